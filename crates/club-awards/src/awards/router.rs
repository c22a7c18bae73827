//! HTTP surface for the engine: the trigger entry point other subsystems
//! call, and the sweep entry point for the external scheduler. The
//! scheduler authenticates itself (shared-secret header) before reaching
//! this router; that check lives outside the engine.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

use super::catalog::AwardId;
use super::domain::{PersonId, Trigger};
use super::engine::{AwardEngine, SweepReport};
use super::history::HistoryReader;
use super::ledger::GrantLedger;

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) person_id: PersonId,
    #[serde(flatten)]
    pub(crate) trigger: Trigger,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) person_id: PersonId,
    pub(crate) granted: Vec<AwardId>,
}

/// Router builder exposing trigger evaluation and the bulk sweep.
pub fn awards_router<H, L>(engine: Arc<AwardEngine<H, L>>) -> Router
where
    H: HistoryReader + 'static,
    L: GrantLedger + 'static,
{
    Router::new()
        .route("/api/v1/awards/evaluate", post(evaluate_handler::<H, L>))
        .route("/api/v1/awards/sweep", post(sweep_handler::<H, L>))
        .with_state(engine)
}

/// Always 200: the engine swallows evaluator failures and the worst case
/// is an empty grant list.
pub(crate) async fn evaluate_handler<H, L>(
    State(engine): State<Arc<AwardEngine<H, L>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    H: HistoryReader + 'static,
    L: GrantLedger + 'static,
{
    let granted = engine.evaluate(&request.person_id, &request.trigger);
    let body = EvaluateResponse {
        person_id: request.person_id,
        granted,
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn sweep_handler<H, L>(
    State(engine): State<Arc<AwardEngine<H, L>>>,
) -> axum::Json<SweepReport>
where
    H: HistoryReader + 'static,
    L: GrantLedger + 'static,
{
    axum::Json(engine.sweep())
}
