//! The idempotent grant ledger.
//!
//! Concurrent triggers race to grant the same award; correctness rests on
//! `insert_if_absent` being atomic with respect to the (person, award)
//! uniqueness constraint, not on any application-level locking. A separate
//! `has_grant` probe lets evaluators skip expensive predicate work, but the
//! probe is an optimization only, never the safety mechanism.

use super::catalog::AwardId;
use super::domain::{GrantMetadata, PersonAward, PersonId};

/// Errors surfaced by the grant store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("grant store unavailable: {0}")]
    Unavailable(String),
    #[error("grant write failed: {0}")]
    Write(String),
}

/// Storage abstraction for grant rows.
///
/// Rows are insert-only: once a grant exists it is never updated or removed
/// by the engine.
pub trait GrantLedger: Send + Sync {
    /// Whether the person already holds the award.
    fn has_grant(&self, person: &PersonId, award: AwardId) -> Result<bool, LedgerError>;

    /// Record the grant unless one already exists. Returns `true` iff this
    /// call performed the insert; a `false` from a lost race or an earlier
    /// grant is the expected idempotent outcome, not an error.
    ///
    /// The check and the insert must be one atomic step against the
    /// (person, award) uniqueness constraint.
    fn insert_if_absent(
        &self,
        person: &PersonId,
        award: AwardId,
        metadata: GrantMetadata,
    ) -> Result<bool, LedgerError>;

    /// All grants held by a person, ordered by award time ascending.
    fn grants_for(&self, person: &PersonId) -> Result<Vec<PersonAward>, LedgerError>;
}
