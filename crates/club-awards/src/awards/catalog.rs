//! Static award catalog.
//!
//! The catalog carries identifiers and display metadata only; which predicate
//! grants which award lives in the rule modules. Definitions are immutable at
//! runtime.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::domain::Position;

/// Every award the engine can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardId {
    // RSVP-triggered
    FirstDip,
    FirstMatch,
    FirstTournament,
    ThirteenthPlayer,
    FullBench,
    RoadTrip,
    InternationalWaters,
    CampSpirit,
    BigStage,
    EarlyBird,
    LastMinuteHero,
    // Streak thresholds
    DoubleUp,
    HatTrick,
    GreatEight,
    IronStreak,
    // Temporal patterns
    PerfectWeek,
    UnbrokenMonth,
    StreakSaver,
    SeasonCenturion,
    // Attendance-triggered
    MondayRegular,
    TuesdayRegular,
    WednesdayRegular,
    ThursdayRegular,
    FridayRegular,
    SaturdayRegular,
    SundayRegular,
    NewYearSplash,
    // Team-assignment-triggered
    TeamWhite,
    TeamBlack,
    ThirdTeam,
    CaptainsPick,
    PositionGoalkeeper,
    PositionCentreBack,
    PositionCentreForward,
    PositionWing,
    UtilityPlayer,
    // Profile-load-triggered
    #[serde(rename = "anniversary_1")]
    AnniversaryOne,
    #[serde(rename = "anniversary_5")]
    AnniversaryFive,
    #[serde(rename = "anniversary_10")]
    AnniversaryTen,
    ForwardPlanner,
    RockSolid,
    Bedrock,
    FirstResponder,
    // Scheduled / seasonal
    SummerSplash,
    // Lifetime milestones
    #[serde(rename = "milestone_5")]
    MilestoneFive,
    #[serde(rename = "milestone_10")]
    MilestoneTen,
    #[serde(rename = "milestone_25")]
    MilestoneTwentyFive,
    #[serde(rename = "milestone_50")]
    MilestoneFifty,
    #[serde(rename = "milestone_100")]
    MilestoneHundred,
    #[serde(rename = "milestone_200")]
    MilestoneTwoHundred,
}

impl AwardId {
    /// Stable string code, as stored in the grant ledger.
    pub const fn code(self) -> &'static str {
        match self {
            AwardId::FirstDip => "first_dip",
            AwardId::FirstMatch => "first_match",
            AwardId::FirstTournament => "first_tournament",
            AwardId::ThirteenthPlayer => "thirteenth_player",
            AwardId::FullBench => "full_bench",
            AwardId::RoadTrip => "road_trip",
            AwardId::InternationalWaters => "international_waters",
            AwardId::CampSpirit => "camp_spirit",
            AwardId::BigStage => "big_stage",
            AwardId::EarlyBird => "early_bird",
            AwardId::LastMinuteHero => "last_minute_hero",
            AwardId::DoubleUp => "double_up",
            AwardId::HatTrick => "hat_trick",
            AwardId::GreatEight => "great_eight",
            AwardId::IronStreak => "iron_streak",
            AwardId::PerfectWeek => "perfect_week",
            AwardId::UnbrokenMonth => "unbroken_month",
            AwardId::StreakSaver => "streak_saver",
            AwardId::SeasonCenturion => "season_centurion",
            AwardId::MondayRegular => "monday_regular",
            AwardId::TuesdayRegular => "tuesday_regular",
            AwardId::WednesdayRegular => "wednesday_regular",
            AwardId::ThursdayRegular => "thursday_regular",
            AwardId::FridayRegular => "friday_regular",
            AwardId::SaturdayRegular => "saturday_regular",
            AwardId::SundayRegular => "sunday_regular",
            AwardId::NewYearSplash => "new_year_splash",
            AwardId::TeamWhite => "team_white",
            AwardId::TeamBlack => "team_black",
            AwardId::ThirdTeam => "third_team",
            AwardId::CaptainsPick => "captains_pick",
            AwardId::PositionGoalkeeper => "position_goalkeeper",
            AwardId::PositionCentreBack => "position_centre_back",
            AwardId::PositionCentreForward => "position_centre_forward",
            AwardId::PositionWing => "position_wing",
            AwardId::UtilityPlayer => "utility_player",
            AwardId::AnniversaryOne => "anniversary_1",
            AwardId::AnniversaryFive => "anniversary_5",
            AwardId::AnniversaryTen => "anniversary_10",
            AwardId::ForwardPlanner => "forward_planner",
            AwardId::RockSolid => "rock_solid",
            AwardId::Bedrock => "bedrock",
            AwardId::FirstResponder => "first_responder",
            AwardId::SummerSplash => "summer_splash",
            AwardId::MilestoneFive => "milestone_5",
            AwardId::MilestoneTen => "milestone_10",
            AwardId::MilestoneTwentyFive => "milestone_25",
            AwardId::MilestoneFifty => "milestone_50",
            AwardId::MilestoneHundred => "milestone_100",
            AwardId::MilestoneTwoHundred => "milestone_200",
        }
    }

    /// Weekday-regular award for a given weekday.
    pub fn for_weekday(weekday: Weekday) -> AwardId {
        match weekday {
            Weekday::Mon => AwardId::MondayRegular,
            Weekday::Tue => AwardId::TuesdayRegular,
            Weekday::Wed => AwardId::WednesdayRegular,
            Weekday::Thu => AwardId::ThursdayRegular,
            Weekday::Fri => AwardId::FridayRegular,
            Weekday::Sat => AwardId::SaturdayRegular,
            Weekday::Sun => AwardId::SundayRegular,
        }
    }

    /// Position-loyalty award for a given position.
    pub fn for_position(position: Position) -> AwardId {
        match position {
            Position::Goalkeeper => AwardId::PositionGoalkeeper,
            Position::CentreBack => AwardId::PositionCentreBack,
            Position::CentreForward => AwardId::PositionCentreForward,
            Position::Wing => AwardId::PositionWing,
        }
    }
}

impl std::fmt::Display for AwardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Consecutive-attendance streak thresholds and their awards.
pub const STREAK_LADDER: [(u32, AwardId); 4] = [
    (2, AwardId::DoubleUp),
    (3, AwardId::HatTrick),
    (8, AwardId::GreatEight),
    (24, AwardId::IronStreak),
];

/// Lifetime attended-session thresholds and their awards.
pub const MILESTONE_LADDER: [(u32, AwardId); 6] = [
    (5, AwardId::MilestoneFive),
    (10, AwardId::MilestoneTen),
    (25, AwardId::MilestoneTwentyFive),
    (50, AwardId::MilestoneFifty),
    (100, AwardId::MilestoneHundred),
    (200, AwardId::MilestoneTwoHundred),
];

/// Display metadata for one award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AwardDefinition {
    pub id: AwardId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// The full catalog, in display order.
pub fn catalog() -> &'static [AwardDefinition] {
    CATALOG
}

/// Look up display metadata for an award.
pub fn definition(id: AwardId) -> &'static AwardDefinition {
    CATALOG
        .iter()
        .find(|definition| definition.id == id)
        .expect("every award id has a catalog entry")
}

static CATALOG: &[AwardDefinition] = &[
    AwardDefinition {
        id: AwardId::FirstDip,
        name: "First Dip",
        description: "Signed up for your first event.",
        icon: "droplet",
    },
    AwardDefinition {
        id: AwardId::FirstMatch,
        name: "Match Debut",
        description: "First yes to a match.",
        icon: "whistle",
    },
    AwardDefinition {
        id: AwardId::FirstTournament,
        name: "Tournament Debut",
        description: "First yes to a tournament.",
        icon: "bracket",
    },
    AwardDefinition {
        id: AwardId::ThirteenthPlayer,
        name: "Thirteenth Player",
        description: "Thirteenth name on the sheet.",
        icon: "shirt-13",
    },
    AwardDefinition {
        id: AwardId::FullBench,
        name: "Full Bench",
        description: "Part of a twenty-four strong sign-up.",
        icon: "bench",
    },
    AwardDefinition {
        id: AwardId::RoadTrip,
        name: "Road Trip",
        description: "Signed up for an away venue.",
        icon: "van",
    },
    AwardDefinition {
        id: AwardId::InternationalWaters,
        name: "International Waters",
        description: "Signed up for an event outside the UK.",
        icon: "globe",
    },
    AwardDefinition {
        id: AwardId::CampSpirit,
        name: "Camp Spirit",
        description: "Signed up for a camp.",
        icon: "tent",
    },
    AwardDefinition {
        id: AwardId::BigStage,
        name: "Big Stage",
        description: "Signed up for a final or national event.",
        icon: "trophy",
    },
    AwardDefinition {
        id: AwardId::EarlyBird,
        name: "Early Bird",
        description: "RSVP'd more than a week ahead.",
        icon: "bird",
    },
    AwardDefinition {
        id: AwardId::LastMinuteHero,
        name: "Last-Minute Hero",
        description: "RSVP'd within two hours of the start.",
        icon: "stopwatch",
    },
    AwardDefinition {
        id: AwardId::DoubleUp,
        name: "Double Up",
        description: "Two eligible sessions in a row.",
        icon: "streak-2",
    },
    AwardDefinition {
        id: AwardId::HatTrick,
        name: "Hat-Trick",
        description: "Three eligible sessions in a row.",
        icon: "streak-3",
    },
    AwardDefinition {
        id: AwardId::GreatEight,
        name: "Great Eight",
        description: "Eight eligible sessions in a row.",
        icon: "streak-8",
    },
    AwardDefinition {
        id: AwardId::IronStreak,
        name: "Iron Streak",
        description: "Twenty-four eligible sessions in a row.",
        icon: "streak-24",
    },
    AwardDefinition {
        id: AwardId::PerfectWeek,
        name: "Perfect Week",
        description: "Attended every session in a multi-session week.",
        icon: "calendar-week",
    },
    AwardDefinition {
        id: AwardId::UnbrokenMonth,
        name: "Unbroken Month",
        description: "Attended every session in a busy month.",
        icon: "calendar-month",
    },
    AwardDefinition {
        id: AwardId::StreakSaver,
        name: "Streak Saver",
        description: "Came back the week after a blank week.",
        icon: "lifebuoy",
    },
    AwardDefinition {
        id: AwardId::SeasonCenturion,
        name: "Season Centurion",
        description: "One hundred sessions in a single season.",
        icon: "laurel",
    },
    AwardDefinition {
        id: AwardId::MondayRegular,
        name: "Monday Regular",
        description: "Ten attendances on a Monday.",
        icon: "day-mon",
    },
    AwardDefinition {
        id: AwardId::TuesdayRegular,
        name: "Tuesday Regular",
        description: "Ten attendances on a Tuesday.",
        icon: "day-tue",
    },
    AwardDefinition {
        id: AwardId::WednesdayRegular,
        name: "Wednesday Regular",
        description: "Ten attendances on a Wednesday.",
        icon: "day-wed",
    },
    AwardDefinition {
        id: AwardId::ThursdayRegular,
        name: "Thursday Regular",
        description: "Ten attendances on a Thursday.",
        icon: "day-thu",
    },
    AwardDefinition {
        id: AwardId::FridayRegular,
        name: "Friday Regular",
        description: "Ten attendances on a Friday.",
        icon: "day-fri",
    },
    AwardDefinition {
        id: AwardId::SaturdayRegular,
        name: "Saturday Regular",
        description: "Ten attendances on a Saturday.",
        icon: "day-sat",
    },
    AwardDefinition {
        id: AwardId::SundayRegular,
        name: "Sunday Regular",
        description: "Ten attendances on a Sunday.",
        icon: "day-sun",
    },
    AwardDefinition {
        id: AwardId::NewYearSplash,
        name: "New Year Splash",
        description: "In the water during the first week of January.",
        icon: "fireworks",
    },
    AwardDefinition {
        id: AwardId::TeamWhite,
        name: "True White",
        description: "Five outings for a white team.",
        icon: "cap-white",
    },
    AwardDefinition {
        id: AwardId::TeamBlack,
        name: "Back in Black",
        description: "Five outings for a black team.",
        icon: "cap-black",
    },
    AwardDefinition {
        id: AwardId::ThirdTeam,
        name: "Third Team",
        description: "Assigned to a team that is neither white nor black.",
        icon: "cap-other",
    },
    AwardDefinition {
        id: AwardId::CaptainsPick,
        name: "Captain's Pick",
        description: "First name a captain put on the sheet.",
        icon: "armband",
    },
    AwardDefinition {
        id: AwardId::PositionGoalkeeper,
        name: "Between the Posts",
        description: "Ten outings in goal.",
        icon: "gloves",
    },
    AwardDefinition {
        id: AwardId::PositionCentreBack,
        name: "Holding the Middle",
        description: "Ten outings at centre back.",
        icon: "shield",
    },
    AwardDefinition {
        id: AwardId::PositionCentreForward,
        name: "Point of the Spear",
        description: "Ten outings at centre forward.",
        icon: "target",
    },
    AwardDefinition {
        id: AwardId::PositionWing,
        name: "Wide Open",
        description: "Ten outings on the wing.",
        icon: "wing",
    },
    AwardDefinition {
        id: AwardId::UtilityPlayer,
        name: "Utility Player",
        description: "Played every position at least once.",
        icon: "swiss-knife",
    },
    AwardDefinition {
        id: AwardId::AnniversaryOne,
        name: "One-Year Club",
        description: "A year since your first sign-up.",
        icon: "candle-1",
    },
    AwardDefinition {
        id: AwardId::AnniversaryFive,
        name: "Five-Year Club",
        description: "Five years since your first sign-up.",
        icon: "candle-5",
    },
    AwardDefinition {
        id: AwardId::AnniversaryTen,
        name: "Ten-Year Club",
        description: "Ten years since your first sign-up.",
        icon: "candle-10",
    },
    AwardDefinition {
        id: AwardId::ForwardPlanner,
        name: "Forward Planner",
        description: "Twenty sign-ups made more than a day ahead.",
        icon: "planner",
    },
    AwardDefinition {
        id: AwardId::RockSolid,
        name: "Rock Solid",
        description: "Twenty-five sessions without a late cancellation.",
        icon: "rock",
    },
    AwardDefinition {
        id: AwardId::Bedrock,
        name: "Bedrock",
        description: "Fifty sessions without a late cancellation.",
        icon: "mountain",
    },
    AwardDefinition {
        id: AwardId::FirstResponder,
        name: "First Responder",
        description: "Fifteen sign-ups within a day of the invite.",
        icon: "bolt",
    },
    AwardDefinition {
        id: AwardId::SummerSplash,
        name: "Summer Splash",
        description: "Ten sessions in the spring and summer window.",
        icon: "sun",
    },
    AwardDefinition {
        id: AwardId::MilestoneFive,
        name: "Getting Started",
        description: "Five sessions attended.",
        icon: "count-5",
    },
    AwardDefinition {
        id: AwardId::MilestoneTen,
        name: "Finding a Rhythm",
        description: "Ten sessions attended.",
        icon: "count-10",
    },
    AwardDefinition {
        id: AwardId::MilestoneTwentyFive,
        name: "Quarter Century",
        description: "Twenty-five sessions attended.",
        icon: "count-25",
    },
    AwardDefinition {
        id: AwardId::MilestoneFifty,
        name: "Half Century",
        description: "Fifty sessions attended.",
        icon: "count-50",
    },
    AwardDefinition {
        id: AwardId::MilestoneHundred,
        name: "Centurion",
        description: "One hundred sessions attended.",
        icon: "count-100",
    },
    AwardDefinition {
        id: AwardId::MilestoneTwoHundred,
        name: "Double Centurion",
        description: "Two hundred sessions attended.",
        icon: "count-200",
    },
];
