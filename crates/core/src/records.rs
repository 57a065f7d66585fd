//! Domain records owned by the karma ledger.

use serde::{Deserialize, Serialize};

use crate::rating::ActionType;
use crate::types::{DbId, Timestamp};

/// Aggregate karma for one normalized plate.
///
/// `karma` is the sum of every associated action's `karma_change`, and
/// `total_positive + total_negative` is the number of associated actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateRecord {
    pub id: DbId,
    pub plate_number: String,
    pub karma: i32,
    pub total_positive: i32,
    pub total_negative: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlateRecord {
    pub fn total_ratings(&self) -> i32 {
        self.total_positive + self.total_negative
    }
}

/// One immutable rating in the append-only action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KarmaAction {
    pub id: DbId,
    pub plate_id: DbId,
    pub user_id: DbId,
    pub action_type: ActionType,
    pub karma_change: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// A user's action together with the plate it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub action: KarmaAction,
    pub plate_number: String,
}

/// Ordering for plate rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankDirection {
    /// Highest karma first.
    #[default]
    Best,
    /// Lowest karma first.
    Worst,
}
