//! Karma action rows.

use autokarma_core::error::CoreError;
use autokarma_core::records::{HistoryEntry, KarmaAction};
use autokarma_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `karma_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct KarmaActionRow {
    pub id: DbId,
    pub plate_id: DbId,
    pub user_id: DbId,
    /// `"positive"` or `"negative"`.
    pub action_type: String,
    pub karma_change: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// A karma action joined with its plate's number, for history listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct KarmaActionWithPlate {
    pub id: DbId,
    pub plate_id: DbId,
    pub user_id: DbId,
    pub action_type: String,
    pub karma_change: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub plate_number: String,
}

impl TryFrom<KarmaActionRow> for KarmaAction {
    type Error = CoreError;

    fn try_from(row: KarmaActionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            plate_id: row.plate_id,
            user_id: row.user_id,
            action_type: row.action_type.parse()?,
            karma_change: row.karma_change,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<KarmaActionWithPlate> for HistoryEntry {
    type Error = CoreError;

    fn try_from(row: KarmaActionWithPlate) -> Result<Self, Self::Error> {
        Ok(Self {
            action: KarmaAction {
                id: row.id,
                plate_id: row.plate_id,
                user_id: row.user_id,
                action_type: row.action_type.parse()?,
                karma_change: row.karma_change,
                description: row.description,
                created_at: row.created_at,
            },
            plate_number: row.plate_number,
        })
    }
}
