//! Car plate aggregate rows.

use autokarma_core::records::PlateRecord;
use autokarma_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `car_plates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarPlate {
    pub id: DbId,
    pub plate_number: String,
    pub karma: i32,
    pub total_positive: i32,
    pub total_negative: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CarPlate> for PlateRecord {
    fn from(row: CarPlate) -> Self {
        Self {
            id: row.id,
            plate_number: row.plate_number,
            karma: row.karma,
            total_positive: row.total_positive,
            total_negative: row.total_negative,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
