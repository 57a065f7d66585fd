//! Database row structs and DTOs.
//!
//! Row structs derive `FromRow` and convert into the domain records from
//! `autokarma_core::records` where the ledger needs them.

pub mod karma_action;
pub mod plate;
pub mod user;
