//! Zero-sized repositories with async query methods over `&PgPool`.

pub mod karma_action_repo;
pub mod plate_repo;
pub mod user_repo;

pub use karma_action_repo::KarmaActionRepo;
pub use plate_repo::{ApplyRatingResult, PlateRepo};
pub use user_repo::UserRepo;
