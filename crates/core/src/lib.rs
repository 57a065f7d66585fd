//! Domain core for the plate karma bot.
//!
//! Pure logic only: plate canonicalization, the rating scale, calendar-day
//! windows and the [`ledger::KarmaLedger`] that enforces the daily rating
//! limit over a pluggable [`ledger::KarmaStore`].

pub mod day_window;
pub mod error;
pub mod ledger;
pub mod plate;
pub mod rating;
pub mod records;
pub mod types;
