//! AutoKarma server library.
//!
//! Exposes configuration, state, error handling and routes so integration
//! tests and the binary entrypoints share them.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
