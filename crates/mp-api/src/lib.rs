//! Mining prediction API: library crate for the HTTP server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `mp-e2e-tests`) can reach `AppState`, `build_router` and the
//! request orchestrator.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;
pub mod state;
