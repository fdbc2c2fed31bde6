//! Habit Tracker HTTP API Service.
//!
//! This crate provides the HTTP API for the habit tracker:
//!
//! - Habit management with refreshed streak and progress
//! - Completion logging (increment or set today's count)
//! - Per-user daily reset and cross-habit streak
//!
//! The operations themselves live in [`HabitTracker`]; handlers only map
//! HTTP requests onto it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers call the synchronous tracker

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tracker;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use tracker::{HabitSummary, HabitTracker};
