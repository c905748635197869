#![forbid(unsafe_code)]

//! Core domain model and business logic for the Dugout training tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, programs, the calendar grid)
//! - Program catalog loading and validation
//! - Exercise resolution and workout expansion
//! - Schedule generation
//! - Progress aggregation and persistence

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod resolve;
pub mod schedule;
pub mod progress;
pub mod store;
pub mod export;
pub mod view;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_catalog, default_program};
pub use config::Config;
pub use resolve::{expand, reduce_token, resolve, ExpandedWorkout};
pub use schedule::{end_date, generate};
pub use progress::{
    day_keys, day_stats, program_stats, set_completion, set_notes, toggle_exercise,
    CompletionKey, DayStats, ProgramStats,
};
pub use store::ProgressFile;
pub use export::export_progress;
pub use view::{DayFocus, ViewMode};
