//! Core domain types for the Dugout training tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Base exercises and their per-workout occurrences
//! - Workout sections and workout types
//! - The program definition (workout types + week/day schedule)
//! - The generated calendar grid and its per-day progress state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Exercise Types
// ============================================================================

/// A category grouping for exercises (e.g. "Throwing", "Mobility")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseCategory {
    pub id: String,
    pub name: String,
}

/// A base exercise definition with its default prescription values
///
/// Immutable once loaded. Per-workout occurrences may override the
/// defaults but never the identity fields (`id`, `name`, `category`,
/// `video_url`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseExercise {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_notes: Option<String>,
}

/// One placement of an exercise within a workout section
///
/// Carries a reference to a base exercise plus zero or more overrides.
/// An occurrence with no overrides inherits all base values unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOccurrence {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseOccurrence {
    /// An occurrence that inherits every base value
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sets: None,
            reps: None,
            rpe: None,
            notes: None,
        }
    }
}

/// The effective display values for one exercise occurrence
///
/// Produced by merging a base exercise with an occurrence's overrides.
/// Identity (`id`, `name`, `category`, `video_url`) always comes from the
/// base record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedExercise {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Workout and Program Types
// ============================================================================

/// A named, ordered block of exercises within a workout
///
/// Section order and exercise order are display-significant and preserved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSection {
    pub title: String,
    pub exercises: Vec<ExerciseOccurrence>,
}

/// A workout type (e.g. "Velocity", "Recovery", "Off")
///
/// The name `"Off"` denotes a rest day; by convention it carries only a
/// recovery section.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutType {
    pub id: String,
    pub name: String,
    /// Opaque color/style tag consumed only by the presentation layer
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sections: Vec<WorkoutSection>,
}

/// One scheduled week: exactly 7 day-tokens
///
/// A day-token is either a literal workout-type name or a composite
/// `"A OR B"` expression, optionally suffixed with a display-only `*`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub days: Vec<String>,
}

/// The declarative week/day layout of a program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub weeks: Vec<Week>,
    pub length: u32,
    pub unit: String,
}

/// A complete training program definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub workout_types: HashMap<String, WorkoutType>,
    pub schedule: Schedule,
}

/// The base exercise dictionary shared by all workout types
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExerciseCatalog {
    #[serde(default)]
    pub categories: HashMap<String, ExerciseCategory>,
    #[serde(default)]
    pub exercises: HashMap<String, BaseExercise>,
}

// ============================================================================
// Calendar Grid Types
// ============================================================================

/// One dated day of the generated calendar
///
/// The mutable portion (`completed`, `user_notes`) is owned by the
/// progress layer; generation always seeds it empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDay {
    pub date: NaiveDate,
    /// The original day-token, possibly composite (e.g. `"Recovery OR Hybrid B*"`)
    pub workout: String,
    #[serde(default)]
    pub completed: HashMap<String, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}

impl ScheduledDay {
    /// A fresh day with no progress recorded
    pub fn new(date: NaiveDate, workout: impl Into<String>) -> Self {
        Self {
            date,
            workout: workout.into(),
            completed: HashMap::new(),
            user_notes: None,
        }
    }
}

/// The generated week × day matrix of scheduled days
pub type Grid = Vec<Vec<ScheduledDay>>;
