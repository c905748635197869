//! Progress aggregation and mutation.
//!
//! Completion state lives on each `ScheduledDay` as a map keyed by the
//! serialized [`CompletionKey`]. This module derives per-day and
//! whole-program statistics from that map cross-referenced against the
//! expanded workout, and applies the user-triggered mutations.

use crate::error::{Error, Result};
use crate::resolve::{expand, ExpandedWorkout};
use crate::types::{ExerciseCatalog, Grid, Program, ScheduledDay};
use std::fmt;
use std::str::FromStr;

/// Serialization version prefix for completion keys
///
/// Bumped whenever the key scheme changes so keys orphaned by a schema
/// change are detectable instead of silently ignored.
const KEY_VERSION: &str = "v1";

/// Composite identity of one trackable exercise occurrence
///
/// Joins the completion map with the resolved exercise list, so it must
/// stay stable across re-renders and across reloading persisted state.
/// Serialized form: `v1:w<week>:d<day>:<section-lowercased>:<exercise-id>`.
/// `:` is the field separator, so section titles have any `:` replaced
/// with `-` at construction to keep the serialized form unambiguous.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompletionKey {
    pub week: usize,
    pub day: usize,
    pub section: String,
    pub exercise: String,
}

impl CompletionKey {
    pub fn new(week: usize, day: usize, section: &str, exercise: &str) -> Self {
        Self {
            week,
            day,
            section: section.to_lowercase().replace(':', "-"),
            exercise: exercise.to_string(),
        }
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:w{}:d{}:{}:{}",
            KEY_VERSION, self.week, self.day, self.section, self.exercise
        )
    }
}

impl FromStr for CompletionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(5, ':');
        let version = parts.next().unwrap_or_default();
        if version != KEY_VERSION {
            return Err(Error::Store(format!(
                "Unknown completion key version '{}' in '{}'",
                version, s
            )));
        }

        let week = parts
            .next()
            .and_then(|p| p.strip_prefix('w'))
            .and_then(|p| p.parse().ok());
        let day = parts
            .next()
            .and_then(|p| p.strip_prefix('d'))
            .and_then(|p| p.parse().ok());
        let section = parts.next();
        let exercise = parts.next();

        match (week, day, section, exercise) {
            (Some(week), Some(day), Some(section), Some(exercise)) => Ok(Self {
                week,
                day,
                section: section.to_string(),
                exercise: exercise.to_string(),
            }),
            _ => Err(Error::Store(format!("Malformed completion key '{}'", s))),
        }
    }
}

/// Enumerate the completion keys for every countable exercise of a day
pub fn day_keys(expanded: &ExpandedWorkout, week: usize, day: usize) -> Vec<CompletionKey> {
    expanded
        .countable_sections()
        .flat_map(|section| {
            section
                .exercises
                .iter()
                .map(|ex| CompletionKey::new(week, day, &section.title, &ex.id))
        })
        .collect()
}

/// Completion statistics for one scheduled day
#[derive(Clone, Debug, PartialEq)]
pub struct DayStats {
    pub total: usize,
    pub completed: usize,
    /// `None` when the day has no trackable exercises; absence is
    /// distinct from zero progress
    pub percentage: Option<f64>,
    pub is_complete: bool,
    pub is_in_progress: bool,
}

impl DayStats {
    fn empty() -> Self {
        Self {
            total: 0,
            completed: 0,
            percentage: None,
            is_complete: false,
            is_in_progress: false,
        }
    }
}

/// Whole-program completion statistics, counted in days
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramStats {
    pub percentage: u32,
    pub completed: usize,
    pub total: usize,
}

fn completed_count(day: &ScheduledDay) -> usize {
    day.completed.values().filter(|v| **v).count()
}

/// Compute completion statistics for day `(week, day)` of the grid
///
/// `total` comes from the expanded workout's countable sections and is 0
/// when the day-token doesn't resolve; `completed` counts `true` entries
/// in the day's completion map.
pub fn day_stats(
    grid: &Grid,
    week: usize,
    day: usize,
    program: &Program,
    catalog: &ExerciseCatalog,
) -> DayStats {
    let Some(scheduled) = grid.get(week).and_then(|w| w.get(day)) else {
        return DayStats::empty();
    };

    let total = expand(&scheduled.workout, program, catalog)
        .map(|e| e.total_exercises())
        .unwrap_or(0);
    let completed = completed_count(scheduled);

    let is_complete = total > 0 && completed >= total;
    DayStats {
        total,
        completed,
        percentage: (total > 0).then(|| completed as f64 / total as f64 * 100.0),
        is_complete,
        is_in_progress: completed > 0 && !is_complete,
    }
}

/// Compute whole-program statistics: days complete out of days scheduled
pub fn program_stats(grid: &Grid, program: &Program, catalog: &ExerciseCatalog) -> ProgramStats {
    let total: usize = grid.iter().map(|w| w.len()).sum();
    let completed = grid
        .iter()
        .enumerate()
        .flat_map(|(w, week)| (0..week.len()).map(move |d| (w, d)))
        .filter(|&(w, d)| day_stats(grid, w, d, program, catalog).is_complete)
        .count();

    let percentage = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    ProgramStats {
        percentage,
        completed,
        total,
    }
}

fn day_mut<'a>(grid: &'a mut Grid, week: usize, day: usize) -> Result<&'a mut ScheduledDay> {
    grid.get_mut(week)
        .and_then(|w| w.get_mut(day))
        .ok_or_else(|| Error::Store(format!("No scheduled day at week {} day {}", week, day)))
}

/// Toggle one exercise's completion flag, returning the new value
///
/// Touches exactly one day; all other days are left unchanged. The key
/// must identify one of the day's countable exercises — a key outside
/// the expanded workout would insert a phantom entry that counts toward
/// `completed` without any real exercise behind it.
pub fn toggle_exercise(
    grid: &mut Grid,
    week: usize,
    day: usize,
    key: &CompletionKey,
    program: &Program,
    catalog: &ExerciseCatalog,
) -> Result<bool> {
    let scheduled = day_mut(grid, week, day)?;

    let known = expand(&scheduled.workout, program, catalog)
        .map(|expanded| day_keys(&expanded, week, day).contains(key))
        .unwrap_or(false);
    if !known {
        return Err(Error::Store(format!(
            "No exercise matching '{}' on week {} day {}",
            key, week, day
        )));
    }

    let entry = scheduled.completed.entry(key.to_string()).or_insert(false);
    *entry = !*entry;
    let value = *entry;
    tracing::debug!("Toggled {} -> {}", key, value);
    Ok(value)
}

/// Set a batch of exercises on one day to the same completion value
pub fn set_completion(
    grid: &mut Grid,
    week: usize,
    day: usize,
    keys: &[CompletionKey],
    value: bool,
) -> Result<()> {
    let scheduled = day_mut(grid, week, day)?;
    for key in keys {
        scheduled.completed.insert(key.to_string(), value);
    }
    tracing::debug!(
        "Set {} exercises to {} on week {} day {}",
        keys.len(),
        value,
        week,
        day
    );
    Ok(())
}

/// Set or clear one day's free-text notes
pub fn set_notes(grid: &mut Grid, week: usize, day: usize, text: Option<String>) -> Result<()> {
    let scheduled = day_mut(grid, week, day)?;
    scheduled.user_notes = text.filter(|t| !t.trim().is_empty());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, default_program};
    use crate::schedule::generate;
    use chrono::NaiveDate;

    fn test_grid() -> Grid {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        generate(start, default_program()).unwrap()
    }

    fn keys_for(grid: &Grid, w: usize, d: usize) -> Vec<CompletionKey> {
        let expanded = expand(
            &grid[w][d].workout,
            default_program(),
            default_catalog(),
        )
        .unwrap();
        day_keys(&expanded, w, d)
    }

    #[test]
    fn test_completion_key_roundtrip() {
        let key = CompletionKey::new(2, 5, "Warm-up", "band_pullaparts");
        assert_eq!(key.section, "warm-up");

        let serialized = key.to_string();
        assert_eq!(serialized, "v1:w2:d5:warm-up:band_pullaparts");
        assert_eq!(serialized.parse::<CompletionKey>().unwrap(), key);
    }

    #[test]
    fn test_completion_key_rejects_unknown_version() {
        let result = "v2:w0:d0:warm-up:x".parse::<CompletionKey>();
        assert!(result.is_err());
    }

    #[test]
    fn test_fresh_day_stats() {
        let grid = test_grid();
        let stats = day_stats(&grid, 0, 0, default_program(), default_catalog());

        assert!(stats.total > 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.percentage, Some(0.0));
        assert!(!stats.is_complete);
        assert!(!stats.is_in_progress);
    }

    #[test]
    fn test_toggle_marks_in_progress_then_complete() {
        let mut grid = test_grid();
        let keys = keys_for(&grid, 0, 0);

        assert!(
            toggle_exercise(&mut grid, 0, 0, &keys[0], default_program(), default_catalog())
                .unwrap()
        );
        let stats = day_stats(&grid, 0, 0, default_program(), default_catalog());
        assert!(stats.is_in_progress);
        assert!(!stats.is_complete);

        set_completion(&mut grid, 0, 0, &keys, true).unwrap();
        let stats = day_stats(&grid, 0, 0, default_program(), default_catalog());
        assert!(stats.is_complete);
        assert!(!stats.is_in_progress);
        assert_eq!(stats.percentage, Some(100.0));
    }

    #[test]
    fn test_toggle_twice_returns_to_unchecked() {
        let mut grid = test_grid();
        let keys = keys_for(&grid, 0, 0);

        assert!(
            toggle_exercise(&mut grid, 0, 0, &keys[0], default_program(), default_catalog())
                .unwrap()
        );
        assert!(
            !toggle_exercise(&mut grid, 0, 0, &keys[0], default_program(), default_catalog())
                .unwrap()
        );

        let stats = day_stats(&grid, 0, 0, default_program(), default_catalog());
        assert_eq!(stats.completed, 0);
    }

    #[test]
    fn test_mutation_touches_only_target_day() {
        let mut grid = test_grid();
        let keys = keys_for(&grid, 1, 2);
        set_completion(&mut grid, 1, 2, &keys, true).unwrap();

        for (w, week) in grid.iter().enumerate() {
            for (d, day) in week.iter().enumerate() {
                if (w, d) != (1, 2) {
                    assert!(day.completed.is_empty(), "week {} day {} touched", w, d);
                }
            }
        }
    }

    #[test]
    fn test_zero_total_day_has_no_percentage() {
        let mut grid = test_grid();
        grid[0][0].workout = "Unknown Workout".into();
        // Stale completion entries must not make an untrackable day complete
        grid[0][0].completed.insert("v1:w0:d0:x:y".into(), true);

        let stats = day_stats(&grid, 0, 0, default_program(), default_catalog());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage, None);
        assert!(!stats.is_complete);
        assert!(!stats.is_in_progress);
    }

    #[test]
    fn test_program_stats_counts_whole_days() {
        let mut grid = test_grid();
        let total_days: usize = grid.iter().map(|w| w.len()).sum();

        let keys = keys_for(&grid, 0, 0);
        set_completion(&mut grid, 0, 0, &keys, true).unwrap();

        let stats = program_stats(&grid, default_program(), default_catalog());
        assert_eq!(stats.total, total_days);
        assert_eq!(stats.completed, 1);
        assert_eq!(
            stats.percentage,
            (1.0 / total_days as f64 * 100.0).round() as u32
        );
    }

    #[test]
    fn test_set_notes_and_clear() {
        let mut grid = test_grid();
        set_notes(&mut grid, 0, 0, Some("felt strong".into())).unwrap();
        assert_eq!(grid[0][0].user_notes.as_deref(), Some("felt strong"));

        set_notes(&mut grid, 0, 0, Some("   ".into())).unwrap();
        assert!(grid[0][0].user_notes.is_none());
    }

    #[test]
    fn test_out_of_range_day_errors() {
        let mut grid = test_grid();
        let key = CompletionKey::new(99, 0, "warm-up", "x");
        assert!(
            toggle_exercise(&mut grid, 99, 0, &key, default_program(), default_catalog()).is_err()
        );
    }

    #[test]
    fn test_toggle_rejects_key_for_missing_exercise() {
        let mut grid = test_grid();
        // Week 0 day 3 is an "Off" day: one countable recovery exercise
        assert_eq!(grid[0][3].workout, "Off");

        let key = CompletionKey::new(0, 3, "bogus section", "no_such_exercise");
        let result =
            toggle_exercise(&mut grid, 0, 3, &key, default_program(), default_catalog());
        assert!(result.is_err());

        // The rejected key left no phantom entry behind
        assert!(grid[0][3].completed.is_empty());
        let stats = day_stats(&grid, 0, 3, default_program(), default_catalog());
        assert_eq!(stats.completed, 0);
        assert!(!stats.is_complete);
    }

    #[test]
    fn test_toggle_rejects_key_with_mismatched_indices() {
        let mut grid = test_grid();
        // A real exercise of day (0, 0), but keyed for a different day
        let stale = CompletionKey::new(2, 5, "Warm-up", "band_pullaparts");
        assert!(
            toggle_exercise(&mut grid, 0, 0, &stale, default_program(), default_catalog())
                .is_err()
        );
        assert!(grid[0][0].completed.is_empty());
    }

    #[test]
    fn test_completion_key_section_with_colon_roundtrips() {
        let key = CompletionKey::new(0, 1, "Throwing: Bullpen", "long_toss");
        assert_eq!(key.section, "throwing- bullpen");

        let parsed = key.to_string().parse::<CompletionKey>().unwrap();
        assert_eq!(parsed, key);
    }
}
