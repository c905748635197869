//! Exercise resolution and workout expansion.
//!
//! Pure functions over the program catalog:
//! - Merge a base exercise with an occurrence's overrides
//! - Reduce composite day-tokens to a workout-type lookup key
//! - Expand a day-token into fully resolved sections

use crate::types::*;

/// Merge a base exercise record with an occurrence's overrides
///
/// For each of sets/reps/RPE/notes the override wins when present, else
/// the base default applies, else the field stays absent. Identity fields
/// (`name`, `category`, `video_url`) always come from the base record.
///
/// If the occurrence references an id with no catalog entry, the
/// occurrence's own fields stand in as display values (degraded mode);
/// a bad reference is never fatal.
pub fn resolve(occurrence: &ExerciseOccurrence, catalog: &ExerciseCatalog) -> ResolvedExercise {
    match catalog.exercises.get(&occurrence.id) {
        Some(base) => ResolvedExercise {
            id: base.id.clone(),
            name: base.name.clone(),
            category: base.category.clone(),
            video_url: base.video_url.clone(),
            sets: occurrence.sets.or(base.default_sets),
            reps: occurrence.reps.clone().or_else(|| base.default_reps.clone()),
            rpe: occurrence.rpe.clone().or_else(|| base.default_rpe.clone()),
            notes: occurrence
                .notes
                .clone()
                .or_else(|| base.default_notes.clone()),
        },
        None => {
            tracing::debug!("Exercise '{}' not in catalog, degraded display", occurrence.id);
            ResolvedExercise {
                id: occurrence.id.clone(),
                name: occurrence.id.clone(),
                category: None,
                video_url: None,
                sets: occurrence.sets,
                reps: occurrence.reps.clone(),
                rpe: occurrence.rpe.clone(),
                notes: occurrence.notes.clone(),
            }
        }
    }
}

/// Reduce a day-token to its base workout-type name
///
/// Splits on literal `" OR "` and keeps the first alternative, strips a
/// trailing display-only `*`, and trims whitespace. This is the canonical
/// extraction used everywhere a day-token becomes a lookup key.
pub fn reduce_token(token: &str) -> &str {
    let first = token.split(" OR ").next().unwrap_or(token);
    first.trim().trim_end_matches('*').trim()
}

/// A workout section with every occurrence resolved against the catalog
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedSection {
    pub title: String,
    pub exercises: Vec<ResolvedExercise>,
}

impl ExpandedSection {
    /// Whether this section holds recovery/rest content
    pub fn is_recovery(&self) -> bool {
        self.title.to_lowercase().contains("recovery")
    }
}

/// A fully expanded workout for one scheduled day
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedWorkout {
    pub name: String,
    pub sections: Vec<ExpandedSection>,
    pub rpe_range: Option<String>,
    pub notes: Option<String>,
}

impl ExpandedWorkout {
    /// Exercise occurrences that count toward completion totals
    ///
    /// On an `"Off"` day only recovery sections carry trackable content;
    /// every other workout counts all of its sections.
    pub fn countable_sections(&self) -> impl Iterator<Item = &ExpandedSection> {
        let off_day = self.name == "Off";
        self.sections
            .iter()
            .filter(move |s| !off_day || s.is_recovery())
    }

    /// Total number of countable exercises
    pub fn total_exercises(&self) -> usize {
        self.countable_sections().map(|s| s.exercises.len()).sum()
    }
}

/// Expand a day-token into resolved sections
///
/// Returns `None` when the reduced token is not a key of the program's
/// workout types; callers treat that day as having zero exercises.
/// Pure and idempotent with respect to its inputs.
pub fn expand(
    token: &str,
    program: &Program,
    catalog: &ExerciseCatalog,
) -> Option<ExpandedWorkout> {
    let base = reduce_token(token);
    let workout = program.workout_types.get(base)?;

    let sections = workout
        .sections
        .iter()
        .map(|section| ExpandedSection {
            title: section.title.clone(),
            exercises: section
                .exercises
                .iter()
                .map(|occ| resolve(occ, catalog))
                .collect(),
        })
        .collect();

    Some(ExpandedWorkout {
        name: workout.name.clone(),
        sections,
        rpe_range: workout.rpe_range.clone(),
        notes: workout.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, default_program};

    #[test]
    fn test_resolve_inherits_base_defaults() {
        let catalog = default_catalog();
        let resolved = resolve(&ExerciseOccurrence::bare("trap_bar_dl"), catalog);

        let base = &catalog.exercises["trap_bar_dl"];
        assert_eq!(resolved.name, base.name);
        assert_eq!(resolved.sets, base.default_sets);
        assert_eq!(resolved.reps, base.default_reps);
        assert_eq!(resolved.rpe, base.default_rpe);
    }

    #[test]
    fn test_resolve_override_wins() {
        let catalog = default_catalog();
        let mut occurrence = ExerciseOccurrence::bare("trap_bar_dl");
        occurrence.reps = Some("3".into());
        occurrence.rpe = Some("9".into());

        let resolved = resolve(&occurrence, catalog);
        assert_eq!(resolved.reps.as_deref(), Some("3"));
        assert_eq!(resolved.rpe.as_deref(), Some("9"));
        // Untouched fields still come from the base
        assert_eq!(resolved.sets, catalog.exercises["trap_bar_dl"].default_sets);
    }

    #[test]
    fn test_resolve_preserves_identity() {
        let catalog = default_catalog();
        let mut occurrence = ExerciseOccurrence::bare("long_toss");
        occurrence.sets = Some(99);
        occurrence.notes = Some("custom".into());

        let resolved = resolve(&occurrence, catalog);
        assert_eq!(resolved.name, catalog.exercises["long_toss"].name);
        assert_eq!(resolved.category, catalog.exercises["long_toss"].category);
    }

    #[test]
    fn test_resolve_unknown_id_degrades() {
        let catalog = default_catalog();
        let mut occurrence = ExerciseOccurrence::bare("mystery_drill");
        occurrence.reps = Some("5".into());

        let resolved = resolve(&occurrence, catalog);
        assert_eq!(resolved.id, "mystery_drill");
        assert_eq!(resolved.name, "mystery_drill");
        assert_eq!(resolved.reps.as_deref(), Some("5"));
        assert_eq!(resolved.sets, None);
    }

    #[test]
    fn test_reduce_token_plain() {
        assert_eq!(reduce_token("Velocity"), "Velocity");
    }

    #[test]
    fn test_reduce_token_composite_with_variant_marker() {
        assert_eq!(reduce_token("Recovery OR Hybrid B*"), "Recovery");
        assert_eq!(reduce_token("Hybrid B*"), "Hybrid B");
        assert_eq!(reduce_token("  Recovery  "), "Recovery");
    }

    #[test]
    fn test_expand_unknown_token_is_none() {
        assert!(expand("Bullpen", default_program(), default_catalog()).is_none());
    }

    #[test]
    fn test_expand_is_idempotent() {
        let a = expand("Recovery OR Hybrid B*", default_program(), default_catalog());
        let b = expand("Recovery OR Hybrid B*", default_program(), default_catalog());
        assert_eq!(a, b);
        assert_eq!(a.unwrap().name, "Recovery");
    }

    #[test]
    fn test_off_day_counts_only_recovery() {
        let expanded = expand("Off", default_program(), default_catalog()).unwrap();
        assert_eq!(expanded.total_exercises(), 1);
    }

    #[test]
    fn test_regular_day_counts_all_sections() {
        let expanded = expand("Hybrid A", default_program(), default_catalog()).unwrap();
        let by_hand: usize = expanded.sections.iter().map(|s| s.exercises.len()).sum();
        assert_eq!(expanded.total_exercises(), by_hand);
        assert!(by_hand > 0);
    }
}
