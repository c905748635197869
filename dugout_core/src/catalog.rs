//! Built-in program and exercise catalog, plus JSON loaders.
//!
//! Programs are normally consumed from two JSON documents (`program.json`
//! and `exercises.json`, see the loaders below). The built-in 8-week
//! throwing program ships in code so the tracker works with no files at
//! all, and so tests have a realistic fixture.

use crate::error::Result;
use crate::resolve::reduce_token;
use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Cached built-in program - built once and reused across all operations
static DEFAULT_PROGRAM: Lazy<Program> = Lazy::new(build_default_program);

/// Cached built-in exercise catalog
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_exercises);

/// Get a reference to the cached built-in program
pub fn default_program() -> &'static Program {
    &DEFAULT_PROGRAM
}

/// Get a reference to the cached built-in exercise catalog
pub fn default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

impl Program {
    /// Load a program definition from a `program.json` document
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let program: Program = serde_json::from_str(&contents)?;
        tracing::info!("Loaded program '{}' from {:?}", program.id, path);
        Ok(program)
    }

    /// Validate the program against an exercise catalog
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    /// Unresolvable exercise references are reported here even though the
    /// runtime treats them as recoverable (degraded display, never fatal).
    pub fn validate(&self, catalog: &ExerciseCatalog) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push("Program has empty id".to_string());
        }

        for (name, workout) in &self.workout_types {
            if name != &workout.name {
                errors.push(format!(
                    "Workout key '{}' doesn't match workout.name '{}'",
                    name, workout.name
                ));
            }
            if workout.id.is_empty() {
                errors.push(format!("Workout '{}' has empty id", name));
            }
            for section in &workout.sections {
                if section.title.is_empty() {
                    errors.push(format!("Workout '{}' has a section with empty title", name));
                }
                for occurrence in &section.exercises {
                    if !catalog.exercises.contains_key(&occurrence.id) {
                        errors.push(format!(
                            "Workout '{}' section '{}' references unknown exercise '{}'",
                            name, section.title, occurrence.id
                        ));
                    }
                }
            }
        }

        if self.schedule.weeks.is_empty() {
            errors.push("Schedule has no weeks".to_string());
        }
        if self.schedule.length as usize != self.schedule.weeks.len() {
            errors.push(format!(
                "Schedule length {} doesn't match week count {}",
                self.schedule.length,
                self.schedule.weeks.len()
            ));
        }

        for (w, week) in self.schedule.weeks.iter().enumerate() {
            if week.days.len() != 7 {
                errors.push(format!(
                    "Week {} has {} day tokens, expected 7",
                    w + 1,
                    week.days.len()
                ));
            }
            for token in &week.days {
                let base = reduce_token(token);
                if !self.workout_types.contains_key(base) {
                    errors.push(format!(
                        "Week {} token '{}' doesn't resolve to a workout type",
                        w + 1,
                        token
                    ));
                }
            }
        }

        errors
    }
}

impl ExerciseCatalog {
    /// Load a base exercise dictionary from an `exercises.json` document
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: ExerciseCatalog = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded {} exercises from {:?}",
            catalog.exercises.len(),
            path
        );
        Ok(catalog)
    }
}

fn exercise(
    id: &str,
    name: &str,
    category: &str,
    sets: Option<u32>,
    reps: Option<&str>,
    rpe: Option<&str>,
) -> BaseExercise {
    BaseExercise {
        id: id.into(),
        name: name.into(),
        category: Some(category.into()),
        video_url: None,
        default_sets: sets,
        default_reps: reps.map(Into::into),
        default_rpe: rpe.map(Into::into),
        default_notes: None,
    }
}

fn build_default_exercises() -> ExerciseCatalog {
    let mut categories = HashMap::new();
    for (id, name) in [
        ("warmup", "Warm-up"),
        ("throwing", "Throwing"),
        ("lifting", "Lifting"),
        ("recovery", "Recovery"),
    ] {
        categories.insert(
            id.to_string(),
            ExerciseCategory {
                id: id.into(),
                name: name.into(),
            },
        );
    }

    let mut exercises = HashMap::new();
    for ex in [
        exercise("band_pullaparts", "Band Pull-aparts", "warmup", Some(2), Some("15"), None),
        exercise("arm_circles", "Arm Circles", "warmup", Some(2), Some("10 each way"), None),
        exercise("wrist_weights", "Wrist Weight Circuit", "warmup", Some(1), Some("10 each"), None),
        exercise("plyo_reverse", "Plyo Ball Reverse Throws", "throwing", Some(1), Some("10"), Some("60-70%")),
        exercise("plyo_pivot", "Plyo Ball Pivot Picks", "throwing", Some(1), Some("10"), Some("60-70%")),
        exercise("long_toss", "Long Toss", "throwing", None, Some("to tolerance"), Some("70-80%")),
        exercise("pulldowns", "Run-and-Gun Pulldowns", "throwing", Some(2), Some("5"), Some("90-100%")),
        exercise("light_catch", "Light Catch", "throwing", None, Some("10-15 min"), Some("<=50%")),
        exercise("trap_bar_dl", "Trap Bar Deadlift", "lifting", Some(3), Some("5"), Some("7-8")),
        exercise("split_squat", "Rear-foot Elevated Split Squat", "lifting", Some(3), Some("8 each"), Some("7")),
        exercise("db_row", "Single-arm DB Row", "lifting", Some(3), Some("10 each"), Some("7")),
        exercise("med_ball_scoop", "Med Ball Scoop Toss", "lifting", Some(3), Some("6 each"), None),
        exercise("sleeper_stretch", "Sleeper Stretch", "recovery", Some(2), Some("30s each"), None),
        exercise("foam_roll", "Foam Roll (T-spine + Lats)", "recovery", Some(1), Some("5 min"), None),
        exercise("band_flush", "Band Flush Circuit", "recovery", Some(2), Some("20"), None),
    ] {
        exercises.insert(ex.id.clone(), ex);
    }

    ExerciseCatalog {
        categories,
        exercises,
    }
}

fn section(title: &str, exercises: Vec<ExerciseOccurrence>) -> WorkoutSection {
    WorkoutSection {
        title: title.into(),
        exercises,
    }
}

fn occurrence(id: &str) -> ExerciseOccurrence {
    ExerciseOccurrence::bare(id)
}

fn occurrence_with(
    id: &str,
    sets: Option<u32>,
    reps: Option<&str>,
    rpe: Option<&str>,
    notes: Option<&str>,
) -> ExerciseOccurrence {
    ExerciseOccurrence {
        id: id.into(),
        sets,
        reps: reps.map(Into::into),
        rpe: rpe.map(Into::into),
        notes: notes.map(Into::into),
    }
}

fn build_default_program() -> Program {
    let mut workout_types = HashMap::new();

    workout_types.insert(
        "Velocity".to_string(),
        WorkoutType {
            id: "velocity".into(),
            name: "Velocity".into(),
            color: "red".into(),
            description: Some("High-intent throwing day".into()),
            rpe_range: Some("90-100%".into()),
            notes: Some("Full rest between pulldown sets.".into()),
            sections: vec![
                section(
                    "Warm-up",
                    vec![
                        occurrence("band_pullaparts"),
                        occurrence("arm_circles"),
                        occurrence("wrist_weights"),
                    ],
                ),
                section(
                    "Throwing",
                    vec![
                        occurrence("plyo_reverse"),
                        occurrence("plyo_pivot"),
                        occurrence_with("long_toss", None, Some("build to max distance"), None, None),
                        occurrence("pulldowns"),
                    ],
                ),
                section(
                    "Recovery",
                    vec![occurrence("band_flush"), occurrence("sleeper_stretch")],
                ),
            ],
        },
    );

    workout_types.insert(
        "Hybrid A".to_string(),
        WorkoutType {
            id: "hybrid_a".into(),
            name: "Hybrid A".into(),
            color: "orange".into(),
            description: Some("Moderate throwing plus lower-body lift".into()),
            rpe_range: Some("70-80%".into()),
            notes: None,
            sections: vec![
                section(
                    "Warm-up",
                    vec![occurrence("band_pullaparts"), occurrence("arm_circles")],
                ),
                section(
                    "Throwing",
                    vec![
                        occurrence("plyo_reverse"),
                        occurrence_with("long_toss", None, Some("20-25 min"), Some("70%"), None),
                    ],
                ),
                section(
                    "Lifting",
                    vec![
                        occurrence("trap_bar_dl"),
                        occurrence("split_squat"),
                        occurrence("med_ball_scoop"),
                    ],
                ),
            ],
        },
    );

    workout_types.insert(
        "Hybrid B".to_string(),
        WorkoutType {
            id: "hybrid_b".into(),
            name: "Hybrid B".into(),
            color: "yellow".into(),
            description: Some("Light throwing plus upper-body lift".into()),
            rpe_range: Some("60-70%".into()),
            notes: None,
            sections: vec![
                section(
                    "Warm-up",
                    vec![occurrence("band_pullaparts"), occurrence("wrist_weights")],
                ),
                section("Throwing", vec![occurrence("light_catch")]),
                section(
                    "Lifting",
                    vec![
                        occurrence("db_row"),
                        occurrence_with("med_ball_scoop", Some(2), None, None, Some("light intent")),
                    ],
                ),
            ],
        },
    );

    workout_types.insert(
        "Recovery".to_string(),
        WorkoutType {
            id: "recovery".into(),
            name: "Recovery".into(),
            color: "green".into(),
            description: Some("Low-intensity flush work".into()),
            rpe_range: Some("<=50%".into()),
            notes: None,
            sections: vec![
                section("Warm-up", vec![occurrence("arm_circles")]),
                section("Throwing", vec![occurrence("light_catch")]),
                section(
                    "Recovery",
                    vec![
                        occurrence("band_flush"),
                        occurrence("sleeper_stretch"),
                        occurrence("foam_roll"),
                    ],
                ),
            ],
        },
    );

    workout_types.insert(
        "Off".to_string(),
        WorkoutType {
            id: "off".into(),
            name: "Off".into(),
            color: "gray".into(),
            description: Some("Full rest day".into()),
            rpe_range: None,
            notes: Some("No throwing. Optional soft-tissue work only.".into()),
            sections: vec![section(
                "Recovery",
                vec![occurrence_with(
                    "foam_roll",
                    None,
                    None,
                    None,
                    Some("optional"),
                )],
            )],
        },
    );

    // Week templates: build-up (weeks 1-2), loading (3-6), taper (7-8)
    let buildup = Week {
        days: [
            "Hybrid A",
            "Recovery",
            "Hybrid B",
            "Off",
            "Hybrid A",
            "Recovery OR Hybrid B*",
            "Off",
        ]
        .map(String::from)
        .to_vec(),
    };
    let loading = Week {
        days: [
            "Velocity",
            "Recovery",
            "Hybrid A",
            "Recovery OR Hybrid B*",
            "Velocity",
            "Recovery",
            "Off",
        ]
        .map(String::from)
        .to_vec(),
    };
    let taper = Week {
        days: [
            "Velocity",
            "Recovery",
            "Hybrid B",
            "Off",
            "Hybrid A",
            "Recovery",
            "Off",
        ]
        .map(String::from)
        .to_vec(),
    };

    let weeks = vec![
        buildup.clone(),
        buildup,
        loading.clone(),
        loading.clone(),
        loading.clone(),
        loading,
        taper.clone(),
        taper,
    ];

    Program {
        id: "offseason_throwing_8wk".into(),
        name: "8-Week Off-season Throwing Program".into(),
        version: "1.0".into(),
        description: "Progressive off-season velocity program: build-up, loading, taper.".into(),
        schedule: Schedule {
            length: weeks.len() as u32,
            unit: "weeks".into(),
            weeks,
        },
        workout_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program_validates() {
        let errors = default_program().validate(default_catalog());
        assert!(
            errors.is_empty(),
            "Default program has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_default_program_shape() {
        let program = default_program();
        assert_eq!(program.schedule.weeks.len(), 8);
        assert_eq!(program.schedule.length, 8);
        for week in &program.schedule.weeks {
            assert_eq!(week.days.len(), 7);
        }
    }

    #[test]
    fn test_all_referenced_exercises_exist() {
        let program = default_program();
        let catalog = default_catalog();
        for workout in program.workout_types.values() {
            for sec in &workout.sections {
                for occurrence in &sec.exercises {
                    assert!(
                        catalog.exercises.contains_key(&occurrence.id),
                        "Exercise {} referenced but not found",
                        occurrence.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_off_day_carries_only_recovery() {
        let off = &default_program().workout_types["Off"];
        assert_eq!(off.sections.len(), 1);
        assert_eq!(off.sections[0].title, "Recovery");
    }

    #[test]
    fn test_validate_reports_short_week() {
        let mut program = default_program().clone();
        program.schedule.weeks[2].days.pop();
        let errors = program.validate(default_catalog());
        assert!(errors.iter().any(|e| e.contains("expected 7")));
    }

    #[test]
    fn test_validate_reports_unknown_token() {
        let mut program = default_program().clone();
        program.schedule.weeks[0].days[0] = "Bullpen".into();
        let errors = program.validate(default_catalog());
        assert!(errors
            .iter()
            .any(|e| e.contains("doesn't resolve to a workout type")));
    }

    #[test]
    fn test_program_json_roundtrip() {
        let program = default_program();
        let json = serde_json::to_string(program).unwrap();
        let parsed: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, *program);
        // Wire casing matches the external document format
        assert!(json.contains("\"workoutTypes\""));
    }
}
