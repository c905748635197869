//! Schedule generation: projecting the program layout onto calendar dates.
//!
//! Dates are day-granular (`chrono::NaiveDate`), so the midnight
//! normalization the rest of the system depends on holds by construction.
//! Callers working from wall-clock time convert at the edge
//! (`Local::now().date_naive()`).

use crate::error::{Error, Result};
use crate::types::{Grid, Program, ScheduledDay};
use chrono::{Duration, NaiveDate};

/// Generate the dated week × day grid for a program
///
/// Day `(w, d)` lands on `start + (w*7 + d)` days, so week 0 / day 0 is
/// the start date itself and every week holds exactly 7 contiguous dates.
/// Every generated day starts with an empty completion map and no notes;
/// carrying over prior progress is the caller's concern.
///
/// Errors with `Error::Config` on an empty schedule or a week whose day
/// list is not exactly 7 tokens long.
pub fn generate(start: NaiveDate, program: &Program) -> Result<Grid> {
    if program.schedule.weeks.is_empty() {
        return Err(Error::Config(format!(
            "Program '{}' has no scheduled weeks",
            program.id
        )));
    }

    let mut grid = Vec::with_capacity(program.schedule.weeks.len());
    for (w, week) in program.schedule.weeks.iter().enumerate() {
        if week.days.len() != 7 {
            return Err(Error::Config(format!(
                "Week {} has {} day tokens, expected 7",
                w + 1,
                week.days.len()
            )));
        }

        let mut days = Vec::with_capacity(7);
        for (d, token) in week.days.iter().enumerate() {
            let date = start + Duration::days((w * 7 + d) as i64);
            days.push(ScheduledDay::new(date, token.clone()));
        }
        grid.push(days);
    }

    tracing::debug!(
        "Generated {}-week grid starting {}",
        grid.len(),
        start
    );
    Ok(grid)
}

/// The last day of the last generated week (for display)
pub fn end_date(start: NaiveDate, program: &Program) -> NaiveDate {
    let weeks = program.schedule.weeks.len() as i64;
    start + Duration::days(weeks * 7 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_program;
    use crate::types::{Schedule, Week};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_shape_and_dates() {
        let program = default_program();
        let start = date(2024, 3, 4);
        let grid = generate(start, program).unwrap();

        assert_eq!(grid.len(), program.schedule.weeks.len());
        for (w, week) in grid.iter().enumerate() {
            assert_eq!(week.len(), 7);
            for (d, day) in week.iter().enumerate() {
                assert_eq!(day.date, start + Duration::days((w * 7 + d) as i64));
                assert!(day.completed.is_empty());
                assert!(day.user_notes.is_none());
            }
        }
        assert_eq!(grid[0][0].date, start);
    }

    #[test]
    fn test_weeks_are_contiguous() {
        let grid = generate(date(2024, 3, 4), default_program()).unwrap();
        let mut prev = None;
        for week in &grid {
            for day in week {
                if let Some(p) = prev {
                    assert_eq!(day.date, p + Duration::days(1));
                }
                prev = Some(day.date);
            }
        }
    }

    #[test]
    fn test_one_week_monday_scenario() {
        let mut program = default_program().clone();
        program.schedule.weeks.truncate(1);
        program.schedule.length = 1;

        let start = date(2024, 1, 15); // a Monday
        let grid = generate(start, &program).unwrap();
        assert_eq!(grid[0][0].date, date(2024, 1, 15));
        assert_eq!(grid[0][6].date, date(2024, 1, 21));
        assert_eq!(end_date(start, &program), date(2024, 1, 21));
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let mut program = default_program().clone();
        program.schedule = Schedule {
            weeks: vec![],
            length: 0,
            unit: "weeks".into(),
        };
        assert!(matches!(
            generate(date(2024, 1, 1), &program),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_short_week_rejected() {
        let mut program = default_program().clone();
        program.schedule.weeks = vec![Week {
            days: vec!["Hybrid A".into(), "Off".into()],
        }];
        program.schedule.length = 1;

        let err = generate(date(2024, 1, 1), &program).unwrap_err();
        assert!(err.to_string().contains("expected 7"));
    }

    #[test]
    fn test_grid_preserves_original_tokens() {
        let grid = generate(date(2024, 3, 4), default_program()).unwrap();
        let tokens: Vec<_> = grid
            .iter()
            .flatten()
            .map(|d| d.workout.as_str())
            .collect();
        assert!(tokens.contains(&"Recovery OR Hybrid B*"));
    }
}
