//! CSV export of per-day progress.

use crate::error::Result;
use crate::progress::day_stats;
use crate::types::{ExerciseCatalog, Grid, Program};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    week: usize,
    day: usize,
    workout: String,
    total: usize,
    completed: usize,
    percentage: Option<u32>,
    notes: Option<String>,
}

/// Write every scheduled day's progress to a CSV file
///
/// Rows come out in grid order. The file is created (or truncated),
/// flushed, and synced before returning the row count.
pub fn export_progress(
    grid: &Grid,
    program: &Program,
    catalog: &ExerciseCatalog,
    out_path: &Path,
) -> Result<usize> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(out_path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut count = 0;
    for (w, week) in grid.iter().enumerate() {
        for (d, day) in week.iter().enumerate() {
            let stats = day_stats(grid, w, d, program, catalog);
            writer.serialize(CsvRow {
                date: day.date.to_string(),
                week: w,
                day: d,
                workout: day.workout.clone(),
                total: stats.total,
                completed: stats.completed,
                percentage: stats.percentage.map(|p| p.round() as u32),
                notes: day.user_notes.clone(),
            })?;
            count += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} days to {:?}", count, out_path);
    Ok(count)
}
