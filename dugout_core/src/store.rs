//! Progress persistence with file locking.
//!
//! One JSON file per program id holds the start date, the display-mode
//! tag, and the full week × day grid with its completion state. Reads
//! take a shared lock; writes go through a temp file with an exclusive
//! lock and an atomic rename. A missing or corrupted file degrades to a
//! freshly generated schedule rather than failing the session.

use crate::error::{Error, Result};
use crate::schedule::generate;
use crate::types::{Grid, Program};
use crate::view::ViewMode;
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The persisted progress document for one program
///
/// Round-trip contract: dates deserialize back to real `NaiveDate`
/// values, and a day with no `completed` entry deserializes as an empty
/// map rather than an error.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressFile {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub view_mode: ViewMode,
    pub weeks: Grid,
}

impl ProgressFile {
    /// A fresh progress document generated from a start date
    pub fn generate(start_date: NaiveDate, program: &Program) -> Result<Self> {
        Ok(Self {
            start_date,
            view_mode: ViewMode::default(),
            weeks: generate(start_date, program)?,
        })
    }

    /// Storage path for a program's progress, keyed by program id
    pub fn path_for(data_dir: &Path, program_id: &str) -> PathBuf {
        data_dir.join("progress").join(format!("{}.json", program_id))
    }

    /// Load persisted progress with a shared lock
    ///
    /// Returns `None` when the file is missing, unreadable, or
    /// unparsable; every failure mode is logged and non-fatal.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::info!("No progress file at {:?}", path);
            return None;
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open progress file {:?}: {}", path, e);
                return None;
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock progress file {:?}: {}", path, e);
            return None;
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read = reader.read_to_string(&mut contents);
        let _ = file.unlock();
        if let Err(e) = read {
            tracing::warn!("Failed to read progress file {:?}: {}", path, e);
            return None;
        }

        match serde_json::from_str::<ProgressFile>(&contents) {
            Ok(progress) => {
                tracing::debug!("Loaded progress from {:?}", path);
                Some(progress)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse progress file {:?}: {}. Progress will reset.",
                    path,
                    e
                );
                None
            }
        }
    }

    /// Load persisted progress, or generate a fresh schedule on any
    /// read failure (the availability-over-visibility fallback)
    pub fn load_or_generate(
        path: &Path,
        program: &Program,
        default_start: NaiveDate,
    ) -> Result<Self> {
        match Self::load(path) {
            Some(progress) => Ok(progress),
            None => Self::generate(default_start, program),
        }
    }

    /// Save progress with an exclusive lock
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "progress path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved progress to {:?}", path);
        Ok(())
    }

    /// Load (or generate), modify, and save back atomically
    pub fn update<F>(
        path: &Path,
        program: &Program,
        default_start: NaiveDate,
        f: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut ProgressFile) -> Result<()>,
    {
        let mut progress = Self::load_or_generate(path, program, default_start)?;
        f(&mut progress)?;
        progress.save(path)?;
        Ok(progress)
    }

    /// Re-base the program on a new start date
    ///
    /// Destructive by design: the entire grid is regenerated and all
    /// completion state and notes are discarded. Callers own the
    /// user-facing confirmation step.
    pub fn rebase(&mut self, new_start: NaiveDate, program: &Program) -> Result<()> {
        self.weeks = generate(new_start, program)?;
        self.start_date = new_start;
        tracing::info!("Rebased program to start {}", new_start);
        Ok(())
    }
}
