//! Best score persisted as a small JSON file between runs.

use std::{
    cell::RefCell,
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context;
use blockfit_engine::BestScoreStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util;

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u64,
    updated_at: DateTime<Utc>,
}

/// [`BestScoreStore`] backed by a JSON file.
///
/// Write failures never interrupt the game. The latest one is kept and can be
/// collected through any clone of the store with [`take_write_error`](Self::take_write_error)
/// once the terminal is back to normal.
#[derive(Debug, Clone)]
pub struct BestScoreFile {
    path: PathBuf,
    best_score: u64,
    write_error: Rc<RefCell<Option<anyhow::Error>>>,
}

impl BestScoreFile {
    /// Opens the store. A missing file means no best score yet.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let best_score = if path.exists() {
            let record: BestScoreRecord = util::read_json_file("best score", &path)?;
            record.best_score
        } else {
            0
        };
        Ok(Self {
            path,
            best_score,
            write_error: Rc::default(),
        })
    }

    /// Like [`Self::open`], but an unreadable file only produces a warning.
    pub fn open_or_reset(path: PathBuf) -> Self {
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(err) => {
                eprintln!("Warning: {err:#}; starting from a best score of 0");
                Self {
                    path,
                    best_score: 0,
                    write_error: Rc::default(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn take_write_error(&self) -> Option<anyhow::Error> {
        self.write_error.borrow_mut().take()
    }

    fn write(&self, best_score: u64) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let record = BestScoreRecord {
            best_score,
            updated_at: Utc::now(),
        };
        let file = File::create(&self.path).with_context(|| {
            format!("Failed to create best score file: {}", self.path.display())
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &record).with_context(|| {
            format!("Failed to write best score file: {}", self.path.display())
        })?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl BestScoreStore for BestScoreFile {
    fn load(&self) -> u64 {
        self.best_score
    }

    fn store(&mut self, best_score: u64) {
        self.best_score = best_score;
        if let Err(err) = self.write(best_score) {
            *self.write_error.borrow_mut() = Some(err);
        }
    }
}
