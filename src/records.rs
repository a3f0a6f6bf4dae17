#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::Resource;
use log::{error, info};
use std::fmt;
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use crate::game::RECORDS_DELIMITER;

/// The persisted high-score list, kept in memory and written back on every change.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
    scores: Vec<u32>,
}

impl RecordStore {
    /// Reads the record list at `path`. A missing or malformed file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RecordsError> {
        let path = path.into();
        let contents = fs::read_to_string(&path)?;
        let scores = parse_records(&contents)?;
        info!("Loaded {} records from {}", scores.len(), path.display());
        Ok(Self { path, scores })
    }

    #[must_use]
    pub fn with_scores(path: impl Into<PathBuf>, scores: Vec<u32>) -> Self {
        Self {
            path: path.into(),
            scores,
        }
    }

    #[must_use]
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), RecordsError> {
        fs::write(&self.path, format_records(&self.scores))?;
        Ok(())
    }

    /// Offers a finished game's score. Returns whether it counts as a new record.
    ///
    /// Accepted scores are written out immediately; a failed write is logged
    /// and the in-memory list keeps the new entry.
    pub fn submit(&mut self, score: u32) -> bool {
        let (scores, is_record) = consider_score(&self.scores, score);
        if scores != self.scores {
            self.scores = scores;
            if let Err(e) = self.save() {
                error!("Failed to save records to {}: {e}", self.path.display());
            } else {
                info!("New record {score} saved");
            }
        }
        is_record
    }
}

/// Inserts `score` before the first entry it beats, dropping the lowest entry
/// so the list keeps its length.
///
/// An empty list reports a record without storing anything. Ties are not records.
#[must_use]
pub fn consider_score(scores: &[u32], score: u32) -> (Vec<u32>, bool) {
    match scores.iter().position(|&entry| entry < score) {
        Some(index) => {
            let mut updated = Vec::with_capacity(scores.len());
            updated.extend_from_slice(&scores[..index]);
            updated.push(score);
            updated.extend_from_slice(&scores[index..scores.len() - 1]);
            (updated, true)
        }
        None => (scores.to_vec(), scores.is_empty()),
    }
}

/// Parses `300;200;100`. Surrounding whitespace and stray outer delimiters are
/// ignored; blank input is an empty list.
pub fn parse_records(contents: &str) -> Result<Vec<u32>, RecordsError> {
    let trimmed = contents.trim().trim_matches(RECORDS_DELIMITER);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(RECORDS_DELIMITER)
        .map(|value| {
            let value = value.trim();
            value.parse::<u32>().map_err(|source| RecordsError::Parse {
                value: value.to_string(),
                source,
            })
        })
        .collect()
}

#[must_use]
pub fn format_records(scores: &[u32]) -> String {
    scores
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(&RECORDS_DELIMITER.to_string())
}

#[derive(Debug)]
pub enum RecordsError {
    Io(io::Error),
    Parse { value: String, source: ParseIntError },
}

impl fmt::Display for RecordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordsError::Io(err) => write!(f, "record file unavailable: {err}"),
            RecordsError::Parse { value, source } => {
                write!(f, "invalid record entry {value:?}: {source}")
            }
        }
    }
}

impl std::error::Error for RecordsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordsError::Io(err) => Some(err),
            RecordsError::Parse { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for RecordsError {
    fn from(err: io::Error) -> Self {
        RecordsError::Io(err)
    }
}
