//! Filesystem persistence for the command-line front end.
//!
//! The engine itself performs no I/O. These helpers save and load the
//! tournament state file and write exported summaries as JSON.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::TournamentSummary;
use crate::tournament::Tournament;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// JSON file holding a serialized tournament.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the tournament from disk.
    pub fn load(&self) -> Result<Tournament, StorageError> {
        if !self.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }
        let tournament = read_json(&self.path)?;
        debug!("Loaded tournament state from {:?}", self.path);
        Ok(tournament)
    }

    /// Write the tournament, replacing the file.
    pub fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        write_json(&self.path, tournament)?;
        debug!("Saved tournament state to {:?}", self.path);
        Ok(())
    }
}

/// Write an exported summary as pretty JSON.
pub fn export_summary(path: &Path, summary: &TournamentSummary) -> Result<(), StorageError> {
    write_json(path, summary)?;
    info!(
        "Exported '{}' ({} players, {} matches) to {:?}",
        summary.name,
        summary.players.len(),
        summary.matches.len(),
        path
    );
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TournamentConfig;
    use crate::models::Format;
    use tempfile::TempDir;

    fn sample() -> Tournament {
        let config = TournamentConfig::new("Saved", Format::RoundRobin)
            .with_rounds(3)
            .with_seed(8);
        let mut t = Tournament::new(config).unwrap();
        for name in ["Ann", "Ben", "Cat", "Dan"] {
            t.register(name, Some(format!("{}-deck", name))).unwrap();
        }
        t.start().unwrap();
        t
    }

    #[test]
    fn test_state_save_and_load() {
        let dir = TempDir::new().unwrap();
        let state = StateFile::new(dir.path().join("nested").join("state.json"));
        let tournament = sample();

        state.save(&tournament).unwrap();
        assert!(state.exists());

        let loaded = state.load().unwrap();
        assert_eq!(loaded.name(), "Saved");
        assert_eq!(loaded.matches(), tournament.matches());
        assert_eq!(loaded.standings(), tournament.standings());
        assert_eq!(loaded.seed(), 8);
    }

    #[test]
    fn test_load_missing_state() {
        let dir = TempDir::new().unwrap();
        let state = StateFile::new(dir.path().join("missing.json"));
        assert!(matches!(state.load(), Err(StorageError::PathNotFound(_))));
    }

    #[test]
    fn test_load_corrupt_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            StateFile::new(path).load(),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn test_export_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let summary = sample().summary();

        export_summary(&path, &summary).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: TournamentSummary = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.name, "Saved");
        assert_eq!(parsed.format, Format::RoundRobin);
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.players.len(), 4);
    }
}
