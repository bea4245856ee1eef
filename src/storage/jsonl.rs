//! JSONL (JSON Lines) files.
//!
//! One JSON object per line. Matches are only ever appended; the roster and
//! tournament record are rewritten whole.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};
use crate::models::TournamentId;

/// Entity types stored per tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Tournament,
    Player,
    Match,
}

impl EntityType {
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Tournament => "tournament.jsonl",
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
        }
    }
}

/// Path of a tournament's entity file.
pub fn entity_path(config: &StorageConfig, entity: EntityType, id: &TournamentId) -> PathBuf {
    config.tournament_dir(id).join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType, id: &TournamentId) -> Self {
        Self::new(entity_path(config, entity, id))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(entity)?)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    ///
    /// Serializes to a sibling temp file first and renames it into place, so
    /// a failed write leaves the previous contents intact.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for entity in entities {
            writeln!(writer, "{}", serde_json::to_string(entity)?)?;
        }
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;

        debug!("Wrote {} entities to {:?}", entities.len(), self.path);
        Ok(entities.len())
    }

    /// Remove the file if it exists.
    pub fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType, id: &TournamentId) -> Self {
        Self::new(entity_path(config, entity, id))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities. A missing file reads as empty; unparseable lines
    /// are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Find all tournament directories.
pub fn list_tournaments(config: &StorageConfig) -> Result<Vec<TournamentId>, StorageError> {
    let dir = config.tournaments_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut ids = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                ids.push(TournamentId::from(name));
            }
        }
    }

    ids.sort();
    Ok(ids)
}
