// File:    store.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Directory-backed repository of sealed mission files.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Mission persistence.
//!
//! Each mission is one file in the store directory. The file name is the
//! filename-safe sealed id plus `.txt`; the content is the standard-base64
//! sealed pad. Re-sealing draws a fresh nonce, so every rewrite writes a new
//! file under a new name and deletes the old one only after the new file has
//! been read back and decrypted. There is no temporary file: a crash between
//! the write and the delete leaves both files, and `list` then shows the
//! mission twice. Access is assumed to be exclusive to one process.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::aead;
use crate::error::{MissionError, Result};
use crate::mission::{MissionRecord, PadSheet};
use crate::pad_generator::{self, PadLayout, DEFAULT_ID_LENGTH};

/// Upper bound on random id draws before `create` gives up.
const MAX_ID_DRAWS: usize = 10_000;
use crate::session::SessionContext;

/// Extension of mission files.
pub const MISSION_EXTENSION: &str = "txt";

/// Name of the store configuration file.
pub const CONFIG_FILE: &str = "station.json";

/// Settings persisted alongside the missions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Shape of the pad generated for each new mission.
    pub pad: PadLayout,
    /// Length of newly generated mission ids.
    pub id_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pad: PadLayout::default(),
            id_length: DEFAULT_ID_LENGTH,
        }
    }
}

impl StoreConfig {
    /// Loads the configuration from a store directory, falling back to the
    /// defaults when no config file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// [`MissionError::InvalidConfig`] if it fails [`StoreConfig::validate`].
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every dimension of the layout and the id length is at
    /// least one.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidConfig`] naming the first zero field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("pages", self.pad.pages),
            ("groups_per_page", self.pad.groups_per_page),
            ("group_length", self.pad.group_length),
            ("id_length", self.id_length),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(MissionError::InvalidConfig(format!(
                "{name} must be at least 1"
            ))),
            None => Ok(()),
        }
    }

    /// Saves the configuration into a store directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(CONFIG_FILE), text)?;
        Ok(())
    }
}

/// Repository of mission files in a single directory.
#[derive(Debug, Clone)]
pub struct MissionStore {
    dir: PathBuf,
    config: StoreConfig,
}

impl MissionStore {
    /// Creates the store directory and writes `config` into it.
    ///
    /// Existing missions in the directory are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::InvalidConfig`] for an unusable config, or an
    /// error if the directory or config file cannot be written.
    pub fn init(dir: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        config.save(&dir)?;
        info!("Initialized mission store at '{}'", dir.display());
        Ok(Self { dir, config })
    }

    /// Opens an existing store directory.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::PersistenceFailure`] if the directory does not
    /// exist, or a config error if its config file is unreadable.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(MissionError::PersistenceFailure(std::io::Error::new(
                ErrorKind::NotFound,
                format!("mission store '{}' does not exist", dir.display()),
            )));
        }
        let config = StoreConfig::load(&dir)?;
        Ok(Self { dir, config })
    }

    /// The store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the file backing `record`, if it has ever been sealed.
    #[must_use]
    pub fn path_for(&self, record: &MissionRecord) -> Option<PathBuf> {
        record.stored_id().map(|id| self.file_path(id))
    }

    fn file_path(&self, stored_id: &str) -> PathBuf {
        self.dir.join(format!("{stored_id}.{MISSION_EXTENSION}"))
    }

    /// Loads and decrypts every mission sealed under the session key.
    ///
    /// Records that do not open with this key are skipped with a warning.
    /// The result is sorted by mission id.
    ///
    /// # Errors
    ///
    /// Fails on an invalid key length (no record could ever open) or if the
    /// directory cannot be read.
    pub fn list(&self, session: &SessionContext) -> Result<Vec<MissionRecord>> {
        aead::check_key(session.key())?;

        let mut missions = Vec::new();
        for stored_id in self.stored_ids()? {
            let sealed = match fs::read_to_string(self.file_path(&stored_id)) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable mission file '{stored_id}': {e}");
                    continue;
                }
            };
            let mut record = MissionRecord::sealed(stored_id, sealed.trim());
            match record.decrypt(session) {
                Ok(()) => missions.push(record),
                Err(e) => warn!(
                    "Skipping mission file '{}': {e}",
                    record.stored_id().unwrap_or_default()
                ),
            }
        }

        missions.sort_by(|a, b| a.plain_id().cmp(&b.plain_id()));
        debug!("Loaded {} missions from '{}'", missions.len(), self.dir.display());
        Ok(missions)
    }

    /// Finds a decryptable mission by its plaintext id.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::MissionNotFound`] if no mission matches.
    pub fn get(&self, plain_id: &str, session: &SessionContext) -> Result<MissionRecord> {
        self.list(session)?
            .into_iter()
            .find(|m| m.plain_id() == Some(plain_id))
            .ok_or_else(|| MissionError::MissionNotFound(plain_id.to_string()))
    }

    /// Creates a mission with a fresh id and pad, persists it, and returns it
    /// in the decrypted state.
    ///
    /// # Errors
    ///
    /// [`MissionError::IdSpaceExhausted`] when no unused id of the configured
    /// length can be found, plus sealing and persistence errors.
    pub fn create(&self, session: &SessionContext) -> Result<MissionRecord> {
        let taken: HashSet<String> = self
            .list(session)?
            .iter()
            .filter_map(|m| m.plain_id().map(str::to_string))
            .collect();
        let plain_id = self.draw_free_id(&taken)?;

        let sheet = PadSheet::new(self.config.pad.generate());
        let record = self.persist(MissionRecord::new(plain_id, sheet), session)?;
        info!(
            "Created mission {} with {} pad rows",
            record.plain_id().unwrap_or_default(),
            self.config.pad.pages
        );
        Ok(record)
    }

    /// Replaces the pad rows of a decrypted record and persists the change.
    ///
    /// The record is sealed, written, and then rebuilt by decrypting what
    /// was read back from disk, so the in-memory view always reflects the
    /// stored file. The previous ciphertext is discarded. On error `record`
    /// is left unchanged.
    ///
    /// # Errors
    ///
    /// [`MissionError::NotDecrypted`] for an encrypted record, plus any
    /// sealing or persistence error.
    pub fn update_data(
        &self,
        record: &mut MissionRecord,
        sheet: PadSheet,
        session: &SessionContext,
    ) -> Result<()> {
        let mut next = record.clone();
        next.set_pad(sheet)?;
        *record = self.persist(next, session)?;
        debug!(
            "Updated mission {}",
            record.plain_id().unwrap_or_default()
        );
        Ok(())
    }

    /// Removes the front pad row of a decrypted record and persists the
    /// remainder. Returns the consumed row.
    ///
    /// # Errors
    ///
    /// [`MissionError::NotDecrypted`] for an encrypted record,
    /// [`MissionError::MissionNotFound`] if no rows are left, plus the errors
    /// of [`MissionStore::update_data`].
    pub fn consume_row(&self, record: &mut MissionRecord, session: &SessionContext) -> Result<String> {
        let sheet = record.pad().ok_or(MissionError::NotDecrypted)?;
        let row = sheet.first_row().map(str::to_string).ok_or_else(|| {
            MissionError::MissionNotFound(format!(
                "{} has no pad rows left",
                record.plain_id().unwrap_or_default()
            ))
        })?;
        let remaining = sheet.without_first_row();
        self.update_data(record, remaining, session)?;
        Ok(row)
    }

    /// Deletes the file backing `record`.
    ///
    /// Returns `false` if there was no such file.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::PersistenceFailure`] for any I/O error other
    /// than the file being absent.
    pub fn remove(&self, record: &MissionRecord) -> Result<bool> {
        let Some(path) = self.path_for(record) else {
            return Ok(false);
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(
                    "Removed mission {}",
                    record.plain_id().unwrap_or_default()
                );
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Mission file '{}' not found", path.display());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn draw_free_id(&self, taken: &HashSet<String>) -> Result<String> {
        let length = self.config.id_length;
        let exhausted = || MissionError::IdSpaceExhausted {
            length,
            taken: taken.len(),
        };
        if pad_generator::mission_id_space(length).is_some_and(|space| taken.len() >= space) {
            return Err(exhausted());
        }
        for _ in 0..MAX_ID_DRAWS {
            let candidate = pad_generator::generate_mission_id(length);
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            debug!("Mission id {candidate} already in use, drawing another");
        }
        Err(exhausted())
    }

    /// Seals `record`, writes it under its new file name, and returns it
    /// decrypted again from what is on disk. The previous file is removed
    /// only once the new one has been read back and decrypted.
    fn persist(&self, mut record: MissionRecord, session: &SessionContext) -> Result<MissionRecord> {
        let previous = self.path_for(&record);
        record.encrypt(session)?;

        let path = self.path_for(&record).ok_or(MissionError::NotDecrypted)?;
        let sealed = record.sealed_payload().ok_or(MissionError::NotDecrypted)?;
        fs::write(&path, sealed)?;

        let read_back = fs::read_to_string(&path)
            .map_err(MissionError::from)
            .and_then(|text| {
                record.reload_sealed(text.trim().to_string());
                record.decrypt(session)
            });
        if let Err(e) = read_back {
            warn!("Discarding unreadable mission file '{}': {e}", path.display());
            if previous.as_ref() != Some(&path) {
                if let Err(cleanup) = fs::remove_file(&path) {
                    warn!("Could not remove '{}': {cleanup}", path.display());
                }
            }
            return Err(e);
        }

        if let Some(previous) = previous.filter(|p| *p != path) {
            match fs::remove_file(&previous) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(record)
    }

    fn stored_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(MISSION_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        Ok(ids)
    }
}
