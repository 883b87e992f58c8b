//! High score and speed preference persistence.
//!
//! The controller only sees the [`ScoreStore`] trait. [`FileStore`] keeps a
//! small JSON document in the user data directory, [`MemoryStore`] keeps
//! everything for the lifetime of the process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::SpeedSetting;

const APP_NAME: &str = "snake-term";
const SCORES_FILE: &str = "scores.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not determine the user data directory")]
    NoDataDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed score file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value capability for values that outlive a session.
///
/// Reads never fail: an absent value yields the documented default.
pub trait ScoreStore {
    fn high_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32);
    fn clear_high_score(&mut self);
    fn speed(&self) -> Option<SpeedSetting>;
    fn set_speed(&mut self, speed: SpeedSetting);
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn high_score(&self) -> u32 {
        (**self).high_score()
    }

    fn set_high_score(&mut self, score: u32) {
        (**self).set_high_score(score)
    }

    fn clear_high_score(&mut self) {
        (**self).clear_high_score()
    }

    fn speed(&self) -> Option<SpeedSetting> {
        (**self).speed()
    }

    fn set_speed(&mut self, speed: SpeedSetting) {
        (**self).set_speed(speed)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    high_score: u32,
    speed: Option<SpeedSetting>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(high_score: u32) -> Self {
        MemoryStore { high_score, speed: None }
    }
}

impl ScoreStore for MemoryStore {
    fn high_score(&self) -> u32 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }

    fn clear_high_score(&mut self) {
        self.high_score = 0;
    }

    fn speed(&self) -> Option<SpeedSetting> {
        self.speed
    }

    fn set_speed(&mut self, speed: SpeedSetting) {
        self.speed = Some(speed);
    }
}

/// On-disk layout. The speed stays a plain string so an unknown value
/// reads back as "absent" instead of poisoning the whole document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    high_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<String>,
}

/// JSON backed store. Write failures are logged and the value is kept in
/// memory, so the session carries on without persistence.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: ScoreFile,
}

impl FileStore {
    /// `<data dir>/snake-term`, e.g. `~/.local/share/snake-term` on Linux.
    pub fn default_dir() -> Result<PathBuf, StoreError> {
        let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(base.join(APP_NAME))
    }

    /// Opens (creating the directory if needed) the score file in `dir`.
    /// A missing file is a first run; a corrupt one is logged and ignored.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io { path: dir.to_path_buf(), source })?;

        let path = dir.join(SCORES_FILE);
        let data = match Self::load(&path) {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable score file");
                ScoreFile::default()
            }
        };

        debug!(path = %path.display(), high_score = data.high_score, "opened score file");
        Ok(FileStore { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<ScoreFile, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
            Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
        };

        serde_json::from_str(&text).map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
    }

    fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.data)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;
        fs::write(&self.path, text).map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!(error = %err, "could not persist scores, keeping them in memory");
        }
    }
}

impl ScoreStore for FileStore {
    fn high_score(&self) -> u32 {
        self.data.high_score
    }

    fn set_high_score(&mut self, score: u32) {
        self.data.high_score = score;
        self.persist();
    }

    fn clear_high_score(&mut self) {
        self.data.high_score = 0;
        self.persist();
    }

    fn speed(&self) -> Option<SpeedSetting> {
        self.data.speed.as_deref().and_then(|s| s.parse().ok())
    }

    fn set_speed(&mut self, speed: SpeedSetting) {
        self.data.speed = Some(speed.to_string());
        self.persist();
    }
}
