use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::store::{FileStore, MemoryStore, ScoreStore};
use crate::SpeedSetting;

const LOG_FILE: &str = "snake-term.log";

#[derive(Parser, Debug, Default)]
#[command(name = "snake-term", version, about = "Snake, in your terminal")]
pub struct Args {
    /// Step speed for this run; also saved as the new preference
    #[arg(long, value_enum)]
    pub speed: Option<SpeedSetting>,

    /// Where the high score and preferences are kept
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Do not read or write anything on disk
    #[arg(long, conflicts_with = "data_dir")]
    pub in_memory: bool,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log destination (default: snake-term.log in the data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn data_dir(&self) -> Option<PathBuf> {
        if self.in_memory {
            return None;
        }

        match &self.data_dir {
            Some(dir) => Some(dir.clone()),
            None => FileStore::default_dir().ok(),
        }
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| self.data_dir().map(|dir| dir.join(LOG_FILE)))
    }

    /// File backed store when possible, otherwise an in-memory one for this
    /// session only.
    pub fn open_store(&self) -> Box<dyn ScoreStore> {
        let Some(dir) = self.data_dir() else {
            return Box::new(MemoryStore::new());
        };

        match FileStore::open(&dir) {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!(error = %err, "falling back to in-memory scores");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn rng(&self) -> Result<StdRng> {
        Ok(match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(rand::thread_rng())?,
        })
    }
}
