use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpeedSetting {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl SpeedSetting {
    /// Milliseconds between two simulation steps.
    pub fn interval_ms(self) -> u64 {
        match self {
            SpeedSetting::Slow => 300,
            SpeedSetting::Medium => 200,
            SpeedSetting::Fast => 150,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedSetting::Slow => "Slow",
            SpeedSetting::Medium => "Medium",
            SpeedSetting::Fast => "Fast",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedSetting::Slow => "slow",
            SpeedSetting::Medium => "medium",
            SpeedSetting::Fast => "fast",
        }
    }
}

impl fmt::Display for SpeedSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown speed setting: {0}")]
pub struct UnknownSpeed(String);

impl FromStr for SpeedSetting {
    type Err = UnknownSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(SpeedSetting::Slow),
            "medium" => Ok(SpeedSetting::Medium),
            "fast" => Ok(SpeedSetting::Fast),
            other => Err(UnknownSpeed(other.to_string())),
        }
    }
}
