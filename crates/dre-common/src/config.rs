//! ---
//! dre_section: "01-core-functionality"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Producer configuration and environment sources."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::info;

use crate::error::{ConfigError, Result};
use crate::logging::LogFormat;

/// Environment key holding the delay between emissions.
pub const INTERVAL_ENV: &str = "MESSAGE_INTERVAL_SECONDS";

/// Interval used when [`INTERVAL_ENV`] is not set.
pub const DEFAULT_INTERVAL_SECS: u64 = 3;

/// Upper bound on dice rolled per emission.
pub const MAX_DICE: u32 = 10_000;

fn default_dice_count() -> u32 {
    2
}

fn default_side_count() -> u32 {
    6
}

fn default_interval() -> Duration {
    Duration::from_secs(DEFAULT_INTERVAL_SECS)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Key/value store the producer reads its boundary settings from.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: IndexMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Resolve the emission interval in seconds.
///
/// An absent key yields [`DEFAULT_INTERVAL_SECS`]. A present value is trimmed
/// and must parse as an unsigned integer; anything else is a
/// [`ConfigError::InvalidInterval`].
pub fn read_interval<E: EnvSource + ?Sized>(env: &E) -> Result<u64> {
    let interval = match env.get(INTERVAL_ENV) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|source| ConfigError::InvalidInterval {
                key: INTERVAL_ENV.to_owned(),
                value: raw.clone(),
                source,
            })?,
        None => DEFAULT_INTERVAL_SECS,
    };
    info!(interval_secs = interval, "Messages will be sent every {} seconds.", interval);
    Ok(interval)
}

/// Die and side counts parameterising every roll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceConfig {
    #[serde(default = "default_dice_count")]
    pub dice: u32,
    #[serde(default = "default_side_count")]
    pub sides: u32,
}

impl DiceConfig {
    pub fn new(dice: u32, sides: u32) -> Result<Self> {
        let config = Self { dice, sides };
        config.validate()?;
        Ok(config)
    }

    /// A die needs at least one face and a roll between one and [`MAX_DICE`] dice.
    pub fn validate(&self) -> Result<()> {
        if self.dice == 0 {
            return Err(ConfigError::InvalidDiceCount(self.dice));
        }
        if self.dice > MAX_DICE {
            return Err(ConfigError::TooManyDice {
                requested: self.dice,
                max: MAX_DICE,
            });
        }
        if self.sides == 0 {
            return Err(ConfigError::InvalidSideCount(self.sides));
        }
        Ok(())
    }
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            dice: default_dice_count(),
            sides: default_side_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

/// Effective configuration for one producer run.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProducerConfig {
    #[serde(default)]
    pub dice: DiceConfig,
    #[serde(default = "default_interval")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub interval: Duration,
    #[serde(default)]
    pub max_emissions: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProducerConfig {
    /// Build a configuration from dice parameters and the environment-provided interval.
    pub fn from_env<E: EnvSource + ?Sized>(env: &E, dice: DiceConfig) -> Result<Self> {
        dice.validate()?;
        let interval = read_interval(env)?;
        Ok(Self {
            dice,
            interval: Duration::from_secs(interval),
            ..Self::default()
        })
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            dice: DiceConfig::default(),
            interval: default_interval(),
            max_emissions: None,
            seed: None,
            logging: LoggingConfig::default(),
        }
    }
}
