//! ---
//! dre_section: "01-core-functionality"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Typed configuration errors."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use std::num::ParseIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {key} must be a non-negative integer, got {value:?}: {source}")]
    InvalidInterval {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("die count must be at least 1, got {0}")]
    InvalidDiceCount(u32),
    #[error("die count must be at most {max}, got {requested}")]
    TooManyDice { requested: u32, max: u32 },
    #[error("side count must be at least 1, got {0}")]
    InvalidSideCount(u32),
}
