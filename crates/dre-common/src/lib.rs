//! ---
//! dre_section: "01-core-functionality"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Shared primitives for the dice roll emitter."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
//! Core shared primitives for the dice roll emitter workspace.
//! This crate exposes configuration loading, the interval boundary read,
//! and logging initialisation consumed by the simulation crate and binary.

pub mod config;
pub mod error;
pub mod logging;
#[cfg(test)]
mod test_support;

pub use config::{
    read_interval, DiceConfig, EnvSource, LoggingConfig, MapEnv, ProcessEnv, ProducerConfig,
    DEFAULT_INTERVAL_SECS, INTERVAL_ENV, MAX_DICE,
};
pub use error::ConfigError;
pub use logging::{init_tracing, LogFormat, LogGuard};
