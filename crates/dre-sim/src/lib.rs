//! ---
//! dre_section: "02-roll-simulation"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Roll emitter module exports and shared types."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
//! Dice roll generation and the emission loop that feeds downstream consumers.

pub mod driver;
pub mod generator;
pub mod roll;
pub mod sink;
#[cfg(test)]
mod test_support;

pub use dre_common::{ConfigError, DiceConfig};
pub use driver::{RollDriver, RunSummary, StopReason};
pub use generator::RollEmitter;
pub use roll::RollEvent;
pub use sink::{MemorySink, RollSink, TracingSink};
