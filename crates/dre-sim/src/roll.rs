//! ---
//! dre_section: "02-roll-simulation"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Roll event value produced per emission."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of rolling every configured die once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEvent {
    pub rolls: Vec<u32>,
    pub total: u64,
    pub rolled_at: DateTime<Utc>,
}

impl RollEvent {
    pub fn new(rolls: Vec<u32>) -> Self {
        let total = rolls.iter().map(|&r| u64::from(r)).sum();
        Self {
            rolls,
            total,
            rolled_at: Utc::now(),
        }
    }
}

impl fmt::Display for RollEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rolled {:?} for a total of {}", self.rolls, self.total)
    }
}
