//! ---
//! dre_section: "02-roll-simulation"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Roll emitter producing an unbounded stream of roll events."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use dre_common::{ConfigError, DiceConfig};
use rand::prelude::*;
use tracing::info;

use crate::roll::RollEvent;

/// Draws dice rolls from an owned [`DiceConfig`].
///
/// The emitter is an infinite [`Iterator`]: every call to `next` performs one
/// independent draw and never returns `None`.
#[derive(Debug)]
pub struct RollEmitter {
    config: DiceConfig,
    rng: StdRng,
}

impl RollEmitter {
    /// Create an emitter. A seed makes the sequence reproducible; without one
    /// the generator is seeded from OS entropy.
    pub fn new(config: DiceConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> DiceConfig {
        self.config
    }

    /// Set the number of dice rolled per emission. Values rejected by
    /// [`DiceConfig::validate`] leave the previous value in place.
    pub fn set_dice_count(&mut self, dice: u32) -> Result<(), ConfigError> {
        DiceConfig { dice, ..self.config }.validate()?;
        self.config.dice = dice;
        info!(dice, "Number of dice to roll set to {}.", dice);
        Ok(())
    }

    /// Set the number of sides on each die. Zero is rejected and the previous
    /// value kept.
    pub fn set_side_count(&mut self, sides: u32) -> Result<(), ConfigError> {
        DiceConfig { sides, ..self.config }.validate()?;
        self.config.sides = sides;
        info!(sides, "Number of sides on the dice set to {}.", sides);
        Ok(())
    }

    pub fn roll(&mut self) -> RollEvent {
        let sides = self.config.sides;
        let rolls = (0..self.config.dice)
            .map(|_| self.rng.gen_range(1..=sides))
            .collect();
        RollEvent::new(rolls)
    }
}

impl Iterator for RollEmitter {
    type Item = RollEvent;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.roll())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
