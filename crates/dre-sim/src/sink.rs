//! ---
//! dre_section: "02-roll-simulation"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Destinations for emitted roll events."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use tracing::info;

use crate::roll::RollEvent;

/// Receives each emission produced by the driver loop.
pub trait RollSink {
    /// `sequence` counts emissions from 1 within a run.
    fn emit(&mut self, sequence: u64, event: &RollEvent);
}

/// Logs every emission at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RollSink for TracingSink {
    fn emit(&mut self, sequence: u64, event: &RollEvent) {
        info!(emission = sequence, total = event.total, "{}", event);
    }
}

/// Keeps emitted events in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<RollEvent>,
}

impl MemorySink {
    pub fn events(&self) -> &[RollEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<RollEvent> {
        self.events
    }
}

impl RollSink for MemorySink {
    fn emit(&mut self, _sequence: u64, event: &RollEvent) {
        self.events.push(event.clone());
    }
}

impl<S: RollSink + ?Sized> RollSink for &mut S {
    fn emit(&mut self, sequence: u64, event: &RollEvent) {
        (**self).emit(sequence, event);
    }
}
