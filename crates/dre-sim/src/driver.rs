//! ---
//! dre_section: "02-roll-simulation"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Emission loop pulling roll events into a sink until cancelled."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::roll::RollEvent;
use crate::sink::RollSink;

/// Why a driver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown channel signalled `true` (or was already set).
    Cancelled,
    /// The configured emission limit was reached.
    LimitReached,
    /// The event source returned `None`.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub emissions: u64,
    pub stop: StopReason,
}

/// Pulls one event at a time from `source`, hands it to `sink`, then waits
/// `interval` before the next pull.
///
/// Cancellation is checked before every pull and raced against the wait, so a
/// shutdown request never has to sit out a full interval.
#[derive(Debug)]
pub struct RollDriver<I, S> {
    source: I,
    sink: S,
    interval: Duration,
    max_emissions: Option<u64>,
}

impl<I, S> RollDriver<I, S>
where
    I: Iterator<Item = RollEvent>,
    S: RollSink,
{
    pub fn new(source: I, sink: S, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
            max_emissions: None,
        }
    }

    pub fn with_max_emissions(mut self, max_emissions: Option<u64>) -> Self {
        self.max_emissions = max_emissions;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (I, S) {
        (self.source, self.sink)
    }

    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> RunSummary {
        let mut emissions: u64 = 0;
        let summary = |emissions, stop| RunSummary { emissions, stop };

        loop {
            if *shutdown.borrow() {
                return summary(emissions, StopReason::Cancelled);
            }
            if self.max_emissions.is_some_and(|max| emissions >= max) {
                return summary(emissions, StopReason::LimitReached);
            }

            let Some(event) = self.source.next() else {
                debug!(emissions, "roll source exhausted");
                return summary(emissions, StopReason::Exhausted);
            };
            emissions += 1;
            self.sink.emit(emissions, &event);

            if self.max_emissions.is_some_and(|max| emissions >= max) {
                return summary(emissions, StopReason::LimitReached);
            }
            if !wait_or_cancel(self.interval, &mut shutdown).await {
                debug!(emissions, "shutdown requested during interval");
                return summary(emissions, StopReason::Cancelled);
            }
        }
    }
}

/// Wait for `interval`. Returns `false` if shutdown was signalled first.
async fn wait_or_cancel(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if interval.is_zero() {
        tokio::task::yield_now().await;
        return !*shutdown.borrow();
    }
    let deadline = Instant::now() + interval;
    loop {
        tokio::select! {
            _ = sleep_until(deadline) => return true,
            changed = shutdown.changed() => match changed {
                Ok(()) => {
                    if *shutdown.borrow_and_update() {
                        return false;
                    }
                }
                Err(_) => {
                    // Sender dropped; nobody can cancel any more.
                    sleep_until(deadline).await;
                    return true;
                }
            }
        }
    }
}
