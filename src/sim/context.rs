use rand::RngCore;

use super::signal::Signal;
use crate::config::CareerConfig;
use crate::model::{GameDate, GameState};

/// Context passed to each system on every tick.
pub struct TickContext<'a> {
    pub state: &'a mut GameState,
    pub config: &'a CareerConfig,
    pub rng: &'a mut dyn RngCore,
    /// Systems push signals here during tick/handle_signals.
    pub signals: &'a mut Vec<Signal>,
    /// Signals emitted by other systems in the previous pass (read-only).
    pub inbox: &'a [Signal],
}

impl TickContext<'_> {
    /// The day being resolved.
    pub fn today(&self) -> GameDate {
        self.state.date()
    }

    pub fn is_week_end(&self) -> bool {
        super::runner::is_week_end(self.today())
    }

    pub fn emit(&mut self, kind: super::signal::SignalKind) {
        let date = self.today();
        self.signals.push(Signal { date, kind });
    }
}
