use super::context::TickContext;

/// How often a simulation system should tick.
///
/// Ordered coarsest-to-finest, matching how the runner walks the calendar:
/// weekly systems fire once, on the last day of the week, after the day itself
/// has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TickFrequency {
    Weekly, // 1 tick/week
    Daily,  // 7 ticks/week
}

/// A pluggable simulation system that runs each tick.
///
/// Object-safe so systems can be stored as `Box<dyn SimSystem>`. Systems keep
/// no state of their own; everything they read or write lives in
/// [`GameState`](crate::model::GameState), so a snapshot fully describes a
/// career.
pub trait SimSystem {
    fn name(&self) -> &str;
    fn frequency(&self) -> TickFrequency;
    fn tick(&mut self, ctx: &mut TickContext);

    /// React to signals emitted by other systems during Phase 1 (`tick()`).
    ///
    /// Called once per dispatch cycle with the full signal buffer in `ctx.inbox`.
    /// Signals pushed to `ctx.signals` here are **not** re-delivered (single-pass).
    /// Default: no-op.
    fn handle_signals(&mut self, ctx: &mut TickContext) {
        let _ = ctx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_ordering_coarsest_to_finest() {
        assert!(TickFrequency::Weekly < TickFrequency::Daily);
    }
}
