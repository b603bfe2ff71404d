use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic ID source shared by every record kind in a career.
///
/// One counter for all kinds, so an id printed in a log line is unambiguous
/// even without its type prefix. The generator lives inside the snapshot and
/// resumes from where it left off after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    /// Mint the next id as any typed id.
    pub fn mint<T: From<u64>>(&mut self) -> T {
        let id = self.next;
        self.next += 1;
        T::from(id)
    }

    /// The id the next call to [`mint`](Self::mint) will hand out.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_ids {
    ($($(#[$meta:meta])* $name:ident => $prefix:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl From<u64> for $name {
                fn from(raw: u64) -> Self {
                    Self(raw)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($prefix, "#{}"), self.0)
                }
            }
        )+
    };
}

typed_ids! {
    /// A scoutable player.
    PlayerId => "player",
    /// A competing scout.
    RivalId => "rival",
    ObservationId => "obs",
    ReportId => "report",
    ContractId => "contract",
    StaffId => "staff",
    EventId => "event",
    ChainId => "chain",
    MessageId => "msg",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_shared_across_kinds() {
        let mut id_gen = IdGenerator::new();
        let player: PlayerId = id_gen.mint();
        let report: ReportId = id_gen.mint();
        let event: EventId = id_gen.mint();
        assert_eq!(player, PlayerId(1));
        assert_eq!(report, ReportId(2));
        assert_eq!(event, EventId(3));
        assert_eq!(id_gen.peek(), 4);
    }

    #[test]
    fn starting_from_resumes() {
        let mut id_gen = IdGenerator::starting_from(100);
        let a: ObservationId = id_gen.mint();
        assert_eq!(a.0, 100);
    }

    #[test]
    fn display_carries_kind_prefix() {
        assert_eq!(PlayerId(7).to_string(), "player#7");
        assert_eq!(ChainId(12).to_string(), "chain#12");
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&RivalId(9)).unwrap();
        assert_eq!(json, "9");
    }
}
