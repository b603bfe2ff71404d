pub mod career;
pub mod config;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod scenario;
pub mod sim;
pub mod worldgen;

#[cfg(test)]
mod testutil;

pub use career::Career;
pub use config::CareerConfig;
pub use error::{Ineligibility, Rejection};
pub use id::IdGenerator;
pub use model::{DayResult, GameDate, GameState};
pub use sim::ReportDraft;
