pub mod jsonl;

pub use jsonl::{JsonlAchievementStore, flush_to_jsonl};
