use serde::{Deserialize, Serialize};

use super::timestamp::GameDate;
use crate::id::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    Scouting,
    Finance,
    Contract,
    Rival,
    Career,
    Story,
}

labelled_enum!(MessageCategory {
    Scouting => "scouting",
    Finance => "finance",
    Contract => "contract",
    Rival => "rival",
    Career => "career",
    Story => "story",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: MessageId,
    pub date: GameDate,
    pub category: MessageCategory,
    pub subject: String,
    pub body: String,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Short-lived toast for the boundary layer; drained on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub date: GameDate,
    pub severity: Severity,
    pub text: String,
}
