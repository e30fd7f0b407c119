use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle state of a [`NestingBatch`](crate::entities::NestingBatch).
/// Lowercase on the wire, uppercase spellings are accepted as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[serde(alias = "DRAFT")]
    Draft,
    #[serde(alias = "CREATED")]
    Created,
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "CONFIRMED")]
    Confirmed,
    #[serde(alias = "LOADED")]
    Loaded,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "ERROR")]
    Error,
}

impl BatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Error)
    }

    /// Whether an operator action may move a batch from `self` to `next`.
    /// States only move forward, and any non-terminal state can fall into [`BatchStatus::Error`].
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        use BatchStatus::*;
        match (self, next) {
            (s, _) if s.is_terminal() => false,
            (_, Error) => true,
            (Draft, Created) | (Created, Pending) | (Pending, Confirmed) => true,
            (Confirmed, Loaded) | (Loaded, Completed) => true,
            _ => false,
        }
    }
}

impl Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BatchStatus::Draft => "draft",
            BatchStatus::Created => "created",
            BatchStatus::Pending => "pending",
            BatchStatus::Confirmed => "confirmed",
            BatchStatus::Loaded => "loaded",
            BatchStatus::Completed => "completed",
            BatchStatus::Error => "error",
        };
        f.write_str(s)
    }
}
