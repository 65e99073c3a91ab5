use crate::mvi::Message;
use crate::props::Snapshot;

#[derive(Debug, Clone)]
pub enum HistoryMessage {
    /// Record a new snapshot. Discards any redo branch past the cursor.
    Append(Snapshot),
    /// Step the cursor back. No-op at the first entry.
    Backward,
    /// Step the cursor forward. No-op at the last entry.
    Forward,
}

impl Message for HistoryMessage {}
