//! Navigable history of state snapshots (undo/redo).

mod message;
mod reducer;
mod state;
mod store;

pub use message::HistoryMessage;
pub use reducer::HistoryReducer;
pub use state::HistoryState;
pub use store::{HistoryEvent, HistoryStore, HistoryStream};
