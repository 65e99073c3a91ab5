//! Model-View-Intent (MVI) primitives shared by the engine's state machines.
//!
//! # Architecture
//!
//! ```text
//! Message ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable value describing one stage of a state machine
//! - **Message**: Request to move the state machine
//! - **Reducer**: Pure function that transforms state based on messages

mod message;
mod reducer;
mod state;

pub use message::Message;
pub use reducer::Reducer;
pub use state::MachineState;
