//! Reducer trait for MVI state machines.

use super::message::Message;
use super::state::MachineState;

/// Reducer transforms state based on messages.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Message) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: MachineState;

    /// The message type this reducer handles.
    type Message: Message;

    /// Process a message and return the new state.
    fn reduce(state: Self::State, message: Self::Message) -> Self::State;
}
