use crate::history::message::HistoryMessage;
use crate::history::state::HistoryState;
use crate::mvi::Reducer;

pub struct HistoryReducer;

impl Reducer for HistoryReducer {
    type State = HistoryState;
    type Message = HistoryMessage;

    fn reduce(mut state: Self::State, message: Self::Message) -> Self::State {
        match message {
            HistoryMessage::Append(snapshot) => {
                if !state.entries.is_empty() {
                    state.entries.truncate(state.cursor + 1);
                }
                state.entries.push(snapshot);

                if state.max_entries > 0 && state.entries.len() > state.max_entries {
                    let overflow = state.entries.len() - state.max_entries;
                    state.entries.drain(..overflow);
                }
                state.cursor = state.entries.len() - 1;
                state
            }
            HistoryMessage::Backward => {
                if state.cursor > 0 {
                    state.cursor -= 1;
                }
                state
            }
            HistoryMessage::Forward => {
                if state.cursor + 1 < state.entries.len() {
                    state.cursor += 1;
                }
                state
            }
        }
    }
}
