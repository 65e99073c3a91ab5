use crate::mvi::MachineState;
use crate::props::Snapshot;

/// Snapshot log plus cursor.
///
/// `baseline` is the state seeded at mount. It is what `current()` returns
/// until the first append, but it is not itself a navigation target: the
/// cursor only ranges over `entries`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryState {
    pub(crate) baseline: Snapshot,
    pub(crate) entries: Vec<Snapshot>,
    pub(crate) cursor: usize,
    /// Upper bound on `entries`; 0 means unbounded.
    pub(crate) max_entries: usize,
}

impl MachineState for HistoryState {}

impl HistoryState {
    pub fn new(baseline: Snapshot, max_entries: usize) -> Self {
        Self {
            baseline,
            entries: Vec::new(),
            cursor: 0,
            max_entries,
        }
    }

    /// Snapshot at the cursor, or the baseline before anything was recorded.
    pub fn current(&self) -> &Snapshot {
        self.entries.get(self.cursor).unwrap_or(&self.baseline)
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_backward(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Props;

    #[test]
    fn empty_history_reports_baseline() {
        let baseline = Snapshot::new(Props::new().with("count", 0));
        let state = HistoryState::new(baseline.clone(), 0);
        assert!(state.current().same_entry(&baseline));
        assert!(state.is_empty());
        assert!(!state.can_backward());
        assert!(!state.can_forward());
    }
}
