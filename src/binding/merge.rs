//! Prop precedence rules.
//!
//! ```text
//! rendered = defaults ⊕ external ⊕ snapshot
//! ```
//!
//! Only keys declared in the view's default props are seeded into state from
//! external props, and only those keys are re-asserted into state when the
//! parent supplies a value that differs from the snapshot at the cursor.
//! Other external props pass through and are never written into history.

use std::collections::BTreeSet;

use crate::props::{Props, Snapshot};

/// Capability flag enabling backward/forward controls. Never passed through.
pub const HISTORY_FLAG: &str = "history";

/// Remove capability flags from externally supplied props.
pub fn split_capabilities(mut external: Props) -> (Props, bool) {
    let history = external
        .remove(HISTORY_FLAG)
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    (external, history)
}

/// Initial state: defaults, overridden by the external props the view declared.
pub fn seed_state(defaults: &Props, overridable: &BTreeSet<String>, external: &Props) -> Props {
    defaults.overlaid(&external.restricted_to(overridable))
}

/// Props the view receives.
pub fn render_props(defaults: &Props, external: &Props, snapshot: &Snapshot) -> Props {
    let mut merged = defaults.overlaid(external);
    merged.overlay(snapshot.props());
    merged
}

/// Declared keys whose freshly supplied external value differs from the
/// snapshot at the cursor. These overwrite whatever history holds.
pub fn reassertion_patch(
    overridable: &BTreeSet<String>,
    current: &Snapshot,
    next: &Props,
) -> Props {
    next.restricted_to(overridable)
        .iter()
        .filter(|(key, value)| current.get(key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared() -> (Props, BTreeSet<String>) {
        let defaults = Props::new().with("count", 0).with("overwritedProps", "inner");
        let keys = defaults.key_set();
        (defaults, keys)
    }

    #[test]
    fn history_flag_is_stripped() {
        let (props, history) =
            split_capabilities(Props::new().with("count", 9).with("history", true));
        assert!(history);
        assert!(!props.contains_key("history"));
        let (_, history) = split_capabilities(Props::new());
        assert!(!history);
    }

    #[test]
    fn seed_only_takes_declared_external_keys() {
        let (defaults, keys) = declared();
        let external = Props::new().with("count", 9).with("wrapperProps", "heheda");
        let seed = seed_state(&defaults, &keys, &external);
        assert_eq!(seed.get_i64("count"), Some(9));
        assert_eq!(seed.get_str("overwritedProps"), Some("inner"));
        assert!(!seed.contains_key("wrapperProps"));
    }

    #[test]
    fn snapshot_wins_over_external() {
        let (defaults, _) = declared();
        let external = Props::new().with("wrapperProps", "heheda").with("count", 0);
        let snapshot = Snapshot::new(Props::new().with("wrapperProps", "miao").with("count", 19));
        let merged = render_props(&defaults, &external, &snapshot);
        assert_eq!(merged.get_str("wrapperProps"), Some("miao"));
        assert_eq!(merged.get_i64("count"), Some(19));
        assert_eq!(merged.get_str("overwritedProps"), Some("inner"));
    }

    #[test]
    fn reassertion_only_covers_declared_keys_that_differ_from_state() {
        let (_, keys) = declared();
        let current = Snapshot::new(
            Props::new()
                .with("overwritedProps", "miao")
                .with("count", 0),
        );
        let next = Props::new()
            .with("wrapperProps", "changed")
            .with("overwritedProps", "wrapper")
            .with("count", 0);
        let patch = reassertion_patch(&keys, &current, &next);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get_str("overwritedProps"), Some("wrapper"));
    }

    #[test]
    fn resupplied_value_overrides_moved_state() {
        let (_, keys) = declared();
        let current = Snapshot::new(Props::new().with("count", 19));
        let patch = reassertion_patch(&keys, &current, &Props::new().with("count", 0));
        assert_eq!(patch.get_i64("count"), Some(0));
    }
}
