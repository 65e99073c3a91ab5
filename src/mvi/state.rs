//! Base trait for reducer-driven state.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (everything needed to answer queries)
/// - Comparable (PartialEq for detecting changes)
pub trait MachineState: Clone + PartialEq + Default + Send + 'static {}
