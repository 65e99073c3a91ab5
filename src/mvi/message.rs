//! Base trait for messages consumed by MVI reducers.

/// Marker trait for message objects.
///
/// Messages represent:
/// - Navigation requests (step backward, step forward)
/// - Newly produced data (a snapshot to record)
///
/// Messages are processed by reducers to produce new states.
pub trait Message: Send + 'static {}
