//! Shared primitive types used across the crate.

/// Number of frame callbacks a runner has processed since its last reset.
pub type FrameCount = u64;

/// Logical animation time. Advances by a fixed step per frame, never by
/// wall-clock delta.
pub type LogicalTime = f64;

/// Unique identifier of one mounted runner instance.
pub type RunnerId = String;
