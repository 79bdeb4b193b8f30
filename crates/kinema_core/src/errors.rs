//! Error Types
//!
//! [`KinemaError`] covers the three failure families of the runtime:
//!
//! - *configuration* errors found while binding a channel to its samplers,
//! - *addressing* errors found while resolving a listener name,
//! - *numeric* errors raised when a time curve cannot be inverted,
//!
//! plus the bookkeeping errors of the transform hierarchy.
//!
//! None of them abort a tick. The evaluator logs them and degrades the
//! affected quantity; APIs that a caller drives directly (registry release,
//! node removal) return them as [`Result`].

use thiserror::Error;

/// The error type shared by all kinema crates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinemaError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A channel names a sampler id that its animation does not contain.
    #[error("Animation '{animation}' has no sampler '{sampler}'")]
    MissingSampler {
        /// Owning animation id
        animation: String,
        /// The sampler id that was looked up
        sampler: String,
    },

    /// A channel index past the end of the animation's channel list.
    #[error("Animation '{animation}' has no channel at index {index}")]
    MissingChannel {
        animation: String,
        index: usize,
    },

    /// Time samplers must be one-dimensional.
    #[error("Time sampler '{sampler}' has {components} components, expected 1")]
    TimeSamplerNotScalar {
        /// The offending sampler id
        sampler: String,
        /// Its component count
        components: usize,
    },

    /// Time and data samplers of one channel must share their segment count.
    #[error(
        "Segment count mismatch: time sampler '{time_sampler}' has {time_segments}, \
         data sampler '{data_sampler}' has {data_segments}"
    )]
    SegmentCountMismatch {
        time_sampler: String,
        time_segments: usize,
        data_sampler: String,
        data_segments: usize,
    },

    /// Control point data does not describe whole cubic segments.
    #[error("Malformed sampler '{sampler}': {reason}")]
    MalformedSampler {
        sampler: String,
        reason: String,
    },

    // ========================================================================
    // Addressing Errors
    // ========================================================================
    /// No listener slot is registered under this name.
    #[error("Unknown listener '{0}'")]
    UnknownListener(String),

    /// The `.suffix` of a target name matches no component alias.
    #[error("Unknown component suffix '{suffix}' in target '{target}'")]
    UnknownSuffix {
        target: String,
        suffix: String,
    },

    /// The requested sub-range does not fit into the slot.
    #[error(
        "Listener '{target}' overflow: offset {offset} + {components} components \
         exceeds slot size {slot_components}"
    )]
    ListenerOverflow {
        target: String,
        offset: usize,
        components: usize,
        slot_components: usize,
    },

    /// A slot was re-acquired with a different component count.
    #[error("Listener '{name}' has {existing} components, requested {requested}")]
    ComponentMismatch {
        name: String,
        existing: usize,
        requested: usize,
    },

    // ========================================================================
    // Numeric Errors
    // ========================================================================
    /// No root of the time curve lies inside the current segment.
    #[error(
        "Failed to invert time curve at x = {x} (segment {segment}: {x1}, {x2}, {x3}, {x4})"
    )]
    InversionFailed {
        x: f32,
        segment: usize,
        x1: f32,
        x2: f32,
        x3: f32,
        x4: f32,
    },

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// The node key is stale or was never issued.
    #[error("Transform node not found")]
    NodeNotFound,

    /// A node cannot be removed while others still depend on it.
    #[error("Transform node '{0}' still has dependents")]
    NodeHasDependents(String),

    /// Transform node ids are unique within a graph.
    #[error("Transform node id '{0}' already exists")]
    DuplicateNode(String),
}

/// Alias for `Result<T, KinemaError>`.
pub type Result<T> = std::result::Result<T, KinemaError>;
