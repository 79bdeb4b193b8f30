//! Evaluator Settings
//!
//! Runtime knobs for the animation evaluator. Everything has a sensible
//! default, so most callers just use `EvaluatorSettings::default()`.
//!
//! ```rust,ignore
//! use kinema::core::EvaluatorSettings;
//!
//! // Start the clock at two seconds and keep inversion failures quiet.
//! let settings = EvaluatorSettings {
//!     start_time: 2.0,
//!     report_inversion_failures: false,
//!     ..Default::default()
//! };
//! let evaluator = Evaluator::with_settings(settings);
//! ```

use crate::spline::INVERSION_EPSILON;

/// Configuration for an animation evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaluatorSettings {
    /// Initial value of the global clock.
    pub start_time: f32,

    /// Border tolerance for time curve inversion.
    ///
    /// Sample times within this distance of a segment's first or last time
    /// value map straight to the segment border.
    pub inversion_epsilon: f32,

    /// Log inversion failures as warnings.
    ///
    /// Failures repeat every frame while the playhead sits in a broken
    /// segment; with this off they are demoted to `debug`.
    pub report_inversion_failures: bool,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            inversion_epsilon: INVERSION_EPSILON,
            report_inversion_failures: true,
        }
    }
}
