//! Core building blocks shared by the kinema crates: Bezier segment math,
//! the error type and evaluator settings.

pub mod errors;
pub mod settings;
pub mod spline;

pub use errors::{KinemaError, Result};
pub use settings::EvaluatorSettings;
pub use spline::{INVERSION_EPSILON, Roots, eval_bezier, find_zero, find_zero_with_tolerance, solve_cubic};
