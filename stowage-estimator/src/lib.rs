//! Volume recovery from package-level observations.
//!
//! Packages report a noisy total volume for a known set of items, giving an
//! overdetermined linear system `A x ≈ b` where `A` is a binary indicator
//! matrix (one row per package, one column per catalog item) and `x` is the
//! vector of unknown per-item volumes. [`build_linear_system`] assembles the
//! system; [`VolumeEstimator`] solves it in the least-squares sense, with
//! rank-deficiency detection and an optional non-negativity constraint.

pub mod estimator;
pub(crate) mod solve;
pub mod system;

pub use estimator::{SolveMode, VolumeEstimator};
pub use system::{build_linear_system, LinearSystem, UnknownReference};
