//! Exact 0/1 knapsack over estimated item volumes.
//!
//! Volumes are continuous estimates, so both solvers quantize them to a
//! configurable number of decimal digits and work on integer weights. The
//! primary solver ([`SparseKnapsack`]) runs a dynamic program over the set
//! of *achievable* scaled volumes only, never materializing a dense
//! capacity-indexed table. [`ExactOptimizer`] is the oracle contract the
//! sparse solver is validated against; [`BranchBoundOracle`] is the shipped
//! implementation.

pub mod oracle;
pub(crate) mod quantize;
pub mod sparse;

pub use oracle::{BranchBoundOracle, ExactOptimizer};
pub use sparse::{SparseKnapsack, DEFAULT_SIGNIFICANT_DIGITS};
