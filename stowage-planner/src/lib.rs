//! End-to-end pipeline: catalog + packages -> linear system -> volume
//! estimates -> priced items -> knapsack selection.
//!
//! Stage ordering is load-bearing: unknown package references and estimation
//! failures abort before any knapsack work, and capacity validation runs
//! before the dynamic program touches its state. A caller never receives a
//! partial result dressed up as success.

use std::collections::BTreeMap;
use stowage_core::{Catalog, Package, PricedItem, Selection, StowageError};
use stowage_estimator::{build_linear_system, SolveMode, VolumeEstimator};
use stowage_solver::SparseKnapsack;

#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    pub capacity: f64,
    pub significant_digits: u32,
    pub solve_mode: SolveMode,
}

impl PlannerConfig {
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            significant_digits: stowage_solver::DEFAULT_SIGNIFICANT_DIGITS,
            solve_mode: SolveMode::Unconstrained,
        }
    }
}

/// The pipeline's full answer: the selection plus the volume estimates it
/// was computed from, keyed by item name.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub selection: Selection,
    pub volume_estimates: BTreeMap<String, f64>,
}

/// Runs estimation and selection in one pass.
pub fn plan(
    catalog: &Catalog,
    packages: &[Package],
    config: &PlannerConfig,
) -> Result<Plan, StowageError> {
    let system = build_linear_system(catalog, packages);
    system.ensure_known_references()?;

    let estimator = VolumeEstimator::new(config.solve_mode);
    let volume_estimates = estimator.estimate(&system)?;

    let items: Vec<PricedItem> = catalog
        .items()
        .iter()
        .map(|item| item.priced(volume_estimates[&item.name]))
        .collect();

    let solver = SparseKnapsack::new(config.significant_digits);
    let selection = solver.solve(&items, config.capacity)?;

    Ok(Plan {
        selection,
        volume_estimates,
    })
}
