use crate::solve::{nnls, solve_symmetric};
use crate::system::LinearSystem;
use std::collections::BTreeMap;
use stowage_core::StowageError;

/// Whether estimates may go negative.
///
/// `Unconstrained` is the plain least-squares solve: with noisy
/// observations an item's estimate can come out slightly negative even
/// though true volumes never are. `NonNegative` enforces `x_i >= 0` with an
/// active-set NNLS solve instead of truncating the unconstrained answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    Unconstrained,
    NonNegative,
}

/// Least-squares recovery of per-item volumes from a [`LinearSystem`].
#[derive(Debug, Clone, Copy)]
pub struct VolumeEstimator {
    pub mode: SolveMode,
}

impl Default for VolumeEstimator {
    fn default() -> Self {
        Self {
            mode: SolveMode::Unconstrained,
        }
    }
}

impl VolumeEstimator {
    pub fn new(mode: SolveMode) -> Self {
        Self { mode }
    }

    /// Solves `min_x ||Ax - b||` via the normal equations and returns the
    /// estimate keyed by item name. The estimates inherit the observation
    /// noise; callers must treat them as approximate, not exact weights.
    ///
    /// Fails with [`StowageError::RankDeficiency`] when the system cannot
    /// identify some item: items observed in no package are reported up
    /// front by name, and a linear dependency discovered during elimination
    /// names the item whose pivot column collapsed.
    pub fn estimate(&self, system: &LinearSystem) -> Result<BTreeMap<String, f64>, StowageError> {
        let unobserved = system.unobserved_items();
        if !unobserved.is_empty() {
            return Err(StowageError::RankDeficiency { items: unobserved });
        }

        let gram = system.a.t().dot(&system.a);
        let atb = system.a.t().dot(&system.b);

        let x = match self.mode {
            SolveMode::Unconstrained => solve_symmetric(&gram, &atb),
            SolveMode::NonNegative => nnls(&gram, &atb),
        }
        .map_err(|col| StowageError::RankDeficiency {
            items: vec![system.item_names[col].clone()],
        })?;

        let non_finite: Vec<String> = x
            .iter()
            .zip(&system.item_names)
            .filter(|(v, _)| !v.is_finite())
            .map(|(_, name)| name.clone())
            .collect();
        if !non_finite.is_empty() {
            return Err(StowageError::RankDeficiency { items: non_finite });
        }

        Ok(system
            .item_names
            .iter()
            .cloned()
            .zip(x.iter().copied())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::build_linear_system;
    use stowage_core::{Catalog, Item, Package};

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|n| Item::new(*n, 1)).collect())
    }

    #[test]
    fn recovers_exact_volumes_from_noiseless_packages() {
        // anvil = 3, bolt = 0.5, crate = 2
        let packages = vec![
            Package::new(3.5, vec!["anvil".into(), "bolt".into()]),
            Package::new(5.0, vec!["anvil".into(), "crate".into()]),
            Package::new(2.5, vec!["bolt".into(), "crate".into()]),
            Package::new(5.5, vec!["anvil".into(), "bolt".into(), "crate".into()]),
        ];
        let system = build_linear_system(&catalog(&["anvil", "bolt", "crate"]), &packages);
        let estimates = VolumeEstimator::default().estimate(&system).unwrap();
        assert!((estimates["anvil"] - 3.0).abs() < 1e-9);
        assert!((estimates["bolt"] - 0.5).abs() < 1e-9);
        assert!((estimates["crate"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unobserved_item_fails_by_name() {
        let packages = vec![Package::new(3.0, vec!["anvil".into()])];
        let system = build_linear_system(&catalog(&["anvil", "bolt"]), &packages);
        match VolumeEstimator::default().estimate(&system) {
            Err(StowageError::RankDeficiency { items }) => assert_eq!(items, vec!["bolt"]),
            other => panic!("expected RankDeficiency, got {:?}", other),
        }
    }

    #[test]
    fn inseparable_items_fail_as_rank_deficient() {
        // bolt and crate always travel together, so only their sum is
        // identifiable.
        let packages = vec![
            Package::new(3.0, vec!["bolt".into(), "crate".into()]),
            Package::new(3.1, vec!["bolt".into(), "crate".into()]),
            Package::new(4.0, vec!["anvil".into()]),
        ];
        let system = build_linear_system(&catalog(&["anvil", "bolt", "crate"]), &packages);
        match VolumeEstimator::default().estimate(&system) {
            Err(StowageError::RankDeficiency { items }) => {
                assert_eq!(items.len(), 1);
                assert!(items[0] == "bolt" || items[0] == "crate");
            }
            other => panic!("expected RankDeficiency, got {:?}", other),
        }
    }

    #[test]
    fn non_negative_mode_never_returns_negative_estimates() {
        // Observations crafted so the unconstrained solve goes negative on
        // bolt: the shared packages say anvil + bolt is barely more than
        // anvil alone says anvil is.
        let packages = vec![
            Package::new(5.0, vec!["anvil".into()]),
            Package::new(5.2, vec!["anvil".into()]),
            Package::new(4.6, vec!["anvil".into(), "bolt".into()]),
            Package::new(4.4, vec!["anvil".into(), "bolt".into()]),
        ];
        let system = build_linear_system(&catalog(&["anvil", "bolt"]), &packages);

        let unconstrained = VolumeEstimator::new(SolveMode::Unconstrained)
            .estimate(&system)
            .unwrap();
        assert!(unconstrained["bolt"] < 0.0);

        let constrained = VolumeEstimator::new(SolveMode::NonNegative)
            .estimate(&system)
            .unwrap();
        assert!(constrained.values().all(|&v| v >= 0.0));
        assert_eq!(constrained["bolt"], 0.0);
    }
}
