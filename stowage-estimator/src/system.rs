use ndarray::{Array1, Array2, Axis};
use std::collections::HashMap;
use stowage_core::{Catalog, Package, StowageError};

/// A package reference to an item name the catalog does not contain.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownReference {
    pub package: usize,
    pub item: String,
}

/// The assembled system `A x ≈ b`. Column `j` of `a` corresponds to
/// `item_names[j]`; the mapping is the catalog's sorted order, so it is
/// stable across runs.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    pub a: Array2<f64>,
    pub b: Array1<f64>,
    pub item_names: Vec<String>,
    pub unknown_references: Vec<UnknownReference>,
}

impl LinearSystem {
    pub fn num_packages(&self) -> usize {
        self.a.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.a.ncols()
    }

    /// Items whose indicator column is all zeros. The system is
    /// under-determined for these: no observation constrains their volume.
    pub fn unobserved_items(&self) -> Vec<String> {
        self.a
            .sum_axis(Axis(0))
            .iter()
            .zip(&self.item_names)
            .filter(|(&count, _)| count == 0.0)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Rejects the system if any package referenced an unknown item.
    pub fn ensure_known_references(&self) -> Result<(), StowageError> {
        if self.unknown_references.is_empty() {
            return Ok(());
        }
        Err(StowageError::UnknownItemReference {
            references: self
                .unknown_references
                .iter()
                .map(|r| (r.package, r.item.clone()))
                .collect(),
        })
    }
}

/// Builds the indicator matrix and observation vector. Performs no
/// estimation. A package naming an item outside the catalog does not abort
/// the build: the reference is skipped and recorded in
/// `unknown_references`. An item named twice in one package still occupies a
/// single binary cell.
pub fn build_linear_system(catalog: &Catalog, packages: &[Package]) -> LinearSystem {
    let item_names: Vec<String> = catalog.items().iter().map(|i| i.name.clone()).collect();
    let column: HashMap<&str, usize> = item_names
        .iter()
        .enumerate()
        .map(|(j, name)| (name.as_str(), j))
        .collect();

    let mut a = Array2::<f64>::zeros((packages.len(), item_names.len()));
    let mut b = Array1::<f64>::zeros(packages.len());
    let mut unknown_references = Vec::new();

    for (p, package) in packages.iter().enumerate() {
        b[p] = package.observed_volume;
        for name in &package.items {
            match column.get(name.as_str()) {
                Some(&j) => a[[p, j]] = 1.0,
                None => unknown_references.push(UnknownReference {
                    package: p,
                    item: name.clone(),
                }),
            }
        }
    }

    LinearSystem {
        a,
        b,
        item_names,
        unknown_references,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_core::Item;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item::new("anvil", 10),
            Item::new("bolt", 2),
            Item::new("crate", 5),
        ])
    }

    #[test]
    fn indicator_rows_match_package_cardinality() {
        let packages = vec![
            Package::new(7.0, vec!["anvil".into(), "crate".into()]),
            Package::new(2.0, vec!["bolt".into()]),
        ];
        let system = build_linear_system(&catalog(), &packages);
        assert_eq!(system.num_packages(), 2);
        assert_eq!(system.num_items(), 3);
        for (p, package) in packages.iter().enumerate() {
            let row_sum: f64 = system.a.row(p).sum();
            assert_eq!(row_sum, package.items.len() as f64);
        }
        assert_eq!(system.b[0], 7.0);
        assert_eq!(system.a[[0, 0]], 1.0); // anvil
        assert_eq!(system.a[[0, 1]], 0.0); // bolt
        assert_eq!(system.a[[0, 2]], 1.0); // crate
    }

    #[test]
    fn column_order_is_sorted_item_names() {
        let system = build_linear_system(&catalog(), &[]);
        assert_eq!(system.item_names, vec!["anvil", "bolt", "crate"]);
    }

    #[test]
    fn unknown_references_are_counted_not_dropped() {
        let packages = vec![Package::new(
            3.0,
            vec!["bolt".into(), "ghost".into(), "phantom".into()],
        )];
        let system = build_linear_system(&catalog(), &packages);
        assert_eq!(system.unknown_references.len(), 2);
        assert_eq!(system.unknown_references[0].package, 0);
        assert_eq!(system.unknown_references[0].item, "ghost");
        match system.ensure_known_references() {
            Err(StowageError::UnknownItemReference { references }) => {
                assert_eq!(references.len(), 2)
            }
            other => panic!("expected UnknownItemReference, got {:?}", other),
        }
        // The known reference still landed in the matrix.
        assert_eq!(system.a[[0, 1]], 1.0);
    }

    #[test]
    fn unobserved_items_are_flagged() {
        let packages = vec![Package::new(7.0, vec!["anvil".into(), "crate".into()])];
        let system = build_linear_system(&catalog(), &packages);
        assert_eq!(system.unobserved_items(), vec!["bolt"]);
    }

    #[test]
    fn duplicate_membership_stays_binary() {
        let packages = vec![Package::new(4.0, vec!["bolt".into(), "bolt".into()])];
        let system = build_linear_system(&catalog(), &packages);
        assert_eq!(system.a[[0, 1]], 1.0);
        assert_eq!(system.a.row(0).sum(), 1.0);
    }
}
