use crate::model::{Catalog, Item, Package, Selection};
use anyhow::{anyhow, bail, Result};
use rand::{distributions::Distribution, rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::collections::{BTreeMap, HashSet};

/// Knobs for synthetic instance generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub num_items: usize,
    pub num_packages: usize,
    pub items_per_package: usize,
    pub noise_stddev: f64,
    pub capacity: f64,
}

impl From<Vec<i32>> for GeneratorParams {
    fn from(arr: Vec<i32>) -> Self {
        Self {
            num_items: arr[0] as usize,
            num_packages: arr[1] as usize,
            items_per_package: arr[2] as usize,
            noise_stddev: arr[3] as f64 / 100.0,
            capacity: arr[4] as f64,
        }
    }
}

impl Into<Vec<i32>> for GeneratorParams {
    fn into(self) -> Vec<i32> {
        vec![
            self.num_items as i32,
            self.num_packages as i32,
            self.items_per_package as i32,
            (self.noise_stddev * 100.0).round() as i32,
            self.capacity as i32,
        ]
    }
}

/// A synthetic problem instance with its ground truth retained, so tests can
/// check estimates and selections against the volumes the generator drew.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instance {
    pub seed: [u8; 32],
    pub params: GeneratorParams,
    pub catalog: Catalog,
    pub packages: Vec<Package>,
    pub true_volumes: BTreeMap<String, f64>,
}

impl Instance {
    /// Draws a catalog with uniform prices in [1, 100] and true volumes on a
    /// centi-unit grid in [0.5, 5.0), then `num_packages` packages of
    /// `items_per_package` distinct items each. Observed volumes are the
    /// true sums plus N(0, noise_stddev) noise. Every item is guaranteed to
    /// appear in at least one package, so the indicator matrix has no zero
    /// column. The grid keeps noiseless instances exactly representable at
    /// two or more significant digits of solver quantization.
    pub fn generate(seed: &[u8; 32], params: &GeneratorParams) -> Result<Instance> {
        if params.num_items == 0 || params.num_packages == 0 {
            bail!("num_items and num_packages must be positive");
        }
        if params.items_per_package == 0 || params.items_per_package > params.num_items {
            bail!(
                "items_per_package must be in 1..={}, got {}",
                params.num_items,
                params.items_per_package
            );
        }
        if params.noise_stddev < 0.0 {
            bail!("noise_stddev must be non-negative, got {}", params.noise_stddev);
        }
        if params.capacity <= 0.0 {
            bail!("capacity must be positive, got {}", params.capacity);
        }

        let mut rng = StdRng::from_seed(*seed);

        let names: Vec<String> = (0..params.num_items)
            .map(|i| format!("item_{:03}", i))
            .collect();
        let items: Vec<Item> = names
            .iter()
            .map(|name| Item::new(name.clone(), rng.gen_range(1..=100)))
            .collect();
        let true_volumes: BTreeMap<String, f64> = names
            .iter()
            .map(|name| (name.clone(), rng.gen_range(50..500) as f64 / 100.0))
            .collect();

        // Distinct membership per package via a partial Fisher-Yates over the
        // item indices.
        let mut membership: Vec<Vec<usize>> = Vec::with_capacity(params.num_packages);
        let mut pool: Vec<usize> = (0..params.num_items).collect();
        for _ in 0..params.num_packages {
            for slot in 0..params.items_per_package {
                let pick = rng.gen_range(slot..params.num_items);
                pool.swap(slot, pick);
            }
            membership.push(pool[..params.items_per_package].to_vec());
        }

        // Any item the draws missed gets appended round-robin so no column
        // of the indicator matrix is all zeros.
        let mut covered = vec![false; params.num_items];
        for members in &membership {
            for &i in members {
                covered[i] = true;
            }
        }
        for (i, seen) in covered.iter().enumerate() {
            if !seen {
                membership[i % params.num_packages].push(i);
            }
        }

        let noise = if params.noise_stddev > 0.0 {
            Some(Normal::new(0.0, params.noise_stddev).map_err(|e| anyhow!(e.to_string()))?)
        } else {
            None
        };

        let packages: Vec<Package> = membership
            .into_iter()
            .map(|mut members| {
                members.sort_unstable();
                let total: f64 = members.iter().map(|&i| true_volumes[&names[i]]).sum();
                let observed = match &noise {
                    Some(dist) => total + dist.sample(&mut rng),
                    None => total,
                };
                Package::new(observed, members.iter().map(|&i| names[i].clone()).collect())
            })
            .collect();

        Ok(Instance {
            seed: *seed,
            params: params.clone(),
            catalog: Catalog::new(items),
            packages,
            true_volumes,
        })
    }

    /// Re-checks a selection against the instance's ground truth: items must
    /// be distinct and in the catalog, the reported price must match the
    /// catalog prices, and the *true* total volume must fit the capacity.
    /// Returns the certified total price.
    pub fn verify_selection(&self, selection: &Selection) -> Result<u64> {
        let mut seen = HashSet::new();
        let mut total_price: u64 = 0;
        let mut true_volume: f64 = 0.0;
        for name in &selection.items {
            if !seen.insert(name.as_str()) {
                bail!("item '{}' selected more than once", name);
            }
            let item = self
                .catalog
                .get(name)
                .ok_or_else(|| anyhow!("selected item '{}' is not in the catalog", name))?;
            total_price += item.price;
            true_volume += self.true_volumes[name];
        }
        if total_price != selection.total_price {
            bail!(
                "reported total price {} does not match catalog prices {}",
                selection.total_price,
                total_price
            );
        }
        // The epsilon absorbs float summation noise, nothing more.
        if true_volume > self.params.capacity + 1e-9 {
            bail!(
                "true total volume {} exceeds capacity {}",
                true_volume,
                self.params.capacity
            );
        }
        Ok(total_price)
    }
}
