use crate::quantize::{scaled_capacity, scaled_weight, true_volume};
use ahash::AHashMap;
use stowage_core::{PricedItem, Selection, StowageError};

pub const DEFAULT_SIGNIFICANT_DIGITS: u32 = 3;

/// Best price found at one achievable scaled volume, with the item indices
/// (ascending input positions) that produce it.
#[derive(Debug, Clone)]
struct StateEntry {
    price: u64,
    items: Vec<usize>,
}

/// Exact 0/1 knapsack over a sparse map of achievable scaled volumes.
///
/// A dense table would cost `capacity * 10^significant_digits` slots per
/// item even when only a few hundred distinct sums are reachable; the map
/// holds exactly the reachable sums, so the work is
/// O(num_items * reachable_states) with
/// reachable_states <= min(scaled capacity, 2^num_items).
#[derive(Debug, Clone, Copy)]
pub struct SparseKnapsack {
    pub significant_digits: u32,
}

impl Default for SparseKnapsack {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

impl SparseKnapsack {
    pub fn new(significant_digits: u32) -> Self {
        Self { significant_digits }
    }

    /// Returns the price-maximizing subset of `items` whose scaled volumes
    /// fit within `capacity`.
    ///
    /// Items are processed in input order. Each item's pass iterates a
    /// snapshot of the state taken before the pass, so an item never
    /// combines with volumes it generated itself (0/1, not unbounded). A
    /// proposed entry replaces an incumbent at the same volume only when
    /// strictly better, so on equal price the earlier-found combination is
    /// kept; the terminal scan breaks price ties toward the smallest scaled
    /// volume. The reported `total_volume` is recomputed from the winners'
    /// original estimates.
    pub fn solve(
        &self,
        items: &[PricedItem],
        capacity: f64,
    ) -> Result<Selection, StowageError> {
        let cap = scaled_capacity(capacity, self.significant_digits)?;
        let weights: Vec<u64> = items
            .iter()
            .map(|item| scaled_weight(item.volume, self.significant_digits))
            .collect();

        let mut state: AHashMap<u64, StateEntry> = AHashMap::new();
        state.insert(
            0,
            StateEntry {
                price: 0,
                items: Vec::new(),
            },
        );

        for (idx, item) in items.iter().enumerate() {
            let w = weights[idx];
            if w > cap {
                // Never selectable on its own, so never selectable at all.
                continue;
            }
            let mut snapshot: Vec<(u64, StateEntry)> = state
                .iter()
                .map(|(&volume, entry)| (volume, entry.clone()))
                .collect();
            // Visit in ascending volume order: the map iterates in an
            // arbitrary (randomized) order, and "earlier-found" on price
            // ties must not depend on it.
            snapshot.sort_unstable_by_key(|&(volume, _)| volume);
            for (volume, entry) in snapshot {
                let next_volume = volume + w;
                if next_volume > cap {
                    continue;
                }
                let next_price = entry.price + item.price;
                let replace = match state.get(&next_volume) {
                    Some(existing) => next_price > existing.price,
                    None => true,
                };
                if replace {
                    let mut chosen = entry.items;
                    chosen.push(idx);
                    state.insert(
                        next_volume,
                        StateEntry {
                            price: next_price,
                            items: chosen,
                        },
                    );
                }
            }
        }

        // Max price; on ties the smallest scaled volume, so the result does
        // not depend on map iteration order.
        let mut best_volume = 0u64;
        let mut best = &state[&0];
        for (&volume, entry) in &state {
            if entry.price > best.price || (entry.price == best.price && volume < best_volume) {
                best = entry;
                best_volume = volume;
            }
        }

        Ok(Selection {
            items: best.items.iter().map(|&i| items[i].name.clone()).collect(),
            total_price: best.price,
            total_volume: true_volume(items, &best.items),
        })
    }
}
