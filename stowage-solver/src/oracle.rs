use crate::quantize::{scaled_capacity, scaled_weight, true_volume};
use crate::sparse::SparseKnapsack;
use stowage_core::{PricedItem, Selection, StowageError};

/// The cross-check contract: any exact 0/1 optimizer over (price, volume,
/// capacity). Implementations must agree on the optimal price for every
/// valid input; the achieving item sets may differ when ties exist.
pub trait ExactOptimizer {
    fn optimize(&self, items: &[PricedItem], capacity: f64) -> Result<Selection, StowageError>;
}

impl ExactOptimizer for SparseKnapsack {
    fn optimize(&self, items: &[PricedItem], capacity: f64) -> Result<Selection, StowageError> {
        self.solve(items, capacity)
    }
}

/// Depth-first branch and bound with a fractional (LP relaxation) upper
/// bound, used as the independent oracle for [`SparseKnapsack`]. Works on
/// the same quantized weights, so agreement on the optimal price is exact.
///
/// The search carries a node budget. Exhausting it means the oracle cannot
/// certify an optimum and the search fails loudly; a partial incumbent is
/// never passed off as the answer.
#[derive(Debug, Clone, Copy)]
pub struct BranchBoundOracle {
    pub significant_digits: u32,
    pub node_budget: usize,
}

impl Default for BranchBoundOracle {
    fn default() -> Self {
        Self {
            significant_digits: crate::sparse::DEFAULT_SIGNIFICANT_DIGITS,
            node_budget: 10_000_000,
        }
    }
}

impl BranchBoundOracle {
    pub fn new(significant_digits: u32) -> Self {
        Self {
            significant_digits,
            ..Self::default()
        }
    }
}

impl ExactOptimizer for BranchBoundOracle {
    fn optimize(&self, items: &[PricedItem], capacity: f64) -> Result<Selection, StowageError> {
        let cap = scaled_capacity(capacity, self.significant_digits)?;
        let weights: Vec<u64> = items
            .iter()
            .map(|item| scaled_weight(item.volume, self.significant_digits))
            .collect();
        let prices: Vec<u64> = items.iter().map(|item| item.price).collect();

        // Price-to-weight ratio order sharpens the fractional bound; ties
        // fall back to input position so the search is deterministic.
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            let ra = prices[a] as f64 / weights[a] as f64;
            let rb = prices[b] as f64 / weights[b] as f64;
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
        });

        let mut search = Search {
            order,
            weights: &weights,
            prices: &prices,
            cap,
            node_budget: self.node_budget,
            nodes: 0,
            best_price: 0,
            best: Vec::new(),
            current: Vec::new(),
        };
        search.visit(0, 0, 0)?;

        let mut chosen = search.best;
        chosen.sort_unstable();
        Ok(Selection {
            items: chosen.iter().map(|&i| items[i].name.clone()).collect(),
            total_price: search.best_price,
            total_volume: true_volume(items, &chosen),
        })
    }
}

struct Search<'a> {
    order: Vec<usize>,
    weights: &'a [u64],
    prices: &'a [u64],
    cap: u64,
    node_budget: usize,
    nodes: usize,
    best_price: u64,
    best: Vec<usize>,
    current: Vec<usize>,
}

impl Search<'_> {
    /// Greedy fractional fill over the remaining ratio-ordered items.
    fn bound(&self, k: usize, weight: u64, price: u64) -> f64 {
        let mut bound = price as f64;
        let mut w = weight;
        let mut j = k;
        while j < self.order.len() {
            let i = self.order[j];
            if w + self.weights[i] > self.cap {
                break;
            }
            w += self.weights[i];
            bound += self.prices[i] as f64;
            j += 1;
        }
        if j < self.order.len() {
            let i = self.order[j];
            bound += (self.cap - w) as f64 * self.prices[i] as f64 / self.weights[i] as f64;
        }
        bound
    }

    fn visit(&mut self, k: usize, weight: u64, price: u64) -> Result<(), StowageError> {
        self.nodes += 1;
        if self.nodes > self.node_budget {
            return Err(StowageError::InfeasibleSelection {
                reason: format!("branch-and-bound node budget of {} exhausted", self.node_budget),
            });
        }
        if price > self.best_price {
            self.best_price = price;
            self.best = self.current.clone();
        }
        if k == self.order.len() {
            return Ok(());
        }
        // An equal bound cannot strictly improve, so the first-found
        // incumbent survives ties.
        if self.bound(k, weight, price) <= self.best_price as f64 {
            return Ok(());
        }

        let i = self.order[k];
        if weight + self.weights[i] <= self.cap {
            self.current.push(i);
            self.visit(k + 1, weight + self.weights[i], price + self.prices[i])?;
            self.current.pop();
        }
        self.visit(k + 1, weight, price)
    }
}
