use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};

/// A catalog entry. Volumes are unknown at this stage; the estimator
/// derives them once and hands the solver [`PricedItem`] values, so an item
/// without an estimate cannot reach the knapsack by construction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub price: u64,
}

impl Item {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Attaches the estimated volume, producing the form the solver
    /// consumes. Called exactly once per item, after estimation.
    pub fn priced(&self, volume: f64) -> PricedItem {
        PricedItem {
            name: self.name.clone(),
            price: self.price,
            volume,
        }
    }
}

/// An item with its estimated volume attached. Estimates carry the noise of
/// the package observations they were recovered from; the solver treats them
/// as given weights, not exact ones.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub name: String,
    pub price: u64,
    pub volume: f64,
}

/// One observed package: which items it contained and its measured total
/// volume (true total plus zero-mean noise). Read-only input to the linear
/// system builder.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Package {
    pub observed_volume: f64,
    pub items: Vec<String>,
}

impl Package {
    pub fn new(observed_volume: f64, items: Vec<String>) -> Self {
        Self {
            observed_volume,
            items,
        }
    }
}

/// Ordered, deduplicated item catalog. Items are kept sorted by name so the
/// item-to-column mapping downstream is a stable bijection across runs.
/// (De)serializes as a plain item list; construction re-establishes the
/// order either way.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "Vec<Item>", into = "Vec<Item>")]
pub struct Catalog {
    items: Vec<Item>,
}

impl From<Vec<Item>> for Catalog {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl From<Catalog> for Vec<Item> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}

impl Catalog {
    /// Builds a catalog sorted by item name. Duplicate names keep the first
    /// occurrence.
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items.dedup_by(|a, b| a.name == b.name);
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items
            .binary_search_by(|item| item.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.items[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// The solver's answer: which items to take, the price they add up to, and
/// their total volume recomputed from the unscaled estimates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Selection {
    pub items: Vec<String>,
    pub total_price: u64,
    pub total_volume: f64,
}

impl Selection {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_price: 0,
            total_volume: 0.0,
        }
    }
}

impl TryFrom<Map<String, Value>> for Selection {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_sorts_and_dedups() {
        let catalog = Catalog::new(vec![
            Item::new("crate", 5),
            Item::new("anvil", 10),
            Item::new("crate", 7),
        ]);
        let names: Vec<&str> = catalog.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["anvil", "crate"]);
        assert_eq!(catalog.get("crate").unwrap().price, 5);
        assert!(!catalog.contains("ghost"));
    }

    #[test]
    fn selection_from_json_map() {
        let json = serde_json::json!({
            "items": ["anvil"],
            "total_price": 10,
            "total_volume": 2.5,
        });
        let map = json.as_object().unwrap().clone();
        let selection = Selection::try_from(map).unwrap();
        assert_eq!(selection.items, vec!["anvil"]);
        assert_eq!(selection.total_price, 10);
    }
}
