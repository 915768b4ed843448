pub mod error;
pub mod instance;
pub mod model;

pub use error::StowageError;
pub use instance::{GeneratorParams, Instance};
pub use model::{Catalog, Item, Package, PricedItem, Selection};
