pub mod catalog;
mod dto;
pub mod search;

pub use catalog::{NewProduct, ProductCatalog, ProductChanges};
pub use dto::{Product, ProductId};
pub use search::ProductSearch;
