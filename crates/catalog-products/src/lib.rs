mod error;
mod model;
mod request;
mod service;

pub use error::ProductError;
pub use model::{Concentration, Ingredient, ListType, Product, Quantity};
pub use request::{FindProductsQuery, OrderBy};
pub use service::{COLLECTION, ProductService, build_query, demo_product};
