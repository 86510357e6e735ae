use std::sync::Arc;

use catalog_products::ProductService;
use catalog_store::Store;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService<Arc<dyn Store>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, collection: impl Into<String>) -> Self {
        Self {
            products: Arc::new(ProductService::new(store, collection)),
        }
    }
}
