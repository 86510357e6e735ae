use catalog_query::{Filter, FilterGroup, Query, Sort, SortDirection};
use catalog_store::Store;

use crate::error::ProductError;
use crate::model::{Concentration, Ingredient, ListType, Product, Quantity};
use crate::request::{FindProductsQuery, OrderBy};

/// Logical collection name; the binary prefixes it with the database name.
pub const COLLECTION: &str = "product";

pub struct ProductService<S: Store> {
    store: S,
    collection: String,
}

impl<S: Store> ProductService<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Products matching `request`, in the requested order.
    pub fn find(&self, request: &FindProductsQuery) -> Result<Vec<Product>, ProductError> {
        let query = build_query(request)?;
        tracing::debug!(collection = %self.collection, ?query, "finding products");

        self.store
            .find(&self.collection, &query)?
            .iter()
            .map(Product::from_document)
            .collect()
    }

    /// Insert the demonstration product and return it with its assigned id.
    pub fn create(&self) -> Result<Product, ProductError> {
        let stored = self
            .store
            .insert_one(&self.collection, demo_product().to_document())?;
        let product = Product::from_document(&stored)?;
        tracing::debug!(collection = %self.collection, id = ?product.id, "created product");
        Ok(product)
    }
}

/// Translate listing parameters into a store query.
///
/// Conditions are conjunctive:
/// - a non-empty `name` matches `commercialName` by case-sensitive, unanchored
///   containment; the input is escaped so it is matched literally
/// - `categories`, when present, restricts `category` to the given set, and an
///   empty set matches nothing
///
/// A sort is applied only when `orderBy` is `name` or `amount` and `order` is
/// non-empty. In that case `order` must be `ASC` or `DESC`.
pub fn build_query(request: &FindProductsQuery) -> Result<Query, ProductError> {
    let mut conditions = Vec::new();

    if let Some(name) = request.name.as_deref().filter(|n| !n.is_empty()) {
        conditions.push(Filter::regex("commercialName", regex::escape(name)));
    }

    if let Some(categories) = &request.categories {
        conditions.push(Filter::is_in("category", categories.iter().map(String::as_str)));
    }

    let filter = (!conditions.is_empty()).then(|| FilterGroup::all(conditions));

    let order_by = request.order_by.as_deref().and_then(OrderBy::parse);
    let order = request.order.as_deref().filter(|o| !o.is_empty());
    let sort = match (order_by, order) {
        (Some(order_by), Some(order)) => {
            let direction = order
                .parse::<SortDirection>()
                .map_err(|e| ProductError::InvalidQuery(e.to_string()))?;
            vec![Sort::new(order_by.field(), direction)]
        }
        _ => Vec::new(),
    };

    Ok(Query { filter, sort })
}

/// The fixed payload inserted by [`ProductService::create`].
pub fn demo_product() -> Product {
    Product {
        id: None,
        commercial_name: "Test".into(),
        ingredients: vec![Ingredient {
            name: "Test".into(),
            concentration: Concentration {
                unit: "mg".into(),
                value: 100.0,
            },
        }],
        quantity: Quantity {
            kind: "comprimido".into(),
            value: 30.0,
        },
        amount: 39.7,
        category: "MEDICAMENTO".into(),
        list_type: ListType {
            description: "D1".into(),
            require_recipe: true,
        },
    }
}
