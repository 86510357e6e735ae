use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use catalog_products::{FindProductsQuery, Product};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /products?name=&categories[]=&orderBy=&order=`
pub async fn list(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(pairs) = pairs.map_err(|e| ApiError::QueryString(e.body_text()))?;
    let request = FindProductsQuery::from_pairs(pairs);

    let products = tokio::task::spawn_blocking(move || state.products.find(&request)).await??;
    tracing::debug!(count = products.len(), "listed products");
    Ok(Json(products))
}

/// `POST /products`. The request body is ignored.
pub async fn create(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = tokio::task::spawn_blocking(move || state.products.create()).await??;
    tracing::info!(id = ?product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}
