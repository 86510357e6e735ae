use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_products::ProductError;
use tokio::task::JoinError;

/// Every failure is reported as 422 with `{ "error": { "message": ... } }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error("invalid query string: {0}")]
    QueryString(String),
    #[error("request task failed: {0}")]
    Task(#[from] JoinError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        tracing::warn!(%status, error = %message, "request failed");

        let body = serde_json::json!({ "error": { "message": message } });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::StoreError;

    #[test]
    fn store_errors_keep_their_message() {
        let err = ApiError::from(ProductError::from(StoreError::Storage("down".into())));
        assert_eq!(err.to_string(), "storage error: down");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_query_is_unprocessable() {
        let response = ApiError::from(ProductError::InvalidQuery("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
