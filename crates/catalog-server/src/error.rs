//! HTTP error responses.

use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_commerce::CatalogError;
use http::StatusCode;

/// A [`CatalogError`] on its way to the client as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl ApiError {
    /// 400 with the fixed message used for undecodable bodies.
    pub fn wrong_body() -> Self {
        ApiError(CatalogError::Validation("Wrong body".to_string()))
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}
