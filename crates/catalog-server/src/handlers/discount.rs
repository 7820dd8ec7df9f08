//! Discount endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use catalog_commerce::discount::{Discount, DiscountRequest, DiscountResponse};
use http::StatusCode;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /v1/discount
pub async fn create_discount(
    State(state): State<AppState>,
    body: Result<Json<DiscountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DiscountResponse>), ApiError> {
    let Json(request) = body.map_err(|e| {
        state
            .logger
            .with_error(&e)
            .error("Error decoding request while trying to create discount");
        ApiError::wrong_body()
    })?;

    let discount = state.discounts.create_discount(request).await?;
    Ok((StatusCode::CREATED, Json(discount.to_response())))
}

/// GET /v1/discounts
pub async fn get_discounts(State(state): State<AppState>) -> Result<Json<Vec<Discount>>, ApiError> {
    let discounts = state.discounts.get_discounts().await?;
    Ok(Json(discounts))
}
