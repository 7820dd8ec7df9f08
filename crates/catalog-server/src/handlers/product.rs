//! Product endpoints.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use catalog_commerce::catalog::{PricedProduct, Product, ProductRequest};
use catalog_db::{Filter, Value};
use http::StatusCode;

use crate::error::ApiError;
use crate::state::AppState;

/// Listing size when `limit` is absent or not a number.
pub const DEFAULT_LIMIT: usize = 5;

/// Query parameter, product field and operand of each listing filter.
const LISTING_FILTERS: &[(&str, &str, &str)] = &[
    ("category", "category", "="),
    ("priceLessThan", "price", "<="),
    ("priceGreaterThan", "price", ">="),
];

/// POST /v1/product
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(request) = body.map_err(|e| {
        state
            .logger
            .with_error(&e)
            .error("Error decoding request while trying to create product");
        ApiError::wrong_body()
    })?;

    let product = state.products.create_product(request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /v1/product/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products.get_product(&id).await?;
    Ok(Json(product))
}

/// GET /v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<PricedProduct>>, ApiError> {
    let limit = parse_limit(params.get("limit").map(String::as_str));
    let filters = listing_filters(&params);

    let mut products = state.products.list_products(&filters).await?;
    products.truncate(limit);
    Ok(Json(products))
}

fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|l| l.trim().parse().ok()).unwrap_or(DEFAULT_LIMIT)
}

fn listing_filters(params: &HashMap<String, String>) -> Vec<Filter> {
    LISTING_FILTERS
        .iter()
        .filter_map(|(param, field, operand)| {
            let raw = params.get(*param).filter(|v| !v.is_empty())?;
            let column = Product::filter_column(field)?;
            Some(Filter::new(column, *operand, Value::from_param(raw)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("")), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("two")), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("-1")), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("2")), 2);
        assert_eq!(parse_limit(Some("0")), 0);
    }

    #[test]
    fn test_listing_filters() {
        let filters = listing_filters(&params(&[
            ("priceGreaterThan", "60000"),
            ("category", "1"),
            ("priceLessThan", ""),
            ("colour", "red"),
        ]));
        assert_eq!(
            filters,
            vec![
                Product::category_filter(1, "="),
                Product::price_filter(60000, ">="),
            ]
        );
    }

    #[test]
    fn test_no_filters() {
        assert!(listing_filters(&HashMap::new()).is_empty());
    }
}
