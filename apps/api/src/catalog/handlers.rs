use axum::{
    extract::{Query, State},
    Json,
};

use crate::catalog::repository::{
    with_sentinel, PromptFilter, PromptRecord, ALL_CATEGORIES, ALL_PRODUCTS,
};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/catalog/categories
pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = state.catalog.categories().await?;
    Ok(Json(with_sentinel(ALL_CATEGORIES, categories)))
}

/// GET /api/v1/catalog/products
pub async fn handle_products(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let products = state.catalog.products().await?;
    Ok(Json(with_sentinel(ALL_PRODUCTS, products)))
}

/// GET /api/v1/prompts?category=&product=
pub async fn handle_list_prompts(
    State(state): State<AppState>,
    Query(filter): Query<PromptFilter>,
) -> Result<Json<Vec<PromptRecord>>, AppError> {
    let prompts = state.catalog.prompts(&filter).await?;
    Ok(Json(prompts))
}
