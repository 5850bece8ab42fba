//! Storefront catalog handlers: home, product list, product detail.

use crate::core::{cart, catalog};
use crate::errors::Result;
use crate::web::extract::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Query parameters for the product list.
#[derive(Debug, Deserialize, Default)]
pub struct ProductListQuery {
    /// Restrict to a category slug
    pub category: Option<String>,
    /// Search term over name and description
    pub q: Option<String>,
}

/// Product list page context: available products plus the category list.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// Products the shopper can buy
    pub products: Vec<crate::entities::ProductModel>,
    /// Active categories for the filter bar
    pub categories: Vec<crate::entities::CategoryModel>,
}

/// `GET /` - home/health with the signed-in user's cart badge when present.
pub async fn home(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Json<Value>> {
    let cart_count = match user {
        Some(CurrentUser(user)) => cart::cart_count(&state.db, user.id).await?,
        None => 0,
    };
    Ok(Json(json!({ "status": "ok", "cart_count": cart_count })))
}

/// `GET /products` - available products with optional category/search filters.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>> {
    let products = catalog::list_available_products(
        &state.db,
        query.category.as_deref(),
        query.q.as_deref(),
    )
    .await?;
    let categories = catalog::list_categories(&state.db, true).await?;
    Ok(Json(ProductListResponse {
        products,
        categories,
    }))
}

/// `GET /products/:id/:slug` - detail page for an available product.
pub async fn product_detail(
    State(state): State<AppState>,
    Path((id, slug)): Path<(i64, String)>,
) -> Result<Json<crate::entities::ProductModel>> {
    let product = catalog::get_available_product(&state.db, id, &slug).await?;
    Ok(Json(product))
}
