//! Cart handlers: view, add, update quantity, remove.

use crate::core::cart::{self, CartLine};
use crate::errors::Result;
use crate::web::extract::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One row of the cart page.
#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    /// Cart row id, used by update/remove
    pub item_id: i64,
    /// Product id
    pub product_id: i64,
    /// Product name at current catalog state
    pub product_name: String,
    /// Current unit price
    pub unit_price: f64,
    /// Requested quantity
    pub quantity: i32,
    /// quantity x current unit price
    pub line_total: f64,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            item_id: line.item.id,
            product_id: line.product.id,
            product_name: line.product.name.clone(),
            unit_price: line.product.price,
            line_total: line.line_total(),
            quantity: line.item.quantity,
        }
    }
}

/// Cart page context.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    /// Cart rows joined with products
    pub items: Vec<CartLineResponse>,
    /// Live total at current prices
    pub total: f64,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Product to add
    pub product_id: i64,
    /// Units to add; defaults to 1
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Quantity-update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity; zero or less removes the row
    pub quantity: i32,
}

/// `GET /cart` - the user's cart with a live total.
pub async fn view_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CartResponse>> {
    let lines = cart::get_cart(&state.db, user.id).await?;
    let total = lines.iter().map(CartLine::line_total).sum();
    Ok(Json(CartResponse {
        items: lines.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// `POST /cart/add` - create or increment a cart row.
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Value>> {
    let item = cart::add_to_cart(&state.db, user.id, body.product_id, body.quantity).await?;
    Ok(Json(
        json!({ "item_id": item.id, "quantity": item.quantity }),
    ))
}

/// `POST /cart/update/:item_id` - set a row's quantity (<= 0 removes it).
pub async fn update_quantity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<i64>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<Value>> {
    let updated = cart::update_quantity(&state.db, user.id, item_id, body.quantity).await?;
    match updated {
        Some(item) => Ok(Json(json!({ "item_id": item.id, "quantity": item.quantity }))),
        None => Ok(Json(json!({ "removed": true }))),
    }
}

/// `POST /cart/remove/:item_id` - delete a cart row.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<i64>,
) -> Result<Json<Value>> {
    cart::remove_from_cart(&state.db, user.id, item_id).await?;
    Ok(Json(json!({ "removed": true })))
}
