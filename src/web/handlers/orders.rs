//! Customer order handlers: history and detail.

use crate::core::orders;
use crate::errors::Result;
use crate::web::extract::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

/// `GET /orders` - the user's order history, newest first.
pub async fn order_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<crate::entities::OrderModel>>> {
    let history = orders::list_orders_for_user(&state.db, user.id).await?;
    Ok(Json(history))
}

/// `GET /orders/:order_number` - one order with its line items, owner-scoped.
pub async fn order_detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_number): Path<String>,
) -> Result<Json<Value>> {
    let order = orders::get_order_for_user(&state.db, user.id, &order_number).await?;
    let items = orders::get_order_items(&state.db, order.id).await?;
    Ok(Json(json!({ "order": order, "items": items })))
}
