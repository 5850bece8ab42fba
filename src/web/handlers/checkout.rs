//! Checkout handlers: the checkout form context, order submission and the
//! confirmation page.

use crate::core::{cart, checkout, orders};
use crate::errors::Result;
use crate::web::extract::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Checkout submission body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Required first name
    pub first_name: String,
    /// Required last name
    pub last_name: String,
    /// Required email
    pub email: String,
    /// Required phone
    pub phone: String,
    /// Optional street address
    #[serde(default)]
    pub address: String,
    /// Optional city
    #[serde(default)]
    pub city: String,
    /// Optional postal code
    #[serde(default)]
    pub postal_code: String,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional marketer attribution
    #[serde(default)]
    pub marketer_id: Option<i64>,
}

impl From<CheckoutRequest> for checkout::CustomerDetails {
    fn from(body: CheckoutRequest) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            city: body.city,
            postal_code: body.postal_code,
            notes: body.notes,
            marketer_id: body.marketer_id,
        }
    }
}

/// Checkout form context: the cart as it will be ordered, with prefilled
/// customer fields from the account.
#[derive(Debug, Serialize)]
pub struct CheckoutFormResponse {
    /// Cart rows about to be ordered
    pub items: Vec<super::cart::CartLineResponse>,
    /// Live total
    pub total: f64,
    /// Prefilled first name
    pub first_name: String,
    /// Prefilled last name
    pub last_name: String,
    /// Prefilled email
    pub email: String,
}

/// `GET /checkout` - the checkout form context.
pub async fn checkout_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CheckoutFormResponse>> {
    let lines = cart::get_cart(&state.db, user.id).await?;
    let total = lines.iter().map(cart::CartLine::line_total).sum();
    Ok(Json(CheckoutFormResponse {
        items: lines.into_iter().map(Into::into).collect(),
        total,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    }))
}

/// `POST /checkout` - run the order engine and return the new order number.
pub async fn place_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<Value>> {
    let order = checkout::place_order(&state.db, user.id, &body.into()).await?;
    Ok(Json(json!({
        "order_number": order.order_number,
        "total_amount": order.total_amount,
    })))
}

/// `GET /order-confirmation/:order_number` - the just-placed order with its
/// frozen line items, owner-scoped.
pub async fn order_confirmation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_number): Path<String>,
) -> Result<Json<Value>> {
    let order = orders::get_order_for_user(&state.db, user.id, &order_number).await?;
    let items = orders::get_order_items(&state.db, order.id).await?;
    Ok(Json(json!({ "order": order, "items": items })))
}
