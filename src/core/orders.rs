//! Order queries and admin status transitions.
//!
//! Orders are immutable apart from `status` / `payment_status`, and are never
//! deleted. Customer-facing lookups are scoped to the owner: another user's
//! order number behaves exactly like a missing one.

use crate::{
    entities::{order, order_item, Order, OrderItem},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};

/// Filters for the admin order list.
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    /// Restrict to an order status
    pub status: Option<String>,
    /// Restrict to a payment status
    pub payment_status: Option<String>,
    /// Match on order number or customer email
    pub search: Option<String>,
}

/// Fetches an order by number, requiring that `user_id` owns it.
pub async fn get_order_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    order_number: &str,
) -> Result<order::Model> {
    Order::find()
        .filter(order::Column::OrderNumber.eq(order_number))
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "order",
            id: order_number.to_string(),
        })
}

/// Fetches any order by number. Admin use.
pub async fn get_order_by_number(
    db: &DatabaseConnection,
    order_number: &str,
) -> Result<order::Model> {
    Order::find()
        .filter(order::Column::OrderNumber.eq(order_number))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "order",
            id: order_number.to_string(),
        })
}

/// The user's order history, newest first.
pub async fn list_orders_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Admin order list with the standard filters, newest first.
pub async fn list_orders(
    db: &DatabaseConnection,
    filter: &OrderFilter,
) -> Result<Vec<order::Model>> {
    let mut query = Order::find();
    if let Some(status) = &filter.status {
        query = query.filter(order::Column::Status.eq(status));
    }
    if let Some(payment) = &filter.payment_status {
        query = query.filter(order::Column::PaymentStatus.eq(payment));
    }
    if let Some(term) = &filter.search {
        query = query.filter(
            Condition::any()
                .add(order::Column::OrderNumber.contains(term))
                .add(order::Column::Email.contains(term)),
        );
    }
    query
        .order_by_desc(order::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The frozen line items of an order.
pub async fn get_order_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<order_item::Model>> {
    OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Admin transition of the fulfilment status.
pub async fn update_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: &str,
) -> Result<order::Model> {
    if !order::ORDER_STATUSES.contains(&status) {
        return Err(Error::Validation {
            message: format!("Unknown order status: {status}"),
        });
    }
    let existing = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "order",
            id: order_id.to_string(),
        })?;

    let mut model: order::ActiveModel = existing.into();
    model.status = Set(status.to_string());
    model.updated_at = Set(chrono::Utc::now());
    let updated = model.update(db).await?;
    tracing::info!(order_id, status, "order status updated");
    Ok(updated)
}

/// Admin transition of the payment status.
pub async fn update_payment_status(
    db: &DatabaseConnection,
    order_id: i64,
    payment_status: &str,
) -> Result<order::Model> {
    if !order::PAYMENT_STATUSES.contains(&payment_status) {
        return Err(Error::Validation {
            message: format!("Unknown payment status: {payment_status}"),
        });
    }
    let existing = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "order",
            id: order_id.to_string(),
        })?;

    let mut model: order::ActiveModel = existing.into();
    model.payment_status = Set(payment_status.to_string());
    model.updated_at = Set(chrono::Utc::now());
    let updated = model.update(db).await?;
    tracing::info!(order_id, payment_status, "order payment status updated");
    Ok(updated)
}
