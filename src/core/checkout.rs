//! The order engine - converts a cart into an immutable order.
//!
//! The whole checkout runs inside one SeaORM transaction: compute the total,
//! insert the order, then per cart row decrement stock and freeze a line
//! item, and finally clear the cart. Any failure drops the transaction
//! uncommitted, so no order, line item, stock change or cart deletion
//! survives a failed attempt.
//!
//! Oversell protection does not rely on the earlier read of the product row:
//! the decrement is a conditional `UPDATE ... SET stock = stock - qty WHERE
//! id = ? AND stock >= qty`, and zero affected rows aborts the checkout. Two
//! checkouts racing on the last unit therefore cannot both succeed.

use crate::{
    entities::{cart_item, order, order_item, product, CartItem, Product},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Customer and shipping fields submitted with the checkout form.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    /// Required first name
    pub first_name: String,
    /// Required last name
    pub last_name: String,
    /// Required email
    pub email: String,
    /// Required phone
    pub phone: String,
    /// Optional street address (charity/digital products ship nowhere)
    pub address: String,
    /// Optional city
    pub city: String,
    /// Optional postal code
    pub postal_code: String,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Optional marketer attribution
    pub marketer_id: Option<i64>,
}

impl CustomerDetails {
    /// Checks the required fields; called before anything is mutated.
    pub fn validate(&self) -> Result<()> {
        for (value, field) in [
            (&self.first_name, "first name"),
            (&self.last_name, "last name"),
            (&self.email, "email"),
            (&self.phone, "phone"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation {
                    message: format!("Missing required field: {field}"),
                });
            }
        }
        Ok(())
    }
}

/// Generates a fresh order number: `ORD-` plus 8 uppercase hex characters
/// from a v4 UUID. Collisions are improbable; the unique column on
/// `orders.order_number` backstops them.
pub fn generate_order_number() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD-{}", hex[..8].to_uppercase())
}

/// Places an order from the user's cart. See the module docs for the
/// transactional shape.
///
/// # Errors
/// [`Error::Validation`] for missing customer fields, [`Error::EmptyCart`]
/// for an empty cart, [`Error::InsufficientStock`] when any line exceeds live
/// stock; all of them leave the store untouched.
pub async fn place_order(
    db: &DatabaseConnection,
    user_id: i64,
    details: &CustomerDetails,
) -> Result<order::Model> {
    details.validate()?;

    let txn = db.begin().await?;

    let lines = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .find_also_related(Product)
        .order_by_asc(cart_item::Column::CreatedAt)
        .all(&txn)
        .await?;
    if lines.is_empty() {
        return Err(Error::EmptyCart);
    }

    let mut total = 0.0;
    let mut resolved = Vec::with_capacity(lines.len());
    for (item, maybe_product) in lines {
        let product = maybe_product.ok_or(Error::NotFound {
            entity: "product",
            id: item.product_id.to_string(),
        })?;
        total += f64::from(item.quantity) * product.price;
        resolved.push((item, product));
    }

    let now = chrono::Utc::now();
    let order = order::ActiveModel {
        order_number: Set(generate_order_number()),
        user_id: Set(Some(user_id)),
        first_name: Set(details.first_name.trim().to_string()),
        last_name: Set(details.last_name.trim().to_string()),
        email: Set(details.email.trim().to_string()),
        phone: Set(details.phone.trim().to_string()),
        address: Set(details.address.clone()),
        city: Set(details.city.clone()),
        postal_code: Set(details.postal_code.clone()),
        notes: Set(details.notes.clone()),
        marketer_id: Set(details.marketer_id),
        total_amount: Set(total),
        status: Set("pending".to_string()),
        payment_status: Set("unpaid".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let order = order.insert(&txn).await?;

    for (item, product) in resolved {
        if !product.unlimited_stock {
            decrement_stock(&txn, &product, item.quantity).await?;
        }

        let line = order_item::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            product_name: Set(product.name.clone()),
            quantity: Set(item.quantity),
            price: Set(product.price),
            ..Default::default()
        };
        line.insert(&txn).await?;
    }

    CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    tracing::info!(
        user_id,
        order_number = %order.order_number,
        total_amount = order.total_amount,
        "order placed"
    );
    Ok(order)
}

/// Conditionally decrements stock inside the checkout transaction.
///
/// The `stock >= quantity` filter makes the check and the decrement one
/// statement; concurrent checkouts that both read enough stock cannot both
/// get past it.
async fn decrement_stock<C>(db: &C, product: &product::Model, quantity: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .filter(product::Column::Id.eq(product.id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        // Re-read for an accurate user-facing count
        let available = Product::find_by_id(product.id)
            .one(db)
            .await?
            .map_or(0, |p| p.stock);
        return Err(Error::InsufficientStock {
            product: product.name.clone(),
            requested: quantity,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::cart;
    use crate::core::orders;
    use crate::entities::{Order, OrderItem};
    use crate::test_utils::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_successful_checkout_snapshot_and_stock() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Pantry").await?;
        // Product A: stock 5 at 10.00, Product B: stock 1 at 20.00
        let a = create_custom_product(&db, "Product A", category.id, 5, |p| p.price = 10.0).await?;
        let b = create_custom_product(&db, "Product B", category.id, 1, |p| p.price = 20.0).await?;
        cart::add_to_cart(&db, user.id, a.id, 2).await?;
        cart::add_to_cart(&db, user.id, b.id, 1).await?;

        let order = place_order(&db, user.id, &test_customer_details()).await?;
        assert_eq!(order.total_amount, 40.0);
        assert_eq!(order.status, "pending");
        assert_eq!(order.payment_status, "unpaid");

        // Cart cleared
        assert_eq!(cart::cart_count(&db, user.id).await?, 0);

        // Stock decreased by exactly the ordered quantities
        let a_after = crate::core::catalog::get_product_by_id(&db, a.id).await?.unwrap();
        let b_after = crate::core::catalog::get_product_by_id(&db, b.id).await?.unwrap();
        assert_eq!(a_after.stock, 3);
        assert_eq!(b_after.stock, 0);

        // Line items carry frozen prices and sum to the total
        let items = orders::get_order_items(&db, order.id).await?;
        assert_eq!(items.len(), 2);
        let items_total: f64 = items.iter().map(order_item::Model::total_price).sum();
        assert_eq!(items_total, order.total_amount);
        Ok(())
    }

    #[tokio::test]
    async fn test_frozen_prices_survive_catalog_changes() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?; // price 10.0
        cart::add_to_cart(&db, user.id, product.id, 1).await?;
        let order = place_order(&db, user.id, &test_customer_details()).await?;

        crate::core::catalog::update_product(
            &db,
            product.id,
            crate::core::catalog::ProductUpdate {
                price: Some(99.0),
                ..Default::default()
            },
        )
        .await?;

        let items = orders::get_order_items(&db, order.id).await?;
        assert_eq!(items[0].price, 10.0);
        assert_eq!(order.total_amount, 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_everything_back() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Pantry").await?;
        let ok = create_custom_product(&db, "Plenty", category.id, 10, |p| p.price = 5.0).await?;
        let scarce = create_custom_product(&db, "Scarce", category.id, 2, |_| {}).await?;
        cart::add_to_cart(&db, user.id, ok.id, 1).await?;
        cart::add_to_cart(&db, user.id, scarce.id, 2).await?;

        // Someone else buys the scarce units first
        let rival = create_test_user(&db, "rival").await?;
        cart::add_to_cart(&db, rival.id, scarce.id, 2).await?;
        place_order(&db, rival.id, &test_customer_details()).await?;

        let failed = place_order(&db, user.id, &test_customer_details()).await;
        assert!(matches!(failed, Err(Error::InsufficientStock { .. })));

        // No second order, no line items for it, cart intact, first product's
        // stock untouched by the failed attempt
        assert_eq!(Order::find().all(&db).await?.len(), 1);
        assert_eq!(OrderItem::find().all(&db).await?.len(), 1);
        assert_eq!(cart::cart_count(&db, user.id).await?, 2);
        let ok_after = crate::core::catalog::get_product_by_id(&db, ok.id).await?.unwrap();
        assert_eq!(ok_after.stock, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_stock_line_fails_and_keeps_cart() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Pantry").await?;
        let product = create_custom_product(&db, "Product C", category.id, 1, |_| {}).await?;
        cart::add_to_cart(&db, user.id, product.id, 1).await?;

        // Stock disappears after the item was carted
        crate::core::catalog::update_product(
            &db,
            product.id,
            crate::core::catalog::ProductUpdate {
                stock: Some(0),
                ..Default::default()
            },
        )
        .await?;

        let failed = place_order(&db, user.id, &test_customer_details()).await;
        assert!(matches!(failed, Err(Error::InsufficientStock { .. })));
        assert_eq!(cart::cart_count(&db, user.id).await?, 1);
        assert!(Order::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_last_unit_goes_to_exactly_one_buyer() -> Result<()> {
        let (db, first) = setup_with_user().await?;
        let second = create_test_user(&db, "second").await?;
        let category = create_test_category(&db, "Pantry").await?;
        let product = create_custom_product(&db, "Product D", category.id, 1, |_| {}).await?;
        cart::add_to_cart(&db, first.id, product.id, 1).await?;
        cart::add_to_cart(&db, second.id, product.id, 1).await?;

        // Both carts passed the add-to-cart stock check; the conditional
        // decrement decides the winner at checkout time.
        let first_result = place_order(&db, first.id, &test_customer_details()).await;
        let second_result = place_order(&db, second.id, &test_customer_details()).await;

        assert!(first_result.is_ok());
        assert!(matches!(
            second_result,
            Err(Error::InsufficientStock { available: 0, .. })
        ));
        let after = crate::core::catalog::get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(after.stock, 0);
        assert_eq!(Order::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unlimited_stock_is_never_decremented() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Donations").await?;
        let donation = create_custom_product(&db, "Donation", category.id, 0, |p| {
            p.unlimited_stock = true;
            p.price = 18.0;
        })
        .await?;
        cart::add_to_cart(&db, user.id, donation.id, 3).await?;

        let order = place_order(&db, user.id, &test_customer_details()).await?;
        assert_eq!(order.total_amount, 54.0);
        let after = crate::core::catalog::get_product_by_id(&db, donation.id).await?.unwrap();
        assert_eq!(after.stock, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_preconditions() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?;

        // Empty cart
        let empty = place_order(&db, user.id, &test_customer_details()).await;
        assert!(matches!(empty, Err(Error::EmptyCart)));

        // Missing required field mutates nothing
        cart::add_to_cart(&db, user.id, product.id, 1).await?;
        let mut details = test_customer_details();
        details.phone = String::new();
        let invalid = place_order(&db, user.id, &details).await;
        assert!(matches!(invalid, Err(Error::Validation { .. })));
        assert_eq!(cart::cart_count(&db, user.id).await?, 1);
        assert!(Order::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_order_numbers_unique() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?; // stock 5
        let mut numbers = HashSet::new();
        for _ in 0..3 {
            cart::add_to_cart(&db, user.id, product.id, 1).await?;
            let order = place_order(&db, user.id, &test_customer_details()).await?;
            assert!(order.order_number.starts_with("ORD-"));
            assert_eq!(order.order_number.len(), 12);
            assert!(numbers.insert(order.order_number));
        }
        Ok(())
    }
}
