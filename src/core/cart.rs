//! Cart business logic - the per-user mapping of product to quantity.
//!
//! One row per (user, product); adding an already-carted product increments
//! the existing row. Stock is checked against the *combined* quantity so a
//! user cannot stage more units than the store can sell, but nothing is
//! reserved: stock itself only moves at checkout.

use crate::{
    entities::{cart_item, product, CartItem, Product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// A cart row joined with its product, as the cart page needs both.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// The cart row itself
    pub item: cart_item::Model,
    /// The referenced product at current catalog state
    pub product: product::Model,
}

impl CartLine {
    /// Line total at the product's *current* price.
    pub fn line_total(&self) -> f64 {
        f64::from(self.item.quantity) * self.product.price
    }
}

/// Adds a product to the user's cart, or increments the existing row.
///
/// Fails with [`Error::InsufficientStock`] when the combined quantity
/// (already carted + newly requested) exceeds the product's stock, unless the
/// product has unlimited stock.
pub async fn add_to_cart(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<cart_item::Model> {
    if quantity < 1 {
        return Err(Error::Validation {
            message: format!("Quantity must be at least 1, got {quantity}"),
        });
    }

    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .filter(product::Model::available)
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            id: product_id.to_string(),
        })?;

    let existing = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .one(db)
        .await?;

    let already_carted = existing.as_ref().map_or(0, |item| item.quantity);
    let requested = already_carted + quantity;
    if !product.unlimited_stock && requested > product.stock {
        return Err(Error::InsufficientStock {
            product: product.name,
            requested,
            available: product.stock,
        });
    }

    let result = match existing {
        Some(item) => {
            let mut model: cart_item::ActiveModel = item.into();
            model.quantity = Set(requested);
            model.update(db).await?
        }
        None => {
            let model = cart_item::ActiveModel {
                user_id: Set(user_id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            };
            model.insert(db).await?
        }
    };
    tracing::info!(
        user_id,
        product_id,
        quantity = result.quantity,
        "cart row upserted"
    );
    Ok(result)
}

/// Sets a cart row's quantity; non-positive quantities delete the row.
///
/// The row must belong to `user_id`, otherwise not-found. Quantities above
/// the product's stock fail with [`Error::InsufficientStock`].
pub async fn update_quantity(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    quantity: i32,
) -> Result<Option<cart_item::Model>> {
    let (item, product) = get_owned_line(db, user_id, item_id).await?;

    if quantity <= 0 {
        let model: cart_item::ActiveModel = item.into();
        model.delete(db).await?;
        return Ok(None);
    }

    if !product.unlimited_stock && quantity > product.stock {
        return Err(Error::InsufficientStock {
            product: product.name,
            requested: quantity,
            available: product.stock,
        });
    }

    let mut model: cart_item::ActiveModel = item.into();
    model.quantity = Set(quantity);
    let updated = model.update(db).await?;
    Ok(Some(updated))
}

/// Removes a cart row owned by the user; not-found when absent.
pub async fn remove_from_cart(db: &DatabaseConnection, user_id: i64, item_id: i64) -> Result<()> {
    let (item, _) = get_owned_line(db, user_id, item_id).await?;
    let model: cart_item::ActiveModel = item.into();
    model.delete(db).await?;
    Ok(())
}

/// Fetches the user's cart joined with products, oldest row first.
pub async fn get_cart(db: &DatabaseConnection, user_id: i64) -> Result<Vec<CartLine>> {
    let rows = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .find_also_related(Product)
        .order_by_asc(cart_item::Column::CreatedAt)
        .all(db)
        .await?;

    rows.into_iter()
        .map(|(item, product)| {
            let product = product.ok_or(Error::NotFound {
                entity: "product",
                id: item.product_id.to_string(),
            })?;
            Ok(CartLine { item, product })
        })
        .collect()
}

/// The cart total at current prices; not stored anywhere.
pub async fn cart_total(db: &DatabaseConnection, user_id: i64) -> Result<f64> {
    let lines = get_cart(db, user_id).await?;
    Ok(lines.iter().map(CartLine::line_total).sum())
}

/// Number of cart rows, shown in the storefront chrome.
pub async fn cart_count(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Loads a cart row and its product, verifying ownership.
async fn get_owned_line(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
) -> Result<(cart_item::Model, product::Model)> {
    let not_found = || Error::NotFound {
        entity: "cart item",
        id: item_id.to_string(),
    };
    let (item, product) = CartItem::find_by_id(item_id)
        .find_also_related(Product)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    if item.user_id != user_id {
        // Someone else's row looks exactly like a missing one
        return Err(not_found());
    }
    let product = product.ok_or_else(not_found)?;
    Ok((item, product))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_creates_then_increments() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?;

        let first = add_to_cart(&db, user.id, product.id, 2).await?;
        assert_eq!(first.quantity, 2);

        let second = add_to_cart(&db, user.id, product.id, 1).await?;
        assert_eq!(second.id, first.id);
        assert_eq!(second.quantity, 3);

        assert_eq!(cart_count(&db, user.id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_combined_overflow() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?; // stock = 5

        add_to_cart(&db, user.id, product.id, 4).await?;
        let overflow = add_to_cart(&db, user.id, product.id, 2).await;
        match overflow {
            Err(Error::InsufficientStock {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_add_unlimited_ignores_stock() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Donations").await?;
        let donation = create_custom_product(&db, "Donation", category.id, 0, |p| {
            p.unlimited_stock = true;
        })
        .await?;

        let item = add_to_cart(&db, user.id, donation.id, 100).await?;
        assert_eq!(item.quantity, 100);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_unavailable_product() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Misc").await?;
        let inactive = create_custom_product(&db, "Hidden", category.id, 5, |p| {
            p.is_active = false;
        })
        .await?;

        let result = add_to_cart(&db, user.id, inactive.id, 1).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        let invalid = add_to_cart(&db, user.id, inactive.id, 0).await;
        assert!(matches!(invalid, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_paths() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?; // stock = 5
        let item = add_to_cart(&db, user.id, product.id, 2).await?;

        // Over stock fails
        let too_many = update_quantity(&db, user.id, item.id, 9).await;
        assert!(matches!(too_many, Err(Error::InsufficientStock { .. })));

        // Valid update sets the quantity
        let updated = update_quantity(&db, user.id, item.id, 5).await?.unwrap();
        assert_eq!(updated.quantity, 5);

        // Zero deletes the row
        assert!(update_quantity(&db, user.id, item.id, 0).await?.is_none());
        assert_eq!(cart_count(&db, user.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rows_are_owner_scoped() -> Result<()> {
        let (db, owner, product) = setup_with_user_and_product().await?;
        let stranger = create_test_user(&db, "stranger").await?;
        let item = add_to_cart(&db, owner.id, product.id, 1).await?;

        let update = update_quantity(&db, stranger.id, item.id, 2).await;
        assert!(matches!(update, Err(Error::NotFound { .. })));
        let remove = remove_from_cart(&db, stranger.id, item.id).await;
        assert!(matches!(remove, Err(Error::NotFound { .. })));

        // The owner still can
        remove_from_cart(&db, owner.id, item.id).await?;
        let again = remove_from_cart(&db, owner.id, item.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_total_tracks_live_prices() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let category = create_test_category(&db, "Pantry").await?;
        let tea = create_custom_product(&db, "Tea", category.id, 10, |p| p.price = 8.0).await?;
        let jam = create_custom_product(&db, "Jam", category.id, 10, |p| p.price = 12.5).await?;

        add_to_cart(&db, user.id, tea.id, 2).await?;
        add_to_cart(&db, user.id, jam.id, 1).await?;
        assert_eq!(cart_total(&db, user.id).await?, 28.5);

        // A price change is reflected immediately, nothing is frozen yet
        crate::core::catalog::update_product(
            &db,
            tea.id,
            crate::core::catalog::ProductUpdate {
                price: Some(10.0),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cart_total(&db, user.id).await?, 32.5);
        Ok(())
    }
}
