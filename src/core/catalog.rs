//! Catalog business logic - products and the reference data around them.
//!
//! Storefront queries only surface available products (active with stock to
//! sell, or unlimited); admin functions see everything and perform the CRUD
//! the admin surface exposes.

use crate::{
    entities::{category, event, kashrut, marketer, product, Category, Event, Kashrut, Marketer, Product},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};

/// Derives a URL-friendly slug from a display name.
///
/// Lowercases ASCII, keeps alphanumerics, collapses everything else into
/// single dashes. Non-ASCII names (e.g. Hebrew) pass through unchanged apart
/// from separator normalization.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Filters for the admin product list.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    /// Restrict to a category
    pub category_id: Option<i64>,
    /// Restrict to active or inactive products
    pub is_active: Option<bool>,
    /// Case-insensitive match on name or description
    pub search: Option<String>,
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name, must be non-empty
    pub name: String,
    /// Slug; derived from the name when empty
    pub slug: Option<String>,
    /// Owning category
    pub category_id: i64,
    /// Optional kosher certification
    pub kashrut_id: Option<i64>,
    /// Long-form description
    pub description: String,
    /// Unit price, must be non-negative
    pub price: f64,
    /// Optional image URL
    pub image_url: Option<String>,
    /// Initial stock, must be non-negative
    pub stock: i32,
    /// Product never runs out
    pub unlimited_stock: bool,
    /// Offered in the storefront
    pub is_active: bool,
}

/// Optional fields for an admin product edit; `None` leaves a field untouched.
#[derive(Debug, Default, Clone)]
pub struct ProductUpdate {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New unit price, must be non-negative
    pub price: Option<f64>,
    /// New stock count, must be non-negative
    pub stock: Option<i32>,
    /// New unlimited-stock flag
    pub unlimited_stock: Option<bool>,
    /// New active flag
    pub is_active: Option<bool>,
    /// New category
    pub category_id: Option<i64>,
    /// New kosher certification (Some(None) is not representable; omit to keep)
    pub kashrut_id: Option<i64>,
    /// New image URL
    pub image_url: Option<String>,
}

/// Lists products a shopper can actually buy, ordered by name.
///
/// A product is available when it is active and either has unlimited stock
/// or a positive stock count.
pub async fn list_available_products(
    db: &DatabaseConnection,
    category_slug: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(product::Column::UnlimitedStock.eq(true))
                .add(product::Column::Stock.gt(0)),
        );

    if let Some(slug) = category_slug {
        let category = Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "category",
                id: slug.to_string(),
            })?;
        query = query.filter(product::Column::CategoryId.eq(category.id));
    }

    if let Some(term) = search {
        query = query.filter(
            Condition::any()
                .add(product::Column::Name.contains(term))
                .add(product::Column::Description.contains(term)),
        );
    }

    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches an available product by id and slug for the detail page.
///
/// Unknown ids, slug mismatches and unavailable products all surface as
/// not-found, mirroring what the storefront shows a browser.
pub async fn get_available_product(
    db: &DatabaseConnection,
    id: i64,
    slug: &str,
) -> Result<product::Model> {
    let product = Product::find_by_id(id)
        .one(db)
        .await?
        .filter(|p| p.slug == slug && p.available())
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            id: id.to_string(),
        })?;
    Ok(product)
}

/// Fetches any product by id, regardless of availability. Admin use.
pub async fn get_product_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<product::Model>> {
    Product::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Creates a product after validating name, price and stock.
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    if new.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }
    if new.price < 0.0 || !new.price.is_finite() {
        return Err(Error::Validation {
            message: format!("Product price cannot be negative: {}", new.price),
        });
    }
    if new.stock < 0 {
        return Err(Error::Validation {
            message: format!("Product stock cannot be negative: {}", new.stock),
        });
    }

    let now = chrono::Utc::now();
    let slug = match new.slug {
        Some(s) if !s.trim().is_empty() => s,
        _ => slugify(&new.name),
    };
    let product = product::ActiveModel {
        name: Set(new.name.trim().to_string()),
        slug: Set(slug),
        category_id: Set(new.category_id),
        kashrut_id: Set(new.kashrut_id),
        description: Set(new.description),
        price: Set(new.price),
        image_url: Set(new.image_url),
        stock: Set(new.stock),
        unlimited_stock: Set(new.unlimited_stock),
        is_active: Set(new.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = product.insert(db).await?;
    tracing::info!(product_id = result.id, name = %result.name, "created product");
    Ok(result)
}

/// Applies an admin edit to a product. Stock edits here are an admin
/// correction; the order engine remains the only runtime stock mutator.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i64,
    update: ProductUpdate,
) -> Result<product::Model> {
    let existing = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            id: id.to_string(),
        })?;

    if let Some(price) = update.price {
        if price < 0.0 || !price.is_finite() {
            return Err(Error::Validation {
                message: format!("Product price cannot be negative: {price}"),
            });
        }
    }
    if let Some(stock) = update.stock {
        if stock < 0 {
            return Err(Error::Validation {
                message: format!("Product stock cannot be negative: {stock}"),
            });
        }
    }

    let mut model: product::ActiveModel = existing.into();
    if let Some(name) = update.name {
        model.name = Set(name);
    }
    if let Some(description) = update.description {
        model.description = Set(description);
    }
    if let Some(price) = update.price {
        model.price = Set(price);
    }
    if let Some(stock) = update.stock {
        model.stock = Set(stock);
    }
    if let Some(unlimited) = update.unlimited_stock {
        model.unlimited_stock = Set(unlimited);
    }
    if let Some(active) = update.is_active {
        model.is_active = Set(active);
    }
    if let Some(category_id) = update.category_id {
        model.category_id = Set(category_id);
    }
    if let Some(kashrut_id) = update.kashrut_id {
        model.kashrut_id = Set(Some(kashrut_id));
    }
    if let Some(image_url) = update.image_url {
        model.image_url = Set(Some(image_url));
    }
    model.updated_at = Set(chrono::Utc::now());
    model.update(db).await.map_err(Into::into)
}

/// Admin product list with the standard filters.
pub async fn list_products_admin(
    db: &DatabaseConnection,
    filter: &ProductFilter,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find();
    if let Some(category_id) = filter.category_id {
        query = query.filter(product::Column::CategoryId.eq(category_id));
    }
    if let Some(active) = filter.is_active {
        query = query.filter(product::Column::IsActive.eq(active));
    }
    if let Some(term) = &filter.search {
        query = query.filter(
            Condition::any()
                .add(product::Column::Name.contains(term))
                .add(product::Column::Description.contains(term)),
        );
    }
    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a category, deriving the slug from the name when absent.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    slug: Option<&str>,
) -> Result<category::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }
    let category = category::ActiveModel {
        name: Set(name.trim().to_string()),
        slug: Set(slug.map_or_else(|| slugify(name), ToString::to_string)),
        is_active: Set(true),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Lists categories, optionally only the active ones, ordered by name.
pub async fn list_categories(
    db: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<category::Model>> {
    let mut query = Category::find();
    if active_only {
        query = query.filter(category::Column::IsActive.eq(true));
    }
    query
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a kosher certification entry.
pub async fn create_kashrut(
    db: &DatabaseConnection,
    name: &str,
    certifier: &str,
) -> Result<kashrut::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Kashrut name cannot be empty".to_string(),
        });
    }
    let kashrut = kashrut::ActiveModel {
        name: Set(name.trim().to_string()),
        certifier: Set(certifier.to_string()),
        is_active: Set(true),
        ..Default::default()
    };
    kashrut.insert(db).await.map_err(Into::into)
}

/// Lists kosher certifications, optionally only the active ones.
pub async fn list_kashrut(
    db: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<kashrut::Model>> {
    let mut query = Kashrut::find();
    if active_only {
        query = query.filter(kashrut::Column::IsActive.eq(true));
    }
    query
        .order_by_asc(kashrut::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a marketer.
pub async fn create_marketer(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
    email: &str,
) -> Result<marketer::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Marketer name cannot be empty".to_string(),
        });
    }
    let marketer = marketer::ActiveModel {
        name: Set(name.trim().to_string()),
        phone: Set(phone.to_string()),
        email: Set(email.to_string()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    marketer.insert(db).await.map_err(Into::into)
}

/// Lists marketers, optionally only the active ones.
pub async fn list_marketers(
    db: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<marketer::Model>> {
    let mut query = Marketer::find();
    if active_only {
        query = query.filter(marketer::Column::IsActive.eq(true));
    }
    query
        .order_by_asc(marketer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a charity event.
pub async fn create_event(
    db: &DatabaseConnection,
    name: &str,
    event_date: Option<chrono::DateTime<chrono::Utc>>,
    location: &str,
) -> Result<event::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Event name cannot be empty".to_string(),
        });
    }
    let event = event::ActiveModel {
        name: Set(name.trim().to_string()),
        event_date: Set(event_date),
        location: Set(location.to_string()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    event.insert(db).await.map_err(Into::into)
}

/// Lists events, optionally only the active ones, newest first.
pub async fn list_events(db: &DatabaseConnection, active_only: bool) -> Result<Vec<event::Model>> {
    let mut query = Event::find();
    if active_only {
        query = query.filter(event::Column::IsActive.eq(true));
    }
    query
        .order_by_desc(event::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Flips the active flag on a category. Generic toggles for the other
/// reference entities go through their update paths in the admin handlers.
pub async fn set_category_active(
    db: &DatabaseConnection,
    category_id: i64,
    is_active: bool,
) -> Result<()> {
    let result = Category::update_many()
        .col_expr(category::Column::IsActive, Expr::value(is_active))
        .filter(category::Column::Id.eq(category_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "category",
            id: category_id.to_string(),
        });
    }
    Ok(())
}
