//! Role-gated admin handlers: CRUD over the catalog, orders and accounts.
//!
//! Every handler begins with [`admin::require_admin`]; the user-management
//! mutations additionally consult the per-target permission rules.

use crate::core::{accounts, admin, catalog, orders};
use crate::entities::{cart_item, CartItem};
use crate::errors::{Error, Result};
use crate::web::extract::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::{json, Value};

// --- Catalog ---

/// Query parameters for the admin product list.
#[derive(Debug, Deserialize, Default)]
pub struct ProductListQuery {
    /// Restrict to a category
    pub category_id: Option<i64>,
    /// Restrict by active flag
    pub is_active: Option<bool>,
    /// Search name/description
    pub q: Option<String>,
}

/// Create-product body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Display name
    pub name: String,
    /// Optional explicit slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Owning category
    pub category_id: i64,
    /// Optional kosher certification
    #[serde(default)]
    pub kashrut_id: Option<i64>,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Optional image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Initial stock
    #[serde(default)]
    pub stock: i32,
    /// Never runs out
    #[serde(default)]
    pub unlimited_stock: bool,
    /// Offered in the storefront
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// Edit-product body; omitted fields stay as they are.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New price
    pub price: Option<f64>,
    /// New stock
    pub stock: Option<i32>,
    /// New unlimited flag
    pub unlimited_stock: Option<bool>,
    /// New active flag
    pub is_active: Option<bool>,
    /// New category
    pub category_id: Option<i64>,
    /// New certification
    pub kashrut_id: Option<i64>,
    /// New image URL
    pub image_url: Option<String>,
}

/// `GET /admin/products`
pub async fn list_products(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<crate::entities::ProductModel>>> {
    admin::require_admin(&requester)?;
    let products = catalog::list_products_admin(
        &state.db,
        &catalog::ProductFilter {
            category_id: query.category_id,
            is_active: query.is_active,
            search: query.q,
        },
    )
    .await?;
    Ok(Json(products))
}

/// `POST /admin/products`
pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<crate::entities::ProductModel>> {
    admin::require_admin(&requester)?;
    let product = catalog::create_product(
        &state.db,
        catalog::NewProduct {
            name: body.name,
            slug: body.slug,
            category_id: body.category_id,
            kashrut_id: body.kashrut_id,
            description: body.description,
            price: body.price,
            image_url: body.image_url,
            stock: body.stock,
            unlimited_stock: body.unlimited_stock,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(product))
}

/// `PUT /admin/products/:id`
pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<crate::entities::ProductModel>> {
    admin::require_admin(&requester)?;
    let product = catalog::update_product(
        &state.db,
        id,
        catalog::ProductUpdate {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock,
            unlimited_stock: body.unlimited_stock,
            is_active: body.is_active,
            category_id: body.category_id,
            kashrut_id: body.kashrut_id,
            image_url: body.image_url,
        },
    )
    .await?;
    Ok(Json(product))
}

/// Create-category body.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name
    pub name: String,
    /// Optional explicit slug
    #[serde(default)]
    pub slug: Option<String>,
}

/// `GET /admin/categories`
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> Result<Json<Vec<crate::entities::CategoryModel>>> {
    admin::require_admin(&requester)?;
    Ok(Json(catalog::list_categories(&state.db, false).await?))
}

/// `POST /admin/categories`
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<crate::entities::CategoryModel>> {
    admin::require_admin(&requester)?;
    let category = catalog::create_category(&state.db, &body.name, body.slug.as_deref()).await?;
    Ok(Json(category))
}

/// Active-flag body shared by the toggle endpoints.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// New active flag
    pub is_active: bool,
}

/// `POST /admin/categories/:id/active`
pub async fn set_category_active(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<Value>> {
    admin::require_admin(&requester)?;
    catalog::set_category_active(&state.db, id, body.is_active).await?;
    Ok(Json(json!({ "updated": true })))
}

/// Create-kashrut body.
#[derive(Debug, Deserialize)]
pub struct CreateKashrutRequest {
    /// Certification name
    pub name: String,
    /// Certifying authority
    #[serde(default)]
    pub certifier: String,
}

/// `GET /admin/kashrut`
pub async fn list_kashrut(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> Result<Json<Vec<crate::entities::KashrutModel>>> {
    admin::require_admin(&requester)?;
    Ok(Json(catalog::list_kashrut(&state.db, false).await?))
}

/// `POST /admin/kashrut`
pub async fn create_kashrut(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(body): Json<CreateKashrutRequest>,
) -> Result<Json<crate::entities::KashrutModel>> {
    admin::require_admin(&requester)?;
    Ok(Json(
        catalog::create_kashrut(&state.db, &body.name, &body.certifier).await?,
    ))
}

/// Create-marketer body.
#[derive(Debug, Deserialize)]
pub struct CreateMarketerRequest {
    /// Marketer name
    pub name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
}

/// `GET /admin/marketers`
pub async fn list_marketers(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> Result<Json<Vec<crate::entities::MarketerModel>>> {
    admin::require_admin(&requester)?;
    Ok(Json(catalog::list_marketers(&state.db, false).await?))
}

/// `POST /admin/marketers`
pub async fn create_marketer(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(body): Json<CreateMarketerRequest>,
) -> Result<Json<crate::entities::MarketerModel>> {
    admin::require_admin(&requester)?;
    Ok(Json(
        catalog::create_marketer(&state.db, &body.name, &body.phone, &body.email).await?,
    ))
}

/// Create-event body.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event name
    pub name: String,
    /// When it takes place
    #[serde(default)]
    pub event_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Where it takes place
    #[serde(default)]
    pub location: String,
}

/// `GET /admin/events`
pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> Result<Json<Vec<crate::entities::EventModel>>> {
    admin::require_admin(&requester)?;
    Ok(Json(catalog::list_events(&state.db, false).await?))
}

/// `POST /admin/events`
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(body): Json<CreateEventRequest>,
) -> Result<Json<crate::entities::EventModel>> {
    admin::require_admin(&requester)?;
    Ok(Json(
        catalog::create_event(&state.db, &body.name, body.event_date, &body.location).await?,
    ))
}

// --- Orders ---

/// Query parameters for the admin order list.
#[derive(Debug, Deserialize, Default)]
pub struct OrderListQuery {
    /// Restrict by status
    pub status: Option<String>,
    /// Restrict by payment status
    pub payment_status: Option<String>,
    /// Search order number / email
    pub q: Option<String>,
}

/// Status-transition body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// The new status value
    pub status: String,
}

/// `GET /admin/orders`
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<crate::entities::OrderModel>>> {
    admin::require_admin(&requester)?;
    let found = orders::list_orders(
        &state.db,
        &orders::OrderFilter {
            status: query.status,
            payment_status: query.payment_status,
            search: query.q,
        },
    )
    .await?;
    Ok(Json(found))
}

/// `POST /admin/orders/:id/status`
pub async fn set_order_status(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<crate::entities::OrderModel>> {
    admin::require_admin(&requester)?;
    Ok(Json(orders::update_status(&state.db, id, &body.status).await?))
}

/// `POST /admin/orders/:id/payment-status`
pub async fn set_payment_status(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<crate::entities::OrderModel>> {
    admin::require_admin(&requester)?;
    Ok(Json(
        orders::update_payment_status(&state.db, id, &body.status).await?,
    ))
}

// --- Cart rows (read-only admin view) ---

/// Query parameters for the cart-row list.
#[derive(Debug, Deserialize, Default)]
pub struct CartListQuery {
    /// Restrict to one user's cart
    pub user_id: Option<i64>,
}

/// `GET /admin/cart-items`
pub async fn list_cart_items(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Query(query): Query<CartListQuery>,
) -> Result<Json<Vec<crate::entities::CartItemModel>>> {
    admin::require_admin(&requester)?;
    let mut select = CartItem::find();
    if let Some(user_id) = query.user_id {
        select = select.filter(cart_item::Column::UserId.eq(user_id));
    }
    Ok(Json(select.all(&state.db).await?))
}

// --- Users ---

/// Query parameters for the admin user list.
#[derive(Debug, Deserialize, Default)]
pub struct UserListQuery {
    /// Restrict by profile user_type
    pub user_type: Option<String>,
    /// Restrict by active flag
    pub is_active: Option<bool>,
    /// Search username / email
    pub q: Option<String>,
}

/// Edit-user body; omitted fields stay as they are.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    /// New first name
    pub first_name: Option<String>,
    /// New last name
    pub last_name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New active flag
    pub is_active: Option<bool>,
    /// New staff flag
    pub is_staff: Option<bool>,
    /// New superuser flag (superuser requesters only)
    pub is_superuser: Option<bool>,
}

/// `GET /admin/users`
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<crate::entities::UserModel>>> {
    admin::require_admin(&requester)?;
    let users = accounts::list_users(
        &state.db,
        &accounts::UserFilter {
            user_type: query.user_type,
            is_active: query.is_active,
            search: query.q,
        },
    )
    .await?;
    Ok(Json(users))
}

/// `GET /admin/users/:id/form` - which fields this requester gets to edit.
pub async fn user_form(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let target = accounts::get_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            id: id.to_string(),
        })?;
    let view = admin::user_form_view(&requester, &target)?;
    Ok(Json(json!({
        "fields": view.fields(),
        "disabled": view.disabled(),
    })))
}

/// `PUT /admin/users/:id` - edit a user under the permission rules.
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<crate::entities::UserModel>> {
    admin::require_admin(&requester)?;
    let target = accounts::get_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            id: id.to_string(),
        })?;
    admin::require_can_edit(&requester, &target)?;

    if body.first_name.is_none()
        && body.last_name.is_none()
        && body.email.is_none()
        && body.is_active.is_none()
        && body.is_staff.is_none()
        && body.is_superuser.is_none()
    {
        return Ok(Json(target));
    }

    if let Some(new_flag) = body.is_superuser {
        if new_flag != target.is_superuser {
            // The field simply isn't on the staff form, and it is disabled on
            // a superuser's own form
            if !requester.is_superuser {
                return Err(Error::Forbidden {
                    message: "Only superusers may change the superuser flag".to_string(),
                });
            }
            if requester.id == target.id {
                return Err(Error::Forbidden {
                    message: "Cannot change your own superuser flag".to_string(),
                });
            }
        }
    }

    let mut model: crate::entities::user::ActiveModel = target.clone().into();
    if let Some(first_name) = body.first_name {
        model.first_name = Set(first_name);
    }
    if let Some(last_name) = body.last_name {
        model.last_name = Set(last_name);
    }
    if let Some(email) = body.email {
        model.email = Set(email);
    }
    if let Some(is_active) = body.is_active {
        model.is_active = Set(is_active);
    }
    if let Some(is_staff) = body.is_staff {
        model.is_staff = Set(is_staff);
    }
    if let Some(is_superuser) = body.is_superuser {
        if requester.is_superuser && requester.id != target.id {
            model.is_superuser = Set(is_superuser);
        }
    }
    let updated = accounts::save_user(&state.db, model).await?;
    Ok(Json(updated))
}

/// Edit-profile body for the admin profile view.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateProfileRequest {
    /// New primary phone
    pub phone: Option<String>,
    /// New secondary phone
    pub phone2: Option<String>,
    /// New address
    pub address: Option<String>,
    /// New marketer attribution
    pub marketer_id: Option<i64>,
    /// New profile role
    pub user_type: Option<String>,
    /// New profile active flag
    pub is_active: Option<bool>,
}

/// `PUT /admin/profiles/:user_id` - admin edit of a user's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<crate::entities::UserProfileModel>> {
    admin::require_admin(&requester)?;
    let updated = accounts::update_profile(
        &state.db,
        user_id,
        accounts::ProfileUpdate {
            phone: body.phone,
            phone2: body.phone2,
            address: body.address,
            marketer_id: body.marketer_id,
            user_type: body.user_type,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(updated))
}

/// `DELETE /admin/users/:id` - delete a user under the permission rules.
/// Cart rows and the profile go with the account; orders are detached and
/// survive.
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    admin::require_admin(&requester)?;
    let target = accounts::get_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            id: id.to_string(),
        })?;
    admin::require_can_delete(&requester, &target)?;

    accounts::delete_user_account(&state.db, target.id).await?;
    tracing::info!(deleted_user = target.id, by = requester.id, "user deleted");
    Ok(Json(json!({ "deleted": true })))
}
