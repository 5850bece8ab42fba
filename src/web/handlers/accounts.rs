//! Profile and registration handlers.
//!
//! Registration is admin-only, matching the storefront's closed signup: new
//! accounts are created for congregants by the office.

use crate::core::{accounts, admin, orders};
use crate::errors::Result;
use crate::web::extract::CurrentUser;
use crate::web::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Self-service profile edit body.
#[derive(Debug, Deserialize, Default)]
pub struct ProfileUpdateRequest {
    /// New primary phone
    pub phone: Option<String>,
    /// New secondary phone
    pub phone2: Option<String>,
    /// New address
    pub address: Option<String>,
}

/// Admin-only registration body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login name
    pub username: String,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
}

/// `GET /profile` - the user's profile plus order history.
pub async fn my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>> {
    let profile = accounts::get_profile(&state.db, user.id).await?;
    let history = orders::list_orders_for_user(&state.db, user.id).await?;
    Ok(Json(json!({
        "user": user,
        "profile": profile,
        "orders": history,
    })))
}

/// `PUT /profile` - self-service contact edits.
pub async fn update_my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<crate::entities::UserProfileModel>> {
    let updated = accounts::update_profile(
        &state.db,
        user.id,
        accounts::ProfileUpdate {
            phone: body.phone,
            phone2: body.phone2,
            address: body.address,
            ..Default::default()
        },
    )
    .await?;
    Ok(Json(updated))
}

/// `POST /accounts/register` - admin-only creation of a regular account.
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<crate::entities::UserModel>> {
    admin::require_admin(&requester)?;
    let user = accounts::create_user(
        &state.db,
        accounts::NewUser {
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            is_staff: false,
            is_superuser: false,
        },
    )
    .await?;
    Ok(Json(user))
}
