//! Authenticated-user extractor.
//!
//! Authentication and session handling live in an external identity
//! subsystem (reverse proxy / gateway) that forwards the established user id
//! in the `X-User-ID` header. The extractor resolves it against the users
//! table and rejects unknown or inactive accounts; handlers simply take a
//! [`CurrentUser`] parameter.

use crate::core::accounts;
use crate::entities::user;
use crate::errors::Error;
use crate::web::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated, active user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| Error::Unauthorized {
            message: message.to_string(),
        };

        let user_id: i64 = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| unauthorized("Missing or invalid X-User-ID header"))?;

        let user = accounts::get_user_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| unauthorized("Unknown user"))?;
        if !user.is_active {
            return Err(unauthorized("Account is inactive"));
        }
        Ok(Self(user))
    }
}
