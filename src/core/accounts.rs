//! Account business logic - user creation, profile provisioning and
//! role-group assignment.
//!
//! Profile provisioning is an explicit, synchronous step invoked by the
//! creation and save use cases, not an ambient hook: the side effect is
//! visible at the call site. [`ensure_profile`] is an idempotent
//! create-if-absent guarded by the unique `user_id` column, so re-running it
//! (including under a race) never yields a second profile.

use crate::{
    entities::{
        cart_item, group, order, user, user_profile, CartItem, Group, Order, User, UserProfile,
    },
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};

/// Group users with the staff flag are assigned to.
pub const ADMINS_GROUP: &str = "Admins";
/// Group users with the superuser flag are assigned to.
pub const SUPER_ADMINS_GROUP: &str = "Super Admins";

/// Fields required to create a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Login name, unique
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Grants admin access
    pub is_staff: bool,
    /// Grants unrestricted admin capability
    pub is_superuser: bool,
}

/// Self-service profile edits; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Primary phone
    pub phone: Option<String>,
    /// Secondary phone
    pub phone2: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Marketer attribution (admin edits only)
    pub marketer_id: Option<i64>,
    /// Profile role, one of [`user_profile::USER_TYPES`] (admin edits only)
    pub user_type: Option<String>,
    /// Profile active flag (admin edits only)
    pub is_active: Option<bool>,
}

/// Filters for the admin user list.
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    /// Restrict by profile user_type
    pub user_type: Option<String>,
    /// Restrict by the account active flag
    pub is_active: Option<bool>,
    /// Match on username, email or profile phone
    pub search: Option<String>,
}

/// Creates a user and synchronously provisions its profile.
///
/// Role-group assignment runs afterwards and is best-effort: a failure there
/// is logged and swallowed, it never fails the creation.
pub async fn create_user(db: &DatabaseConnection, new: NewUser) -> Result<user::Model> {
    if new.username.trim().is_empty() {
        return Err(Error::Validation {
            message: "Username cannot be empty".to_string(),
        });
    }

    let model = user::ActiveModel {
        username: Set(new.username.trim().to_string()),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        email: Set(new.email),
        is_staff: Set(new.is_staff),
        is_superuser: Set(new.is_superuser),
        is_active: Set(true),
        group_id: Set(None),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let user = model.insert(db).await?;
    tracing::info!(user_id = user.id, username = %user.username, "user created");

    ensure_profile(db, user.id).await?;

    let user = match sync_role_group(db, user).await {
        Ok(user) => user,
        Err((user, e)) => {
            // Intentionally best-effort: the group can be assigned later
            tracing::warn!(user_id = user.id, error = %e, "role group assignment failed");
            user
        }
    };
    Ok(user)
}

/// Saves edits to a user and re-runs the self-healing profile invariant:
/// if the profile is somehow missing, it is recreated.
pub async fn save_user(db: &DatabaseConnection, user: user::ActiveModel) -> Result<user::Model> {
    let user = user.update(db).await?;
    ensure_profile(db, user.id).await?;
    let user = match sync_role_group(db, user).await {
        Ok(user) => user,
        Err((user, e)) => {
            tracing::warn!(user_id = user.id, error = %e, "role group assignment failed");
            user
        }
    };
    Ok(user)
}

/// Idempotent profile upsert: creates the default profile only when absent.
///
/// The unique constraint on `user_profiles.user_id` backs this up under
/// concurrency; a racing duplicate insert fails there and the existing row
/// wins, which is exactly the invariant we want.
pub async fn ensure_profile(db: &DatabaseConnection, user_id: i64) -> Result<user_profile::Model> {
    if let Some(existing) = UserProfile::find()
        .filter(user_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = chrono::Utc::now();
    let model = user_profile::ActiveModel {
        user_id: Set(user_id),
        phone: Set(String::new()),
        phone2: Set(String::new()),
        address: Set(String::new()),
        user_type: Set(user_profile::DEFAULT_USER_TYPE.to_string()),
        marketer_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    match model.insert(db).await {
        Ok(profile) => {
            tracing::info!(user_id, "profile provisioned");
            Ok(profile)
        }
        // Lost a provisioning race; the row that won is the one we want
        Err(_) => UserProfile::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "profile",
                id: user_id.to_string(),
            }),
    }
}

/// Fetches the profile for a user.
pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<user_profile::Model> {
    UserProfile::find()
        .filter(user_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "profile",
            id: user_id.to_string(),
        })
}

/// Applies profile edits.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    update: ProfileUpdate,
) -> Result<user_profile::Model> {
    if let Some(user_type) = &update.user_type {
        if !user_profile::USER_TYPES.contains(&user_type.as_str()) {
            return Err(Error::Validation {
                message: format!("Unknown user type: {user_type}"),
            });
        }
    }

    let existing = get_profile(db, user_id).await?;
    let mut model: user_profile::ActiveModel = existing.into();
    if let Some(phone) = update.phone {
        model.phone = Set(phone);
    }
    if let Some(phone2) = update.phone2 {
        model.phone2 = Set(phone2);
    }
    if let Some(address) = update.address {
        model.address = Set(address);
    }
    if let Some(marketer_id) = update.marketer_id {
        model.marketer_id = Set(Some(marketer_id));
    }
    if let Some(user_type) = update.user_type {
        model.user_type = Set(user_type);
    }
    if let Some(is_active) = update.is_active {
        model.is_active = Set(is_active);
    }
    model.updated_at = Set(chrono::Utc::now());
    model.update(db).await.map_err(Into::into)
}

/// Fetches a user by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Admin user list with the standard filters.
pub async fn list_users(db: &DatabaseConnection, filter: &UserFilter) -> Result<Vec<user::Model>> {
    let mut query = User::find();
    if let Some(active) = filter.is_active {
        query = query.filter(user::Column::IsActive.eq(active));
    }
    if let Some(term) = &filter.search {
        // Phone lives on the profile; match those ids alongside the
        // username/email columns
        let phone_matches: Vec<i64> = UserProfile::find()
            .filter(user_profile::Column::Phone.contains(term))
            .all(db)
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        query = query.filter(
            Condition::any()
                .add(user::Column::Username.contains(term))
                .add(user::Column::Email.contains(term))
                .add(user::Column::Id.is_in(phone_matches)),
        );
    }
    let mut users = query
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?;

    // user_type lives on the profile; filter after the join-free fetch
    if let Some(user_type) = &filter.user_type {
        let mut kept = Vec::with_capacity(users.len());
        for user in users {
            let profile = get_profile(db, user.id).await?;
            if &profile.user_type == user_type {
                kept.push(user);
            }
        }
        users = kept;
    }
    Ok(users)
}

/// Deletes a user account: cart rows and the profile go with it, orders
/// survive.
///
/// Orders are detached (their user link cleared) rather than deleted; the
/// snapshot fields on the order keep the customer data. The detach has to
/// happen before the user row goes, or the foreign key rejects the delete.
pub async fn delete_user_account(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    Order::update_many()
        .col_expr(order::Column::UserId, Expr::value(Option::<i64>::None))
        .filter(order::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    UserProfile::delete_many()
        .filter(user_profile::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    let result = User::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "user",
            id: user_id.to_string(),
        });
    }
    tracing::info!(user_id, "user deleted");
    Ok(())
}

/// Creates the role groups when missing and returns the one for `name`.
pub async fn get_or_create_group(db: &DatabaseConnection, name: &str) -> Result<group::Model> {
    if let Some(existing) = Group::find()
        .filter(group::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }
    let model = group::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    match model.insert(db).await {
        Ok(created) => Ok(created),
        // Lost a creation race; fetch the winner
        Err(_) => Group::find()
            .filter(group::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "group",
                id: name.to_string(),
            }),
    }
}

/// Assigns the user's role group from its flags: superuser gets
/// "Super Admins", staff gets "Admins", everyone else none.
///
/// Returns the user back on failure so best-effort callers can keep it.
async fn sync_role_group(
    db: &DatabaseConnection,
    user: user::Model,
) -> std::result::Result<user::Model, (user::Model, Error)> {
    let group_id = if user.is_superuser {
        match get_or_create_group(db, SUPER_ADMINS_GROUP).await {
            Ok(g) => Some(g.id),
            Err(e) => return Err((user, e)),
        }
    } else if user.is_staff {
        match get_or_create_group(db, ADMINS_GROUP).await {
            Ok(g) => Some(g.id),
            Err(e) => return Err((user, e)),
        }
    } else {
        None
    };

    if user.group_id == group_id {
        return Ok(user);
    }
    let mut model: user::ActiveModel = user.clone().into();
    model.group_id = Set(group_id);
    model.update(db).await.map_err(|e| (user, e.into()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{cart, checkout};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_creation_provisions_exactly_one_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_user(
            &db,
            NewUser {
                username: "rivka".to_string(),
                email: "rivka@example.org".to_string(),
                ..Default::default()
            },
        )
        .await?;

        let profiles = UserProfile::find()
            .filter(user_profile::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].user_type, "regular");
        assert!(profiles[0].is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let first = ensure_profile(&db, user.id).await?;
        let second = ensure_profile(&db, user.id).await?;
        assert_eq!(first.id, second.id);

        let count = UserProfile::find()
            .filter(user_profile::Column::UserId.eq(user.id))
            .count(&db)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_heals_missing_profile() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let profile = get_profile(&db, user.id).await?;
        let model: user_profile::ActiveModel = profile.into();
        model.delete(&db).await?;

        let mut edit: user::ActiveModel = user.clone().into();
        edit.first_name = Set("Changed".to_string());
        let saved = save_user(&db, edit).await?;
        assert_eq!(saved.first_name, "Changed");
        assert!(get_profile(&db, user.id).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_role_groups_follow_flags() -> Result<()> {
        let db = setup_test_db().await?;
        let staff = create_custom_user(&db, "staffer", true, false).await?;
        let root = create_custom_user(&db, "root", true, true).await?;
        let regular = create_test_user(&db, "regular").await?;

        let admins = get_or_create_group(&db, ADMINS_GROUP).await?;
        let supers = get_or_create_group(&db, SUPER_ADMINS_GROUP).await?;
        assert_eq!(staff.group_id, Some(admins.id));
        assert_eq!(root.group_id, Some(supers.id));
        assert_eq!(regular.group_id, None);

        // Demotion moves the group on save
        let mut edit: user::ActiveModel = root.into();
        edit.is_superuser = Set(false);
        let demoted = save_user(&db, edit).await?;
        assert_eq!(demoted.group_id, Some(admins.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_a_buyer_keeps_their_orders() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?;
        cart::add_to_cart(&db, user.id, product.id, 2).await?;
        let order = checkout::place_order(&db, user.id, &test_customer_details()).await?;
        // A fresh cart row that should be cleaned up with the account
        cart::add_to_cart(&db, user.id, product.id, 1).await?;

        delete_user_account(&db, user.id).await?;

        assert!(get_user_by_id(&db, user.id).await?.is_none());
        assert!(matches!(
            get_profile(&db, user.id).await,
            Err(Error::NotFound { .. })
        ));
        assert_eq!(cart::cart_count(&db, user.id).await?, 0);

        // The order survives, detached, snapshots intact
        let kept = Order::find_by_id(order.id).one(&db).await?.unwrap();
        assert_eq!(kept.user_id, None);
        assert_eq!(kept.order_number, order.order_number);
        assert_eq!(kept.total_amount, order.total_amount);
        assert_eq!(kept.email, "buyer@example.org");

        let again = delete_user_account(&db, user.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_profile_update() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let updated = update_profile(
            &db,
            user.id,
            ProfileUpdate {
                phone: Some("050-123-4567".to_string()),
                address: Some("1 Herzl St".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.phone, "050-123-4567");
        assert_eq!(updated.address, "1 Herzl St");
        // Untouched fields stay
        assert_eq!(updated.phone2, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_profile_user_type_validated() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let bad = update_profile(
            &db,
            user.id,
            ProfileUpdate {
                user_type: Some("wizard".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad, Err(Error::Validation { .. })));

        let promoted = update_profile(
            &db,
            user.id,
            ProfileUpdate {
                user_type: Some("marketer".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(promoted.user_type, "marketer");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_users_filters() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "alice").await?;
        create_test_user(&db, "bob").await?;

        let found = list_users(
            &db,
            &UserFilter {
                search: Some("ali".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "alice");

        let regulars = list_users(
            &db,
            &UserFilter {
                user_type: Some("regular".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(regulars.len(), 2);

        // Phone search reaches through the profile
        let bob = find_by_username(&db, "bob").await?;
        update_profile(
            &db,
            bob.id,
            ProfileUpdate {
                phone: Some("052-999-8877".to_string()),
                ..Default::default()
            },
        )
        .await?;
        let by_phone = list_users(
            &db,
            &UserFilter {
                search: Some("999-8877".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].username, "bob");
        Ok(())
    }

    async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "user",
                id: username.to_string(),
            })
    }
}
