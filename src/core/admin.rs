//! Administrative permission rules over user accounts.
//!
//! The rules are polymorphic over the requester's tier: a plain staff admin
//! sees a reduced user form and cannot touch superuser accounts, while a
//! superuser sees everything (with one exception: nobody can strip their own
//! superuser flag, and nobody can delete themselves). Instead of mutating a
//! shared field list at runtime, each tier gets its own explicit form view.

use crate::entities::user;
use crate::errors::{Error, Result};

/// Administrative tier of a requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    /// Staff admin, restricted from superuser-only fields and targets
    Staff,
    /// Superuser, unrestricted
    Superuser,
}

impl AdminRole {
    /// Derives the tier from the account flags; `None` when the user has no
    /// admin access at all.
    pub fn of(user: &user::Model) -> Option<Self> {
        if !user.is_active {
            return None;
        }
        if user.is_superuser {
            Some(Self::Superuser)
        } else if user.is_staff {
            Some(Self::Staff)
        } else {
            None
        }
    }
}

/// Returns the requester's admin tier or a forbidden error.
pub fn require_admin(user: &user::Model) -> Result<AdminRole> {
    AdminRole::of(user).ok_or_else(|| Error::Forbidden {
        message: "Admin access requires staff status".to_string(),
    })
}

/// Fields of the admin user-edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserFormField {
    /// Login name
    Username,
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Email address
    Email,
    /// Account active flag
    IsActive,
    /// Staff flag
    IsStaff,
    /// Superuser flag (superuser-only)
    IsSuperuser,
    /// Group memberships (superuser-only)
    Groups,
    /// Permission set (superuser-only)
    Permissions,
}

/// The user-edit form a given admin tier is presented with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFormView {
    /// Superusers see every field; `disabled` fields are shown but locked
    SuperAdmin {
        /// All form fields
        fields: Vec<UserFormField>,
        /// Shown but not editable (own superuser flag)
        disabled: Vec<UserFormField>,
    },
    /// Staff admins get the reduced field set, nothing hidden-but-disabled
    Staff {
        /// Form fields with the superuser-only ones absent entirely
        fields: Vec<UserFormField>,
    },
}

impl UserFormView {
    /// Fields present in the form.
    pub fn fields(&self) -> &[UserFormField] {
        match self {
            Self::SuperAdmin { fields, .. } | Self::Staff { fields } => fields,
        }
    }

    /// Fields presented but locked against edits.
    pub fn disabled(&self) -> &[UserFormField] {
        match self {
            Self::SuperAdmin { disabled, .. } => disabled,
            Self::Staff { .. } => &[],
        }
    }
}

const COMMON_FIELDS: [UserFormField; 6] = [
    UserFormField::Username,
    UserFormField::FirstName,
    UserFormField::LastName,
    UserFormField::Email,
    UserFormField::IsActive,
    UserFormField::IsStaff,
];

/// Builds the user-edit form view for `requester` editing `target`.
pub fn user_form_view(requester: &user::Model, target: &user::Model) -> Result<UserFormView> {
    let role = require_admin(requester)?;
    match role {
        AdminRole::Superuser => {
            let mut fields = COMMON_FIELDS.to_vec();
            fields.extend([
                UserFormField::IsSuperuser,
                UserFormField::Groups,
                UserFormField::Permissions,
            ]);
            // A superuser cannot strip their own flag through this form
            let disabled = if requester.id == target.id {
                vec![UserFormField::IsSuperuser]
            } else {
                Vec::new()
            };
            Ok(UserFormView::SuperAdmin { fields, disabled })
        }
        AdminRole::Staff => Ok(UserFormView::Staff {
            fields: COMMON_FIELDS.to_vec(),
        }),
    }
}

/// Whether `requester` may edit `target` at all.
pub fn can_edit_user(requester: &user::Model, target: &user::Model) -> bool {
    match AdminRole::of(requester) {
        Some(AdminRole::Superuser) => true,
        Some(AdminRole::Staff) => !target.is_superuser,
        None => false,
    }
}

/// Whether `requester` may delete `target`.
///
/// Self-deletion is blocked for everyone; deleting a superuser requires a
/// superuser; deleting anyone else requires staff.
pub fn can_delete_user(requester: &user::Model, target: &user::Model) -> bool {
    if requester.id == target.id {
        return false;
    }
    match AdminRole::of(requester) {
        Some(AdminRole::Superuser) => true,
        Some(AdminRole::Staff) => !target.is_superuser,
        None => false,
    }
}

/// Enforces [`can_edit_user`] as an error.
pub fn require_can_edit(requester: &user::Model, target: &user::Model) -> Result<()> {
    if can_edit_user(requester, target) {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: format!("Not allowed to edit user {}", target.username),
        })
    }
}

/// Enforces [`can_delete_user`] as an error.
pub fn require_can_delete(requester: &user::Model, target: &user::Model) -> Result<()> {
    if can_delete_user(requester, target) {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: format!("Not allowed to delete user {}", target.username),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn user(id: i64, is_staff: bool, is_superuser: bool) -> user::Model {
        user::Model {
            id,
            username: format!("user{id}"),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            is_staff,
            is_superuser,
            is_active: true,
            group_id: None,
            date_joined: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_staff_form_has_no_privileged_fields() {
        let staff = user(1, true, false);
        let target = user(2, false, false);
        let view = user_form_view(&staff, &target).unwrap();
        for hidden in [
            UserFormField::IsSuperuser,
            UserFormField::Groups,
            UserFormField::Permissions,
        ] {
            assert!(!view.fields().contains(&hidden));
        }
        assert!(view.disabled().is_empty());
    }

    #[test]
    fn test_superuser_form_is_complete() {
        let root = user(1, true, true);
        let target = user(2, false, false);
        let view = user_form_view(&root, &target).unwrap();
        assert!(view.fields().contains(&UserFormField::IsSuperuser));
        assert!(view.fields().contains(&UserFormField::Groups));
        assert!(view.fields().contains(&UserFormField::Permissions));
        assert!(view.disabled().is_empty());
    }

    #[test]
    fn test_superuser_cannot_strip_own_flag() {
        let root = user(1, true, true);
        let view = user_form_view(&root, &root).unwrap();
        // Presented but disabled for self-edit
        assert!(view.fields().contains(&UserFormField::IsSuperuser));
        assert_eq!(view.disabled(), &[UserFormField::IsSuperuser]);
    }

    #[test]
    fn test_non_admin_gets_no_form() {
        let regular = user(1, false, false);
        let target = user(2, false, false);
        assert!(matches!(
            user_form_view(&regular, &target),
            Err(Error::Forbidden { .. })
        ));
    }

    #[test]
    fn test_staff_cannot_touch_superusers() {
        let staff = user(1, true, false);
        let root = user(2, true, true);
        let plain = user(3, false, false);

        assert!(!can_edit_user(&staff, &root));
        assert!(!can_delete_user(&staff, &root));
        assert!(can_edit_user(&staff, &plain));
        assert!(can_delete_user(&staff, &plain));
    }

    #[test]
    fn test_nobody_deletes_themselves() {
        let staff = user(1, true, false);
        let root = user(2, true, true);
        assert!(!can_delete_user(&staff, &staff));
        assert!(!can_delete_user(&root, &root));
        // But a superuser can delete another superuser
        let other_root = user(3, true, true);
        assert!(can_delete_user(&root, &other_root));
    }

    #[test]
    fn test_inactive_admins_lose_access() {
        let mut staff = user(1, true, false);
        staff.is_active = false;
        assert_eq!(AdminRole::of(&staff), None);
        assert!(require_admin(&staff).is_err());
    }
}
