use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::db::Db;
use infra::repos::AccessRepo;

use crate::error::AppError;

/// Console access role, resolved from the access table by email. This is
/// unrelated to a member's playing role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
    /// No access record, or access revoked (role column NULL).
    None,
}

impl Role {
    /// Absent rows, NULL columns and unrecognized strings all resolve to
    /// `None` rather than erroring.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Role::Admin,
            Some("editor") => Role::Editor,
            Some("viewer") => Role::Viewer,
            _ => Role::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
            Role::None => "none",
        }
    }

    /// Whether this role may enter the console at all.
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Role::None)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set for a role. Total over the role enum; same input, same
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permissions {
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_access: bool,
}

impl Permissions {
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                can_view: true,
                can_create: true,
                can_edit: true,
                can_delete: true,
                can_manage_access: true,
            },
            Role::Editor => Self {
                can_view: true,
                can_create: true,
                can_edit: true,
                can_delete: false,
                can_manage_access: false,
            },
            Role::Viewer => Self {
                can_view: true,
                can_create: false,
                can_edit: false,
                can_delete: false,
                can_manage_access: false,
            },
            Role::None => Self {
                can_view: false,
                can_create: false,
                can_edit: false,
                can_delete: false,
                can_manage_access: false,
            },
        }
    }
}

/// Resolve an authenticated email to its access record and console role.
/// Case-insensitive; no row or a NULL role means `Role::None`.
pub async fn resolve_identity(
    pool: &Db,
    email: &str,
) -> Result<(Option<Uuid>, Role), AppError> {
    let row = AccessRepo::new(pool.clone()).get_by_email(email).await?;
    let role = Role::from_db(row.as_ref().and_then(|r| r.role.as_deref()));
    Ok((row.map(|r| r.id), role))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 4] = [Role::Admin, Role::Editor, Role::Viewer, Role::None];

    fn flags(p: Permissions) -> [bool; 5] {
        [
            p.can_view,
            p.can_create,
            p.can_edit,
            p.can_delete,
            p.can_manage_access,
        ]
    }

    #[test]
    fn deterministic_over_roles() {
        for role in ALL {
            assert_eq!(
                Permissions::for_role(role),
                Permissions::for_role(role),
                "{role} must be deterministic"
            );
        }
    }

    #[test]
    fn admin_contains_editor_contains_viewer() {
        let admin = flags(Permissions::for_role(Role::Admin));
        let editor = flags(Permissions::for_role(Role::Editor));
        let viewer = flags(Permissions::for_role(Role::Viewer));
        for i in 0..5 {
            assert!(admin[i] || !editor[i], "admin must contain editor");
            assert!(editor[i] || !viewer[i], "editor must contain viewer");
        }
    }

    #[test]
    fn delete_and_manage_access_are_admin_only() {
        for role in [Role::Editor, Role::Viewer, Role::None] {
            let p = Permissions::for_role(role);
            assert!(!p.can_delete, "{role} must not delete");
            assert!(!p.can_manage_access, "{role} must not manage access");
        }
        let admin = Permissions::for_role(Role::Admin);
        assert!(admin.can_delete && admin.can_manage_access);
    }

    #[test]
    fn none_has_no_capabilities() {
        assert_eq!(flags(Permissions::for_role(Role::None)), [false; 5]);
    }

    #[test]
    fn unknown_and_null_roles_resolve_to_none() {
        assert_eq!(Role::from_db(None), Role::None);
        assert_eq!(Role::from_db(Some("owner")), Role::None);
        assert_eq!(Role::from_db(Some("")), Role::None);
        assert_eq!(Role::from_db(Some("admin")), Role::Admin);
    }
}
