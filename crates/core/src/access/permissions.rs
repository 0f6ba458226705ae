use super::resource::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

/// Actions that can be performed on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Update,
    Remove,
    /// Edit a record the acting user owns. Never implied by `Update`.
    UpdateSelf,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::View,
        Self::Create,
        Self::Update,
        Self::Remove,
        Self::UpdateSelf,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::UpdateSelf => "update_self",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grant flags a role carries for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct RoleGrant {
    pub resource: ResourceKind,
    #[serde(default)]
    pub view: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub remove: bool,
    #[serde(default)]
    pub update_self: bool,
}

impl RoleGrant {
    /// A grant with every flag cleared
    pub const fn none(resource: ResourceKind) -> Self {
        Self {
            resource,
            view: false,
            create: false,
            update: false,
            remove: false,
            update_self: false,
        }
    }

    /// A grant with every flag set
    pub const fn all(resource: ResourceKind) -> Self {
        Self {
            resource,
            view: true,
            create: true,
            update: true,
            remove: true,
            update_self: true,
        }
    }

    /// Read-only access
    pub const fn view_only(resource: ResourceKind) -> Self {
        Self {
            view: true,
            ..Self::none(resource)
        }
    }

    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Remove => self.remove,
            Action::UpdateSelf => self.update_self,
        }
    }
}

/// A user together with the grants of their role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithRoles {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
}

impl UserWithRoles {
    pub fn new(id: impl Into<String>, roles: Vec<RoleGrant>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            roles,
        }
    }

    /// Grant for `resource`. With duplicate entries the first one wins.
    pub fn grant_for(&self, resource: ResourceKind) -> Option<&RoleGrant> {
        self.roles.iter().find(|grant| grant.resource == resource)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Reason an action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Permission denied: {action} on {resource}")]
pub struct PermissionDenied {
    pub resource: ResourceKind,
    pub action: Action,
}

pub type PermissionResult = Result<(), PermissionDenied>;

/// Whether `user` may perform `action` on `resource`.
///
/// Users without a grant for the resource are denied.
pub fn can(user: &UserWithRoles, resource: ResourceKind, action: Action) -> bool {
    user.grant_for(resource)
        .is_some_and(|grant| grant.allows(action))
}

/// [`can`] for call sites that want to propagate a refusal with `?`
pub fn check(user: &UserWithRoles, resource: ResourceKind, action: Action) -> PermissionResult {
    if can(user, resource, action) {
        Ok(())
    } else {
        Err(PermissionDenied { resource, action })
    }
}

/// Whether `user` may edit a record of `resource` owned by `owner_id`
pub fn can_edit_record(user: &UserWithRoles, resource: ResourceKind, owner_id: &str) -> bool {
    can(user, resource, Action::Update)
        || (user.id == owner_id && can(user, resource, Action::UpdateSelf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> Vec<RoleGrant> {
        vec![
            RoleGrant::all(ResourceKind::Users),
            RoleGrant::view_only(ResourceKind::Customers),
            RoleGrant {
                create: true,
                remove: true,
                ..RoleGrant::view_only(ResourceKind::Projects)
            },
            RoleGrant {
                update_self: true,
                ..RoleGrant::none(ResourceKind::Properties)
            },
            RoleGrant::none(ResourceKind::Licensings),
        ]
    }

    #[test]
    fn missing_grant_denies_every_action() {
        let user = UserWithRoles::new("u1", vec![RoleGrant::all(ResourceKind::Users)]);
        for resource in ResourceKind::ALL {
            if resource == ResourceKind::Users {
                continue;
            }
            for action in Action::ALL {
                assert!(!can(&user, resource, action), "{resource}/{action}");
            }
        }
    }

    #[test]
    fn user_without_roles_is_denied() {
        let user = UserWithRoles::new("nobody", Vec::new());
        for resource in ResourceKind::ALL {
            for action in Action::ALL {
                assert!(!can(&user, resource, action));
            }
        }
    }

    #[test]
    fn result_matches_grant_field() {
        for grant in fixtures() {
            let user = UserWithRoles::new("u1", vec![grant]);
            let expected = [
                (Action::View, grant.view),
                (Action::Create, grant.create),
                (Action::Update, grant.update),
                (Action::Remove, grant.remove),
                (Action::UpdateSelf, grant.update_self),
            ];
            for (action, allowed) in expected {
                assert_eq!(can(&user, grant.resource, action), allowed);
            }
        }
    }

    #[test]
    fn first_duplicate_grant_wins() {
        let user = UserWithRoles::new(
            "u1",
            vec![
                RoleGrant::view_only(ResourceKind::Customers),
                RoleGrant::all(ResourceKind::Customers),
            ],
        );
        assert!(can(&user, ResourceKind::Customers, Action::View));
        assert!(!can(&user, ResourceKind::Customers, Action::Remove));
    }

    #[test]
    fn update_self_is_not_update() {
        let user = UserWithRoles::new(
            "u1",
            vec![RoleGrant {
                update_self: true,
                ..RoleGrant::view_only(ResourceKind::Users)
            }],
        );
        assert!(!can(&user, ResourceKind::Users, Action::Update));
        assert!(can(&user, ResourceKind::Users, Action::UpdateSelf));
        assert!(can_edit_record(&user, ResourceKind::Users, "u1"));
        assert!(!can_edit_record(&user, ResourceKind::Users, "u2"));
    }

    #[test]
    fn update_grant_edits_any_record() {
        let user = UserWithRoles::new("admin", vec![RoleGrant::all(ResourceKind::Users)]);
        assert!(can_edit_record(&user, ResourceKind::Users, "someone-else"));
    }

    #[test]
    fn check_reports_resource_and_action() {
        let user = UserWithRoles::new("u1", fixtures());
        assert!(check(&user, ResourceKind::Projects, Action::Remove).is_ok());
        let denied = check(&user, ResourceKind::Customers, Action::Create).unwrap_err();
        assert_eq!(
            denied,
            PermissionDenied {
                resource: ResourceKind::Customers,
                action: Action::Create,
            }
        );
        assert_eq!(denied.to_string(), "Permission denied: create on customers");
    }

    #[test]
    fn grants_deserialize_with_missing_flags() {
        let user: UserWithRoles = serde_json::from_value(serde_json::json!({
            "id": "42",
            "name": "Ada",
            "roles": [{ "resource": "customers", "view": true }]
        }))
        .unwrap();
        assert_eq!(user.display_name(), "Ada");
        assert_eq!(user.roles, vec![RoleGrant::view_only(ResourceKind::Customers)]);
    }
}
