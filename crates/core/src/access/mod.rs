pub mod labels;
pub mod permissions;
pub mod resource;

pub use labels::{AccessError, translate_grant, translate_grant_str, translate_role, translate_role_str};
pub use permissions::{
    Action, PermissionDenied, PermissionResult, RoleGrant, UserWithRoles, can, can_edit_record,
    check,
};
pub use resource::ResourceKind;
