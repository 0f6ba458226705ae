//! Keystone core types and utilities

pub mod access;
pub mod error;
pub mod types;

#[cfg(feature = "tracing")]
pub mod tracing;

pub use access::{
    AccessError, Action, PermissionDenied, PermissionResult, ResourceKind, RoleGrant,
    UserWithRoles, can, can_edit_record, check, translate_grant, translate_role,
};
pub use error::{CoreError, CoreResult};
pub use types::{Entity, MembershipRecord, RelationTabState, TabStatus};
