//! Display labels for roles and grants

use super::permissions::Action;
use super::resource::ResourceKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Unknown {kind} value: {value}")]
    UnknownEnumValue { kind: &'static str, value: String },
}

/// Label shown for the role section covering `resource`
pub const fn translate_role(resource: ResourceKind) -> &'static str {
    match resource {
        ResourceKind::Users => "Users",
        ResourceKind::Roles => "Roles",
        ResourceKind::Customers => "Customers",
        ResourceKind::Properties => "Properties",
        ResourceKind::Projects => "Projects",
        ResourceKind::Licensings => "Licensings",
    }
}

/// Label shown for a single grant flag
pub const fn translate_grant(action: Action) -> &'static str {
    match action {
        Action::View => "View",
        Action::Create => "Create",
        Action::Update => "Edit",
        Action::Remove => "Delete",
        Action::UpdateSelf => "Edit own",
    }
}

/// [`translate_role`] for a raw wire value
pub fn translate_role_str(value: &str) -> Result<&'static str, AccessError> {
    value.parse::<ResourceKind>().map(translate_role)
}

/// [`translate_grant`] for a raw wire value
pub fn translate_grant_str(value: &str) -> Result<&'static str, AccessError> {
    Action::ALL
        .into_iter()
        .find(|action| action.as_str() == value)
        .map(translate_grant)
        .ok_or_else(|| AccessError::UnknownEnumValue {
            kind: "grant",
            value: value.to_string(),
        })
}
