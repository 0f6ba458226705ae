use super::labels::AccessError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Kinds of resources the console manages.
///
/// Doubles as the tab key of the user-details view: each relation tab shows
/// the memberships a user holds for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Users,
    Roles,
    Customers,
    Properties,
    Projects,
    Licensings,
}

impl ResourceKind {
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Roles,
        Self::Customers,
        Self::Properties,
        Self::Projects,
        Self::Licensings,
    ];

    /// Relation tabs of the user-details view, in display order
    pub const RELATIONS: [Self; 4] = [
        Self::Customers,
        Self::Properties,
        Self::Projects,
        Self::Licensings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Customers => "customers",
            Self::Properties => "properties",
            Self::Projects => "projects",
            Self::Licensings => "licensings",
        }
    }

    /// Key under which a membership row nests its related record
    pub const fn member_key(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Roles => "role",
            Self::Customers => "customer",
            Self::Properties => "property",
            Self::Projects => "project",
            Self::Licensings => "licensing",
        }
    }

    pub fn is_relation(self) -> bool {
        Self::RELATIONS.contains(&self)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AccessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AccessError::UnknownEnumValue {
                kind: "resource",
                value: value.to_string(),
            })
    }
}
