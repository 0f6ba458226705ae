use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A record related to a user through a membership (customer, property, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Remaining attributes, kept as sent by the backend
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            attributes: Map::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Join row linking a user to a related entity.
///
/// The related entity may be gone while the row still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub related_entity: Option<Entity>,
}

impl MembershipRecord {
    pub fn new(id: impl Into<String>, related_entity: Option<Entity>) -> Self {
        Self {
            id: id.into(),
            related_entity,
        }
    }

    /// Related entities of `records` in order, skipping rows without one
    pub fn resolve(records: Vec<Self>) -> Vec<Entity> {
        records
            .into_iter()
            .filter_map(|record| record.related_entity)
            .collect()
    }
}

/// Coarse status of a relation tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    Loading,
    Loaded,
    Errored,
}

/// Loading state of one relation tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTabState<T> {
    pub loading: bool,
    pub errored: bool,
    pub items: Vec<T>,
}

impl<T> RelationTabState<T> {
    pub const fn loading() -> Self {
        Self {
            loading: true,
            errored: false,
            items: Vec::new(),
        }
    }

    pub fn loaded(items: Vec<T>) -> Self {
        Self {
            loading: false,
            errored: false,
            items,
        }
    }

    pub const fn errored() -> Self {
        Self {
            loading: false,
            errored: true,
            items: Vec::new(),
        }
    }

    pub const fn status(&self) -> TabStatus {
        if self.loading {
            TabStatus::Loading
        } else if self.errored {
            TabStatus::Errored
        } else {
            TabStatus::Loaded
        }
    }

    pub const fn is_settled(&self) -> bool {
        !self.loading
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(serde_json::Number),
}

/// Backends send ids either as strings or as numbers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(id) => id,
        IdRepr::Number(id) => id.to_string(),
    })
}
