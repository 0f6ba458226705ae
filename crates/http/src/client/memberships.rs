//! Membership rows linking users to customers, properties, projects and licensings

use super::{ClientError, ConsoleClient};
use keystone_core::{Entity, MembershipRecord, ResourceKind};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Membership row as the backend sends it.
///
/// The related record sits under the resource's singular key (`customer`,
/// `property`, ...) or under `entity`; the row may also embed the user.
#[derive(Debug, Deserialize)]
struct WireMembership {
    id: Value,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl WireMembership {
    fn into_record(mut self, kind: ResourceKind) -> Result<MembershipRecord, ClientError> {
        let id = match self.id {
            Value::String(id) => id,
            Value::Number(id) => id.to_string(),
            other => {
                return Err(ClientError::InvalidResponse(format!(
                    "unexpected membership id: {other}"
                )));
            }
        };

        let related = self
            .fields
            .remove(kind.member_key())
            .or_else(|| self.fields.remove("entity"))
            .filter(|value| !value.is_null())
            .map(serde_json::from_value::<Entity>)
            .transpose()?;

        Ok(MembershipRecord::new(id, related))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddMemberRequest<'a> {
    user_id: &'a str,
}

impl ConsoleClient {
    /// Memberships `user_id` holds for records of `kind`
    pub async fn fetch_relation_memberships(
        &self,
        kind: ResourceKind,
        user_id: &str,
    ) -> Result<Vec<MembershipRecord>, ClientError> {
        let request = self
            .request(Method::GET, &["api", kind.as_str(), "members"])?
            .query(&[("userId", user_id)]);
        let rows: Vec<WireMembership> = self.execute(request).await?;

        rows.into_iter().map(|row| row.into_record(kind)).collect()
    }

    /// Attach `user_id` as a member of the record `entity_id`
    pub async fn add_membership(
        &self,
        kind: ResourceKind,
        entity_id: &str,
        user_id: &str,
    ) -> Result<MembershipRecord, ClientError> {
        let request = self
            .request(Method::POST, &["api", kind.as_str(), entity_id, "members"])?
            .json(&AddMemberRequest { user_id });
        let row: WireMembership = self.execute(request).await?;

        row.into_record(kind)
    }

    /// Delete a membership row
    pub async fn remove_membership(
        &self,
        kind: ResourceKind,
        membership_id: &str,
    ) -> Result<(), ClientError> {
        let request = self.request(
            Method::DELETE,
            &["api", kind.as_str(), "members", membership_id],
        )?;
        self.execute_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(kind: ResourceKind, value: Value) -> MembershipRecord {
        serde_json::from_value::<WireMembership>(value)
            .unwrap()
            .into_record(kind)
            .unwrap()
    }

    #[test]
    fn picks_resource_specific_key() {
        let record = parse(
            ResourceKind::Customers,
            json!({
                "id": 7,
                "user": { "id": "u1", "name": "Ada" },
                "customer": { "id": "c1", "name": "Acme" }
            }),
        );
        assert_eq!(record.id, "7");
        assert_eq!(record.related_entity, Some(Entity::new("c1", "Acme")));
    }

    #[test]
    fn falls_back_to_generic_key() {
        let record = parse(
            ResourceKind::Projects,
            json!({ "id": "m1", "entity": { "id": "p1", "name": "Dock" } }),
        );
        assert_eq!(record.related_entity, Some(Entity::new("p1", "Dock")));
    }

    #[test]
    fn null_or_missing_entity_is_absent() {
        let null = parse(ResourceKind::Licensings, json!({ "id": 1, "licensing": null }));
        assert_eq!(null.related_entity, None);
        let missing = parse(ResourceKind::Licensings, json!({ "id": 2 }));
        assert_eq!(missing.related_entity, None);
    }

    #[test]
    fn rejects_structured_ids() {
        let result = serde_json::from_value::<WireMembership>(json!({ "id": [1] }))
            .unwrap()
            .into_record(ResourceKind::Customers);
        assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    }
}
