//! Data-access seam between the console and the REST backend

use async_trait::async_trait;
use keystone_core::{MembershipRecord, ResourceKind};
use keystone_http::{ClientError, ConsoleClient};

#[cfg(test)]
use mockall::automock;

/// Backend operations the user-details view depends on
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DataAccess: Send + Sync {
    /// Memberships the subject user holds for records of `kind`
    async fn fetch_relation_memberships(
        &self,
        kind: ResourceKind,
        subject_user_id: &str,
    ) -> Result<Vec<MembershipRecord>, ClientError>;

    async fn add_membership(
        &self,
        kind: ResourceKind,
        entity_id: &str,
        user_id: &str,
    ) -> Result<MembershipRecord, ClientError>;

    async fn remove_membership(
        &self,
        kind: ResourceKind,
        membership_id: &str,
    ) -> Result<(), ClientError>;
}

#[async_trait]
impl DataAccess for ConsoleClient {
    async fn fetch_relation_memberships(
        &self,
        kind: ResourceKind,
        subject_user_id: &str,
    ) -> Result<Vec<MembershipRecord>, ClientError> {
        ConsoleClient::fetch_relation_memberships(self, kind, subject_user_id).await
    }

    async fn add_membership(
        &self,
        kind: ResourceKind,
        entity_id: &str,
        user_id: &str,
    ) -> Result<MembershipRecord, ClientError> {
        ConsoleClient::add_membership(self, kind, entity_id, user_id).await
    }

    async fn remove_membership(
        &self,
        kind: ResourceKind,
        membership_id: &str,
    ) -> Result<(), ClientError> {
        ConsoleClient::remove_membership(self, kind, membership_id).await
    }
}
