//! Generic CRUD over console resources

use super::{ClientError, ConsoleClient};
use keystone_core::{Entity, ResourceKind};
use reqwest::Method;
use serde_json::Value;

impl ConsoleClient {
    /// List every record of `kind`
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<Entity>, ClientError> {
        let request = self.request(Method::GET, &["api", kind.as_str()])?;
        self.execute(request).await
    }

    /// Fetch one record
    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<Entity, ClientError> {
        let request = self.request(Method::GET, &["api", kind.as_str(), id])?;
        self.execute(request).await
    }

    /// Create a record from the given attributes
    pub async fn create(&self, kind: ResourceKind, body: &Value) -> Result<Entity, ClientError> {
        let request = self
            .request(Method::POST, &["api", kind.as_str()])?
            .json(body);
        self.execute(request).await
    }

    /// Replace the attributes of a record
    pub async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &Value,
    ) -> Result<Entity, ClientError> {
        let request = self
            .request(Method::PUT, &["api", kind.as_str(), id])?
            .json(body);
        self.execute(request).await
    }

    /// Delete a record
    pub async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &["api", kind.as_str(), id])?;
        self.execute_empty(request).await
    }
}
