//! User and session client methods

use super::{ClientError, ConsoleClient};
use keystone_core::UserWithRoles;
use reqwest::Method;

impl ConsoleClient {
    /// The signed-in user with their role grants
    pub async fn current_user(&self) -> Result<UserWithRoles, ClientError> {
        let request = self.request(Method::GET, &["api", "auth", "me"])?;
        self.execute(request).await
    }

    /// A user with their role grants
    pub async fn get_user(&self, user_id: &str) -> Result<UserWithRoles, ClientError> {
        let request = self.request(Method::GET, &["api", "users", user_id])?;
        self.execute(request).await
    }
}
