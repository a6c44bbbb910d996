use async_trait::async_trait;
use reqwest::Method;

use super::{require_token, ApiClient};
use crate::errors::AppError;
use crate::models::{User, UserUpdate};
use crate::session::ProfileSource;

impl ApiClient {
    /// GET /users/me
    pub async fn current_user(&self, token: Option<&str>) -> Result<User, AppError> {
        let token = require_token(token, "fetch user details")?;
        let endpoint = "/users/me";
        let response = self
            .execute(self.request(Method::GET, endpoint, Some(token)), endpoint)
            .await?;
        Self::read_json(response).await
    }

    /// PUT /users/me
    pub async fn update_current_user(
        &self,
        token: Option<&str>,
        update: &UserUpdate,
    ) -> Result<User, AppError> {
        let token = require_token(token, "update user details")?;
        let endpoint = "/users/me";
        let response = self
            .execute(
                self.request(Method::PUT, endpoint, Some(token)).json(update),
                endpoint,
            )
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl ProfileSource for ApiClient {
    async fn fetch_profile(&self, token: &str) -> Result<User, AppError> {
        self.current_user(Some(token)).await
    }
}
