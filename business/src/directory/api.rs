//! Directory API client helpers.
//!
//! Network IO against the `/users` endpoints. Callers map results into state updates;
//! nothing here touches controller state.

use crate::BusinessConfig;
use crate::http::Client;

use super::types::{ListUsersResponse, UserId, UserRecord};

/// Minimal error wrapper for API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryApiError {
    pub message: String,
}

impl DirectoryApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DirectoryApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DirectoryApiError {}

pub type ApiResult<T> = Result<T, DirectoryApiError>;

fn http_status_error(status: u16) -> DirectoryApiError {
    DirectoryApiError::new(format!("API returned status: {status}"))
}

#[derive(Debug, Clone)]
pub struct DirectoryApi {
    api_url: String,
    http: Client,
}

impl DirectoryApi {
    pub fn new(config: &BusinessConfig, http: Client) -> Self {
        Self {
            api_url: config.api_url(),
            http,
        }
    }

    /// GET `/users?page={page}`
    pub async fn list_users(
        &self,
        authorization: Option<&str>,
        page: u32,
    ) -> ApiResult<ListUsersResponse> {
        let url = format!("{}/users?page={page}", self.api_url);

        let response = self
            .http
            .get(&url)
            .authorization(authorization)
            .send()
            .await
            .map_err(|e| DirectoryApiError::new(e.to_string()))?;

        if !response.is_success() {
            return Err(http_status_error(response.status));
        }

        response.json().map_err(|e| {
            DirectoryApiError::new(format!("Failed to parse ListUsersResponse: {e}"))
        })
    }

    /// PUT `/users/{id}`
    /// Body: the full record. The response body is not used.
    pub async fn update_user(
        &self,
        authorization: Option<&str>,
        record: &UserRecord,
    ) -> ApiResult<()> {
        let url = format!("{}/users/{}", self.api_url, record.id);

        let request = self
            .http
            .put(&url)
            .authorization(authorization)
            .json(record)
            .map_err(|e| DirectoryApiError::new(format!("Failed to serialize request: {e}")))?;

        let response = request
            .send()
            .await
            .map_err(|e| DirectoryApiError::new(e.to_string()))?;

        if !response.is_success() {
            return Err(http_status_error(response.status));
        }

        Ok(())
    }

    /// DELETE `/users/{id}`
    ///
    /// Any 2xx is success; the service answers `204 No Content`.
    pub async fn delete_user(&self, authorization: Option<&str>, id: UserId) -> ApiResult<()> {
        let url = format!("{}/users/{id}", self.api_url);

        let response = self
            .http
            .delete(&url)
            .authorization(authorization)
            .send()
            .await
            .map_err(|e| DirectoryApiError::new(e.to_string()))?;

        if !response.is_success() {
            return Err(http_status_error(response.status));
        }

        Ok(())
    }
}
