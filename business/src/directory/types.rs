//! Wire types for the `/users` endpoints.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote service.
pub type UserId = u64;

/// One user as returned by `GET /users` and sent to `PUT /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
}

impl UserRecord {
    /// "First Last", trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// First letter of each name, used where no avatar can be shown.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}

/// Response of `GET /users?page=N`.
///
/// `per_page` and `total` are informational; `total_pages` is trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListUsersResponse {
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<UserRecord>,
}
