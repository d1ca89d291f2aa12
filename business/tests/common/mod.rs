//! Test utilities for the session and directory layers with mock servers.
//!
//! ```ignore
//! let ctx = TestContext::signed_in("abc123").await;
//! ctx.mock_users_page(1, 2, vec![sample_user(7)]).await;
//! ctx.controller.load_page(1).await?;
//! ```

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use roster_business::http::Client;
use roster_business::{
    BusinessConfig, DirectoryApi, DirectoryController, MemoryTokenStore, PageLoadPolicy,
    SessionStore, UserRecord,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock server plus a session and controller pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub config: BusinessConfig,
    pub tokens: Arc<MemoryTokenStore>,
    pub session: SessionStore,
    pub controller: DirectoryController,
}

impl TestContext {
    /// Fresh mock server, empty token store, signed out.
    pub async fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new(), PageLoadPolicy::default()).await
    }

    /// Signed in via a restored token; no login request is made.
    pub async fn signed_in(token: &str) -> Self {
        Self::signed_in_with_policy(token, PageLoadPolicy::default()).await
    }

    pub async fn signed_in_with_policy(token: &str, policy: PageLoadPolicy) -> Self {
        let ctx = Self::with_tokens(MemoryTokenStore::with_token(token), policy).await;
        assert!(ctx.session.restore(), "token should restore");
        ctx
    }

    async fn with_tokens(tokens: MemoryTokenStore, policy: PageLoadPolicy) -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig {
            page_load_policy: policy,
            ..BusinessConfig::new(mock_server.uri())
        };
        let http = Client::new(&config).expect("client builds");
        let tokens = Arc::new(tokens);
        let session = SessionStore::new(&config, http.clone(), tokens.clone());
        let controller = DirectoryController::new(
            session.clone(),
            DirectoryApi::new(&config, http),
            config.page_load_policy,
        );

        Self {
            mock_server,
            config,
            tokens,
            session,
            controller,
        }
    }

    pub async fn mock_login_success(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_login_status(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_users_page(&self, page: u32, total_pages: u32, data: Vec<UserRecord>) {
        self.mock_users_page_delayed(page, total_pages, data, Duration::ZERO)
            .await;
    }

    pub async fn mock_users_page_delayed(
        &self,
        page: u32,
        total_pages: u32,
        data: Vec<UserRecord>,
        delay: Duration,
    ) {
        let body = json!({
            "page": page,
            "per_page": 6,
            "total": total_pages * 6,
            "total_pages": total_pages,
            "data": data,
            "support": { "url": "https://reqres.in/#support-heading", "text": "support" },
        });

        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_users_status(&self, page: u32, status: u16) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_update(&self, id: u64, status: u16, delay: Duration, expected: u64) {
        Mock::given(method("PUT"))
            .and(path(format!("/api/users/{id}")))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(json!({ "updatedAt": "2026-01-01T00:00:00.000Z" }))
                    .set_delay(delay),
            )
            .expect(expected)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_delete(&self, id: u64, status: u16, expected: u64) {
        self.mock_delete_delayed(id, status, Duration::ZERO, expected)
            .await;
    }

    pub async fn mock_delete_delayed(&self, id: u64, status: u16, delay: Duration, expected: u64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/users/{id}")))
            .respond_with(ResponseTemplate::new(status).set_delay(delay))
            .expect(expected)
            .mount(&self.mock_server)
            .await;
    }

    /// Number of requests the mock server has seen so far.
    pub async fn request_count(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    pub fn record_ids(&self) -> Vec<u64> {
        self.controller
            .page()
            .records
            .iter()
            .map(|record| record.id)
            .collect()
    }
}

pub fn sample_user(id: u64) -> UserRecord {
    let (first, last) = match id {
        7 => ("Michael", "Lawson"),
        8 => ("Lindsay", "Ferguson"),
        9 => ("Tobias", "Funke"),
        _ => ("George", "Bluth"),
    };
    UserRecord {
        id,
        email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}
