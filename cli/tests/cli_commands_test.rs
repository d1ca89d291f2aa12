//! CLI workflow tests using mock servers.
//!
//! Each `roster` invocation is a fresh process: it restores the session from the
//! session file, loads a page, acts, and exits. These tests replay that sequence with
//! a new session per step against a wiremock server and a temporary session file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use roster_business::http::Client;
use roster_business::{
    BusinessConfig, DirectoryApi, DirectoryController, FileTokenStore, Route, SessionStore,
    UserRecord,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct CliTestContext {
    mock_server: MockServer,
    _dir: tempfile::TempDir,
    token_path: PathBuf,
}

impl CliTestContext {
    async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let token_path = dir.path().join("roster").join("session.json");
        Self {
            mock_server: MockServer::start().await,
            _dir: dir,
            token_path,
        }
    }

    fn config(&self) -> BusinessConfig {
        BusinessConfig {
            token_path: Some(self.token_path.clone()),
            ..BusinessConfig::new(self.mock_server.uri())
        }
    }

    /// What `roster` does on startup.
    fn start_process(&self) -> (SessionStore, DirectoryController) {
        let config = self.config();
        let http = Client::new(&config).expect("client builds");
        let store = FileTokenStore::from_config(&config).expect("token path");
        let session = SessionStore::new(&config, http.clone(), Arc::new(store));
        session.restore();
        let controller = DirectoryController::new(
            session.clone(),
            DirectoryApi::new(&config, http),
            config.page_load_policy,
        );
        (session, controller)
    }

    fn session_file(&self) -> &Path {
        &self.token_path
    }
}

fn user(id: u64, first: &str, last: &str) -> UserRecord {
    UserRecord {
        id,
        email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}

async fn mount_page(server: &MockServer, page: u32, data: Vec<UserRecord>) {
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", page.to_string()))
        .and(header("authorization", "Bearer QpwL5tke4Pnpja7X4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": page,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": data,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_list_delete_logout_across_processes() {
    let test_ctx = CliTestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "QpwL5tke4Pnpja7X4" })),
        )
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;
    mount_page(
        &test_ctx.mock_server,
        2,
        vec![user(7, "Michael", "Lawson"), user(8, "Lindsay", "Ferguson")],
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;

    // roster login
    let (session, _) = test_ctx.start_process();
    assert_eq!(Route::for_session(&session.state()), Route::Login);
    session
        .login("eve.holt@reqres.in", "cityslicka")
        .await
        .expect("login succeeds");
    assert!(test_ctx.session_file().exists());

    // roster users list --page 2
    let (session, controller) = test_ctx.start_process();
    assert_eq!(Route::for_session(&session.state()), Route::Directory);
    controller.load_page(2).await.expect("page loads");
    let page = controller.page();
    assert_eq!(page.current_page, 2);
    assert_eq!(page.records.len(), 2);

    // roster users delete 7 --page 2 --yes
    let (_, controller) = test_ctx.start_process();
    controller.load_page(2).await.expect("page loads");
    let michael = controller.page().record(7).cloned().expect("on page 2");
    controller.begin_delete(&michael).expect("open");
    controller.confirm_delete(7).await.expect("delete succeeds");
    let ids: Vec<u64> = controller.page().records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![8]);
    let notifications = controller.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "User deleted");

    // roster logout
    let (session, _) = test_ctx.start_process();
    session.logout();
    assert!(!test_ctx.session_file().exists());

    // roster users list, signed out
    let (session, controller) = test_ctx.start_process();
    assert_eq!(Route::for_session(&session.state()), Route::Login);
    assert!(controller.load_page(1).await.is_err());
}

#[tokio::test]
async fn test_edit_sends_full_record() {
    let test_ctx = CliTestContext::new().await;
    std::fs::create_dir_all(test_ctx.session_file().parent().expect("parent")).expect("mkdir");
    std::fs::write(
        test_ctx.session_file(),
        r#"{"auth_token":"QpwL5tke4Pnpja7X4"}"#,
    )
    .expect("write session");

    mount_page(&test_ctx.mock_server, 1, vec![user(7, "Michael", "Lawson")]).await;
    let updated = UserRecord {
        first_name: "Mike".to_owned(),
        ..user(7, "Michael", "Lawson")
    };
    Mock::given(method("PUT"))
        .and(path("/api/users/7"))
        .and(wiremock::matchers::body_json(json!({
            "id": 7,
            "email": "michael.lawson@reqres.in",
            "first_name": "Mike",
            "last_name": "Lawson",
            "avatar": "https://reqres.in/img/faces/7-image.jpg",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updatedAt": "2026-10-19T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&test_ctx.mock_server)
        .await;

    // roster users edit 7 --first-name Mike
    let (_, controller) = test_ctx.start_process();
    controller.load_page(1).await.expect("page loads");
    let michael = controller.page().record(7).cloned().expect("on page 1");
    controller.begin_edit(&michael).expect("open");
    controller
        .confirm_edit(updated.clone())
        .await
        .expect("update succeeds");

    assert_eq!(controller.page().records, vec![updated]);
    assert_eq!(
        controller.drain_notifications()[0].description,
        "Mike Lawson has been updated."
    );
}
