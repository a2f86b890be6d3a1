use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

// Leading `::` keeps the storage crate distinct from this test module,
// which shares its name.
use ::common::storage::FilesystemDocumentStore;
use dashmap::DashMap;
use reqwest::Client;
use serde_json::Value;

use server::config::{
    AccessRuleConfig, AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig,
    StorageConfig,
};
use server::policy::AccessPolicy;
use server::state::AppState;
use server::utils::hash::hash_password;

pub const USERNAME: &str = "archivist";
pub const PASSWORD: &str = "correct horse battery staple";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const ME: &str = "/api/v1/auth/me";

    pub const DOCUMENTS: &str = "/api/v1/documents";
    pub const COURSES: &str = "/api/v1/courses";
    pub const FOLDERS: &str = "/api/v1/folders";
    pub const AUTHORS: &str = "/api/v1/authors";
    pub const ITEMS: &str = "/api/v1/items";

    pub fn document(id: i64) -> String {
        format!("{DOCUMENTS}/{id}")
    }

    pub fn document_upload(id: i64) -> String {
        format!("{DOCUMENTS}/{id}/upload")
    }

    pub fn document_download(id: i64) -> String {
        format!("{DOCUMENTS}/{id}/download")
    }

    pub fn course(id: i64) -> String {
        format!("{COURSES}/{id}")
    }

    pub fn folder(id: i64) -> String {
        format!("{FOLDERS}/{id}")
    }

    pub fn author(id: i64) -> String {
        format!("{AUTHORS}/{id}")
    }

    pub fn item(id: i64) -> String {
        format!("{ITEMS}/{id}")
    }
}

/// A running test server backed by a temp-dir SQLite file and blob
/// directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    #[allow(dead_code)]
    dir: tempfile::TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_access(HashMap::new()).await
    }

    pub async fn spawn_with_access(access: HashMap<String, AccessRuleConfig>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("archive.sqlite");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let db = server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let docs_dir = dir.path().join("docs");
        let docs = FilesystemDocumentStore::new(docs_dir.clone(), 10 * 1024 * 1024)
            .await
            .expect("Failed to initialize test document store");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig {
                username: USERNAME.to_string(),
                password_hash: hash_password(PASSWORD).expect("Failed to hash test password"),
                token_secret: "test-secret-for-integration-tests".to_string(),
            },
            storage: StorageConfig {
                docs_dir,
                max_document_size: 10 * 1024 * 1024,
            },
            access: access.clone(),
        };

        let policy = AccessPolicy::from_config(&access).expect("Invalid test access rules");

        let state = AppState {
            db,
            docs: Arc::new(docs),
            config: Arc::new(app_config),
            access: Arc::new(policy),
            revoked_tokens: Arc::new(DashMap::new()),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Log in with the configured test credentials and return the token.
    pub async fn login(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"username": USERNAME, "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);
        res.body["token"]
            .as_str()
            .expect("Login response carries no token")
            .to_string()
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    /// POST with an empty body, e.g. for logout.
    pub async fn post_empty_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");
        TestResponse::from_response(res).await
    }

    pub async fn patch_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");
        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    /// Upload raw bytes as a document payload.
    pub async fn upload(
        &self,
        id: i64,
        content_type: &str,
        bytes: &[u8],
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(&routes::document_upload(id)))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .expect("Failed to send upload request");
        TestResponse::from_response(res).await
    }

    /// Download a document payload; returns the raw response so headers and
    /// bytes can be asserted.
    pub async fn download(&self, id: i64, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(self.url(&routes::document_download(id)));
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        req.send().await.expect("Failed to send download request")
    }
}

/// Convenience constructors for access-rule maps.
pub fn allow_rule(ranges: &[&str]) -> AccessRuleConfig {
    AccessRuleConfig {
        allow: Some(ranges.iter().map(|s| s.to_string()).collect()),
        deny: None,
    }
}

pub fn deny_rule(ranges: &[&str]) -> AccessRuleConfig {
    AccessRuleConfig {
        allow: None,
        deny: Some(ranges.iter().map(|s| s.to_string()).collect()),
    }
}

pub fn access_rules(entries: &[(&str, AccessRuleConfig)]) -> HashMap<String, AccessRuleConfig> {
    entries
        .iter()
        .map(|(key, rule)| (key.to_string(), rule.clone()))
        .collect()
}
