//! Common Test Utilities
//!
//! Shared helpers and the in-memory test application.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use tunemate_social::config::{
    AuthSettings, CorsSettings, DatabaseSettings, RedisSettings, ServerSettings, Settings, SnowflakeSettings,
    StorageBackend, StorageSettings,
};
use tunemate_social::presentation::middleware::issue_token;
use tunemate_social::startup::{build_router, AppState};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Settings for an in-memory app with the caller header trusted
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: None,
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
            run_migrations: false,
        },
        redis: RedisSettings::default(),
        auth: AuthSettings {
            jwt_secret: TEST_JWT_SECRET.into(),
            trust_user_id_header: true,
            user_id_header: "UserId".into(),
        },
        snowflake: SnowflakeSettings {
            machine_id: 1,
            epoch: 1672531200000,
        },
        storage: StorageSettings {
            backend: StorageBackend::Memory,
        },
        cors: CorsSettings {
            allowed_origins: Vec::new(),
        },
        environment: "test".into(),
    }
}

/// Response status plus raw body
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is not UTF-8")
    }
}

/// Test application backed by in-memory storage
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            router: build_router(AppState::in_memory(settings)),
        }
    }

    /// Send a request, optionally as `user` via the caller header
    pub async fn request(&self, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("UserId", user);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_as(&self, user: &str, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(user), None).await
    }

    pub async fn post_as(&self, user: &str, uri: &str, body: Option<Value>) -> TestResponse {
        self.request(Method::POST, uri, Some(user), body).await
    }

    pub async fn delete_as(&self, user: &str, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(user), None).await
    }

    /// GET with a bearer token issued for `user`
    pub async fn get_with_token(&self, user: &str, uri: &str) -> TestResponse {
        let token = issue_token(user, TEST_JWT_SECRET, 300).unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// `from` sends a request that `to` accepts. Returns the relation id.
    pub async fn make_friends(&self, from: &str, to: &str) -> String {
        let sent = self
            .post_as(from, "/friend-request", Some(serde_json::json!({ "targetUserId": to })))
            .await;
        assert_eq!(sent.status, StatusCode::OK);

        let accepted = self.post_as(to, &format!("/acceptance/{}", from), None).await;
        assert_eq!(accepted.status, StatusCode::OK);

        let friends = self.get_as(from, "/friends").await.json();
        friends
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["friendId"] == to)
            .and_then(|f| f["relationId"].as_str())
            .expect("friendship missing from /friends")
            .to_string()
    }
}
