//! Helpers for driving the full router in-process.

#![allow(dead_code, clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::SessionStore;
use tower_sessions::session::Id;

use accounts_api::config::SessionConfig;
use accounts_api::db::{MemoryStore, UserStore};
use accounts_api::middleware::{SESSION_COOKIE_NAME, create_session_layer};
use accounts_api::routes;
use accounts_api::services::PasswordPolicy;
use accounts_api::state::AppState;

pub const PASSWORD: &str = "pineapple-pw";

/// The router plus handles on its stores.
pub struct TestApp<S = MemoryStore> {
    pub router: Router,
    pub store: Arc<S>,
    pub sessions: tower_sessions::MemoryStore,
}

/// A response with its body already collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap().to_owned()
    }

    /// Session cookie as `name=value`, if one was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }
}

/// Build the application over fresh in-memory stores.
pub fn build_test_app(policy: PasswordPolicy) -> TestApp {
    build_test_app_with(MemoryStore::new(), policy)
}

/// Build the application over `store` with an in-memory session store.
pub fn build_test_app_with<S>(store: S, policy: PasswordPolicy) -> TestApp<S>
where
    S: UserStore + 'static,
{
    let store = Arc::new(store);
    let sessions = tower_sessions::MemoryStore::default();

    let state = AppState::new(store.clone(), policy);
    let session_layer = create_session_layer(sessions.clone(), &SessionConfig::default());

    TestApp {
        router: routes::app(state, session_layer),
        store,
        sessions,
    }
}

impl<S> TestApp<S> {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    /// Create a user through the API and return its JSON.
    pub async fn create_user(&self, username: &str, email: &str) -> Value {
        let response = self
            .post(
                "/api/users",
                json!({
                    "username": username,
                    "first_name": "Ada",
                    "last_name": "Apple",
                    "email": email,
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["user"].clone()
    }

    /// Log in and return the session cookie.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post(
                "/api/users/login",
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.session_cookie().unwrap()
    }

    /// The stored session record behind `cookie`.
    pub async fn session_data(&self, cookie: &str) -> Option<Value> {
        let (_, raw_id) = cookie.split_once('=').unwrap();
        let id = Id::from_str(raw_id).unwrap();
        let record = self.sessions.load(&id).await.unwrap()?;
        record.data.get("session_user").cloned()
    }
}
