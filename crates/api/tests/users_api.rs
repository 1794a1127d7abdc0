//! Router tests for `/api/users`.

#![allow(clippy::unwrap_used)]

mod common;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use accounts_api::db::{StoreError, UserStore};
use accounts_api::error::{INTERNAL_MESSAGE, USER_NOT_FOUND};
use accounts_api::models::{Cart, NewUserRecord, User, UserChangesRecord, UserWithCarts};
use accounts_api::services::PasswordPolicy;
use accounts_core::{Email, UserId};

use common::{PASSWORD, build_test_app, build_test_app_with};

const POLICY: PasswordPolicy = PasswordPolicy { min_length: 8 };

#[tokio::test]
async fn create_then_get_round_trip() {
    let app = build_test_app(POLICY);

    let response = app
        .post(
            "/api/users",
            json!({
                "username": "pine",
                "first_name": "Ada",
                "last_name": "Apple",
                "email": "ada@example.com",
                "password": PASSWORD,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "Success");
    assert_eq!(body["user"]["balance"], "0.00");
    assert!(body["user"].get("password").is_none());

    let id = body["user"]["id"].as_i64().unwrap();
    let fetched = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    let user = fetched.json();
    assert_eq!(user["username"], "pine");
    assert_eq!(user["first_name"], "Ada");
    assert_eq!(user["last_name"], "Apple");
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["carts"], json!([]));
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn list_includes_carts() {
    let app = build_test_app(POLICY);
    let user = app.create_user("pine", "ada@example.com").await;
    app.create_user("pear", "bea@example.com").await;

    let id = UserId::new(i32::try_from(user["id"].as_i64().unwrap()).unwrap());
    app.store.create_cart(id).await.unwrap();

    let response = app.get("/api/users").await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.json();
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert_eq!(users[0]["carts"].as_array().unwrap().len(), 1);
    assert_eq!(users[1]["carts"], json!([]));
}

#[tokio::test]
async fn short_password_reports_configured_minimum() {
    let app = build_test_app(PasswordPolicy { min_length: 12 });

    let response = app
        .post(
            "/api/users",
            json!({
                "username": "pine",
                "first_name": "Ada",
                "last_name": "Apple",
                "email": "ada@example.com",
                "password": "only-eleven",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Password must be 12 or more characters.");
    assert_eq!(app.get("/api/users").await.json(), json!([]));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = build_test_app(POLICY);
    app.create_user("pine", "ada@example.com").await;

    let response = app
        .post(
            "/api/users",
            json!({
                "username": "pear",
                "first_name": "Bea",
                "last_name": "Pear",
                "email": "ada@example.com",
                "password": PASSWORD,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Email must be unique.");
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = build_test_app(POLICY);

    let response = app
        .post(
            "/api/users",
            json!({
                "username": "pine",
                "first_name": "Ada",
                "last_name": "Apple",
                "email": "ada.example.com",
                "password": PASSWORD,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Please enter a valid email.");
}

#[tokio::test]
async fn only_first_validation_error_is_reported() {
    let app = build_test_app(POLICY);

    let response = app
        .post(
            "/api/users",
            json!({
                "first_name": "Ada",
                "last_name": "Apple",
                "email": "nope",
                "password": "short",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Unable to post user data.");
}

#[tokio::test]
async fn unreadable_body_is_generic_error() {
    let app = build_test_app(POLICY);

    let response = app.send(Method::POST, "/api/users", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Unable to post user data.");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = build_test_app(POLICY);

    for uri in ["/api/users/999", "/api/users/abc"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.message(), USER_NOT_FOUND);

        let response = app.send(Method::DELETE, uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.message(), USER_NOT_FOUND);
    }
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = build_test_app(POLICY);
    let user = app.create_user("pine", "ada@example.com").await;
    let uri = format!("/api/users/{}", user["id"]);

    let response = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "deleted": 1 }));

    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_unknown_email() {
    let app = build_test_app(POLICY);

    let response = app
        .post(
            "/api/users/login",
            json!({ "email": "nobody@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Email is not registered.");
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn login_wrong_password() {
    let app = build_test_app(POLICY);
    app.create_user("pine", "ada@example.com").await;

    let response = app
        .post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": "not-the-password" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Incorrect email or password, please try again"
    );
}

#[tokio::test]
async fn login_establishes_session_with_cart_count() {
    let app = build_test_app(POLICY);
    let user = app.create_user("pine", "ada@example.com").await;
    let id = UserId::new(i32::try_from(user["id"].as_i64().unwrap()).unwrap());
    app.store.create_cart(id).await.unwrap();
    app.store.create_cart(id).await.unwrap();

    let response = app
        .post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "You are now logged in!");
    assert_eq!(response.json()["user"]["username"], "pine");

    let cookie = response.session_cookie().unwrap();
    let session = app.session_data(&cookie).await.unwrap();
    assert_eq!(session["user_id"], user["id"]);
    assert_eq!(session["logged_in"], true);
    assert_eq!(session["cart_count"], 2);
}

#[tokio::test]
async fn logout_without_session_is_not_found() {
    let app = build_test_app(POLICY);

    let response = app
        .send(Method::POST, "/api/users/logout", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn logout_ends_session() {
    let app = build_test_app(POLICY);
    app.create_user("pine", "ada@example.com").await;
    let cookie = app.login("ada@example.com").await;

    let response = app
        .send(Method::POST, "/api/users/logout", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
    assert!(app.session_data(&cookie).await.is_none());

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "first_name": "Bea" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Please log in to continue.");
}

#[tokio::test]
async fn update_requires_login() {
    let app = build_test_app(POLICY);
    let user = app.create_user("pine", "ada@example.com").await;

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "first_name": "Mallory" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Please log in to continue.");

    let fetched = app.get(&format!("/api/users/{}", user["id"])).await;
    assert_eq!(fetched.json()["first_name"], "Ada");
}

#[tokio::test]
async fn update_current_user() {
    let app = build_test_app(POLICY);
    let user = app.create_user("pine", "ada@example.com").await;
    let cookie = app.login("ada@example.com").await;

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "username": "renamed", "last_name": "Pear" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "User updated!");
    assert_eq!(body["user"]["last_name"], "Pear");
    assert_eq!(body["user"]["username"], "pine");
    assert_eq!(body["user"]["id"], user["id"]);
}

#[tokio::test]
async fn update_is_validated() {
    let app = build_test_app(POLICY);
    app.create_user("pine", "ada@example.com").await;
    app.create_user("pear", "bea@example.com").await;
    let cookie = app.login("ada@example.com").await;

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "email": "bea@example.com" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Email must be unique.");

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "password": "short" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Password must be 8 or more characters.");
}

#[tokio::test]
async fn changed_password_is_used_for_login() {
    let app = build_test_app(POLICY);
    app.create_user("pine", "ada@example.com").await;
    let cookie = app.login("ada@example.com").await;

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "password": "a-new-password" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let old = app
        .post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(old.status, StatusCode::BAD_REQUEST);

    let new = app
        .post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": "a-new-password" }),
        )
        .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn update_after_user_deleted_is_not_found() {
    let app = build_test_app(POLICY);
    let user = app.create_user("pine", "ada@example.com").await;
    let cookie = app.login("ada@example.com").await;

    app.send(
        Method::DELETE,
        &format!("/api/users/{}", user["id"]),
        None,
        None,
    )
    .await;

    let response = app
        .send(
            Method::PUT,
            "/api/users",
            Some(json!({ "first_name": "Bea" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), USER_NOT_FOUND);
}

#[tokio::test]
async fn login_rotates_session_id() {
    let app = build_test_app(POLICY);
    app.create_user("pine", "ada@example.com").await;
    let first = app.login("ada@example.com").await;
    assert!(app.session_data(&first).await.is_some());

    let response = app
        .send(
            Method::POST,
            "/api/users/login",
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
            Some(&first),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let second = response.session_cookie().unwrap();
    assert_ne!(second, first);
    assert!(app.session_data(&first).await.is_none());
    assert_eq!(app.session_data(&second).await.unwrap()["logged_in"], true);
}

#[tokio::test]
async fn login_trims_email_like_signup() {
    let app = build_test_app(POLICY);
    app.create_user("pine", " ada@example.com ").await;

    let response = app
        .post(
            "/api/users/login",
            json!({ "email": " ada@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn balance_beyond_column_range_is_rejected() {
    let app = build_test_app(POLICY);

    let response = app
        .post(
            "/api/users",
            json!({
                "username": "pine",
                "first_name": "Ada",
                "last_name": "Apple",
                "email": "ada@example.com",
                "password": PASSWORD,
                "balance": "99999999999",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Unable to post user data.");
    assert!(app.store.list_users().await.unwrap().is_empty());

    let response = app
        .post(
            "/api/users",
            json!({
                "username": "pine",
                "first_name": "Ada",
                "last_name": "Apple",
                "email": "ada@example.com",
                "password": PASSWORD,
                "balance": "9999999999.99",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["user"]["balance"], "9999999999.99");
}

/// A store whose backend is always unreachable.
struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for UnreachableStore {
    async fn list_users(&self) -> Result<Vec<UserWithCarts>, StoreError> {
        Err(unreachable())
    }

    async fn get_user(&self, _id: UserId) -> Result<Option<UserWithCarts>, StoreError> {
        Err(unreachable())
    }

    async fn get_credentials(&self, _email: &Email) -> Result<Option<(User, String)>, StoreError> {
        Err(unreachable())
    }

    async fn insert_user(&self, _record: NewUserRecord) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn update_user(
        &self,
        _id: UserId,
        _changes: UserChangesRecord,
    ) -> Result<Option<User>, StoreError> {
        Err(unreachable())
    }

    async fn delete_user(&self, _id: UserId) -> Result<u64, StoreError> {
        Err(unreachable())
    }

    async fn list_carts(&self, _user_id: UserId) -> Result<Vec<Cart>, StoreError> {
        Err(unreachable())
    }

    async fn create_cart(&self, _user_id: UserId) -> Result<Cart, StoreError> {
        Err(unreachable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

#[tokio::test]
async fn store_failure_is_internal_error() {
    let app = build_test_app_with(UnreachableStore, POLICY);

    let response = app.get("/api/users").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.message(), INTERNAL_MESSAGE);

    let response = app
        .post(
            "/api/users/login",
            json!({ "email": "ada@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.message(), INTERNAL_MESSAGE);

    assert_eq!(
        app.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn health_endpoints() {
    let app = build_test_app(POLICY);

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"ok");

    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = build_test_app(POLICY);

    let generated = app.get("/health").await;
    assert!(generated.headers.contains_key("x-request-id"));

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
