use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, ProtectedResponse, RegisterRequest, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo_types::{NewUser, Role},
    },
    db::StoreError,
    error::{AppError, AppResult},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_BODY: &str = "Invalid request body";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/protected", get(protected))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let Json(payload) = payload.map_err(|e| AppError::rejected(INVALID_BODY, e))?;
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();

    let missing: Vec<&'static str> = [
        ("username", username.is_empty()),
        ("email", email.is_empty()),
        ("password", payload.password.is_empty()),
    ]
    .into_iter()
    .filter_map(|(name, blank)| blank.then_some(name))
    .collect();
    if !missing.is_empty() {
        return Err(AppError::missing_fields("Please fill in all required fields.", missing));
    }

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::bad_request("Invalid email"));
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let new_user = NewUser {
        username,
        email,
        password_hash,
        role: Role::User,
    };
    let user = match state.store.insert_user(&new_user).await {
        Ok(u) => u,
        // lost a race with a concurrent registration
        Err(StoreError::Duplicate) => {
            warn!(email = %new_user.email, "email already registered");
            return Err(AppError::Conflict("User already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "User registered successfully",
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(payload) = payload.map_err(|e| AppError::rejected(INVALID_BODY, e))?;
    let email = payload.email.trim();

    let user = match state.store.find_user_by_email(email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse {
        message: "Login successful",
        token,
    }))
}

pub async fn protected(AuthUser(claims): AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted",
        user: claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MemoryStore};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn register_body(email: &str, password: &str) -> Value {
        json!({ "username": "jane_doe", "email": email, "password": password })
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("jane.doe@talentsync.dev"));
        assert!(!is_valid_email("jane.doe"));
        assert!(!is_valid_email("jane doe@talentsync.dev"));
        assert!(!is_valid_email("jane@localhost"));
    }

    #[tokio::test]
    async fn register_returns_token_for_new_user() {
        let store = Arc::new(MemoryStore::default());
        let (app, dir) = testing::app(store.clone()).await;

        let (status, body) =
            testing::post_json(&app, "/api/auth/register", register_body("jane@talentsync.dev", "Password123")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully");

        let user = store.user("jane@talentsync.dev").expect("user stored");
        assert_ne!(user.password_hash, "Password123");
        assert_eq!(user.role, Role::User);

        let claims = JwtKeys::from(&testing::config(dir.path()).jwt)
            .verify(body["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_once_stored() {
        let store = Arc::new(MemoryStore::default());
        let (app, _dir) = testing::app(store.clone()).await;

        let body = register_body("dup@talentsync.dev", "Password123");
        let (first, _) = testing::post_json(&app, "/api/auth/register", body.clone()).await;
        assert_eq!(first, StatusCode::CREATED);

        let (second, err) = testing::post_json(&app, "/api/auth/register", body).await;
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert_eq!(err["message"], "User already exists");
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_caught_at_insert_is_still_a_conflict() {
        let store = Arc::new(MemoryStore::racing_registrations());
        let (app, _dir) = testing::app(store.clone()).await;

        let body = register_body("race@talentsync.dev", "Password123");
        let (first, _) = testing::post_json(&app, "/api/auth/register", body.clone()).await;
        assert_eq!(first, StatusCode::CREATED);

        let (second, err) = testing::post_json(&app, "/api/auth/register", body).await;
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert_eq!(err, json!({ "message": "User already exists" }));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn unreadable_bodies_get_json_400() {
        let (app, _dir) = testing::app(Arc::new(MemoryStore::default())).await;
        let expected = json!({ "message": "Invalid request body" });

        let malformed = testing::post_raw(&app, "/api/auth/register", Some("application/json"), "{not json").await;
        assert_eq!(malformed, (StatusCode::BAD_REQUEST, expected.clone()));

        let wrong_type = testing::post_json(
            &app,
            "/api/auth/login",
            json!({ "email": 5, "password": "Password123" }),
        )
        .await;
        assert_eq!(wrong_type, (StatusCode::BAD_REQUEST, expected.clone()));

        let no_content_type = testing::post_raw(
            &app,
            "/api/auth/login",
            None,
            r#"{"email":"jane@talentsync.dev","password":"Password123"}"#,
        )
        .await;
        assert_eq!(no_content_type, (StatusCode::BAD_REQUEST, expected));
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_sensitive() {
        let store = Arc::new(MemoryStore::default());
        let (app, _dir) = testing::app(store.clone()).await;

        testing::post_json(&app, "/api/auth/register", register_body("Jane@talentsync.dev", "Password123")).await;
        let (status, _) =
            testing::post_json(&app, "/api/auth/register", register_body("jane@talentsync.dev", "Password123")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.user_count(), 2);
    }

    #[tokio::test]
    async fn register_reports_missing_fields() {
        let (app, _dir) = testing::app(Arc::new(MemoryStore::default())).await;
        let (status, body) =
            testing::post_json(&app, "/api/auth/register", json!({ "email": "  " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["missingFields"], json!(["username", "email", "password"]));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (app, _dir) = testing::app(Arc::new(MemoryStore::default())).await;
        testing::post_json(&app, "/api/auth/register", register_body("jane@talentsync.dev", "Password123")).await;

        let wrong_password = testing::post_json(
            &app,
            "/api/auth/login",
            json!({ "email": "jane@talentsync.dev", "password": "nope" }),
        )
        .await;
        let unknown_email = testing::post_json(
            &app,
            "/api/auth/login",
            json!({ "email": "ghost@talentsync.dev", "password": "Password123" }),
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.1, json!({ "message": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn login_token_opens_protected_route() {
        let store = Arc::new(MemoryStore::default());
        let (app, _dir) = testing::app(store.clone()).await;
        testing::post_json(&app, "/api/auth/register", register_body("jane@talentsync.dev", "Password123")).await;

        let login = testing::post_json(
            &app,
            "/api/auth/login",
            json!({ "email": "jane@talentsync.dev", "password": "Password123" }),
        )
        .await;
        assert_eq!(login.0, StatusCode::OK);
        assert_eq!(login.1["message"], "Login successful");
        let token = login.1["token"].as_str().expect("token in body").to_string();

        let req = Request::get("/api/auth/protected")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, body) = testing::send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Access granted");

        let user = store.user("jane@talentsync.dev").unwrap();
        assert_eq!(body["user"]["sub"], user.id.to_string());
    }

    #[tokio::test]
    async fn protected_route_rejects_missing_and_bad_tokens() {
        let (app, _dir) = testing::app(Arc::new(MemoryStore::default())).await;

        let req = Request::get("/api/auth/protected")
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, body) = testing::send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access denied");

        let req = Request::get("/api/auth/protected")
            .header(header::AUTHORIZATION, "Bearer not.a.token")
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, body) = testing::send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }
}
