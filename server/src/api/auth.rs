//! Registration and login endpoints.
//!
//! - POST /api/auth/register - Create an account
//! - POST /api/auth/login - Exchange credentials for a bearer token

use crate::auth::{hash_password, verify_password};
use crate::server::AppState;
use axum::{Json, extract::State, http::StatusCode};
use bookstore_auth::Principal;
use bookstore_core::user::{NewUser, UserProfile, validate_password};
use bookstore_web::{AppError, ClientIp, CorrelationId, UserAgent};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login name, 1 to 50 characters
    pub username: String,
    /// Plain password, at least 8 characters
    pub password: String,
    /// Optional email address
    pub email: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain password
    pub password: String,
}

/// The user part of a login response.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    /// User id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Email address
    pub email: Option<String>,
    /// Loyalty points
    pub points: i32,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    /// The logged-in user
    pub user: LoginUser,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new user.
///
/// Weak passwords are rejected with 422, taken usernames or emails with 409.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3001/api/auth/register \
///   -H "Content-Type: application/json" \
///   -d '{"username":"reader","password":"correct horse","email":"reader@example.com"}'
/// ```
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    validate_password(&request.password)?;

    let password_hash = hash_password(state.passwords.clone(), request.password).await?;
    let profile = state
        .users
        .create_user(&NewUser {
            username: request.username,
            password_hash,
            email: request.email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Log in.
///
/// Unknown usernames and wrong passwords get the same 401 answer.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3001/api/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"username":"reader","password":"correct horse"}'
/// ```
///
/// Response:
/// ```json
/// {
///   "token": "eyJ0eXAiOiJKV1Qi...",
///   "user": { "id": 42, "username": "reader", "email": "reader@example.com", "points": 100 }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    client_ip: ClientIp,
    UserAgent(user_agent): UserAgent,
    CorrelationId(correlation_id): CorrelationId,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let rejected = || {
        tracing::warn!(
            client_ip = %client_ip.0,
            user_agent = %user_agent,
            correlation_id = %correlation_id,
            "Login rejected"
        );
        metrics::counter!("bookstore_logins_total", "outcome" => "rejected").increment(1);
        AppError::unauthorized("Invalid username or password")
    };

    let Some(credentials) = state.users.find_credentials(&request.username).await? else {
        return Err(rejected());
    };
    if !verify_password(
        state.passwords.clone(),
        request.password,
        credentials.password_hash,
    )
    .await?
    {
        return Err(rejected());
    }

    let profile = state
        .users
        .get_profile(credentials.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", credentials.id))?;
    let token = state
        .token_issuer
        .issue(&Principal::new(profile.id, profile.username.clone()))?;

    tracing::info!(
        user_id = profile.id,
        client_ip = %client_ip.0,
        user_agent = %user_agent,
        correlation_id = %correlation_id,
        "User logged in"
    );
    metrics::counter!("bookstore_logins_total", "outcome" => "accepted").increment(1);

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            points: profile.points,
        },
    }))
}
