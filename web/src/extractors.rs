//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request correlation id
//! - `ClientIp`: client IP address from proxy headers or the connection
//! - `UserAgent`: the `User-Agent` header
//! - `BearerToken`: the token of an `Authorization: Bearer <token>` header
//! - `PageParams`: raw `page`/`limit` query parameters
//!
//! # Examples
//!
//! ```ignore
//! use bookstore_web::extractors::{ClientIp, CorrelationId, UserAgent};
//!
//! async fn login(
//!     correlation_id: CorrelationId,
//!     client_ip: ClientIp,
//!     user_agent: UserAgent,
//!     Json(request): Json<LoginRequest>,
//! ) -> Result<Json<LoginResponse>, AppError> {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         client_ip = %client_ip.0,
//!         user_agent = %user_agent.0,
//!         "Login attempt"
//!     );
//!     // ...
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use bookstore_auth::AuthError;
use bookstore_auth::constants::BEARER_PREFIX;
use bookstore_core::Pagination;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the id stored by [`crate::correlation_id_layer`] when the layer is
/// installed, then the `X-Correlation-ID` header, then a fresh UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .extensions
            .get::<Uuid>()
            .copied()
            .or_else(|| {
                parts
                    .headers
                    .get(CORRELATION_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| Uuid::parse_str(s).ok())
            })
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Client IP address.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
/// 3. Connection IP, when the server was started with connect info
/// 4. `127.0.0.1`
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = extract_client_ip(&parts.headers, parts.extensions.get());

        Ok(Self(ip))
    }
}

/// Extract client IP from headers or connection info.
fn extract_client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> IpAddr {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());
    if let Some(ip) = forwarded {
        return ip;
    }

    let real_ip = headers
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());
    if let Some(ip) = real_ip {
        return ip;
    }

    connect_info.map_or(IpAddr::V4(Ipv4Addr::LOCALHOST), |info| info.0.ip())
}

/// User-Agent header, or `"Unknown"`.
#[derive(Debug, Clone)]
pub struct UserAgent(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self(user_agent))
    }
}

/// Bearer token extracted from `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is missing, uses another scheme, or
/// carries an empty token.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?;

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Raw `page` and `limit` query parameters.
///
/// Kept as strings so a non-numeric value becomes a 422 with a readable
/// message instead of a query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

impl PageParams {
    /// Parse into a [`Pagination`], defaulting to page 1 of 10.
    ///
    /// # Errors
    ///
    /// Returns a 422 [`AppError`] if either value is non-numeric or out of
    /// range.
    pub fn pagination(&self) -> Result<Pagination, AppError> {
        Ok(Pagination::parse(self.page.as_deref(), self.limit.as_deref())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode, header};

    fn parts(request: Request<()>) -> Parts {
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let mut parts = parts(
            Request::builder()
                .header(CORRELATION_ID_HEADER, uuid.to_string())
                .body(())
                .expect("Valid request"),
        );

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let stored = Uuid::new_v4();
        let mut parts = parts(
            Request::builder()
                .header(CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
                .body(())
                .expect("Valid request"),
        );
        parts.extensions.insert(stored);

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, stored);
    }

    #[tokio::test]
    async fn test_client_ip_from_x_forwarded_for() {
        let mut parts = parts(
            Request::builder()
                .header("X-Forwarded-For", "203.0.113.1, 198.51.100.1")
                .body(())
                .expect("Valid request"),
        );

        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "203.0.113.1");
    }

    #[tokio::test]
    async fn test_client_ip_from_connect_info() {
        let mut parts = parts(Request::builder().body(()).expect("Valid request"));
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 7], 4000))));

        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "198.51.100.7");
    }

    #[tokio::test]
    async fn test_client_ip_fallback() {
        let mut parts = parts(Request::builder().body(()).expect("Valid request"));

        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_user_agent_fallback() {
        let mut parts = parts(Request::builder().body(()).expect("Valid request"));

        let user_agent = UserAgent::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(user_agent.0, "Unknown");
    }

    #[tokio::test]
    async fn test_bearer_token_extracted() {
        let mut parts = parts(
            Request::builder()
                .header(header::AUTHORIZATION, "Bearer abc.def")
                .body(())
                .expect("Valid request"),
        );

        let token = BearerToken::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(token.0, "abc.def");
    }

    #[tokio::test]
    async fn test_bearer_token_rejections() {
        for header_value in [None, Some("Basic dXNlcg=="), Some("Bearer ")] {
            let mut builder = Request::builder();
            if let Some(value) = header_value {
                builder = builder.header(header::AUTHORIZATION, value);
            }
            let mut parts = parts(builder.body(()).expect("Valid request"));

            let rejection = BearerToken::from_request_parts(&mut parts, &())
                .await
                .expect_err("Should reject");

            assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_page_params() {
        let defaults = PageParams::default().pagination().unwrap();
        assert_eq!((defaults.page(), defaults.limit()), (1, 10));

        let bad = PageParams {
            page: Some("two".to_string()),
            limit: None,
        };
        assert_eq!(
            bad.pagination().unwrap_err().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
