//! Authentication middleware
//!
//! Verifies the bearer token and hands the resulting session to handlers as
//! an explicit [`AuthenticatedUser`].

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{constants::roles, error::AppError, services::AuthService, state::AppState};

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        debug!(path = %path, "Auth failed: No Authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = bearer_token(auth_header) else {
        debug!(path = %path, "Auth failed: expected 'Bearer <token>'");
        return Err(AppError::Unauthorized);
    };

    let claims = AuthService::verify_token(token, &state.config().jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: Token verification failed");
        e
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        debug!(path = %path, sub = %claims.sub, error = ?e, "Auth failed: Invalid user ID in token");
        AppError::InvalidToken
    })?;

    let user = AuthenticatedUser {
        id: user_id,
        username: claims.username,
        role: claims.role,
    };

    debug!(path = %path, user_id = %user.id, role = %user.role, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
