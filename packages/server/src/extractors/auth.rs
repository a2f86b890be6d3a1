use axum::{extract::FromRequestParts, http::request::Parts};

use crate::engine::Caller;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::token;

/// The authenticated principal, extracted from the
/// `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication; requests
/// without a valid, unrevoked token are rejected before the handler runs.
#[derive(Debug)]
pub struct AuthUser {
    pub username: String,
    /// Token id, kept so logout can revoke exactly this token.
    pub jti: String,
    /// Token expiry (seconds since epoch), kept so the revocation set can
    /// drop entries once they would no longer verify anyway.
    pub exp: usize,
}

impl From<AuthUser> for Caller {
    fn from(user: AuthUser) -> Self {
        Caller::Authenticated {
            username: user.username,
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("Authorization") else {
        return Ok(None);
    };
    let header = header.to_str().map_err(|_| AppError::TokenInvalid)?;
    let token = header.strip_prefix("Bearer ").ok_or(AppError::TokenInvalid)?;
    Ok(Some(token))
}

fn verify_token(state: &AppState, raw: &str) -> Result<AuthUser, AppError> {
    let claims = token::verify(raw, state.config.auth.token_secret.as_bytes())
        .map_err(|_| AppError::TokenInvalid)?;

    if state.revoked_tokens.contains_key(&claims.jti) {
        return Err(AppError::TokenInvalid);
    }

    Ok(AuthUser {
        username: claims.sub,
        jti: claims.jti,
        exp: claims.exp,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AppError::TokenMissing)?;
        verify_token(state, token)
    }
}

/// The caller identity for read endpoints: requests without an
/// `Authorization` header run as [`Caller::Anonymous`], requests with a
/// valid token as the principal. A present but invalid token is an error,
/// not an anonymous fallback.
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(Caller::Anonymous),
            Some(token) => verify_token(state, token).map(Caller::from),
        }
    }
}
