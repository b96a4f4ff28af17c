//! Bearer-token authorization for mutating routes.
//!
//! Token issuance and verification live outside this crate. The server only
//! needs something that maps a presented token to a [`CurrentUser`];
//! [`StaticTokens`] does that from the `[[auth.tokens]]` config entries.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub is_admin: bool,
}

/// Resolves a bearer token to the user it was issued to.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Option<CurrentUser>;
}

/// A fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    users: HashMap<String, CurrentUser>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(
        mut self,
        token: impl Into<String>,
        username: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        self.users.insert(
            token.into(),
            CurrentUser {
                username: username.into(),
                is_admin,
            },
        );
        self
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        config.tokens.iter().fold(Self::new(), |acc, t| {
            acc.with_token(t.token.clone(), t.username.clone(), t.is_admin)
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn has_admin(&self) -> bool {
        self.users.values().any(|u| u.is_admin)
    }
}

impl Authenticator for StaticTokens {
    fn authenticate(&self, token: &str) -> Option<CurrentUser> {
        self.users.get(token).cloned()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor that only succeeds for an admin; anything else is a 401.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        match state.authenticate(token) {
            Some(user) if user.is_admin => Ok(AdminUser(user)),
            Some(user) => {
                tracing::debug!(username = %user.username, "rejected non-admin mutation");
                Err(ApiError::Unauthorized)
            }
            None => Err(ApiError::Unauthorized),
        }
    }
}
