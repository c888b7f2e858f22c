//! Delegated access tokens
//!
//! Every authenticated call asks a [`TokenProvider`] for a token scoped to
//! the backend API and acting for the current [`Principal`]. Tokens are
//! passed by value into the pipeline and never stored by resource clients.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tailspin_domain::split_scopes;

use super::context::Principal;
use super::errors::ApiError;

/// Ordered, de-duplicated set of OAuth scopes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeSet(BTreeSet<String>);

impl ScopeSet {
    /// Parse a semicolon-delimited scope string
    ///
    /// Whitespace around each scope is trimmed and empty entries are dropped.
    pub fn parse(raw: &str) -> Self {
        split_scopes(raw).collect()
    }

    /// Whether no scope was given
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct scopes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `scope` is in the set
    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    /// Scopes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ScopeSet {
    /// Space-separated, the form token issuers expect
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(" "))
    }
}

/// Bearer token bound to a scope set and an expiry
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    scopes: ScopeSet,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token with an absolute expiry
    pub fn new(secret: impl Into<String>, scopes: ScopeSet, expires_at: DateTime<Utc>) -> Self {
        Self { secret: secret.into(), scopes, expires_at }
    }

    /// Token valid for `lifetime` from now
    pub fn expiring_in(secret: impl Into<String>, scopes: ScopeSet, lifetime: Duration) -> Self {
        let lifetime = chrono::Duration::from_std(lifetime).unwrap_or(chrono::Duration::MAX);
        let expires_at =
            Utc::now().checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(secret, scopes, expires_at)
    }

    /// The raw bearer value
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Scopes the token was issued for
    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// Absolute expiry reported by the issuer
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check if the token is expired or will expire within the given
    /// threshold
    ///
    /// A threshold too large to represent counts as already expired.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: u64) -> bool {
        i64::try_from(threshold_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|threshold| Utc::now().checked_add_signed(threshold))
            .map_or(true, |deadline| deadline >= self.expires_at)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Trait for acquiring delegated access tokens
///
/// Called once per outbound request. Implementations may cache, but must
/// never hand out an expired token. Failures (no session, missing consent,
/// unreachable issuer) are reported as [`ApiError::TokenAcquisition`].
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Token for `principal` covering `scopes`
    ///
    /// # Errors
    /// Returns [`ApiError::TokenAcquisition`] when no token can be obtained.
    async fn acquire_token(
        &self,
        scopes: &ScopeSet,
        principal: &Principal,
    ) -> Result<AccessToken, ApiError>;
}

/// Client for the external token issuer
///
/// Each call performs a fresh exchange; caching is layered on top by
/// [`CachingTokenProvider`](super::token_cache::CachingTokenProvider).
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Exchange the principal's session for a new token
    ///
    /// # Errors
    /// Returns [`ApiError::TokenAcquisition`] when the issuer refuses or
    /// cannot be reached.
    async fn issue_token(
        &self,
        scopes: &ScopeSet,
        principal: &Principal,
    ) -> Result<AccessToken, ApiError>;
}

/// Provider returning one fixed credential regardless of principal
///
/// Suitable for client-credential style calls and tests.
#[derive(Clone)]
pub struct StaticTokenProvider {
    secret: String,
    lifetime: Duration,
}

impl StaticTokenProvider {
    /// Provider handing out `secret` with a one hour lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into(), lifetime: Duration::from_secs(3600) }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn acquire_token(
        &self,
        scopes: &ScopeSet,
        _principal: &Principal,
    ) -> Result<AccessToken, ApiError> {
        Ok(AccessToken::expiring_in(self.secret.clone(), scopes.clone(), self.lifetime))
    }
}
