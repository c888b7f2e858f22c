//! Access token caching with moka
//!
//! Wraps a [`TokenIssuer`] so repeated calls for the same principal and
//! scope set reuse a still-valid token instead of round-tripping to the
//! issuer for every request.
//!
//! # Architecture
//!
//! - **Key**: user id + tenant id + scope set
//! - **Expiry**: entries within `refresh_threshold` of expiry count as a miss
//!   and are evicted before re-issuing
//! - **Coalescing**: concurrent misses for one key share a single issuer call
//! - **Errors**: issuer failures are never cached

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tailspin_domain::TokenCacheConfig;
use tracing::{debug, info, warn};

use super::auth::{AccessToken, ScopeSet, TokenIssuer, TokenProvider};
use super::context::Principal;
use super::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TokenCacheKey {
    user_id: String,
    tenant_id: Option<String>,
    scopes: ScopeSet,
}

impl TokenCacheKey {
    fn new(principal: &Principal, scopes: &ScopeSet) -> Self {
        Self {
            user_id: principal.user_id.clone(),
            tenant_id: principal.tenant_id.clone(),
            scopes: scopes.clone(),
        }
    }
}

/// [`TokenProvider`] that caches issuer responses per principal and scopes
pub struct CachingTokenProvider<I: TokenIssuer> {
    issuer: Arc<I>,
    cache: Cache<TokenCacheKey, AccessToken>,
    refresh_threshold_seconds: u64,
}

impl<I: TokenIssuer> CachingTokenProvider<I> {
    /// Cache in front of an owned issuer
    pub fn new(issuer: I, config: &TokenCacheConfig) -> Self {
        Self::with_shared_issuer(Arc::new(issuer), config)
    }

    /// Cache in front of an issuer shared with other callers
    pub fn with_shared_issuer(issuer: Arc<I>, config: &TokenCacheConfig) -> Self {
        info!(
            max_capacity = config.max_capacity,
            ttl_seconds = config.ttl_secs,
            refresh_threshold_seconds = config.refresh_threshold_secs,
            "Token cache configuration loaded"
        );

        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .support_invalidation_closures()
            .build();

        Self { issuer, cache, refresh_threshold_seconds: config.refresh_threshold_secs }
    }

    /// Drop every cached token for the principal (e.g. on sign-out)
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the cache was built without
    /// invalidation support.
    pub fn invalidate_principal(&self, principal: &Principal) -> Result<(), ApiError> {
        let user_id = principal.user_id.clone();
        let tenant_id = principal.tenant_id.clone();
        self.cache
            .invalidate_entries_if(move |key, _| {
                key.user_id == user_id && key.tenant_id == tenant_id
            })
            .map(|_| ())
            .map_err(|e| ApiError::Config(format!("Token cache invalidation unsupported: {e}")))
    }

    /// Number of cached tokens (approximate until pending tasks run)
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<I: TokenIssuer + 'static> TokenProvider for CachingTokenProvider<I> {
    async fn acquire_token(
        &self,
        scopes: &ScopeSet,
        principal: &Principal,
    ) -> Result<AccessToken, ApiError> {
        let key = TokenCacheKey::new(principal, scopes);

        if let Some(token) = self.cache.get(&key).await {
            if !token.is_expired(self.refresh_threshold_seconds) && !token.is_expired(0) {
                debug!(user_id = %principal.user_id, "Access token served from cache");
                return Ok(token);
            }
            debug!(user_id = %principal.user_id, "Cached access token near expiry, re-issuing");
            self.cache.invalidate(&key).await;
        }

        let issuer = Arc::clone(&self.issuer);
        let principal_for_issue = principal.clone();
        let scopes_for_issue = scopes.clone();

        let token = self
            .cache
            .try_get_with(key, async move {
                let token = issuer.issue_token(&scopes_for_issue, &principal_for_issue).await?;
                if token.is_expired(0) {
                    return Err(ApiError::TokenAcquisition(
                        "token issuer returned an expired token".to_string(),
                    ));
                }
                Ok::<_, ApiError>(token)
            })
            .await
            .map_err(|err: Arc<ApiError>| {
                warn!(user_id = %principal.user_id, error = %err, "Token acquisition failed");
                match err.as_ref() {
                    ApiError::TokenAcquisition(message) => {
                        ApiError::TokenAcquisition(message.clone())
                    }
                    ApiError::Cancelled => ApiError::Cancelled,
                    other => ApiError::TokenAcquisition(other.to_string()),
                }
            })?;

        // A coalesced waiter may receive a token issued with a lower threshold.
        if token.is_expired(0) {
            return Err(ApiError::TokenAcquisition("cached token expired".to_string()));
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingIssuer {
        calls: AtomicUsize,
        lifetime: Duration,
    }

    impl CountingIssuer {
        fn new(lifetime: Duration) -> Self {
            Self { calls: AtomicUsize::new(0), lifetime }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenIssuer for CountingIssuer {
        async fn issue_token(
            &self,
            scopes: &ScopeSet,
            principal: &Principal,
        ) -> Result<AccessToken, ApiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AccessToken::expiring_in(
                format!("{}-{}", principal.user_id, n),
                scopes.clone(),
                self.lifetime,
            ))
        }
    }

    struct FailingIssuer;

    #[async_trait]
    impl TokenIssuer for FailingIssuer {
        async fn issue_token(
            &self,
            _scopes: &ScopeSet,
            _principal: &Principal,
        ) -> Result<AccessToken, ApiError> {
            Err(ApiError::TokenAcquisition("consent required".to_string()))
        }
    }

    fn config() -> TokenCacheConfig {
        TokenCacheConfig { max_capacity: 100, ttl_secs: 3600, refresh_threshold_secs: 300 }
    }

    #[tokio::test]
    async fn test_reuses_token_for_same_principal_and_scopes() {
        let issuer = Arc::new(CountingIssuer::new(Duration::from_secs(3600)));
        let provider = CachingTokenProvider::with_shared_issuer(Arc::clone(&issuer), &config());
        let scopes = ScopeSet::parse("surveys");
        let principal = Principal::new("alice");

        let first = provider.acquire_token(&scopes, &principal).await.unwrap();
        let second = provider.acquire_token(&scopes, &principal).await.unwrap();

        assert_eq!(first.secret(), second.secret());
        assert_eq!(issuer.calls(), 1);
    }

    #[tokio::test]
    async fn test_separates_principals_and_scopes() {
        let issuer = Arc::new(CountingIssuer::new(Duration::from_secs(3600)));
        let provider = CachingTokenProvider::with_shared_issuer(Arc::clone(&issuer), &config());

        provider.acquire_token(&ScopeSet::parse("a"), &Principal::new("alice")).await.unwrap();
        provider.acquire_token(&ScopeSet::parse("a"), &Principal::new("bob")).await.unwrap();
        provider.acquire_token(&ScopeSet::parse("b"), &Principal::new("alice")).await.unwrap();

        assert_eq!(issuer.calls(), 3);
    }

    #[tokio::test]
    async fn test_near_expiry_token_is_reissued() {
        // Lifetime below the refresh threshold: every cached hit is stale.
        let issuer = Arc::new(CountingIssuer::new(Duration::from_secs(60)));
        let provider = CachingTokenProvider::with_shared_issuer(Arc::clone(&issuer), &config());
        let scopes = ScopeSet::parse("surveys");
        let principal = Principal::new("alice");

        let first = provider.acquire_token(&scopes, &principal).await.unwrap();
        let second = provider.acquire_token(&scopes, &principal).await.unwrap();

        assert_ne!(first.secret(), second.secret());
        assert_eq!(issuer.calls(), 2);
        assert!(!second.is_expired(0));
    }

    #[tokio::test]
    async fn test_expired_issuer_token_is_rejected() {
        let issuer = CountingIssuer::new(Duration::ZERO);
        let provider = CachingTokenProvider::new(issuer, &config());

        let err = provider
            .acquire_token(&ScopeSet::parse("surveys"), &Principal::new("alice"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::TokenAcquisition(_)));
    }

    #[tokio::test]
    async fn test_issuer_failure_is_not_cached() {
        let provider = CachingTokenProvider::new(FailingIssuer, &config());
        let scopes = ScopeSet::parse("surveys");
        let principal = Principal::new("alice");

        let err = provider.acquire_token(&scopes, &principal).await.unwrap_err();
        assert!(matches!(err, ApiError::TokenAcquisition(msg) if msg == "consent required"));
        provider.cache.run_pending_tasks().await;
        assert_eq!(provider.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_cached_token_past_expiry_is_never_served() {
        let issuer = Arc::new(CountingIssuer::new(Duration::from_secs(1)));
        let config = TokenCacheConfig { refresh_threshold_secs: 0, ..config() };
        let provider = CachingTokenProvider::with_shared_issuer(Arc::clone(&issuer), &config);
        let scopes = ScopeSet::parse("surveys");
        let principal = Principal::new("alice");

        let first = provider.acquire_token(&scopes, &principal).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(first.is_expired(0));

        let second = provider.acquire_token(&scopes, &principal).await.unwrap();

        assert_ne!(first.secret(), second.secret());
        assert!(!second.is_expired(0));
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn test_unrepresentable_threshold_reissues_without_panicking() {
        let issuer = Arc::new(CountingIssuer::new(Duration::from_secs(3600)));
        let config = TokenCacheConfig { refresh_threshold_secs: u64::MAX, ..config() };
        let provider = CachingTokenProvider::with_shared_issuer(Arc::clone(&issuer), &config);
        let scopes = ScopeSet::parse("surveys");
        let principal = Principal::new("alice");

        let first = provider.acquire_token(&scopes, &principal).await.unwrap();
        let second = provider.acquire_token(&scopes, &principal).await.unwrap();

        assert!(!first.is_expired(0));
        assert!(!second.is_expired(0));
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_principal_forces_reissue() {
        let issuer = Arc::new(CountingIssuer::new(Duration::from_secs(3600)));
        let provider = CachingTokenProvider::with_shared_issuer(Arc::clone(&issuer), &config());
        let scopes = ScopeSet::parse("surveys");
        let principal = Principal::new("alice");

        provider.acquire_token(&scopes, &principal).await.unwrap();
        provider.invalidate_principal(&principal).unwrap();
        provider.cache.run_pending_tasks().await;
        provider.acquire_token(&scopes, &principal).await.unwrap();

        assert_eq!(issuer.calls(), 2);
    }
}
