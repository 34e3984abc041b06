// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Caching
//!
//! - Keys are indexed by `kid` and cached with a configurable TTL
//! - A `kid` missing from the cache forces a refetch (key rotation), at most
//!   once per minimum refresh interval
//! - Stale cache is used on fetch failure (fail-open for availability)
//! - Fetches are serialized; a failed fetch is not retried until the
//!   minimum refresh interval has passed
//! - The fetch itself is bounded by the HTTP client timeout

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default JWKS fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum spacing between refetches triggered by an unknown `kid`.
const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// JWKS cache entry.
struct CacheEntry {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// When the endpoint was last contacted and how it went.
#[derive(Debug, Clone, Copy)]
struct RefreshAttempt {
    at: Instant,
    failed: bool,
}

/// JWKS manager with caching.
///
/// Fetches and caches the Auth0 tenant's signing keys for JWT verification.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL (`https://{domain}/.well-known/jwks.json`)
    jwks_url: String,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// Held for the duration of a fetch.
    last_attempt: Arc<Mutex<Option<RefreshAttempt>>>,
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a new JWKS manager whose fetches give up after `timeout`.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::JwksFetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: Arc::new(RwLock::new(None)),
            last_attempt: Arc::new(Mutex::new(None)),
            client,
        })
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Get the decoding key for the given key ID.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(found) = self.lookup_cached(kid).await {
            return found;
        }

        let mut last_attempt = self.last_attempt.lock().await;
        // Another request may have refreshed while we waited.
        if let Some(found) = self.lookup_cached(kid).await {
            return found;
        }

        let due = self.is_due(*last_attempt);
        let backing_off = !due && last_attempt.is_some_and(|a| a.failed);
        let refresh_error = if due {
            self.refresh_locked(&mut last_attempt).await.err()
        } else {
            None
        };
        drop(last_attempt);

        let cache = self.cache.read().await;
        let key = cache.as_ref().and_then(|entry| entry.keys.get(kid)).cloned();
        match (key, refresh_error) {
            (Some(key), Some(e)) => {
                tracing::warn!(error = %e, kid = %kid, "JWKS refresh failed, using stale key");
                Ok(key)
            }
            (Some(key), None) => Ok(key),
            (None, Some(e)) => Err(e),
            (None, None) if backing_off => Err(retry_deferred()),
            (None, None) => Err(AuthError::NoMatchingKey),
        }
    }

    /// Answer from the cache when no fetch is warranted.
    ///
    /// `None` means the caller should consider refreshing.
    async fn lookup_cached(&self, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
        let cache = self.cache.read().await;
        let entry = cache.as_ref()?;
        let age = entry.fetched_at.elapsed();
        match entry.keys.get(kid) {
            Some(key) if age < self.cache_ttl => Some(Ok(key.clone())),
            None if age < self.min_refresh_interval => Some(Err(AuthError::NoMatchingKey)),
            _ => None,
        }
    }

    fn is_due(&self, last_attempt: Option<RefreshAttempt>) -> bool {
        last_attempt.is_none_or(|a| a.at.elapsed() >= self.min_refresh_interval)
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let mut last_attempt = self.last_attempt.lock().await;
        self.refresh_locked(&mut last_attempt).await
    }

    /// Refresh unless the endpoint was contacted within the minimum refresh
    /// interval, in which case the outcome of that attempt is reported.
    pub async fn refresh_if_due(&self) -> Result<(), AuthError> {
        let mut last_attempt = self.last_attempt.lock().await;
        let last = *last_attempt;
        if self.is_due(last) {
            return self.refresh_locked(&mut last_attempt).await;
        }
        if last.is_some_and(|a| a.failed) {
            return Err(retry_deferred());
        }
        Ok(())
    }

    async fn refresh_locked(
        &self,
        last_attempt: &mut Option<RefreshAttempt>,
    ) -> Result<(), AuthError> {
        let at = Instant::now();
        let fetched = self.fetch_jwks().await;
        *last_attempt = Some(RefreshAttempt {
            at,
            failed: fetched.is_err(),
        });

        let count = self.install(&fetched?).await;
        tracing::info!(url = %self.jwks_url, keys = count, "Refreshed JWKS");
        Ok(())
    }

    /// Replace the cached key set. Returns the number of usable signing keys.
    pub async fn install(&self, jwks: &JwkSet) -> usize {
        let keys = index_signing_keys(jwks);
        let count = keys.len();
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            keys,
            fetched_at: Instant::now(),
        });
        count
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < self.cache_ttl
        } else {
            false
        }
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetch(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetch(e.to_string()))?;

        Ok(jwks)
    }
}

fn retry_deferred() -> AuthError {
    AuthError::JwksFetch("JWKS endpoint unavailable, retry deferred".to_string())
}

/// Index the signature keys of a set by `kid`, skipping keys we cannot use.
fn index_signing_keys(jwks: &JwkSet) -> HashMap<String, DecodingKey> {
    jwks.keys
        .iter()
        .filter(|jwk| !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)))
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => Some((kid, key)),
                Err(e) => {
                    tracing::debug!(kid = %kid, error = %e, "Skipping unusable JWK");
                    None
                }
            }
        })
        .collect()
}
