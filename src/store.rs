//! Rule Store
//!
//! Fetching rules is the data layer's job; this module only decides when to ask
//! for them again. A fetched snapshot is shared behind an [`Arc`] and reused until
//! it is older than the store's time-to-live, so quotes recomputed on every
//! keystroke all read the same rules without refetching them.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{fixtures::FixtureError, rules::RuleSnapshot};

/// Default time a fetched snapshot is considered fresh.
pub const DEFAULT_TTL: SignedDuration = SignedDuration::from_secs(5 * 60);

/// Errors raised while fetching rules.
#[derive(Debug, Error)]
pub enum RuleSourceError {
    /// The rules could not be read from fixture files.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The backing data layer could not be reached.
    #[error("rule source unavailable: {0}")]
    Unavailable(String),
}

/// Something that can produce a complete, current [`RuleSnapshot`].
#[automock]
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Fetch all four rule collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be read or are malformed.
    async fn fetch_rules(&self) -> Result<RuleSnapshot, RuleSourceError>;
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    fetched_at: Timestamp,
    rules: Arc<RuleSnapshot>,
}

/// Caches the snapshot produced by a [`RuleSource`] for a fixed time-to-live.
#[derive(Debug)]
pub struct CachedRuleStore<S> {
    source: S,
    ttl: SignedDuration,
    cached: RwLock<Option<CachedSnapshot>>,
}

impl<S: RuleSource> CachedRuleStore<S> {
    /// Wrap `source` with the default time-to-live.
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    /// Wrap `source`, keeping snapshots for `ttl`.
    pub fn with_ttl(source: S, ttl: SignedDuration) -> Self {
        Self {
            source,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// The configured time-to-live.
    pub const fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// The current best-known snapshot as of `now`.
    ///
    /// Returns the cached snapshot while it is fresh and refetches otherwise. When
    /// a refetch fails but an older snapshot exists, the older snapshot is served.
    ///
    /// # Errors
    ///
    /// Returns the source's error when nothing has been fetched yet and the fetch
    /// fails.
    pub async fn snapshot(&self, now: Timestamp) -> Result<Arc<RuleSnapshot>, RuleSourceError> {
        {
            let cached = self.cached.read().await;

            if let Some(current) = self.fresh(cached.as_ref(), now) {
                return Ok(current);
            }
        }

        let mut cached = self.cached.write().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(current) = self.fresh(cached.as_ref(), now) {
            return Ok(current);
        }

        match self.source.fetch_rules().await {
            Ok(rules) => {
                debug!(%now, "fetched pricing rules");

                let rules = Arc::new(rules);

                *cached = Some(CachedSnapshot {
                    fetched_at: now,
                    rules: Arc::clone(&rules),
                });

                Ok(rules)
            }
            Err(error) => match cached.as_ref() {
                Some(stale) => {
                    warn!(
                        %error,
                        fetched_at = %stale.fetched_at,
                        "failed to refresh pricing rules, serving stale snapshot"
                    );

                    Ok(Arc::clone(&stale.rules))
                }
                None => Err(error),
            },
        }
    }

    /// Drop the cached snapshot so the next call refetches.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    fn fresh(
        &self,
        cached: Option<&CachedSnapshot>,
        now: Timestamp,
    ) -> Option<Arc<RuleSnapshot>> {
        cached
            .filter(|cached| {
                let elapsed = now.duration_since(cached.fetched_at);

                // A clock that moved backwards makes the age unknown.
                !elapsed.is_negative() && elapsed < self.ttl
            })
            .map(|cached| Arc::clone(&cached.rules))
    }
}
