use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::auth::PermissionStore;
use crate::domain::{DomainResult, PermissionRule, Role, SubjectAttributes};

struct CachedRules {
    fetched_at: Instant,
    rules: Vec<PermissionRule>,
}

#[derive(Default)]
struct Entries {
    /// Bumped by every invalidation; a fetch that straddles a bump is not stored.
    generation: u64,
    rules: HashMap<(Role, String), CachedRules>,
}

/// Rule cache in front of another [`PermissionStore`].
///
/// Entries are stamped when their fetch starts and live for at most `ttl`
/// from then, so a revoked rule stops granting access within that bound even
/// without explicit invalidation. A fetch still in flight when
/// [`invalidate_role`](Self::invalidate_role) or
/// [`invalidate_all`](Self::invalidate_all) runs is returned to its caller but
/// never cached. Errors are never cached and subject attributes always go to
/// the inner store.
pub struct CachedPermissionStore<S> {
    inner: S,
    ttl: Duration,
    entries: RwLock<Entries>,
}

impl<S: PermissionStore> CachedPermissionStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(Entries::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Forget every cached entry for `role`, e.g. after its rules change.
    #[instrument(skip(self))]
    pub async fn invalidate_role(&self, role: Role) {
        let mut entries = self.entries.write().await;
        entries.generation += 1;
        entries.rules.retain(|(cached_role, _), _| *cached_role != role);
    }

    #[instrument(skip(self))]
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        entries.generation += 1;
        entries.rules.clear();
    }

    /// Fresh cached rules for `key`, or the generation a new fetch runs under.
    async fn lookup(&self, key: &(Role, String)) -> Result<Vec<PermissionRule>, u64> {
        let entries = self.entries.read().await;
        match entries.rules.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Ok(entry.rules.clone()),
            _ => Err(entries.generation),
        }
    }
}

#[async_trait]
impl<S: PermissionStore> PermissionStore for CachedPermissionStore<S> {
    #[instrument(skip(self))]
    async fn find_rules(&self, role: Role, resource_type: &str) -> DomainResult<Vec<PermissionRule>> {
        let key = (role, resource_type.to_string());
        let generation = match self.lookup(&key).await {
            Ok(rules) => {
                debug!("permission rules served from cache");
                return Ok(rules);
            }
            Err(generation) => generation,
        };

        let started = Instant::now();
        let rules = self.inner.find_rules(role, resource_type).await?;

        let mut entries = self.entries.write().await;
        if entries.generation != generation {
            debug!("cache invalidated during fetch, not storing");
            return Ok(rules);
        }

        let ttl = self.ttl;
        entries.rules.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        entries.rules.insert(
            key,
            CachedRules {
                fetched_at: started,
                rules: rules.clone(),
            },
        );

        Ok(rules)
    }

    async fn find_subject_attributes(&self, subject_id: &str) -> DomainResult<Option<SubjectAttributes>> {
        self.inner.find_subject_attributes(subject_id).await
    }
}
