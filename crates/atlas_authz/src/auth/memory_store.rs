use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::auth::{base_rules, PermissionStore};
use crate::domain::{DomainResult, PermissionRule, Role, SubjectAttributes};

#[derive(Default)]
struct Inner {
    rules: Vec<PermissionRule>,
    subjects: HashMap<String, SubjectAttributes>,
}

/// Process-local permission store.
///
/// Rules are returned in insertion order. Clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryPermissionStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<PermissionRule>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                rules,
                subjects: HashMap::new(),
            })),
        }
    }

    pub fn with_base_rules() -> Self {
        Self::with_rules(base_rules())
    }

    pub async fn add_rule(&self, rule: PermissionRule) {
        self.inner.write().await.rules.push(rule);
    }

    /// Drops every rule for `role` on exactly `resource`.
    pub async fn revoke(&self, role: Role, resource: &str) {
        self.inner
            .write()
            .await
            .rules
            .retain(|rule| !(rule.role == role && rule.resource == resource));
    }

    pub async fn upsert_subject(&self, subject_id: impl Into<String>, attributes: SubjectAttributes) {
        self.inner
            .write()
            .await
            .subjects
            .insert(subject_id.into(), attributes);
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    #[instrument(skip(self))]
    async fn find_rules(&self, role: Role, resource_type: &str) -> DomainResult<Vec<PermissionRule>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rules
            .iter()
            .filter(|rule| rule.applies_to(role, resource_type))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_subject_attributes(&self, subject_id: &str) -> DomainResult<Option<SubjectAttributes>> {
        Ok(self.inner.read().await.subjects.get(subject_id).cloned())
    }
}
