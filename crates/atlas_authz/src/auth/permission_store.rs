use async_trait::async_trait;

use crate::domain::{DomainResult, PermissionRule, Role, SubjectAttributes};

/// Read-only source of permission rules and subject attributes.
///
/// Implementations report every failure (connection, query, malformed row)
/// as an error; callers treat any error as the store being unavailable.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Rules for `role` whose resource is `resource_type` or `"all"`, in
    /// storage order.
    async fn find_rules(&self, role: Role, resource_type: &str) -> DomainResult<Vec<PermissionRule>>;

    /// Attributes for a subject id, or `None` when the id is unknown.
    async fn find_subject_attributes(&self, subject_id: &str) -> DomainResult<Option<SubjectAttributes>>;
}
