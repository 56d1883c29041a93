use std::sync::Arc;
use std::time::Duration;

use garde::Validate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::auth::evaluator::with_deadline;
use crate::auth::{
    accessible_locations, EvaluatorConfig, GeographicScopeMatcher, LocationScope,
    PermissionEvaluator, PermissionStore, RoleHierarchy, ScopeFilter, ScopePolicy,
    DEFAULT_FILTER_BATCH_LIMIT, DEFAULT_STORE_TIMEOUT,
};
use crate::domain::{
    AuthorizationDecision, DomainError, DomainResult, Jurisdiction, Located, PermissionRule, Role,
    Subject,
};
use crate::validation::validate_struct;

/// Knobs for building an [`AuthorizationFacade`].
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationSettings {
    pub store_timeout: Duration,
    pub scope_policy: ScopePolicy,
    pub filter_batch_limit: usize,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            scope_policy: ScopePolicy::default(),
            filter_batch_limit: DEFAULT_FILTER_BATCH_LIMIT,
        }
    }
}

/// What a subject holds, for display to the subject itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessSummary {
    pub role: Role,
    pub jurisdiction: Jurisdiction,
    pub accessible_locations: LocationScope,
    pub rules: Vec<PermissionRule>,
}

#[derive(Debug, Validate)]
struct SubjectLookup {
    #[garde(length(min = 1))]
    subject_id: String,
}

/// Single entry point for authorization decisions and scoped reads.
#[derive(Clone)]
pub struct AuthorizationFacade {
    store: Arc<dyn PermissionStore>,
    evaluator: PermissionEvaluator,
    scope_filter: ScopeFilter,
}

impl AuthorizationFacade {
    pub fn new(store: Arc<dyn PermissionStore>, settings: AuthorizationSettings) -> Self {
        let evaluator = PermissionEvaluator::new(
            store.clone(),
            EvaluatorConfig {
                store_timeout: settings.store_timeout,
            },
        );
        let scope_filter = ScopeFilter::new(
            GeographicScopeMatcher::new(settings.scope_policy),
            settings.filter_batch_limit,
        );

        Self {
            store,
            evaluator,
            scope_filter,
        }
    }

    pub fn with_defaults(store: Arc<dyn PermissionStore>) -> Self {
        Self::new(store, AuthorizationSettings::default())
    }

    pub fn scope_filter(&self) -> &ScopeFilter {
        &self.scope_filter
    }

    pub async fn check_access(
        &self,
        subject: &Subject,
        resource_type: &str,
        action: &str,
    ) -> DomainResult<AuthorizationDecision> {
        self.evaluator.authorize(subject, resource_type, action).await
    }

    /// [`check_access`](Self::check_access) with a caller supplied deadline.
    pub async fn check_access_within(
        &self,
        subject: &Subject,
        resource_type: &str,
        action: &str,
        deadline: Duration,
    ) -> DomainResult<AuthorizationDecision> {
        self.evaluator
            .authorize_within(subject, resource_type, action, deadline)
            .await
    }

    /// Check access and turn a denial into [`DomainError::AccessDenied`].
    #[instrument(skip(self, subject), fields(subject_id = %subject.id, role = %subject.role))]
    pub async fn require_access(
        &self,
        subject: &Subject,
        resource_type: &str,
        action: &str,
    ) -> DomainResult<()> {
        let decision = self.check_access(subject, resource_type, action).await?;
        if decision.allowed {
            return Ok(());
        }

        debug!(reason = %decision.reason, "access denied");
        Err(DomainError::AccessDenied {
            resource_type: resource_type.to_string(),
            action: action.to_string(),
            subject_role: subject.role.as_str().to_string(),
            reason: decision.reason.as_str().to_string(),
        })
    }

    pub fn visible_subset<'a, T: Located>(&self, subject: &Subject, records: &'a [T]) -> Vec<&'a T> {
        self.scope_filter.filter_visible(subject, records)
    }

    /// Lazy form of [`visible_subset`](Self::visible_subset) for paged reads.
    pub fn visible_iter<'s, I>(
        &'s self,
        subject: &'s Subject,
        records: I,
    ) -> impl Iterator<Item = I::Item> + Clone + 's
    where
        I: IntoIterator + 's,
        I::IntoIter: Clone + 's,
        I::Item: Located,
    {
        self.scope_filter.filter_iter(subject, records)
    }

    pub fn can_manage(&self, actor: Role, target: Role) -> bool {
        RoleHierarchy::can_manage(actor, target)
    }

    /// Turn a verified identity into a [`Subject`].
    ///
    /// Unknown or deactivated identities are refused; a stored role that is
    /// not recognised is an [`DomainError::InvalidRole`].
    #[instrument(skip(self))]
    pub async fn resolve_subject(&self, subject_id: &str) -> DomainResult<Subject> {
        validate_struct(&SubjectLookup {
            subject_id: subject_id.to_string(),
        })?;

        let attributes = with_deadline(
            self.evaluator.config().store_timeout,
            "subject lookup",
            self.store.find_subject_attributes(subject_id),
        )
        .await?;

        let attributes =
            attributes.ok_or_else(|| DomainError::SubjectNotFound(subject_id.to_string()))?;
        Subject::from_attributes(subject_id, attributes)
    }

    /// Rules the subject's role holds for `resource_type` and the region it
    /// can see.
    #[instrument(skip(self, subject), fields(subject_id = %subject.id, role = %subject.role))]
    pub async fn access_summary(
        &self,
        subject: &Subject,
        resource_type: &str,
    ) -> DomainResult<AccessSummary> {
        let rules = with_deadline(
            self.evaluator.config().store_timeout,
            "rule lookup",
            self.store.find_rules(subject.role, resource_type),
        )
        .await?;

        Ok(AccessSummary {
            role: subject.role,
            jurisdiction: subject.jurisdiction.clone(),
            accessible_locations: accessible_locations(subject.role, &subject.jurisdiction),
            rules: rules
                .into_iter()
                .filter(|rule| rule.applies_to(subject.role, resource_type))
                .collect(),
        })
    }
}
