use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use garde::Validate;
use tracing::{debug, instrument, warn};

use crate::auth::PermissionStore;
use crate::domain::{
    AuthorizationDecision, DecisionReason, DomainError, DomainResult, Subject,
};
use crate::validation::validate_struct;

/// Default deadline for a single permission store lookup.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
pub struct EvaluatorConfig {
    pub store_timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

#[derive(Debug, Validate)]
struct AccessCheck {
    #[garde(length(min = 1))]
    resource_type: String,
    #[garde(length(min = 1))]
    action: String,
}

/// Answers "may this subject do `action` on `resource_type`".
///
/// Stateless apart from the injected store; never caches rules itself.
#[derive(Clone)]
pub struct PermissionEvaluator {
    store: Arc<dyn PermissionStore>,
    config: EvaluatorConfig,
}

impl PermissionEvaluator {
    pub fn new(store: Arc<dyn PermissionStore>, config: EvaluatorConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> EvaluatorConfig {
        self.config
    }

    pub async fn authorize(
        &self,
        subject: &Subject,
        resource_type: &str,
        action: &str,
    ) -> DomainResult<AuthorizationDecision> {
        self.authorize_within(subject, resource_type, action, self.config.store_timeout)
            .await
    }

    /// Evaluate with an explicit deadline on the store lookup.
    ///
    /// A store error or a missed deadline is returned as
    /// [`DomainError::StoreUnavailable`], never as a decision.
    #[instrument(
        skip(self, subject),
        fields(subject_id = %subject.id, role = %subject.role)
    )]
    pub async fn authorize_within(
        &self,
        subject: &Subject,
        resource_type: &str,
        action: &str,
        deadline: Duration,
    ) -> DomainResult<AuthorizationDecision> {
        if subject.role.is_admin() {
            debug!("admin override");
            return Ok(AuthorizationDecision::allow(DecisionReason::AdminOverride));
        }

        validate_struct(&AccessCheck {
            resource_type: resource_type.to_string(),
            action: action.to_string(),
        })?;

        let rules = with_deadline(
            deadline,
            "rule lookup",
            self.store.find_rules(subject.role, resource_type),
        )
        .await?;

        // The store already narrows by role and resource; re-check so an
        // over-broad store can never widen a grant.
        let mut matched = false;
        let mut actions: BTreeSet<&str> = BTreeSet::new();
        for rule in rules
            .iter()
            .filter(|rule| rule.applies_to(subject.role, resource_type))
        {
            matched = true;
            actions.extend(rule.actions.iter().map(String::as_str));
        }

        if !matched {
            debug!("no matching rule");
            return Ok(AuthorizationDecision::deny(DecisionReason::NoMatchingRule));
        }

        if actions.contains(action) {
            Ok(AuthorizationDecision::allow(DecisionReason::RuleMatched))
        } else {
            debug!("action not permitted");
            Ok(AuthorizationDecision::deny(DecisionReason::ActionNotPermitted))
        }
    }
}

/// Run a store lookup under `deadline`, failing closed.
///
/// Store errors and missed deadlines both come back as
/// [`DomainError::StoreUnavailable`] and are logged with
/// `outcome = "store_unavailable"`.
pub(crate) async fn with_deadline<T, F>(
    deadline: Duration,
    operation: &'static str,
    lookup: F,
) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(deadline, lookup).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(outcome = "store_unavailable", operation, error = %e, "permission store lookup failed");
            Err(store_unavailable(e))
        }
        Err(_) => {
            warn!(
                outcome = "store_unavailable",
                operation,
                deadline_ms = deadline.as_millis() as u64,
                "permission store lookup timed out"
            );
            Err(DomainError::StoreUnavailable(format!(
                "{} exceeded {}ms",
                operation,
                deadline.as_millis()
            )))
        }
    }
}

/// Collapse any store failure into `StoreUnavailable`.
pub(crate) fn store_unavailable(error: DomainError) -> DomainError {
    match error {
        DomainError::StoreUnavailable(msg) => DomainError::StoreUnavailable(msg),
        other => DomainError::StoreUnavailable(other.to_string()),
    }
}
