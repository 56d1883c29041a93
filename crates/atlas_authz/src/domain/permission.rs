use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Resource name that makes a rule apply to every resource type.
pub const ALL_RESOURCES: &str = "all";

/// Grants a role a set of actions on a resource type (or on `"all"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub role: Role,
    pub resource: String,
    pub actions: BTreeSet<String>,
}

impl PermissionRule {
    pub fn new<I, A>(role: Role, resource: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            role,
            resource: resource.into(),
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.resource == ALL_RESOURCES
    }

    /// True when this rule is relevant to `role` acting on `resource_type`.
    pub fn applies_to(&self, role: Role, resource_type: &str) -> bool {
        self.role == role && (self.is_wildcard() || self.resource == resource_type)
    }
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionReason {
    AdminOverride,
    RuleMatched,
    NoMatchingRule,
    ActionNotPermitted,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::AdminOverride => "admin-override",
            DecisionReason::RuleMatched => "rule-matched",
            DecisionReason::NoMatchingRule => "no-matching-rule",
            DecisionReason::ActionNotPermitted => "action-not-permitted",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl AuthorizationDecision {
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
