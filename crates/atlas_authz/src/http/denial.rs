use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPermission {
    pub resource: String,
    pub action: String,
}

/// Body an HTTP layer returns alongside a 403.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDeniedBody {
    pub error: String,
    pub required: RequiredPermission,
    #[serde(rename = "userRole")]
    pub user_role: String,
}

impl AccessDeniedBody {
    /// Body for an [`DomainError::AccessDenied`]; `None` for any other error.
    pub fn from_error(error: &DomainError) -> Option<Self> {
        match error {
            DomainError::AccessDenied {
                resource_type,
                action,
                subject_role,
                ..
            } => Some(Self {
                error: "Insufficient permissions".to_string(),
                required: RequiredPermission {
                    resource: resource_type.clone(),
                    action: action.clone(),
                },
                user_role: subject_role.clone(),
            }),
            _ => None,
        }
    }
}
