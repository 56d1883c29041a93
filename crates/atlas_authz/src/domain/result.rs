use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Permission store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Access denied: role {subject_role} may not {action} {resource_type} ({reason})")]
    AccessDenied {
        resource_type: String,
        action: String,
        subject_role: String,
        reason: String,
    },

    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("Subject is deactivated: {0}")]
    SubjectInactive(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Coarse classification used at integration boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Expected business outcome; the subject lacks the capability.
    Denied,
    /// Infrastructure failure reaching the permission store.
    Unavailable,
    /// Misconfiguration or data-integrity failure.
    Internal,
    /// Caller supplied malformed input.
    Invalid,
    /// The identity could not be turned into an active subject.
    Unauthenticated,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::AccessDenied { .. } => ErrorKind::Denied,
            DomainError::StoreUnavailable(_) => ErrorKind::Unavailable,
            DomainError::InvalidRole(_) => ErrorKind::Internal,
            DomainError::ValidationError(_) => ErrorKind::Invalid,
            DomainError::SubjectNotFound(_) | DomainError::SubjectInactive(_) => {
                ErrorKind::Unauthenticated
            }
        }
    }

    /// HTTP status an integration layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Denied => 403,
            ErrorKind::Unavailable => 503,
            ErrorKind::Internal => 500,
            ErrorKind::Invalid => 400,
            ErrorKind::Unauthenticated => 401,
        }
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable(_))
    }
}
