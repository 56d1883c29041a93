use tonic::Status;

use crate::domain::DomainError;

/// Convert domain error to gRPC Status
pub fn domain_error_to_status(error: DomainError) -> Status {
    match error {
        DomainError::AccessDenied { .. } => Status::permission_denied(error.to_string()),

        DomainError::StoreUnavailable(msg) => {
            Status::unavailable(format!("Permission store unavailable: {}", msg))
        }

        // A role the core does not know is a deployment problem, not a client error.
        DomainError::InvalidRole(msg) => Status::internal(format!("Invalid role: {}", msg)),

        DomainError::SubjectNotFound(_) => Status::unauthenticated("Subject not found"),

        DomainError::SubjectInactive(_) => Status::unauthenticated("Account is deactivated"),

        DomainError::ValidationError(msg) => Status::invalid_argument(msg),
    }
}
