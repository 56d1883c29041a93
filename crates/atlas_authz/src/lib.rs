//! Authorization core: role seniority, jurisdiction scoping, rule
//! evaluation and scoped filtering behind [`auth::AuthorizationFacade`].

pub mod auth;
pub mod domain;
pub mod grpc;
pub mod http;
pub mod postgres;
pub mod telemetry;
pub mod validation;

// Re-export mocks when testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use auth::MockPermissionStore;
