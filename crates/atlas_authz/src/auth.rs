mod cache;
mod evaluator;
mod facade;
mod memory_store;
mod permission_store;
mod rbac_policy;
mod role_hierarchy;
mod scope_filter;
mod scope_matcher;

pub use cache::*;
pub use evaluator::{EvaluatorConfig, PermissionEvaluator, DEFAULT_STORE_TIMEOUT};
pub use facade::*;
pub use memory_store::*;
pub use permission_store::*;
pub use rbac_policy::*;
pub use role_hierarchy::*;
pub use scope_filter::*;
pub use scope_matcher::*;
