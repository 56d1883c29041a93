use crate::domain::{PermissionRule, Role, ALL_RESOURCES};

/// Resource types the base rules refer to.
pub mod resources {
    pub const CLAIMS: &str = "claims";
    pub const STATE_DATA: &str = "state_data";
    pub const DISTRICT_DATA: &str = "district_data";
    pub const BLOCK_DATA: &str = "block_data";
    pub const BASIC_DATA: &str = "basic_data";
}

/// Rule set installed for a fresh deployment.
///
/// Admin holds the wildcard rule; every other tier is granted its own data
/// set plus access to claims. Admin is never gated on these rules, the
/// wildcard row exists so summaries list what admin holds.
pub fn base_rules() -> Vec<PermissionRule> {
    vec![
        PermissionRule::new(
            Role::Admin,
            ALL_RESOURCES,
            ["create", "read", "update", "delete", "manage"],
        ),
        PermissionRule::new(
            Role::StateAdmin,
            resources::STATE_DATA,
            ["create", "read", "update", "delete"],
        ),
        PermissionRule::new(Role::StateAdmin, resources::CLAIMS, ["read", "update"]),
        PermissionRule::new(
            Role::DistrictAdmin,
            resources::DISTRICT_DATA,
            ["create", "read", "update"],
        ),
        PermissionRule::new(Role::DistrictAdmin, resources::CLAIMS, ["read", "update"]),
        PermissionRule::new(
            Role::BlockAdmin,
            resources::BLOCK_DATA,
            ["create", "read", "update"],
        ),
        PermissionRule::new(Role::BlockAdmin, resources::CLAIMS, ["read"]),
        PermissionRule::new(Role::User, resources::BASIC_DATA, ["read"]),
        PermissionRule::new(Role::User, resources::CLAIMS, ["read"]),
    ]
}
