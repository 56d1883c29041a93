use serde::{Deserialize, Serialize};

use crate::domain::{DomainResult, Jurisdiction, ResourceLocation, Role};

/// How the administrative tiers treat records with unset location levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePolicy {
    /// When true an empty level on the record is open to state, district and
    /// block admins. When false those admins only see records whose levels
    /// they constrain are filled in. `user` is always strict.
    pub open_unset_levels: bool,
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self {
            open_unset_levels: true,
        }
    }
}

/// The region a role can see, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum LocationScope {
    /// No geographic restriction.
    Global,
    /// Records under this prefix; empty levels are not pinned.
    Within { location: ResourceLocation },
    /// Only records at exactly this location.
    Exactly { location: ResourceLocation },
}

/// Decides whether a record location lies inside a subject's jurisdiction.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicScopeMatcher {
    policy: ScopePolicy,
}

impl GeographicScopeMatcher {
    pub fn new(policy: ScopePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScopePolicy {
        self.policy
    }

    pub fn matches(&self, role: Role, jurisdiction: &Jurisdiction, location: &ResourceLocation) -> bool {
        match role {
            Role::Admin => true,
            Role::StateAdmin => self.state_matches(jurisdiction, location),
            Role::DistrictAdmin => {
                self.state_matches(jurisdiction, location)
                    && self.level_matches(&jurisdiction.district, &location.district)
            }
            Role::BlockAdmin => {
                self.state_matches(jurisdiction, location)
                    && self.level_matches(&jurisdiction.district, &location.district)
                    && self.level_matches(&jurisdiction.block, &location.block)
            }
            Role::User => {
                location.is_complete()
                    && location.state == jurisdiction.state
                    && location.district == jurisdiction.district
                    && location.block == jurisdiction.block
            }
        }
    }

    /// Same as [`matches`](Self::matches) for a role given as stored text.
    pub fn matches_role_str(
        &self,
        role: &str,
        jurisdiction: &Jurisdiction,
        location: &ResourceLocation,
    ) -> DomainResult<bool> {
        Ok(self.matches(role.parse::<Role>()?, jurisdiction, location))
    }

    fn state_matches(&self, jurisdiction: &Jurisdiction, location: &ResourceLocation) -> bool {
        self.level_matches(&jurisdiction.state, &location.state)
    }

    fn level_matches(&self, subject_level: &str, resource_level: &str) -> bool {
        if resource_level.is_empty() {
            return self.policy.open_unset_levels;
        }
        resource_level == subject_level
    }
}

/// Region visible to `role` holding `jurisdiction`.
pub fn accessible_locations(role: Role, jurisdiction: &Jurisdiction) -> LocationScope {
    match role {
        Role::Admin => LocationScope::Global,
        Role::StateAdmin => LocationScope::Within {
            location: ResourceLocation::state(jurisdiction.state.clone()),
        },
        Role::DistrictAdmin => LocationScope::Within {
            location: ResourceLocation::district(
                jurisdiction.state.clone(),
                jurisdiction.district.clone(),
            ),
        },
        Role::BlockAdmin => LocationScope::Within {
            location: jurisdiction.clone(),
        },
        Role::User => LocationScope::Exactly {
            location: jurisdiction.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    fn matcher() -> GeographicScopeMatcher {
        GeographicScopeMatcher::default()
    }

    fn strict() -> GeographicScopeMatcher {
        GeographicScopeMatcher::new(ScopePolicy {
            open_unset_levels: false,
        })
    }

    #[test]
    fn test_admin_matches_everything() {
        let jurisdiction = ResourceLocation::default();
        for location in [
            ResourceLocation::default(),
            ResourceLocation::new("MP", "Balaghat", "Ambegaon"),
            ResourceLocation::state("Odisha"),
        ] {
            assert!(matcher().matches(Role::Admin, &jurisdiction, &location));
            assert!(strict().matches(Role::Admin, &jurisdiction, &location));
        }
    }

    #[test]
    fn test_state_admin_sees_whole_state() {
        let jurisdiction = ResourceLocation::state("Odisha");
        let location = ResourceLocation::new("Odisha", "Mayurbhanj", "Baripada");
        assert!(matcher().matches(Role::StateAdmin, &jurisdiction, &location));

        let elsewhere = ResourceLocation::new("MP", "Balaghat", "");
        assert!(!matcher().matches(Role::StateAdmin, &jurisdiction, &elsewhere));
    }

    #[test]
    fn test_district_admin_other_district() {
        let jurisdiction = ResourceLocation::district("Odisha", "Mayurbhanj");
        let location = ResourceLocation::district("Odisha", "Keonjhar");
        assert!(!matcher().matches(Role::DistrictAdmin, &jurisdiction, &location));
    }

    #[test]
    fn test_district_requires_state_agreement() {
        // Same district name in a different state does not match.
        let jurisdiction = ResourceLocation::district("Odisha", "Balaghat");
        let location = ResourceLocation::district("MP", "Balaghat");
        assert!(!matcher().matches(Role::DistrictAdmin, &jurisdiction, &location));
        assert!(!matcher().matches(Role::BlockAdmin, &jurisdiction, &location));
    }

    #[test]
    fn test_block_admin_levels() {
        let jurisdiction = ResourceLocation::new("Maharashtra", "Pune", "Haveli");
        assert!(matcher().matches(
            Role::BlockAdmin,
            &jurisdiction,
            &ResourceLocation::new("Maharashtra", "Pune", "Haveli")
        ));
        assert!(matcher().matches(
            Role::BlockAdmin,
            &jurisdiction,
            &ResourceLocation::district("Maharashtra", "Pune")
        ));
        assert!(!matcher().matches(
            Role::BlockAdmin,
            &jurisdiction,
            &ResourceLocation::new("Maharashtra", "Pune", "Mulshi")
        ));
    }

    #[test]
    fn test_user_requires_complete_exact_location() {
        let jurisdiction = ResourceLocation::new("MP", "Balaghat", "Ambegaon");
        assert!(!matcher().matches(
            Role::User,
            &jurisdiction,
            &ResourceLocation::new("MP", "Balaghat", "")
        ));
        assert!(matcher().matches(
            Role::User,
            &jurisdiction,
            &ResourceLocation::new("MP", "Balaghat", "Ambegaon")
        ));
    }

    #[test]
    fn test_user_with_incomplete_jurisdiction_sees_nothing() {
        let jurisdiction = ResourceLocation::district("MP", "Balaghat");
        let location = ResourceLocation::district("MP", "Balaghat");
        assert!(!matcher().matches(Role::User, &jurisdiction, &location));
    }

    #[test]
    fn test_unset_location_open_for_admin_tiers_only() {
        let jurisdiction = ResourceLocation::new("MP", "Balaghat", "Ambegaon");
        let unset = ResourceLocation::default();
        assert!(matcher().matches(Role::StateAdmin, &jurisdiction, &unset));
        assert!(matcher().matches(Role::DistrictAdmin, &jurisdiction, &unset));
        assert!(matcher().matches(Role::BlockAdmin, &jurisdiction, &unset));
        assert!(!matcher().matches(Role::User, &jurisdiction, &unset));
    }

    #[test]
    fn test_strict_policy_closes_unset_levels() {
        let jurisdiction = ResourceLocation::district("Odisha", "Mayurbhanj");
        let partial = ResourceLocation::state("Odisha");
        assert!(matcher().matches(Role::DistrictAdmin, &jurisdiction, &partial));
        assert!(!strict().matches(Role::DistrictAdmin, &jurisdiction, &partial));
        assert!(strict().matches(Role::StateAdmin, &jurisdiction, &partial));
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let jurisdiction = ResourceLocation::state("Odisha");
        let location = ResourceLocation::state("odisha");
        assert!(!matcher().matches(Role::StateAdmin, &jurisdiction, &location));
    }

    #[test]
    fn test_matches_role_str_rejects_unknown_role() {
        let jurisdiction = ResourceLocation::default();
        let result = matcher().matches_role_str("root", &jurisdiction, &jurisdiction);
        assert_eq!(result, Err(DomainError::InvalidRole("root".to_string())));
    }

    #[test]
    fn test_accessible_locations() {
        let jurisdiction = ResourceLocation::new("Maharashtra", "Pune", "Haveli");
        assert_eq!(
            accessible_locations(Role::Admin, &jurisdiction),
            LocationScope::Global
        );
        assert_eq!(
            accessible_locations(Role::DistrictAdmin, &jurisdiction),
            LocationScope::Within {
                location: ResourceLocation::district("Maharashtra", "Pune")
            }
        );
        assert_eq!(
            accessible_locations(Role::User, &jurisdiction),
            LocationScope::Exactly {
                location: jurisdiction.clone()
            }
        );
    }
}
