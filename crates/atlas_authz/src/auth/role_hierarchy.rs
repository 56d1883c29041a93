use crate::domain::{DomainResult, Role};

/// Static seniority ranking over roles.
///
/// The chain is linear, so a rank table indexed by the enum discriminant is
/// enough: 0 is the most senior.
pub struct RoleHierarchy;

const RANKS: [u8; 5] = [0, 1, 2, 3, 4];

impl RoleHierarchy {
    pub const fn rank(role: Role) -> u8 {
        RANKS[role as usize]
    }

    /// Rank of a role given as stored text.
    pub fn rank_of(role: &str) -> DomainResult<u8> {
        Ok(Self::rank(role.parse::<Role>()?))
    }

    /// Whether `actor` is at least as senior as `target`.
    pub const fn can_manage(actor: Role, target: Role) -> bool {
        Self::rank(actor) <= Self::rank(target)
    }

    /// Roles `actor` may manage, most senior first.
    pub fn manageable_by(actor: Role) -> impl Iterator<Item = Role> {
        Role::ALL
            .into_iter()
            .filter(move |target| Self::can_manage(actor, *target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_rank_order() {
        assert_eq!(RoleHierarchy::rank(Role::Admin), 0);
        assert_eq!(RoleHierarchy::rank(Role::StateAdmin), 1);
        assert_eq!(RoleHierarchy::rank(Role::DistrictAdmin), 2);
        assert_eq!(RoleHierarchy::rank(Role::BlockAdmin), 3);
        assert_eq!(RoleHierarchy::rank(Role::User), 4);
    }

    #[test]
    fn test_rank_of_unknown_role() {
        assert_eq!(RoleHierarchy::rank_of("block_admin"), Ok(3));
        assert_eq!(
            RoleHierarchy::rank_of("beneficiary"),
            Err(DomainError::InvalidRole("beneficiary".to_string()))
        );
    }

    #[test]
    fn test_can_manage() {
        assert!(RoleHierarchy::can_manage(Role::Admin, Role::User));
        assert!(RoleHierarchy::can_manage(Role::DistrictAdmin, Role::DistrictAdmin));
        assert!(RoleHierarchy::can_manage(Role::DistrictAdmin, Role::BlockAdmin));
        assert!(!RoleHierarchy::can_manage(Role::BlockAdmin, Role::StateAdmin));
        assert!(!RoleHierarchy::can_manage(Role::User, Role::Admin));
    }

    #[test]
    fn test_manageable_by() {
        let roles: Vec<Role> = RoleHierarchy::manageable_by(Role::DistrictAdmin).collect();
        assert_eq!(roles, vec![Role::DistrictAdmin, Role::BlockAdmin, Role::User]);
    }
}
