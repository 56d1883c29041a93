use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Administrative roles, most senior first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    StateAdmin,
    DistrictAdmin,
    BlockAdmin,
    User,
}

impl Role {
    /// All roles ordered from most to least senior.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::StateAdmin,
        Role::DistrictAdmin,
        Role::BlockAdmin,
        Role::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::StateAdmin => "state_admin",
            Role::DistrictAdmin => "district_admin",
            Role::BlockAdmin => "block_admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(value: &str) -> DomainResult<Self> {
        match value {
            "admin" => Ok(Role::Admin),
            "state_admin" => Ok(Role::StateAdmin),
            "district_admin" => Ok(Role::DistrictAdmin),
            "block_admin" => Ok(Role::BlockAdmin),
            "user" => Ok(Role::User),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_and_differently_cased() {
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(DomainError::InvalidRole(_))
        ));
        assert!(matches!(
            "Admin".parse::<Role>(),
            Err(DomainError::InvalidRole(_))
        ));
        assert!(matches!("".parse::<Role>(), Err(DomainError::InvalidRole(_))));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::DistrictAdmin).unwrap();
        assert_eq!(json, "\"district_admin\"");
    }
}
