use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, Jurisdiction, ResourceLocation, Role};

/// Authenticated identity making a request. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub role: Role,
    pub jurisdiction: Jurisdiction,
}

/// Identity attributes as held by the permission store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttributes {
    pub role: String,
    pub is_active: bool,
    pub state: Option<String>,
    pub district: Option<String>,
    pub block: Option<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>, role: Role, jurisdiction: Jurisdiction) -> Self {
        Self {
            id: id.into(),
            role,
            jurisdiction,
        }
    }

    /// Build a subject from stored attributes.
    ///
    /// Inactive identities are refused and the role text must name a known
    /// role; nothing is defaulted.
    pub fn from_attributes(id: impl Into<String>, attributes: SubjectAttributes) -> DomainResult<Self> {
        let id = id.into();
        if !attributes.is_active {
            return Err(DomainError::SubjectInactive(id));
        }

        let role = attributes.role.parse::<Role>()?;
        let jurisdiction = ResourceLocation::from_optional(
            attributes.state,
            attributes.district,
            attributes.block,
        );

        Ok(Self {
            id,
            role,
            jurisdiction,
        })
    }
}
