use serde::{Deserialize, Serialize};

/// Administrative (state, district, block) triple.
///
/// Names are compared exactly as stored; canonicalisation happens at
/// ingestion. An empty field means the level is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLocation {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub block: String,
}

/// A subject's administrative scope uses the same triple as a record location.
pub type Jurisdiction = ResourceLocation;

impl ResourceLocation {
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        block: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            block: block.into(),
        }
    }

    pub fn state(state: impl Into<String>) -> Self {
        Self::new(state, "", "")
    }

    pub fn district(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self::new(state, district, "")
    }

    /// Builds a location from nullable columns, treating NULL as unset.
    pub fn from_optional(
        state: Option<String>,
        district: Option<String>,
        block: Option<String>,
    ) -> Self {
        Self {
            state: state.unwrap_or_default(),
            district: district.unwrap_or_default(),
            block: block.unwrap_or_default(),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.state.is_empty() && self.district.is_empty() && self.block.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.state.is_empty() && !self.district.is_empty() && !self.block.is_empty()
    }
}

/// Anything that carries a location subject to geographic scoping.
pub trait Located {
    fn location(&self) -> &ResourceLocation;
}

impl Located for ResourceLocation {
    fn location(&self) -> &ResourceLocation {
        self
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn location(&self) -> &ResourceLocation {
        (**self).location()
    }
}
