//! Category vocabulary and validator.
//!
//! # Responsibility
//! - Define the fixed, ordered set of board categories.
//! - Parse external category labels strictly (intents) or leniently (imports).
//!
//! # Invariants
//! - Exactly four categories exist, in display order Past, Present, Future, TBD.
//! - Wire labels are case-sensitive and match `Category::as_str()`.

use crate::model::role::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lifecycle bucket a role is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Past,
    Present,
    Future,
    /// Serialized as `TBD` to match the board document format.
    #[serde(rename = "TBD")]
    Tbd,
}

impl Category {
    /// All categories in column display order.
    pub const ALL: [Category; 4] = [
        Category::Past,
        Category::Present,
        Category::Future,
        Category::Tbd,
    ];

    /// Returns the wire/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Past => "Past",
            Self::Present => "Present",
            Self::Future => "Future",
            Self::Tbd => "TBD",
        }
    }

    /// Parses an exact category label.
    ///
    /// # Errors
    /// - Returns `ValidationError::UnknownCategory` for any other label.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownCategory(value.to_string()))
    }

    /// Maps an arbitrary label to a legal category, falling back to `TBD`.
    ///
    /// Import and load decode through this, where one bad value must not
    /// reject the whole document.
    pub fn normalize(value: Option<&str>) -> Self {
        value
            .and_then(|label| Self::parse(label).ok())
            .unwrap_or(Self::Tbd)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
