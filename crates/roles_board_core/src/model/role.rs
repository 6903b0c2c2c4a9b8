//! Role domain model.
//!
//! # Responsibility
//! - Define the single board entity and its stable identifier.
//! - Enforce name rules for create/rename paths.
//! - Provide first-run seed data.
//!
//! # Invariants
//! - `id` is generated once and never changes for the role lifetime.
//! - Names accepted through `normalize_name` are trimmed and non-empty.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ROLE_ID_PREFIX: &str = "r_";

/// Opaque, stable handle for one role.
///
/// Imported documents may carry arbitrary id strings, so this is not
/// restricted to the generated `r_<hex>` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Generates a fresh id (`r_` + 32 hex chars from a random v4 uuid).
    pub fn generate() -> Self {
        Self(format!("{ROLE_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RoleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Input validation failures for role fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    UnknownCategory(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "role name must not be empty"),
            Self::UnknownCategory(value) => write!(
                f,
                "unknown category `{value}`; expected Past|Present|Future|TBD"
            ),
        }
    }
}

impl Error for ValidationError {}

/// One board item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub category: Category,
    /// Display-only flag; carries no meaning for the engine.
    pub checked: bool,
}

impl Role {
    /// Creates an unchecked role with a generated id.
    ///
    /// # Errors
    /// - `ValidationError::EmptyName` when `name` is blank after trimming.
    pub fn new(name: &str, category: Category) -> Result<Self, ValidationError> {
        Ok(Self {
            id: RoleId::generate(),
            name: normalize_name(name)?,
            category,
            checked: false,
        })
    }
}

/// Trims a user-entered name and rejects blank input.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Example roles written on first run, in board order.
pub fn seed_roles() -> Vec<Role> {
    [
        ("Team Lead", Category::Present, false),
        ("Product Owner", Category::Past, true),
        ("AI Strategist", Category::Future, false),
        ("Security Reviewer", Category::Tbd, false),
    ]
    .into_iter()
    .map(|(name, category, checked)| Role {
        id: RoleId::generate(),
        name: name.to_string(),
        category,
        checked,
    })
    .collect()
}
