use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use orgspace_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A validated dotted permission name.
///
/// Accepted shapes are the global wildcard `*`, a resource wildcard such as
/// `org.*`, or a concrete `resource.action` pair such as `org.read`. Segments
/// are lowercase ASCII alphanumerics plus `_`. Matching is single-level only;
/// `resource.sub.action` is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionName(String);

/// The global wildcard permission that satisfies every requirement.
pub const GLOBAL_WILDCARD: &str = "*";

impl PermissionName {
    /// Creates a validated permission name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value == GLOBAL_WILDCARD {
            return Ok(Self(value));
        }

        let Some((resource, action)) = value.split_once('.') else {
            return Err(AppError::Validation(format!(
                "permission name '{value}' must be '*', 'resource.*', or 'resource.action'"
            )));
        };

        if !is_valid_segment(resource) {
            return Err(AppError::Validation(format!(
                "permission name '{value}' has an invalid resource segment"
            )));
        }

        if action != "*" && !is_valid_segment(action) {
            return Err(AppError::Validation(format!(
                "permission name '{value}' has an invalid action segment"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying name string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this is the global wildcard `*`.
    #[must_use]
    pub fn is_global_wildcard(&self) -> bool {
        self.0 == GLOBAL_WILDCARD
    }

    /// Returns whether this is a resource wildcard such as `org.*`.
    #[must_use]
    pub fn is_resource_wildcard(&self) -> bool {
        self.0.ends_with(".*")
    }

    /// Returns whether this names one concrete action.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        !self.is_global_wildcard() && !self.is_resource_wildcard()
    }

    /// Returns the resource segment, absent only for the global wildcard.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.0.split_once('.').map(|(resource, _)| resource)
    }

    /// Returns the action segment, absent only for the global wildcard.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, action)| action)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
}

impl Display for PermissionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for PermissionName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionName> for String {
    fn from(value: PermissionName) -> Self {
        value.0
    }
}

impl Borrow<str> for PermissionName {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// An immutable catalog entry decomposing a concrete permission name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Concrete dotted name, the identity of the permission.
    pub name: PermissionName,
    /// Resource segment of the name.
    pub resource: String,
    /// Action segment of the name.
    pub action: String,
    /// Human-readable description.
    pub description: String,
}

impl Permission {
    /// Creates a catalog entry from a concrete permission name.
    pub fn new(name: PermissionName, description: impl Into<String>) -> AppResult<Self> {
        if !name.is_concrete() {
            return Err(AppError::Validation(format!(
                "catalog permission '{name}' must name a concrete resource.action"
            )));
        }

        let resource = name.resource().unwrap_or_default().to_owned();
        let action = name.action().unwrap_or_default().to_owned();

        Ok(Self {
            name,
            resource,
            action,
            description: description.into(),
        })
    }
}
