//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The value contains a character that cannot be stored in a day file.
    #[error("{field} cannot contain {character:?}")]
    ForbiddenCharacter {
        field: &'static str,
        character: char,
    },
}

/// A validated category name.
///
/// Category names are stored in the third field of the `|`-separated day file
/// format, so they must be non-empty and cannot contain `|` or line breaks.
/// Priorities are not part of the category; they are looked up through a
/// [`PriorityProvider`](crate::PriorityProvider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Creates a new category after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "category" });
        }
        if let Some(character) = name.chars().find(|c| matches!(c, '|' | '\n' | '\r')) {
            return Err(ValidationError::ForbiddenCharacter {
                field: "category",
                character,
            });
        }
        Ok(Self(name))
    }

    /// Returns the category name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Category {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Category {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks that an event name can be written as the last field of a day file line.
pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    match name.chars().find(|c| matches!(c, '\n' | '\r')) {
        Some(character) => Err(ValidationError::ForbiddenCharacter {
            field: "event name",
            character,
        }),
        None => Ok(()),
    }
}
