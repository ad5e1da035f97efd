//! Comment tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `name:value` annotation found inside an inline comment.
///
/// A tag written as `name:` with nothing after the colon has no value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, everything before the colon.
    pub name: String,
    /// Tag value, trimmed; `None` when empty.
    pub value: Option<String>,
}

impl Tag {
    /// Create a tag without a value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Create a tag with a value.
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {value}", self.name),
            None => write!(f, "{}:", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::new("trip").to_string(), "trip:");
        assert_eq!(Tag::with_value("trip", "japan").to_string(), "trip: japan");
    }
}
