use std::fmt::{self, Display};

use thiserror::Error;

/// Error type for invalid qualified names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQualifiedNameError {
    #[error("Qualified name cannot be empty")]
    Empty,

    #[error("Qualified name contains an empty segment")]
    EmptySegment,

    #[error("Name segment cannot start with a digit: '{0}'")]
    SegmentStartsWithDigit(String),

    #[error("Qualified name contains invalid character: '{0}'")]
    InvalidCharacter(char),
}

/// A QualifiedName is a validated dotted path of JavaScript identifiers,
/// e.g. `Foo`, `ns.FooBase` or `Foo.prototype.bar`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    value: String,
}

impl QualifiedName {
    /// Create a new QualifiedName from a string, validating it
    pub fn new(name: &str) -> Result<Self, InvalidQualifiedNameError> {
        Self::validate(name)?;
        Ok(QualifiedName {
            value: name.to_string(),
        })
    }

    fn validate(name: &str) -> Result<(), InvalidQualifiedNameError> {
        if name.is_empty() {
            return Err(InvalidQualifiedNameError::Empty);
        }

        for segment in name.split('.') {
            Self::validate_segment(segment)?;
        }

        Ok(())
    }

    /// Validate a single identifier segment (no dots)
    pub fn validate_segment(segment: &str) -> Result<(), InvalidQualifiedNameError> {
        let mut chars = segment.chars();
        let Some(first_char) = chars.next() else {
            return Err(InvalidQualifiedNameError::EmptySegment);
        };

        if first_char.is_ascii_digit() {
            return Err(InvalidQualifiedNameError::SegmentStartsWithDigit(
                segment.to_string(),
            ));
        }

        for c in std::iter::once(first_char).chain(chars) {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '$') {
                return Err(InvalidQualifiedNameError::InvalidCharacter(c));
            }
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.value.split('.')
    }

    /// Append a property segment, e.g. `Foo` + `prototype` = `Foo.prototype`
    pub fn child(&self, segment: &str) -> Result<QualifiedName, InvalidQualifiedNameError> {
        Self::validate_segment(segment)?;
        Ok(QualifiedName {
            value: format!("{}.{}", self.value, segment),
        })
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
