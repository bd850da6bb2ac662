//! Structured diagnostics.
//!
//! Data errors in a schema are values attached to the graph, never thrown.
//! Everything in this module is cheap to clone and safe to hold across
//! threads once the model is frozen.

use serde::Serialize;
use std::fmt::{self, Display};
use std::sync::Arc;
use thiserror::Error;

/// Stable diagnostic codes. The numeric value is part of the output contract
/// and must not be reassigned between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ErrorCode {
    AlreadyDefined = 100,
    BadAmbiguousElementBinding = 101,

    BadUnresolvedType = 200,
    BadUnresolvedTerm = 201,
    BadUnresolvedOperation = 202,
    BadUnresolvedEntityContainer = 203,
    BadUnresolvedEntitySet = 204,

    BadCyclicEntityType = 210,
    BadCyclicComplexType = 211,
    BadCyclicEntitySet = 212,

    KeyMissingOnEntityType = 300,
    InvalidKeyPropertyRef = 301,
    KeyPropertyMustBeNonNullable = 302,
    DuplicatePropertyName = 303,
    DuplicateEnumMemberName = 304,
    DuplicateContainerMemberName = 305,
    InvalidBaseTypeKind = 306,
    OperationImportUnresolvedOperation = 307,
    NavigationBindingUnresolvedTarget = 308,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Optional source position carried over from the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub document: Option<Arc<str>>,
    pub line: u32,
    pub column: u32,
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(doc) => write!(f, "{doc}:{}:{}", self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// A single diagnostic: where, what, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{code}: {message}")]
pub struct EdmError {
    pub location: Option<Location>,
    pub code: ErrorCode,
    pub message: String,
}

impl EdmError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            location: None,
            code,
            message: message.into(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::AlreadyDefined.code(), 100);
        assert_eq!(ErrorCode::BadUnresolvedType.code(), 200);
        assert_eq!(ErrorCode::KeyMissingOnEntityType.code(), 300);
    }

    #[test]
    fn test_diagnostics_serialize_to_json() {
        let err = EdmError::new(ErrorCode::BadUnresolvedType, "the type 'NS.Missing' could not be found")
            .with_location(Location {
                document: Some("schema.xml".into()),
                line: 4,
                column: 12,
            });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "BadUnresolvedType");
        assert_eq!(json["message"], "the type 'NS.Missing' could not be found");
        assert_eq!(json["location"]["line"], 4);
    }

    #[test]
    fn test_error_display() {
        let err = EdmError::new(ErrorCode::AlreadyDefined, "the name 'NS.Person' is already defined");
        assert_eq!(
            err.to_string(),
            "AlreadyDefined: the name 'NS.Person' is already defined"
        );
    }
}
