//! Error types for schema lookup, validation, and the codec.
//!
//! Every failure names the `(type, version)` tag or the field path it is
//! about, so callers can render precise diagnostics without re-parsing.

use std::fmt;

use thiserror::Error;

use super::types::TransactionKind;

/// A single problem found while checking a field bag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field is missing, has the wrong representation, or breaks a
    /// cross-field rule.
    #[error("{field}: {reason}")]
    Field { field: String, reason: String },

    /// A nested variant (data entry, call argument, order) could not be
    /// recognised at all: unknown tag, wrong JSON shape, or nesting too deep.
    #[error("malformed nested variant at {path}: {reason}")]
    MalformedNestedVariant { path: String, reason: String },
}

impl ValidationError {
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn nested(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedNestedVariant {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The field name or nested path this error points at.
    pub fn location(&self) -> &str {
        match self {
            Self::Field { field, .. } => field,
            Self::MalformedNestedVariant { path, .. } => path,
        }
    }
}

/// Aggregated validation failures for one bag, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if any field-level error points exactly at `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|e| matches!(e, ValidationError::Field { field: f, .. } if f == field))
    }

    /// Returns `true` if any error is a malformed nested variant.
    pub fn has_malformed_nested(&self) -> bool {
        self.0
            .iter()
            .any(|e| matches!(e, ValidationError::MalformedNestedVariant { .. }))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Renders a raw type id, naming the kind when it is known.
fn kind_label(type_id: &u8) -> String {
    let type_id = *type_id;
    match TransactionKind::from_type_id(type_id) {
        Some(kind) => format!("{} ({})", kind, type_id),
        None => format!("unknown type {}", type_id),
    }
}

/// Top-level error returned by every public schema operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The `(type, version)` pair is not in the catalog.
    #[error("unknown transaction variant: {} version {version}", kind_label(.type_id))]
    UnknownVariant { type_id: u8, version: u8 },

    /// The bag failed structural validation. Carries every independent
    /// failure found in one pass.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// No authentication rule exists for the `(type, version)` pair.
    #[error("cannot resolve authentication for {} version {version}", kind_label(.type_id))]
    UnresolvedAuthentication { type_id: u8, version: u8 },
}

impl SchemaError {
    pub fn unknown_variant(kind: TransactionKind, version: u8) -> Self {
        Self::UnknownVariant {
            type_id: kind.type_id(),
            version,
        }
    }

    /// Wraps a single validation error.
    pub fn invalid(error: ValidationError) -> Self {
        Self::Invalid(ValidationErrors(vec![error]))
    }

    /// The aggregated validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationError> for SchemaError {
    fn from(error: ValidationError) -> Self {
        Self::invalid(error)
    }
}
