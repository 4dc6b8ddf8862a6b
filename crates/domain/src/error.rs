//! Domain error types.

use std::collections::BTreeMap;
use std::fmt;

use entity_store::StoreError;
use thiserror::Error;

/// Errors with a stable code that may be shown to API users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ModelError {
    /// The referenced entity does not exist.
    #[error("resource not found")]
    NotFound,

    /// A bid does not strictly exceed the required floor.
    #[error("bid amount should be higher than highest")]
    LowValue,

    /// Another bid on the same item is being committed.
    #[error("resource is being used")]
    Conflict,

    /// A required value was absent.
    #[error("value cannot be empty")]
    Required,
}

impl ModelError {
    /// Short machine-readable code, e.g. `"not_found"`.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::NotFound => "not_found",
            ModelError::LowValue => "low_value",
            ModelError::Conflict => "conflict",
            ModelError::Required => "required",
        }
    }

    /// Human-readable explanation.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

/// Per-field failures collected by a validation pipeline.
///
/// Field names of nested validations are joined with a dot (`item.name`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    fields: BTreeMap<String, ModelError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregate holding a single failure.
    pub fn single(field: impl Into<String>, error: ModelError) -> Self {
        let mut ve = Self::new();
        ve.insert(field, error);
        ve
    }

    /// Records a failure, replacing any previous one for the same field.
    pub fn insert(&mut self, field: impl Into<String>, error: ModelError) {
        self.fields.insert(field.into(), error);
    }

    /// Merges every entry of `nested` under `prefix.<field>`.
    pub fn merge_nested(&mut self, prefix: &str, nested: ValidationError) {
        for (field, error) in nested.fields {
            self.fields.insert(format!("{prefix}.{field}"), error);
        }
    }

    pub fn get(&self, field: &str) -> Option<ModelError> {
        self.fields.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates failures in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ModelError)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error on fields ")?;
        for (i, field) in self.fields.keys().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl<S: Into<String>> FromIterator<(S, ModelError)> for ValidationError {
    fn from_iter<I: IntoIterator<Item = (S, ModelError)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Errors that can occur during domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A single user-facing failure.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// One or more per-field failures.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A storage failure callers cannot correct.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } | StoreError::NoBids(_) => ModelError::NotFound.into(),
            StoreError::Conflict(_) => ModelError::Conflict.into(),
            other => DomainError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use entity_store::ItemId;

    use super::*;

    #[test]
    fn codes_and_details() {
        assert_eq!(ModelError::NotFound.code(), "not_found");
        assert_eq!(ModelError::LowValue.code(), "low_value");
        assert_eq!(ModelError::Conflict.code(), "conflict");
        assert_eq!(ModelError::Required.code(), "required");
        assert_eq!(ModelError::Conflict.detail(), "resource is being used");
    }

    #[test]
    fn validation_display_lists_fields_in_order() {
        let ve: ValidationError = [("user", ModelError::NotFound), ("item", ModelError::LowValue)]
            .into_iter()
            .collect();
        assert_eq!(ve.to_string(), "validation error on fields item, user");
    }

    #[test]
    fn merge_nested_prefixes_fields() {
        let mut ve = ValidationError::single("bid", ModelError::LowValue);
        ve.merge_nested("item", ValidationError::single("name", ModelError::Required));

        assert_eq!(ve.get("item.name"), Some(ModelError::Required));
        assert_eq!(ve.get("bid"), Some(ModelError::LowValue));
        assert!(!ve.contains("item"));
    }

    #[test]
    fn store_errors_map_to_public_codes() {
        let not_found = StoreError::NotFound {
            entity: "item",
            id: 1,
        };
        assert_eq!(
            DomainError::from(not_found),
            DomainError::Model(ModelError::NotFound)
        );
        assert_eq!(
            DomainError::from(StoreError::NoBids(ItemId::new(1))),
            DomainError::Model(ModelError::NotFound)
        );
        assert_eq!(
            DomainError::from(StoreError::Conflict(ItemId::new(1))),
            DomainError::Model(ModelError::Conflict)
        );

        let backend = StoreError::Backend("disk on fire".into());
        assert_eq!(
            DomainError::from(backend.clone()),
            DomainError::Store(backend)
        );
    }
}
