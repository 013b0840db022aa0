//! Error types shared by the workflow state machines.
//!
//! Every failure is recoverable: the caller shows it next to the offending
//! field (or as a banner) and lets the user resubmit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::panel::PanelError;

/// Key under which errors without a field of their own are collected.
pub const GENERAL: &str = "general";

/// Field name to message map, rendered inline next to the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map holding a single `general` message.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(GENERAL, message);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Merges `other` wholesale, later messages replacing earlier ones.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `Ok(())` when no error was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A wire name that does not belong to the expected enum.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// The three ways a backend call can fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend rejected one or more fields.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The backend answered with an error that is not tied to a field.
    #[error("{0}")]
    General(String),

    /// The backend could not be reached or answered garbage.
    #[error("network error: {0}")]
    Network(String),
}

impl BackendError {
    /// Folds the error into a field map, the shape every form renders.
    #[must_use]
    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            BackendError::Validation(errors) => errors,
            BackendError::General(message) | BackendError::Network(message) => {
                FieldErrors::general(message)
            }
        }
    }
}

/// Errors returned by the workspace operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Client-side checks failed; nothing was sent.
    #[error("invalid input: {0}")]
    Invalid(FieldErrors),

    /// The backend refused or failed the request.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The requested panel transition is not allowed from the current mode.
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// The same action is already waiting for the backend.
    #[error("{0} already in progress")]
    InFlight(&'static str),
}
