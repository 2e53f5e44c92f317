//! Errors that abort a single generation unit.
//!
//! Structural limitations (missing constructors, user overrides) are not
//! errors: they surface as [`crate::Diagnostic`] values next to the
//! generated text. Only conditions that leave a unit without a usable plan
//! end up here, and the driver turns them into diagnostics so sibling units
//! keep generating.

use thiserror::Error;

/// Errors raised while planning or synthesising one builder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// A configuration option resolved to a value the generator cannot use.
    #[error("invalid configuration for '{key}': {message}")]
    InvalidConfiguration {
        /// Option that failed validation.
        key: String,
        /// Human-readable explanation.
        message: String,
    },

    /// A referenced type has no declaration in the snapshot.
    #[error("type '{name}' is not declared in the compilation")]
    UnresolvedType {
        /// Display name of the missing type.
        name: String,
    },

    /// The generation attribute does not name a target type.
    #[error("builder '{builder}' does not name the type it builds")]
    MissingEntityArgument {
        /// Name of the builder declaration.
        builder: String,
    },

    /// A partial class carries more than one generation attribute. Only the
    /// first one is generated; the others would redeclare its members.
    #[error("builder '{builder}' already generates a builder for '{first}'")]
    DuplicateTarget {
        /// Name of the builder declaration.
        builder: String,
        /// Type named by the first generation attribute.
        first: String,
    },

    /// The semantic snapshot could not be read or written.
    #[error("malformed semantic snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),
}

impl GenerationError {
    /// Shorthand for [`GenerationError::InvalidConfiguration`].
    #[must_use]
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the generator.
pub type GenerationResult<T> = Result<T, GenerationError>;
