//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for
//! `template-query`. It uses the `thiserror` library to create a single
//! `Error` enum that covers all anticipated failure modes, providing clear
//! and descriptive error messages.
//!
//! There is no recovery inside the core: every decode or encode failure
//! surfaces to the caller, and a malformed entry fails the whole decode of
//! its containing document. Silently skipping an entry would corrupt
//! round-trip fidelity, so the core never does it. The library also never
//! terminates the process; the CLI binary is responsible for translating
//! errors into exit codes.
//!
//! Most variants carry a `context` string naming the document location that
//! failed (e.g. `Definitions.Source.Beginning`), which is built up by the
//! decoding helpers in [`crate::document`].

use thiserror::Error;

/// Main error type for template descriptor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A dynamic mapping key was the empty string.
    ///
    /// Descriptor documents carry schema-less maps (definition names, build
    /// setting names) whose keys must be non-empty to round-trip.
    #[error("Empty key at {context}: dynamic mapping keys must not be empty")]
    EmptyKey { context: String },

    /// A leaf value was not one of the four primitive kinds
    /// (boolean, integer, float, string).
    #[error("Unrepresentable scalar at {context}: found {found}")]
    UnrepresentableScalar { context: String, found: String },

    /// A build-phase `Class` discriminator did not match any of the six
    /// recognized phase kinds.
    #[error("Unknown build phase kind: {class:?}")]
    UnknownPhaseKind { class: String },

    /// A build-settings configuration key was the empty string.
    #[error("Invalid configuration name at {context}: configuration keys must not be empty")]
    InvalidConfigurationName { context: String },

    /// A Definitions entry was neither a bare string nor an object, so it
    /// matched none of the definition shapes.
    #[error("Malformed definition {name:?}: {message}")]
    MalformedDefinition { name: String, message: String },

    /// A Definitions entry satisfied more than one definition shape at once
    /// (both the container and the asset catalog key sets were present).
    #[error(
        "Ambiguous definition {name:?}: entry matches both the container \
         (Beginning/End) and asset catalog (AssetGeneration/Path) shapes"
    )]
    AmbiguousDefinition { name: String },

    /// A required field for an already-selected variant or phase was missing
    /// or of the wrong primitive kind.
    #[error("Structural mismatch at {context}: expected {expected}, found {found}")]
    StructuralMismatch {
        context: String,
        expected: String,
        found: String,
    },

    /// An error occurred while locating template descriptors on disk.
    #[error("Template discovery error: {message}")]
    Discovery { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing or serialization error, wrapped from `serde_json`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::StructuralMismatch`] with owned parts.
    pub(crate) fn mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::StructuralMismatch {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
