//! Error Types
//!
//! This module defines the error types used throughout the importer.
//!
//! # Overview
//!
//! The main error type [`ImportError`] covers the hard-fail paths of an
//! import:
//! - Node descriptors carrying a type tag the importer does not know
//! - Payloads whose JSON shape cannot be decoded into a typed payload
//! - Document loading (I/O and JSON parsing)
//!
//! Every other missing or unresolvable reference (a node that cannot be found
//! by name, a parent id that never materializes, an extension that is not
//! registered) is a soft skip and never surfaces as an error.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ImportError>`.
//!
//! ```rust,ignore
//! use project_importer::errors::Result;
//!
//! fn import() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for project imports.
#[derive(Error, Debug)]
pub enum ImportError {
    // ========================================================================
    // Reconciliation Errors
    // ========================================================================
    /// A node descriptor carries a payload with an unknown type tag.
    ///
    /// This aborts the whole import; the scene may be left partially mutated.
    #[error("Cannot parse node named '{name}': unrecognized node type '{type_tag}'")]
    UnrecognizedNodeType {
        /// Name of the offending descriptor
        name: String,
        /// The type tag as found in the document
        type_tag: String,
    },

    /// A payload could not be decoded into the entity's typed payload.
    #[error("Invalid {kind} payload for '{name}': {source}")]
    InvalidPayload {
        /// Entity category being decoded (e.g. "light", "material")
        kind: &'static str,
        /// Name of the descriptor that carried the payload
        name: String,
        /// Underlying decoding error
        #[source]
        source: serde_json::Error,
    },

    // ========================================================================
    // Document Loading Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImportError {
    /// Builds a closure mapping a decoding failure to [`ImportError::InvalidPayload`].
    pub(crate) fn payload(
        kind: &'static str,
        name: impl Into<String>,
    ) -> impl FnOnce(serde_json::Error) -> Self {
        let name = name.into();
        move |source| Self::InvalidPayload { kind, name, source }
    }
}

/// Alias for `Result<T, ImportError>`.
pub type Result<T> = std::result::Result<T, ImportError>;
