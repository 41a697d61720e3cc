//! Error types for the exportable admin.
//!
//! [`AdminError`] covers every failure class the listing and export paths
//! can produce. Handlers decide how each variant reaches the wire: most
//! become JSON error bodies, invalid lookups become a redirect to the
//! unparameterized changelist, and an unusable delimiter makes the export
//! route fall back to the interactive listing.

use thiserror::Error;

/// The primary error type for changelist and export operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The requested model key has no registered admin configuration.
    #[error("model '{0}' is not registered")]
    ModelNotFound(String),

    /// The access policy rejected the request. Export routes carry the
    /// same permission requirement as the changelist, so this variant is
    /// identical for both.
    #[error("permission '{0}' required")]
    PermissionDenied(String),

    /// A query parameter named a field that cannot be filtered on.
    #[error("invalid lookup parameter '{0}'")]
    InvalidLookup(String),

    /// The configured delimiter cannot be written to a single-byte
    /// delimited stream.
    #[error("delimiter {0:?} is not a single-byte character")]
    UnsupportedDelimiter(char),

    /// The changelist source failed to produce the object set.
    #[error("changelist source failed: {0}")]
    Source(String),

    /// Writing the delimited body failed.
    #[error("delimited rendering failed: {0}")]
    Render(#[from] csv::Error),
}
