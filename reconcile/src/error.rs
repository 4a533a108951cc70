//! Error taxonomy for dataset reconciliation.
//!
//! Every variant is fatal for the dataset being processed. [`DatasetError`]
//! attaches the dataset name so diagnostics can be traced back to the input
//! that caused them.

use std::path::PathBuf;

use crate::model::Split;

/// Errors raised while reconciling one dataset.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The raw N-Triples source is malformed.
    #[error("malformed N-Triples in {origin}: {message}")]
    Parse {
        /// File path, or `<memory>` for in-memory sources.
        origin: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An encoded edge references an entity ID absent from the entity-ID table.
    #[error("split {split}: unknown entity id {id}")]
    UnknownEntityId {
        /// Split whose edge referenced the ID.
        split: Split,
        /// The unresolved ID.
        id: u64,
    },

    /// The merged entity set and the merged type map disagree.
    #[error(
        "type coverage mismatch: {} entities without a type, {} typed entities never used (first: {})",
        .untyped.len(),
        .unused.len(),
        first_offender(.untyped, .unused)
    )]
    TypeCoverageMismatch {
        /// Entities used by some split that carry no type.
        untyped: Vec<String>,
        /// Entities with a type that no split uses.
        unused: Vec<String>,
    },

    /// Two canonical predicates mangle to the same key under the `reject` policy.
    #[error("predicates <{existing}> and <{incoming}> both mangle to {mangled:?}")]
    RelationCollision {
        /// The shared mangled form.
        mangled: String,
        /// Canonical predicate recorded first.
        existing: String,
        /// Canonical predicate that collided with it.
        incoming: String,
    },

    /// A grounded edge carries a mangled predicate with no canonical form.
    #[error("split {split}: no canonical predicate recorded for {mangled:?}")]
    UnmappedRelation {
        /// Split being reconciled.
        split: Split,
        /// The mangled predicate.
        mangled: String,
    },

    /// Two entity URIs share one integer ID in the entity-ID table.
    #[error("entity id {id} is assigned to both <{first}> and <{second}>")]
    DuplicateEntityId {
        /// The shared ID.
        id: u64,
        /// URI kept first.
        first: String,
        /// URI that reused the ID.
        second: String,
    },

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON input table could not be decoded.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The settings file is invalid.
    #[error("invalid configuration in {}: {message}", .path.display())]
    Config {
        /// Settings file path.
        path: PathBuf,
        /// Diagnostic.
        message: String,
    },
}

impl ReconcileError {
    /// Builds an [`ReconcileError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn first_offender<'a>(untyped: &'a [String], unused: &'a [String]) -> &'a str {
    untyped
        .first()
        .or(unused.first())
        .map_or("-", String::as_str)
}

/// A [`ReconcileError`] tagged with the dataset it aborted.
#[derive(Debug, thiserror::Error)]
#[error("dataset {dataset}: {source}")]
pub struct DatasetError {
    /// Dataset name, as configured.
    pub dataset: String,
    /// The failure.
    #[source]
    pub source: ReconcileError,
}

impl DatasetError {
    /// Tags `source` with `dataset`.
    pub fn new(dataset: impl Into<String>, source: ReconcileError) -> Self {
        Self {
            dataset: dataset.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;
