//! Core data model: splits, encoded edges, and triples.
//!
//! Triples own their terms as `String`s. Every dataset is held in memory for
//! the duration of one run and dropped afterwards.

use std::fmt;

use serde::de::IgnoredAny;
use serde::Deserialize;

/// One of the three disjoint dataset partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Split {
    /// Training edges.
    Train,
    /// Validation edges.
    Validation,
    /// Test edges.
    Test,
}

impl Split {
    /// All splits in merge order: train, validation, test.
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    /// File stem of the encoded edge table (`<stem>_edges.json`).
    #[must_use]
    pub fn source_stem(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "val",
            Split::Test => "test",
        }
    }

    /// File stem of the reconciled triple file (`<stem>.nt`).
    #[must_use]
    pub fn output_stem(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "valid",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_stem())
    }
}

/// A statement of the raw store, with its predicate in mangled form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawTriple {
    /// Subject term.
    pub subject: String,
    /// Predicate with every `.` removed.
    pub relation: String,
    /// Object term.
    pub object: String,
}

/// A triple proven to exist in the raw store, with its canonical predicate.
///
/// Ordering is lexicographic on (subject, relation, object); the triple
/// files are written in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReconciledTriple {
    /// Subject URI.
    pub subject: String,
    /// Canonical predicate URI.
    pub relation: String,
    /// Object URI.
    pub object: String,
}

impl ReconciledTriple {
    /// Renders the triple as one N-Triples line, without the trailing newline.
    ///
    /// Every term of the encoded edge source is an entity, so all three are
    /// written as IRIs.
    #[must_use]
    pub fn to_ntriples(&self) -> String {
        format!("<{}> <{}> <{}> .", self.subject, self.relation, self.object)
    }
}

/// One edge of a per-split encoded table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireEdge")]
pub struct EncodedEdge {
    /// Integer ID of the subject entity.
    pub subject_id: u64,
    /// Type label of the subject.
    pub subject_type: String,
    /// Predicate in mangled form.
    pub relation: String,
    /// Type label of the object.
    pub object_type: String,
    /// Integer ID of the object entity.
    pub object_id: u64,
}

impl EncodedEdge {
    /// Convenience constructor, mostly for fixtures.
    pub fn new(
        subject_id: u64,
        subject_type: impl Into<String>,
        relation: impl Into<String>,
        object_type: impl Into<String>,
        object_id: u64,
    ) -> Self {
        Self {
            subject_id,
            subject_type: subject_type.into(),
            relation: relation.into(),
            object_type: object_type.into(),
            object_id,
        }
    }
}

/// `[[chain, [subject_id, [subject_type, relation, object_type], object_id]], aux, aux]`
///
/// The query chain and both auxiliary labels are not used by reconciliation.
#[derive(Deserialize)]
struct WireEdge(
    (IgnoredAny, (u64, (String, String, String), u64)),
    IgnoredAny,
    IgnoredAny,
);

impl From<WireEdge> for EncodedEdge {
    fn from(wire: WireEdge) -> Self {
        let WireEdge((_chain, (subject_id, (subject_type, relation, object_type), object_id)), _, _) =
            wire;
        Self {
            subject_id,
            subject_type,
            relation,
            object_type,
            object_id,
        }
    }
}
