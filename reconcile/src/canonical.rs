//! Predicate canonicalization.
//!
//! The encoded edge tables carry predicates with every `.` removed (dots are
//! not allowed in the parameter names of the embedding pipeline that produced
//! them). To match those edges against the raw store, every raw predicate is
//! mangled the same way and the inverse map mangled → canonical is kept so
//! grounded edges can be written back with their original predicate.
//!
//! Mangling is many-to-one. What happens when two canonical predicates share a
//! mangled form is governed by [`CollisionPolicy`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ReconcileError, Result};
use crate::index::TripleIndex;
use crate::model::RawTriple;

/// Characters stripped from predicates by the encoder.
const MANGLED_CHARS: &[char] = &['.'];

/// Returns the mangled form of `predicate`.
///
/// ```
/// assert_eq!(
///     kg_reconcile::canonical::mangle("http://swrc.ontoware.org/ontology#name"),
///     "http://swrcontowareorg/ontology#name"
/// );
/// ```
#[must_use]
pub fn mangle(predicate: &str) -> String {
    predicate.replace(MANGLED_CHARS, "")
}

/// What to do when two distinct canonical predicates mangle to the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The predicate seen later in the raw source replaces the earlier one.
    /// Every replacement is recorded as a [`RelationCollision`].
    #[default]
    LastWriteWins,
    /// Fail with [`ReconcileError::RelationCollision`].
    Reject,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last-write-wins" => Ok(Self::LastWriteWins),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown collision policy {other:?} (expected last-write-wins or reject)"
            )),
        }
    }
}

/// A mangled key that was remapped to a different canonical predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCollision {
    /// Shared mangled form.
    pub mangled: String,
    /// Canonical predicate that was replaced.
    pub replaced: String,
    /// Canonical predicate now recorded.
    pub canonical: String,
}

/// Inverse map from mangled predicate to canonical predicate.
#[derive(Debug, Default)]
pub struct RelationMapping {
    by_mangled: HashMap<String, String>,
    collisions: Vec<RelationCollision>,
}

impl RelationMapping {
    /// Records `canonical` and returns its mangled form.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::RelationCollision`] when the mangled form is
    /// already mapped to a different predicate and `policy` is
    /// [`CollisionPolicy::Reject`].
    pub fn insert(&mut self, canonical: &str, policy: CollisionPolicy) -> Result<String> {
        let mangled = mangle(canonical);
        match self.by_mangled.get_mut(&mangled) {
            Some(existing) if existing == canonical => {}
            Some(existing) => {
                if policy == CollisionPolicy::Reject {
                    return Err(ReconcileError::RelationCollision {
                        mangled,
                        existing: existing.clone(),
                        incoming: canonical.to_string(),
                    });
                }
                let replaced = std::mem::replace(existing, canonical.to_string());
                tracing::warn!(
                    mangled = %mangled,
                    replaced = %replaced,
                    canonical,
                    "mangled predicate collision, keeping the later predicate"
                );
                self.collisions.push(RelationCollision {
                    mangled: mangled.clone(),
                    replaced,
                    canonical: canonical.to_string(),
                });
            }
            None => {
                self.by_mangled
                    .insert(mangled.clone(), canonical.to_string());
            }
        }
        Ok(mangled)
    }

    /// Canonical predicate for a mangled key.
    #[must_use]
    pub fn canonical(&self, mangled: &str) -> Option<&str> {
        self.by_mangled.get(mangled).map(String::as_str)
    }

    /// Collisions resolved by overwriting, in source order.
    #[must_use]
    pub fn collisions(&self) -> &[RelationCollision] {
        &self.collisions
    }

    /// Number of distinct mangled predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_mangled.len()
    }

    /// Returns true if no predicate has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_mangled.is_empty()
    }
}

/// Builds the [`TripleIndex`] and [`RelationMapping`] from raw statements.
#[derive(Debug, Default)]
pub struct Canonicalizer {
    policy: CollisionPolicy,
    mapping: RelationMapping,
    index: TripleIndex,
    statements: usize,
}

impl Canonicalizer {
    /// Creates an empty canonicalizer with the given collision policy.
    #[must_use]
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Records one raw statement.
    ///
    /// # Errors
    ///
    /// Propagates [`RelationMapping::insert`] errors.
    pub fn observe(&mut self, subject: String, predicate: &str, object: String) -> Result<()> {
        let relation = self.mapping.insert(predicate, self.policy)?;
        self.index.insert(RawTriple {
            subject,
            relation,
            object,
        });
        self.statements += 1;
        Ok(())
    }

    /// Number of statements observed, duplicates included.
    #[must_use]
    pub fn statements(&self) -> usize {
        self.statements
    }

    /// Finishes the raw pass.
    #[must_use]
    pub fn finish(self) -> (TripleIndex, RelationMapping) {
        (self.index, self.mapping)
    }
}
