//! Membership index over the raw store.

use std::collections::{HashMap, HashSet};

use crate::model::RawTriple;

/// Set of every raw statement, keyed on the mangled predicate.
///
/// Nested as subject → relation → objects so lookups borrow `&str` keys.
/// Built once per dataset by [`Canonicalizer`](crate::canonical::Canonicalizer)
/// and read-only afterwards. The whole raw graph is held in memory.
#[derive(Debug, Default)]
pub struct TripleIndex {
    by_subject: HashMap<String, HashMap<String, HashSet<String>>>,
    len: usize,
}

impl TripleIndex {
    pub(crate) fn insert(&mut self, triple: RawTriple) {
        let RawTriple {
            subject,
            relation,
            object,
        } = triple;
        let inserted = self
            .by_subject
            .entry(subject)
            .or_default()
            .entry(relation)
            .or_default()
            .insert(object);
        if inserted {
            self.len += 1;
        }
    }

    /// Returns true if (subject, relation, object) is a raw statement.
    ///
    /// `relation` is compared verbatim; pass the mangled form.
    #[must_use]
    pub fn contains(&self, subject: &str, relation: &str, object: &str) -> bool {
        self.by_subject
            .get(subject)
            .and_then(|relations| relations.get(relation))
            .is_some_and(|objects| objects.contains(object))
    }

    /// Number of distinct raw statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the raw store was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
