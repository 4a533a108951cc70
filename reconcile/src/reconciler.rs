//! Split reconciliation.
//!
//! Matches one split's encoded edges back to raw statements. The encoder
//! added inverse edges for training; those have no raw counterpart and are
//! dropped here.
//!
//! Entities and their types are harvested from every edge, grounded or not:
//! an entity that only takes part in synthetic edges still belongs to the
//! split's entity universe. Relations and triples are only recorded for
//! grounded edges. Downstream ID assignment and the type coverage check rely
//! on this asymmetry.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::canonical::RelationMapping;
use crate::error::{ReconcileError, Result};
use crate::index::TripleIndex;
use crate::model::{EncodedEdge, ReconciledTriple, Split};
use crate::source::encoded::EntityIds;

/// An entity seen with two different type labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConflict {
    /// Entity URI.
    pub entity: String,
    /// Type recorded earlier.
    pub previous: String,
    /// Type that replaced it.
    pub current: String,
}

/// Everything one split contributes to the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Split this outcome belongs to.
    pub split: Split,
    /// Entities referenced by any edge of the split.
    pub entities: BTreeSet<String>,
    /// Canonical relations of grounded edges, unique, in first-seen order.
    pub relations: Vec<String>,
    /// Entity → type label; the last edge mentioning an entity wins.
    pub types: BTreeMap<String, String>,
    /// Grounded triples with canonical predicates.
    pub triples: BTreeSet<ReconciledTriple>,
    /// Number of encoded edges processed.
    pub edges: usize,
    /// Number of edges discarded as synthetic.
    pub synthetic: usize,
    /// Entities whose type label changed within the split.
    pub type_conflicts: Vec<TypeConflict>,
}

impl SplitOutcome {
    /// An outcome with no edges.
    #[must_use]
    pub fn empty(split: Split) -> Self {
        Self {
            split,
            entities: BTreeSet::new(),
            relations: Vec::new(),
            types: BTreeMap::new(),
            triples: BTreeSet::new(),
            edges: 0,
            synthetic: 0,
            type_conflicts: Vec::new(),
        }
    }

    fn record_type(&mut self, entity: &str, label: &str) {
        match self.types.get_mut(entity) {
            Some(previous) if previous == label => {}
            Some(previous) => {
                let previous = std::mem::replace(previous, label.to_string());
                self.type_conflicts.push(TypeConflict {
                    entity: entity.to_string(),
                    previous,
                    current: label.to_string(),
                });
            }
            None => {
                self.types.insert(entity.to_string(), label.to_string());
            }
        }
    }
}

/// Reconciles the encoded edges of one split against the raw store.
///
/// # Errors
///
/// Returns [`ReconcileError::UnknownEntityId`] on the first ID missing from
/// `entity_ids`; nothing of the split is kept in that case. Returns
/// [`ReconcileError::UnmappedRelation`] if a grounded edge's predicate has no
/// canonical form, which means `index` and `relations` were not built
/// together.
pub fn reconcile_split<'e, I>(
    split: Split,
    edges: I,
    index: &TripleIndex,
    entity_ids: &EntityIds,
    relations: &RelationMapping,
) -> Result<SplitOutcome>
where
    I: IntoIterator<Item = &'e EncodedEdge>,
{
    let mut outcome = SplitOutcome::empty(split);
    let mut seen_relations = HashSet::new();

    for edge in edges {
        let subject = resolve(entity_ids, split, edge.subject_id)?;
        let object = resolve(entity_ids, split, edge.object_id)?;
        outcome.edges += 1;

        outcome.entities.insert(subject.to_string());
        outcome.entities.insert(object.to_string());
        outcome.record_type(subject, &edge.subject_type);
        outcome.record_type(object, &edge.object_type);

        if !index.contains(subject, &edge.relation, object) {
            outcome.synthetic += 1;
            continue;
        }

        let canonical = relations.canonical(&edge.relation).ok_or_else(|| {
            ReconcileError::UnmappedRelation {
                split,
                mangled: edge.relation.clone(),
            }
        })?;
        if seen_relations.insert(canonical) {
            outcome.relations.push(canonical.to_string());
        }
        outcome.triples.insert(ReconciledTriple {
            subject: subject.to_string(),
            relation: canonical.to_string(),
            object: object.to_string(),
        });
    }

    for conflict in &outcome.type_conflicts {
        tracing::warn!(
            %split,
            entity = %conflict.entity,
            previous = %conflict.previous,
            current = %conflict.current,
            "entity type changed within split"
        );
    }
    tracing::info!(
        %split,
        edges = outcome.edges,
        triples = outcome.triples.len(),
        synthetic = outcome.synthetic,
        entities = outcome.entities.len(),
        relations = outcome.relations.len(),
        "split reconciled"
    );
    Ok(outcome)
}

fn resolve(entity_ids: &EntityIds, split: Split, id: u64) -> Result<&str> {
    entity_ids
        .uri(id)
        .ok_or(ReconcileError::UnknownEntityId { split, id })
}
