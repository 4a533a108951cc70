//! Dataset-wide vocabulary: entity and relation IDs and the merged type map.
//!
//! IDs are dense and zero-based. Entity IDs follow the lexicographic order of
//! the URIs, so they are stable for a fixed entity set but shift when the set
//! changes between regenerations.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Deserialize;

use crate::error::{ReconcileError, Result};
use crate::model::Split;
use crate::reconciler::{SplitOutcome, TypeConflict};

/// Order in which relations receive their IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationOrder {
    /// Lexicographic order of the canonical URIs.
    #[default]
    Sorted,
    /// Order of first appearance, walking train, validation, then test.
    FirstSeen,
}

impl std::str::FromStr for RelationOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sorted" => Ok(Self::Sorted),
            "first-seen" => Ok(Self::FirstSeen),
            other => Err(format!(
                "unknown relation order {other:?} (expected sorted or first-seen)"
            )),
        }
    }
}

/// The three reconciled splits of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcomes {
    /// Training split.
    pub train: SplitOutcome,
    /// Validation split.
    pub validation: SplitOutcome,
    /// Test split.
    pub test: SplitOutcome,
}

impl SplitOutcomes {
    /// Outcome of `split`.
    #[must_use]
    pub fn get(&self, split: Split) -> &SplitOutcome {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
            Split::Test => &self.test,
        }
    }

    /// Outcomes in merge order: train, validation, test.
    pub fn iter(&self) -> impl Iterator<Item = &SplitOutcome> {
        Split::ALL.into_iter().map(move |s| self.get(s))
    }

    /// Test entities that never appear in the training split.
    #[must_use]
    pub fn test_entities_missing_from_train(&self) -> BTreeSet<&str> {
        self.test
            .entities
            .difference(&self.train.entities)
            .map(String::as_str)
            .collect()
    }
}

/// Merged entity/relation vocabulary with dense IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entities: Vec<String>,
    relations: Vec<String>,
    relation_ids: HashMap<String, usize>,
    types: BTreeMap<String, String>,
    type_conflicts: Vec<TypeConflict>,
}

impl Vocabulary {
    /// Merges the vocabularies of all three splits.
    ///
    /// Type maps are merged train → validation → test; a later split
    /// overrides the type an earlier split recorded, and each override that
    /// changes the label is kept as a [`TypeConflict`].
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::TypeCoverageMismatch`] unless the merged
    /// entity set equals the key set of the merged type map.
    pub fn merge(outcomes: &SplitOutcomes, order: RelationOrder) -> Result<Self> {
        let entity_set: BTreeSet<&str> = outcomes
            .iter()
            .flat_map(|o| o.entities.iter().map(String::as_str))
            .collect();
        let entities: Vec<String> = entity_set.iter().map(|e| e.to_string()).collect();

        let mut seen = HashSet::new();
        let mut relations: Vec<String> = outcomes
            .iter()
            .flat_map(|o| o.relations.iter())
            .filter(|r| seen.insert(r.as_str()))
            .cloned()
            .collect();
        if order == RelationOrder::Sorted {
            relations.sort();
        }
        let relation_ids = relations
            .iter()
            .enumerate()
            .map(|(id, r)| (r.clone(), id))
            .collect();

        let mut types = BTreeMap::new();
        let mut type_conflicts = Vec::new();
        for outcome in outcomes.iter() {
            for (entity, label) in &outcome.types {
                if let Some(previous) = types.insert(entity.clone(), label.clone()) {
                    if previous != *label {
                        type_conflicts.push(TypeConflict {
                            entity: entity.clone(),
                            previous,
                            current: label.clone(),
                        });
                    }
                }
            }
        }

        check_coverage(&entity_set, &types)?;

        Ok(Self {
            entities,
            relations,
            relation_ids,
            types,
            type_conflicts,
        })
    }

    /// Entities in ID order.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Relations in ID order.
    #[must_use]
    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    /// Dense ID of `entity`.
    #[must_use]
    pub fn entity_id(&self, entity: &str) -> Option<usize> {
        self.entities
            .binary_search_by(|e| e.as_str().cmp(entity))
            .ok()
    }

    /// Dense ID of `relation`.
    #[must_use]
    pub fn relation_id(&self, relation: &str) -> Option<usize> {
        self.relation_ids.get(relation).copied()
    }

    /// Merged type label of `entity`.
    #[must_use]
    pub fn entity_type(&self, entity: &str) -> Option<&str> {
        self.types.get(entity).map(String::as_str)
    }

    /// `(id, uri, type)` for every entity, in ID order.
    pub fn typed_entities(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.entities.iter().enumerate().map(|(id, uri)| {
            // Coverage was checked in `merge`.
            let label = self.types.get(uri).map_or("", String::as_str);
            (id, uri.as_str(), label)
        })
    }

    /// Type overrides between splits.
    #[must_use]
    pub fn type_conflicts(&self) -> &[TypeConflict] {
        &self.type_conflicts
    }
}

fn check_coverage(entities: &BTreeSet<&str>, types: &BTreeMap<String, String>) -> Result<()> {
    let untyped: Vec<String> = entities
        .iter()
        .filter(|e| !types.contains_key(**e))
        .map(|e| e.to_string())
        .collect();
    let unused: Vec<String> = types
        .keys()
        .filter(|k| !entities.contains(k.as_str()))
        .cloned()
        .collect();
    if untyped.is_empty() && unused.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError::TypeCoverageMismatch { untyped, unused })
    }
}
