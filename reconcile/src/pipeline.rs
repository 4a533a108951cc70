//! End-to-end processing of one dataset.
//!
//! [`reconcile_dataset`] is the in-memory core: raw store and encoded tables
//! in, per-split outcomes plus merged vocabulary out. [`process_dataset`] adds
//! the file glue around it. Every failure is tagged with the dataset name.

use std::path::Path;

use crate::canonical::{Canonicalizer, CollisionPolicy, RelationMapping};
use crate::config::{DatasetLayout, Settings};
use crate::error::{DatasetError, Result};
use crate::index::TripleIndex;
use crate::materializer;
use crate::model::{EncodedEdge, Split};
use crate::reconciler::{reconcile_split, SplitOutcome, TypeConflict};
use crate::report::{capped_details, DatasetReport, Finding};
use crate::source::{encoded, ntriples};
use crate::vocabulary::{RelationOrder, SplitOutcomes, Vocabulary};

/// Detail lines kept per warning.
const DETAIL_LIMIT: usize = 10;

/// The raw side of a dataset, ready for matching.
#[derive(Debug)]
pub struct RawStore {
    /// Membership index over mangled triples.
    pub index: TripleIndex,
    /// Mangled → canonical predicate map.
    pub relations: RelationMapping,
    /// Statements read, duplicates included.
    pub statements: usize,
}

impl RawStore {
    /// Reads the raw N-Triples file at `path`.
    ///
    /// # Errors
    ///
    /// Returns I/O, parse, or collision errors from the N-Triples source.
    pub fn read_file(path: &Path, policy: CollisionPolicy) -> Result<Self> {
        let mut canonicalizer = Canonicalizer::new(policy);
        ntriples::read_file(path, &mut canonicalizer)?;
        Ok(Self::from(canonicalizer))
    }

    /// Parses raw N-Triples text.
    ///
    /// # Errors
    ///
    /// Returns parse or collision errors.
    pub fn parse_str(text: &str, policy: CollisionPolicy) -> Result<Self> {
        let mut canonicalizer = Canonicalizer::new(policy);
        ntriples::read_str(text, &mut canonicalizer)?;
        Ok(Self::from(canonicalizer))
    }
}

impl From<Canonicalizer> for RawStore {
    fn from(canonicalizer: Canonicalizer) -> Self {
        let statements = canonicalizer.statements();
        let (index, relations) = canonicalizer.finish();
        Self {
            index,
            relations,
            statements,
        }
    }
}

/// Encoded edges of the three splits.
#[derive(Debug, Clone, Default)]
pub struct SplitEdges {
    /// Training edges.
    pub train: Vec<EncodedEdge>,
    /// Validation edges.
    pub validation: Vec<EncodedEdge>,
    /// Test edges.
    pub test: Vec<EncodedEdge>,
}

impl SplitEdges {
    /// Edges of `split`.
    #[must_use]
    pub fn get(&self, split: Split) -> &[EncodedEdge] {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
            Split::Test => &self.test,
        }
    }

    /// Reads the three edge tables of `layout`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error naming the offending table.
    pub fn read(layout: &DatasetLayout) -> Result<Self> {
        Ok(Self {
            train: encoded::read_edges(&layout.split_edges(Split::Train))?,
            validation: encoded::read_edges(&layout.split_edges(Split::Validation))?,
            test: encoded::read_edges(&layout.split_edges(Split::Test))?,
        })
    }
}

/// A reconciled dataset that passed the type coverage check.
#[derive(Debug)]
pub struct Reconciliation {
    /// Per-split outcomes.
    pub outcomes: SplitOutcomes,
    /// Merged vocabulary with dense IDs.
    pub vocabulary: Vocabulary,
    /// Findings gathered along the way.
    pub report: DatasetReport,
}

/// Reconciles all three splits of `dataset` and merges their vocabularies.
///
/// # Errors
///
/// Returns the first [`ReconcileError`](crate::error::ReconcileError) of
/// any split or of the merge, tagged with `dataset`.
pub fn reconcile_dataset(
    dataset: &str,
    raw: &RawStore,
    entity_ids: &encoded::EntityIds,
    edges: &SplitEdges,
    order: RelationOrder,
) -> Result<Reconciliation, DatasetError> {
    let tag = |e| DatasetError::new(dataset, e);
    let mut report = DatasetReport::new(dataset);
    report_raw(&mut report, raw);

    let reconcile = |split| {
        reconcile_split(split, edges.get(split), &raw.index, entity_ids, &raw.relations)
    };
    let outcomes = SplitOutcomes {
        train: reconcile(Split::Train).map_err(tag)?,
        validation: reconcile(Split::Validation).map_err(tag)?,
        test: reconcile(Split::Test).map_err(tag)?,
    };
    for outcome in outcomes.iter() {
        report_split(&mut report, outcome);
    }

    let missing = outcomes.test_entities_missing_from_train();
    tracing::info!(dataset, missing = missing.len(), "test entities absent from training");
    if missing.is_empty() {
        report.push(Finding::info("split/test", "every test entity appears in training"));
    } else {
        report.push(Finding::warn_with_details(
            "split/test",
            format!("{} test entities are not in training", missing.len()),
            capped_details(missing.iter().map(|e| e.to_string()), DETAIL_LIMIT),
        ));
    }

    let vocabulary = Vocabulary::merge(&outcomes, order).map_err(tag)?;
    if !vocabulary.type_conflicts().is_empty() {
        report.push(type_conflict_warning(
            "vocabulary",
            "entities change type between splits",
            vocabulary.type_conflicts(),
        ));
    }
    report.push(Finding::info(
        "vocabulary",
        format!(
            "{} entities, {} relations",
            vocabulary.entities().len(),
            vocabulary.relations().len()
        ),
    ));

    Ok(Reconciliation {
        outcomes,
        vocabulary,
        report,
    })
}

/// Loads, reconciles, and materialises one dataset.
///
/// Nothing is written unless every split reconciled and the type coverage
/// check passed.
///
/// # Errors
///
/// Returns the first failure, tagged with the dataset name.
pub fn process_dataset(
    layout: &DatasetLayout,
    settings: &Settings,
) -> Result<DatasetReport, DatasetError> {
    let dataset = layout.name.as_str();
    let tag = |e| DatasetError::new(dataset, e);
    tracing::info!(dataset, raw = %layout.raw.display(), "processing dataset");

    let raw = RawStore::read_file(&layout.raw, settings.collisions).map_err(tag)?;
    let entity_ids = encoded::EntityIds::read_file(&layout.entity_ids).map_err(tag)?;
    let edges = SplitEdges::read(layout).map_err(tag)?;

    let Reconciliation {
        outcomes,
        vocabulary,
        mut report,
    } = reconcile_dataset(dataset, &raw, &entity_ids, &edges, settings.relation_order)?;
    drop(raw);

    let written =
        materializer::materialize(&layout.output, &outcomes, &vocabulary).map_err(tag)?;
    report.push(Finding::info(
        "output",
        format!("{} files written to {}", written.len(), layout.output.display()),
    ));
    tracing::info!(dataset, output = %layout.output.display(), "dataset written");
    Ok(report)
}

fn report_raw(report: &mut DatasetReport, raw: &RawStore) {
    report.push(Finding::info(
        "raw",
        format!(
            "{} statements, {} distinct, {} mangled predicates",
            raw.statements,
            raw.index.len(),
            raw.relations.len()
        ),
    ));
    let collisions = raw.relations.collisions();
    if !collisions.is_empty() {
        report.push(Finding::warn_with_details(
            "raw",
            format!("{} predicate collisions resolved by overwriting", collisions.len()),
            capped_details(
                collisions
                    .iter()
                    .map(|c| format!("{}: <{}> replaced by <{}>", c.mangled, c.replaced, c.canonical)),
                DETAIL_LIMIT,
            ),
        ));
    }
}

fn report_split(report: &mut DatasetReport, outcome: &SplitOutcome) {
    let component = format!("split/{}", outcome.split);
    report.push(Finding::info(
        component.as_str(),
        format!(
            "{} edges, {} triples kept, {} synthetic dropped, {} entities",
            outcome.edges,
            outcome.triples.len(),
            outcome.synthetic,
            outcome.entities.len()
        ),
    ));
    if !outcome.type_conflicts.is_empty() {
        report.push(type_conflict_warning(
            component,
            "entities change type within the split",
            &outcome.type_conflicts,
        ));
    }
}

fn type_conflict_warning(
    component: impl Into<String>,
    what: &str,
    conflicts: &[TypeConflict],
) -> Finding {
    Finding::warn_with_details(
        component,
        format!("{} {what}", conflicts.len()),
        capped_details(
            conflicts
                .iter()
                .map(|c| format!("{}: {} -> {}", c.entity, c.previous, c.current)),
            DETAIL_LIMIT,
        ),
    )
}
