//! Knowledge-graph split reconciliation.
//!
//! Benchmark datasets such as AIFB, AM, and MUTAG are distributed twice: as a
//! raw N-Triples store, and as a pre-split, ID-encoded edge list produced by
//! an embedding pipeline that stripped every `.` from predicate IRIs and
//! added inverse edges for training. This crate maps the encoded edges back
//! onto the raw statements and produces one consistent triple set per split,
//! dense entity and relation IDs, and an entity → type table.
//!
//! # Pipeline
//!
//! 1. [`canonical`]: mangles raw predicates, keeps the inverse map
//! 2. [`index`]: membership set over raw triples
//! 3. [`reconciler`]: filters synthetic edges, un-mangles grounded ones
//! 4. [`vocabulary`]: merges splits, assigns IDs, checks type coverage
//! 5. [`materializer`]: writes triple files and ID/type tables
//!
//! # Entry Point
//!
//! ```no_run
//! use kg_reconcile::{process_dataset, Settings};
//!
//! let settings = Settings::default();
//! for dataset in &settings.datasets {
//!     let report = process_dataset(&settings.layout(dataset), &settings)
//!         .expect("dataset failed");
//!     assert!(!report.findings.is_empty());
//! }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod canonical;
pub mod config;
pub mod error;
pub mod index;
pub mod materializer;
pub mod model;
pub mod pipeline;
pub mod reconciler;
pub mod report;
pub mod source;
pub mod vocabulary;

pub use canonical::{mangle, CollisionPolicy};
pub use config::{DatasetLayout, Settings};
pub use error::{DatasetError, ReconcileError};
pub use model::{EncodedEdge, ReconciledTriple, Split};
pub use pipeline::{process_dataset, reconcile_dataset, RawStore, Reconciliation, SplitEdges};
pub use report::{DatasetReport, Finding, Severity};
pub use source::encoded::EntityIds;
pub use vocabulary::{RelationOrder, Vocabulary};
