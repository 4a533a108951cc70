//! Run settings and the on-disk layout of a dataset.
//!
//! Settings come from an optional `reconcile.toml`:
//!
//! ```toml
//! data_root = "data"
//! datasets = ["AIFB", "AM", "MUTAG"]
//! relation_order = "sorted"        # or "first-seen"
//! collisions = "last-write-wins"   # or "reject"
//!
//! [overrides.AM]
//! raw = "/mnt/raw/am_stripped.nt"
//! ```
//!
//! Missing keys take the defaults of [`Settings::default`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::canonical::CollisionPolicy;
use crate::error::{ReconcileError, Result};
use crate::model::Split;
use crate::vocabulary::RelationOrder;

/// Datasets processed when none are configured.
pub const DEFAULT_DATASETS: [&str; 3] = ["AIFB", "AM", "MUTAG"];

const RAW_DIR: &str = "raw";
const PROCESSED_DIR: &str = "processed";
const OUTPUT_DIR: &str = "triple_split";
const ENTITY_IDS_FILE: &str = "entity_ids.json";

/// Settings for one run over a list of datasets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding one sub-directory per dataset.
    pub data_root: PathBuf,
    /// Dataset names, processed in order.
    pub datasets: Vec<String>,
    /// Relation ID order.
    pub relation_order: RelationOrder,
    /// Predicate collision policy.
    pub collisions: CollisionPolicy,
    /// Per-dataset path overrides, keyed by dataset name.
    pub overrides: BTreeMap<String, PathOverrides>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            datasets: DEFAULT_DATASETS.iter().map(|d| d.to_string()).collect(),
            relation_order: RelationOrder::default(),
            collisions: CollisionPolicy::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Io`] if the file cannot be read and
    /// [`ReconcileError::Config`] if it is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReconcileError::io(path, e))?;
        Self::from_toml(&text, path)
    }

    /// Parses settings from TOML text. `origin` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Config`] on invalid TOML or unknown keys.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| ReconcileError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolves the file layout of `dataset`, applying any override.
    #[must_use]
    pub fn layout(&self, dataset: &str) -> DatasetLayout {
        let mut layout = DatasetLayout::conventional(&self.data_root, dataset);
        if let Some(o) = self.overrides.get(dataset) {
            if let Some(raw) = &o.raw {
                layout.raw = raw.clone();
            }
            if let Some(ids) = &o.entity_ids {
                layout.entity_ids = ids.clone();
            }
            if let Some(dir) = &o.edges_dir {
                layout.edges_dir = dir.clone();
            }
            if let Some(out) = &o.output {
                layout.output = out.clone();
            }
        }
        layout
    }
}

/// Optional replacements for the conventional paths of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOverrides {
    /// Raw N-Triples file.
    pub raw: Option<PathBuf>,
    /// Entity-ID table.
    pub entity_ids: Option<PathBuf>,
    /// Directory holding `<split>_edges.json`.
    pub edges_dir: Option<PathBuf>,
    /// Output directory.
    pub output: Option<PathBuf>,
}

/// Where the inputs and outputs of one dataset live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    /// Dataset name.
    pub name: String,
    /// Raw N-Triples file.
    pub raw: PathBuf,
    /// Entity-ID table.
    pub entity_ids: PathBuf,
    /// Directory holding `<split>_edges.json`.
    pub edges_dir: PathBuf,
    /// Output directory.
    pub output: PathBuf,
}

impl DatasetLayout {
    /// The conventional layout under `root`:
    ///
    /// ```text
    /// <root>/<NAME>/raw/<name>_stripped.nt
    /// <root>/<NAME>/processed/entity_ids.json
    /// <root>/<NAME>/processed/{train,val,test}_edges.json
    /// <root>/<NAME>/triple_split/
    /// ```
    #[must_use]
    pub fn conventional(root: &Path, name: &str) -> Self {
        let base = root.join(name);
        let processed = base.join(PROCESSED_DIR);
        Self {
            name: name.to_string(),
            raw: base
                .join(RAW_DIR)
                .join(format!("{}_stripped.nt", name.to_lowercase())),
            entity_ids: processed.join(ENTITY_IDS_FILE),
            edges_dir: processed,
            output: base.join(OUTPUT_DIR),
        }
    }

    /// Edge table of `split`.
    #[must_use]
    pub fn split_edges(&self, split: Split) -> PathBuf {
        self.edges_dir
            .join(format!("{}_edges.json", split.source_stem()))
    }
}
