//! Writes the reconciled dataset to its output directory.
//!
//! **Outputs** (all overwritten on every run):
//! - `train.nt`, `valid.nt`, `test.nt`: one `<s> <p> <o> .` line per triple
//! - `entoid`: `URI\tID` per entity, in ID order
//! - `reltoid`: `URI\tID` per relation, in ID order
//! - `entity_url_typing.txt`: `URI\ttype`, in entity ID order
//! - `entity_id_typing.txt`: `ID\ttype`, in entity ID order
//!
//! Only a [`Vocabulary`] that passed the type coverage check can be
//! materialised, so no output is written for an inconsistent dataset.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReconcileError, Result};
use crate::model::Split;
use crate::reconciler::SplitOutcome;
use crate::vocabulary::{SplitOutcomes, Vocabulary};

/// Entity → ID table.
pub const ENTITY_IDS_FILE: &str = "entoid";
/// Relation → ID table.
pub const RELATION_IDS_FILE: &str = "reltoid";
/// Entity URI → type table.
pub const URI_TYPES_FILE: &str = "entity_url_typing.txt";
/// Entity ID → type table.
pub const ID_TYPES_FILE: &str = "entity_id_typing.txt";

/// Writes every output file into `out_dir` and returns their paths.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] if the directory cannot be created or a
/// file cannot be written.
pub fn materialize(
    out_dir: &Path,
    outcomes: &SplitOutcomes,
    vocabulary: &Vocabulary,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| ReconcileError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(7);
    for split in Split::ALL {
        let path = out_dir.join(format!("{}.nt", split.output_stem()));
        write(&path, &render_triples(outcomes.get(split)))?;
        written.push(path);
    }

    let tables = [
        (ENTITY_IDS_FILE, render_entity_ids(vocabulary)),
        (RELATION_IDS_FILE, render_relation_ids(vocabulary)),
        (URI_TYPES_FILE, render_uri_types(vocabulary)),
        (ID_TYPES_FILE, render_id_types(vocabulary)),
    ];
    for (name, content) in tables {
        let path = out_dir.join(name);
        write(&path, &content)?;
        written.push(path);
    }
    Ok(written)
}

/// Renders a split's triple file.
#[must_use]
pub fn render_triples(outcome: &SplitOutcome) -> String {
    let mut out = String::new();
    for triple in &outcome.triples {
        out.push_str(&triple.to_ntriples());
        out.push('\n');
    }
    out
}

/// Renders the entity → ID table.
#[must_use]
pub fn render_entity_ids(vocabulary: &Vocabulary) -> String {
    let rows = vocabulary.entities().iter().enumerate();
    render_rows(rows.map(|(id, e)| (e.clone(), id.to_string())))
}

/// Renders the relation → ID table.
#[must_use]
pub fn render_relation_ids(vocabulary: &Vocabulary) -> String {
    let rows = vocabulary.relations().iter().enumerate();
    render_rows(rows.map(|(id, r)| (r.clone(), id.to_string())))
}

/// Renders the entity URI → type table.
#[must_use]
pub fn render_uri_types(vocabulary: &Vocabulary) -> String {
    let rows = vocabulary.typed_entities();
    render_rows(rows.map(|(_, uri, t)| (uri.to_string(), t.to_string())))
}

/// Renders the entity ID → type table.
#[must_use]
pub fn render_id_types(vocabulary: &Vocabulary) -> String {
    let rows = vocabulary.typed_entities();
    render_rows(rows.map(|(id, _, t)| (id.to_string(), t.to_string())))
}

fn render_rows(rows: impl Iterator<Item = (String, String)>) -> String {
    let mut out = String::new();
    for (key, value) in rows {
        out.push_str(&key);
        out.push('\t');
        out.push_str(&value);
        out.push('\n');
    }
    out
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| ReconcileError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReconciledTriple;
    use crate::vocabulary::RelationOrder;

    fn outcomes() -> SplitOutcomes {
        let mut train = SplitOutcome::empty(Split::Train);
        for (e, t) in [("b", "T2"), ("a", "T1")] {
            train.entities.insert(e.to_string());
            train.types.insert(e.to_string(), t.to_string());
        }
        train.relations.push("p".into());
        train.triples.insert(ReconciledTriple {
            subject: "a".into(),
            relation: "p".into(),
            object: "b".into(),
        });
        SplitOutcomes {
            train,
            validation: SplitOutcome::empty(Split::Validation),
            test: SplitOutcome::empty(Split::Test),
        }
    }

    #[test]
    fn tables_are_tab_separated_in_id_order() -> Result<()> {
        let o = outcomes();
        let v = Vocabulary::merge(&o, RelationOrder::Sorted)?;
        assert_eq!(render_triples(&o.train), "<a> <p> <b> .\n");
        assert_eq!(render_triples(&o.test), "");
        assert_eq!(render_entity_ids(&v), "a\t0\nb\t1\n");
        assert_eq!(render_relation_ids(&v), "p\t0\n");
        assert_eq!(render_uri_types(&v), "a\tT1\nb\tT2\n");
        assert_eq!(render_id_types(&v), "0\tT1\n1\tT2\n");
        Ok(())
    }

    #[test]
    fn writes_seven_files() -> Result<()> {
        let dir = tempfile::tempdir().map_err(|e| ReconcileError::io("tempdir", e))?;
        let out = dir.path().join("nested").join("triple_split");
        let o = outcomes();
        let v = Vocabulary::merge(&o, RelationOrder::Sorted)?;
        let written = materialize(&out, &o, &v)?;
        assert_eq!(written.len(), 7);
        assert!(written.iter().all(|p| p.is_file()));
        assert!(out.join("valid.nt").is_file());
        Ok(())
    }
}
