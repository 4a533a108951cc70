//! End-to-end dataset processing through the file system.
//!
//! Each test lays out a miniature dataset in the conventional directory
//! structure, runs [`process_dataset`], and inspects the written files.

use std::fs;
use std::path::Path;

use kg_reconcile::materializer::{
    ENTITY_IDS_FILE, ID_TYPES_FILE, RELATION_IDS_FILE, URI_TYPES_FILE,
};
use kg_reconcile::{
    process_dataset, CollisionPolicy, DatasetLayout, ReconcileError, RelationOrder, Settings,
    Split,
};
use tempfile::TempDir;

/// Writes a dataset named `name` under `root` and returns its layout.
fn write_dataset(
    root: &Path,
    name: &str,
    raw: &str,
    entity_ids: &str,
    edges: [&str; 3],
) -> DatasetLayout {
    let layout = DatasetLayout::conventional(root, name);
    fs::create_dir_all(layout.raw.parent().unwrap()).unwrap();
    fs::create_dir_all(&layout.edges_dir).unwrap();
    fs::write(&layout.raw, raw).unwrap();
    fs::write(&layout.entity_ids, entity_ids).unwrap();
    for (split, content) in Split::ALL.into_iter().zip(edges) {
        fs::write(layout.split_edges(split), content).unwrap();
    }
    layout
}

fn settings(root: &Path) -> Settings {
    Settings {
        data_root: root.to_path_buf(),
        ..Settings::default()
    }
}

fn read(layout: &DatasetLayout, file: &str) -> String {
    fs::read_to_string(layout.output.join(file)).unwrap()
}

#[test]
fn single_triple_dataset() {
    let root = TempDir::new().unwrap();
    let layout = write_dataset(
        root.path(),
        "TOY",
        "<http://ex/a> <http://ex/p> <http://ex/b> .\n",
        r#"{"http://ex/a": 0, "http://ex/b": 1}"#,
        [r#"[[[null, [0, ["T1", "http://ex/p", "T2"], 1]], null, null]]"#, "[]", "[]"],
    );

    let report = process_dataset(&layout, &settings(root.path())).unwrap();
    assert_eq!(report.dataset, "TOY");

    assert_eq!(read(&layout, "train.nt"), "<http://ex/a> <http://ex/p> <http://ex/b> .\n");
    assert_eq!(read(&layout, "valid.nt"), "");
    assert_eq!(read(&layout, "test.nt"), "");
    assert_eq!(read(&layout, ENTITY_IDS_FILE), "http://ex/a\t0\nhttp://ex/b\t1\n");
    assert_eq!(read(&layout, RELATION_IDS_FILE), "http://ex/p\t0\n");
    assert_eq!(read(&layout, URI_TYPES_FILE), "http://ex/a\tT1\nhttp://ex/b\tT2\n");
    assert_eq!(read(&layout, ID_TYPES_FILE), "0\tT1\n1\tT2\n");
}

#[test]
fn dotted_predicate_is_restored_and_inverses_dropped() {
    let root = TempDir::new().unwrap();
    let raw = "\
<http://ex.org/alice> <http://swrc.ontoware.org/ontology#affiliation> <http://ex.org/lab> .
<http://ex.org/bob> <http://swrc.ontoware.org/ontology#affiliation> <http://ex.org/lab> .
<http://ex.org/alice> <http://ex.org/name> \"Alice\" .
";
    let ids = r#"{
        "http://ex.org/alice": 10,
        "http://ex.org/bob": 11,
        "http://ex.org/lab": 12,
        "http://ex.org/carol": 13
    }"#;
    let rel = "http://swrcontowareorg/ontology#affiliation";
    let train = format!(
        r#"[
        [[null, [10, ["Person", "{rel}", "Org"], 12]], null, null],
        [[null, [12, ["Org", "{rel}", "Person"], 10]], null, null]
    ]"#
    );
    // carol only takes part in a synthetic validation edge
    let valid = format!(r#"[[[null, [13, ["Person", "{rel}", "Org"], 12]], null, null]]"#);
    let test = format!(r#"[[[null, [11, ["Person", "{rel}", "Org"], 12]], null, null]]"#);
    let layout = write_dataset(root.path(), "AIFB", raw, ids, [&train, &valid, &test]);

    let report = process_dataset(&layout, &settings(root.path())).unwrap();

    assert_eq!(
        read(&layout, "train.nt"),
        "<http://ex.org/alice> <http://swrc.ontoware.org/ontology#affiliation> <http://ex.org/lab> .\n"
    );
    assert_eq!(read(&layout, "valid.nt"), "");
    assert_eq!(
        read(&layout, "test.nt"),
        "<http://ex.org/bob> <http://swrc.ontoware.org/ontology#affiliation> <http://ex.org/lab> .\n"
    );
    assert_eq!(
        read(&layout, ENTITY_IDS_FILE),
        "http://ex.org/alice\t0\nhttp://ex.org/bob\t1\nhttp://ex.org/carol\t2\nhttp://ex.org/lab\t3\n"
    );
    assert_eq!(
        read(&layout, RELATION_IDS_FILE),
        "http://swrc.ontoware.org/ontology#affiliation\t0\n"
    );
    assert!(read(&layout, URI_TYPES_FILE).contains("http://ex.org/carol\tPerson\n"));
    assert_eq!(read(&layout, ID_TYPES_FILE), "0\tPerson\n1\tPerson\n2\tPerson\n3\tOrg\n");

    // bob is only in test
    assert!(!report.is_clean());
    assert!(report
        .findings
        .iter()
        .any(|f| f.is_warning() && f.message.contains("1 test entities")));
}

#[test]
fn unknown_entity_id_aborts_without_output() {
    let root = TempDir::new().unwrap();
    let layout = write_dataset(
        root.path(),
        "MUTAG",
        "<http://ex/a> <http://ex/p> <http://ex/b> .\n",
        r#"{"http://ex/a": 0, "http://ex/b": 1}"#,
        ["[]", r#"[[[null, [0, ["T1", "http://ex/p", "T2"], 7]], null, null]]"#, "[]"],
    );

    let err = process_dataset(&layout, &settings(root.path())).unwrap_err();
    assert_eq!(err.dataset, "MUTAG");
    assert!(matches!(
        err.source,
        ReconcileError::UnknownEntityId {
            split: Split::Validation,
            id: 7
        }
    ));
    let msg = err.to_string();
    assert!(msg.contains("MUTAG") && msg.contains("val") && msg.contains('7'), "{msg}");
    assert!(!layout.output.exists());
}

#[test]
fn malformed_raw_source_is_a_parse_error() {
    let root = TempDir::new().unwrap();
    let layout = write_dataset(
        root.path(),
        "AM",
        "<http://ex/a> <http://ex/p> <http://ex/b>\n",
        r#"{"http://ex/a": 0, "http://ex/b": 1}"#,
        ["[]", "[]", "[]"],
    );

    let err = process_dataset(&layout, &settings(root.path())).unwrap_err();
    assert_eq!(err.dataset, "AM");
    assert!(matches!(err.source, ReconcileError::Parse { .. }));
    assert!(!layout.output.exists());
}

#[test]
fn collision_policy_reject_fails_dataset() {
    let root = TempDir::new().unwrap();
    let layout = write_dataset(
        root.path(),
        "AM",
        "<http://ex/s> <http://ex.org/ab> <http://ex/o> .\n\
         <http://ex/s> <http://exorg/a.b> <http://ex/o> .\n",
        r#"{"http://ex/s": 0, "http://ex/o": 1}"#,
        ["[]", "[]", "[]"],
    );
    let mut s = settings(root.path());
    s.collisions = CollisionPolicy::Reject;

    let err = process_dataset(&layout, &s).unwrap_err();
    assert!(matches!(err.source, ReconcileError::RelationCollision { .. }));

    s.collisions = CollisionPolicy::LastWriteWins;
    let report = process_dataset(&layout, &s).unwrap();
    assert!(report
        .findings
        .iter()
        .any(|f| f.is_warning() && f.message.contains("predicate collisions")));
}

#[test]
fn rerun_overwrites_previous_output() {
    let root = TempDir::new().unwrap();
    let layout = write_dataset(
        root.path(),
        "TOY",
        "<http://ex/a> <http://ex/q> <http://ex/b> .\n\
         <http://ex/a> <http://ex/p> <http://ex/b> .\n",
        r#"{"http://ex/a": 0, "http://ex/b": 1}"#,
        [
            r#"[
                [[null, [0, ["T", "http://ex/q", "T"], 1]], null, null],
                [[null, [0, ["T", "http://ex/p", "T"], 1]], null, null]
            ]"#,
            "[]",
            "[]",
        ],
    );
    fs::create_dir_all(&layout.output).unwrap();
    fs::write(layout.output.join(RELATION_IDS_FILE), "stale\t0\n").unwrap();

    let mut s = settings(root.path());
    s.relation_order = RelationOrder::FirstSeen;
    process_dataset(&layout, &s).unwrap();
    assert_eq!(read(&layout, RELATION_IDS_FILE), "http://ex/q\t0\nhttp://ex/p\t1\n");

    s.relation_order = RelationOrder::Sorted;
    process_dataset(&layout, &s).unwrap();
    assert_eq!(read(&layout, RELATION_IDS_FILE), "http://ex/p\t0\nhttp://ex/q\t1\n");
}
