//! Store persistence and structural invariants across save/load.

use navix::storage::{ref_columns, ref_index_columns};
use navix::{IndexStore, Indexer, Project, Settings};
use std::sync::Arc;
use tempfile::TempDir;

const SAMPLE: &str = r#"
int helper(int v);

int helper(int v) { return v * 2; }

int main() {
    int total = 0;
    total += helper(3);
    return total;
}
"#;

fn index_sample() -> IndexStore {
    let mut indexer = Indexer::new(Arc::new(Settings::default())).unwrap();
    indexer.index_source("sample.cc", SAMPLE).unwrap();
    indexer.into_store()
}

#[test]
fn save_load_round_trip_preserves_queries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("navix.idx");

    let store = index_sample();
    let before = Project::from_store(store);
    let before_refs = before.query_references_of_symbol("helper");
    before.store().save(&path).unwrap();

    let after = Project::open(&path).unwrap();
    assert_eq!(after.query_references_of_symbol("helper"), before_refs);
    assert_eq!(after.query_all_paths(), vec!["sample.cc"]);
}

#[test]
fn refs_and_ref_index_hold_the_same_rows() {
    let store = index_sample();
    assert_eq!(store.refs().len(), store.ref_index().len());

    let mut from_refs: Vec<[u32; 6]> = store
        .refs()
        .iter()
        .map(|row| {
            [
                row[ref_columns::FILE],
                row[ref_columns::LINE],
                row[ref_columns::START_COL],
                row[ref_columns::END_COL],
                row[ref_columns::SYMBOL],
                row[ref_columns::KIND],
            ]
        })
        .collect();
    let mut from_index: Vec<[u32; 6]> = store
        .ref_index()
        .iter()
        .map(|row| {
            [
                row[ref_index_columns::FILE],
                row[ref_index_columns::LINE],
                row[ref_index_columns::START_COL],
                row[ref_index_columns::END_COL],
                row[ref_index_columns::SYMBOL],
                row[ref_index_columns::KIND],
            ]
        })
        .collect();
    from_refs.sort();
    from_index.sort();
    assert_eq!(from_refs, from_index);
}

#[test]
fn reindexing_the_same_input_is_deterministic() {
    let first = index_sample();
    let second = index_sample();

    let a: Vec<&[u32]> = first.refs().iter().collect();
    let b: Vec<&[u32]> = second.refs().iter().collect();
    assert_eq!(a, b);

    let a: Vec<&str> = first.symbol_names().iter().collect();
    let b: Vec<&str> = second.symbol_names().iter().collect();
    assert_eq!(a, b);
}

#[test]
fn spans_are_one_based_with_exclusive_end() {
    let mut indexer = Indexer::new(Arc::new(Settings::default())).unwrap();
    indexer.index_source("one.cc", "int x;\n").unwrap();
    let project = Project::from_store(indexer.into_store());

    let refs = project.query_references_of_symbol("x");
    assert_eq!(refs.len(), 1);
    // "x" is the 5th character on line 1.
    assert_eq!(refs[0].line, 1);
    assert_eq!(refs[0].start_col, 5);
    assert_eq!(refs[0].end_col, 6);
}
