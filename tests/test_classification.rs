//! End-to-end reference classification over real C++ snippets.

use navix::storage::ref_columns;
use navix::{IndexStore, Indexer, RefKind, Settings};
use std::sync::Arc;

fn index(code: &str) -> IndexStore {
    let mut indexer = Indexer::new(Arc::new(Settings::default())).unwrap();
    indexer.index_source("test.cc", code).unwrap();
    indexer.into_store()
}

/// All reference kinds recorded for `name`, in file order.
fn kinds_of(store: &IndexStore, name: &str) -> Vec<RefKind> {
    let symbol = store
        .symbol_names()
        .get(name)
        .unwrap_or_else(|| panic!("symbol '{name}' not indexed"));
    store
        .refs()
        .iter()
        .filter(|row| row[ref_columns::SYMBOL] == symbol)
        .map(|row| store.ref_kind_of(row[ref_columns::KIND]))
        .collect()
}

#[test]
fn plain_assignment_is_write() {
    let store = index("void f() { int x; x = 5; }");
    assert_eq!(kinds_of(&store, "x"), vec![RefKind::Definition, RefKind::Write]);
}

#[test]
fn compound_assignment_is_modify() {
    let store = index("void f() { int x = 0; x += 5; }");
    assert_eq!(
        kinds_of(&store, "x"),
        vec![RefKind::Definition, RefKind::Modify]
    );
}

#[test]
fn increment_is_modify() {
    let store = index("void f() { int count = 0; ++count; count++; }");
    assert_eq!(
        kinds_of(&store, "count"),
        vec![RefKind::Definition, RefKind::Modify, RefKind::Modify]
    );
}

#[test]
fn call_site_classifies_callee_and_arguments() {
    let store = index("void foo(int v);\nvoid g() { int x = 0; foo(x); }");
    assert!(kinds_of(&store, "foo").contains(&RefKind::Call));
    assert_eq!(kinds_of(&store, "x"), vec![RefKind::Definition, RefKind::Read]);
}

#[test]
fn address_of_overrides_read_context() {
    // The rhs of the assignment is a read context, but &x escapes the
    // address instead.
    let store = index("void f() { int x = 0; int* p; p = &x; }");
    assert_eq!(
        kinds_of(&store, "x"),
        vec![RefKind::Definition, RefKind::AddressTaken]
    );
    assert_eq!(kinds_of(&store, "p"), vec![RefKind::Definition, RefKind::Write]);
}

#[test]
fn dereference_reads_the_pointer() {
    let store = index("void f(int* p) { int y; y = *p; }");
    assert_eq!(kinds_of(&store, "p"), vec![RefKind::Definition, RefKind::Read]);
    assert_eq!(kinds_of(&store, "y"), vec![RefKind::Definition, RefKind::Write]);
}

#[test]
fn discarded_comma_operand_is_plain_use() {
    let store = index("void f() { int a = 0; int b = 0; (a, b); }");
    assert_eq!(kinds_of(&store, "a"), vec![RefKind::Definition, RefKind::Use]);
    // The right operand inherits the (empty) statement context.
    assert_eq!(kinds_of(&store, "b"), vec![RefKind::Definition, RefKind::Use]);
}

#[test]
fn member_write_reads_the_object() {
    let store = index(
        "struct S { int field; };\nvoid f() { S s; s.field = 1; }",
    );
    let s_kinds = kinds_of(&store, "s");
    assert_eq!(s_kinds, vec![RefKind::Definition, RefKind::Read]);
    assert_eq!(
        kinds_of(&store, "field"),
        vec![RefKind::Definition, RefKind::Write]
    );
}

#[test]
fn scope_qualifier_is_use_regardless_of_context() {
    let store = index(
        "namespace app { int value; }\nvoid f() { app::value = 3; }",
    );
    let app_kinds = kinds_of(&store, "app");
    assert_eq!(app_kinds, vec![RefKind::Definition, RefKind::Use]);
    assert_eq!(
        kinds_of(&store, "value"),
        vec![RefKind::Definition, RefKind::Write]
    );
}

#[test]
fn return_value_is_read() {
    let store = index("int f(int v) { return v; }");
    assert_eq!(kinds_of(&store, "v"), vec![RefKind::Definition, RefKind::Read]);
}

#[test]
fn condition_is_read() {
    let store = index("void f(int flag) { if (flag) {} while (flag) {} }");
    assert_eq!(
        kinds_of(&store, "flag"),
        vec![RefKind::Definition, RefKind::Read, RefKind::Read]
    );
}

#[test]
fn initializer_is_read() {
    let store = index("void f() { int a = 1; int b = a; }");
    assert_eq!(kinds_of(&store, "a"), vec![RefKind::Definition, RefKind::Read]);
}

#[test]
fn binary_operands_are_read() {
    let store = index("int f(int a, int b) { return a + b; }");
    assert_eq!(kinds_of(&store, "a"), vec![RefKind::Definition, RefKind::Read]);
    assert_eq!(kinds_of(&store, "b"), vec![RefKind::Definition, RefKind::Read]);
}
