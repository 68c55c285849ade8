//! Navigation queries over a small multi-file C++ project.

use navix::{Indexer, Project, RefKind, Settings, SymbolKind};
use std::sync::Arc;

const HEADER: &str = r#"
class Widget {
public:
    int size() const;
    int width;
};

int unique_helper(int v);
"#;

const SOURCE: &str = r#"
int Widget::size() const { return width; }

int unique_helper(int v) { return v + 1; }

int main() {
    Widget w;
    w.width = 10;
    return unique_helper(w.size());
}
"#;

fn sample_project() -> Project {
    let mut indexer = Indexer::new(Arc::new(Settings::default())).unwrap();
    indexer.index_source("widget.h", HEADER).unwrap();
    indexer.index_source("widget.cc", SOURCE).unwrap();
    Project::from_store(indexer.into_store())
}

#[test]
fn class_and_members_get_declared_kinds() {
    let project = sample_project();
    let widget = project.symbol_id("Widget").unwrap();
    assert_eq!(project.symbol_kind(widget), SymbolKind::Class);
    let width = project.symbol_id("width").unwrap();
    assert_eq!(project.symbol_kind(width), SymbolKind::Field);
    let size = project.symbol_id("size").unwrap();
    assert_eq!(project.symbol_kind(size), SymbolKind::Method);
}

#[test]
fn references_span_files() {
    let project = sample_project();
    let refs = project.query_references_of_symbol("width");
    let files: Vec<&str> = refs
        .iter()
        .filter_map(|r| project.file_name(r.file))
        .collect();
    assert!(files.contains(&"widget.h"));
    assert!(files.contains(&"widget.cc"));
}

#[test]
fn method_call_through_object_is_classified() {
    let project = sample_project();
    let calls = project.query_references_of_symbol_with_kind("size", RefKind::Call);
    assert_eq!(calls.len(), 1);
    assert_eq!(project.file_name(calls[0].file), Some("widget.cc"));
}

#[test]
fn file_refs_are_windowed_and_ordered() {
    let project = sample_project();
    let file = project.file_id("widget.cc").unwrap();

    let all = project.query_file_refs(file, 1, u32::MAX);
    assert!(!all.is_empty());
    assert!(
        all.windows(2)
            .all(|w| (w[0].line, w[0].start_col) <= (w[1].line, w[1].start_col))
    );

    // Line 2 holds the out-of-line size() definition.
    let line2 = project.query_file_refs(file, 2, 2);
    assert!(line2.iter().all(|r| r.line == 2));
    let names: Vec<&str> = line2
        .iter()
        .filter_map(|r| project.symbol_name(r.symbol))
        .collect();
    assert!(names.contains(&"Widget"));
    assert!(names.contains(&"size"));
    assert!(names.contains(&"width"));
}

#[test]
fn unique_definition_resolves_across_declaration_and_definition() {
    let project = sample_project();
    // Declared in the header and defined in the source file: two
    // Definition rows, so navigation refuses to pick one.
    assert!(
        project
            .find_single_definition_of_symbol("unique_helper")
            .is_none()
    );
    // The local variable w is defined exactly once.
    let def = project.find_single_definition_of_symbol("w").unwrap();
    assert_eq!(project.file_name(def.file), Some("widget.cc"));
    assert_eq!(def.line, 7);
}

#[test]
fn main_has_a_unique_definition() {
    let project = sample_project();
    let def = project.find_single_definition_of_symbol("main").unwrap();
    assert_eq!(def.kind, RefKind::Definition);
    assert_eq!(project.file_name(def.file), Some("widget.cc"));
    assert_eq!(def.line, 6);
}

#[test]
fn namespace_definitions_get_the_namespace_kind() {
    let mut indexer = Indexer::new(Arc::new(Settings::default())).unwrap();
    indexer
        .index_source(
            "ns.cc",
            "namespace app { namespace detail { int value; } }\nnamespace shortcut = app;\n",
        )
        .unwrap();
    let project = Project::from_store(indexer.into_store());

    for name in ["app", "detail", "shortcut"] {
        let id = project.symbol_id(name).unwrap();
        assert_eq!(project.symbol_kind(id), SymbolKind::Namespace, "{name}");
    }
}

#[test]
fn all_symbols_and_paths_enumerate() {
    let project = sample_project();
    let symbols = project.query_all_symbols();
    assert!(symbols.contains(&"Widget"));
    assert!(symbols.contains(&"unique_helper"));
    assert_eq!(project.query_all_paths(), vec!["widget.h", "widget.cc"]);
}
