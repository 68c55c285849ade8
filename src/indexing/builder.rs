//! Accumulates rows from the AST visitor into an index store.

use crate::storage::IndexStore;
use crate::types::{FileId, RefKind, Span, SymbolId, SymbolKind};
use std::collections::HashMap;
use tracing::debug;

/// Write-side wrapper around an [`IndexStore`] for one indexing pass.
///
/// Reference rows go straight into the `refs` and `ref_index` tables.
/// Symbol kinds are buffered here until [`finish`](Self::finish) because a
/// reference can be recorded before its declaration is visited: such a
/// symbol starts at the `Unknown` sentinel and is reconciled to the first
/// concrete kind seen. A concrete kind is never downgraded or replaced.
#[derive(Debug)]
pub struct IndexBuilder {
    store: IndexStore,
    kinds: HashMap<SymbolId, SymbolKind>,
    ref_count: u64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            store: IndexStore::new(),
            kinds: HashMap::new(),
            ref_count: 0,
        }
    }

    /// Intern a file path, returning its stable id.
    pub fn file_id(&mut self, path: &str) -> FileId {
        self.store.intern_path(path)
    }

    /// Record one occurrence of `name` at `span`.
    pub fn record_ref(&mut self, name: &str, kind: RefKind, file: FileId, span: Span) -> SymbolId {
        let symbol = self.store.intern_symbol(name);
        self.kinds.entry(symbol).or_insert(SymbolKind::Unknown);
        self.store.add_ref(file, span, symbol, kind);
        self.ref_count += 1;
        symbol
    }

    /// Record a declaration of `name` at `span` with a concrete kind.
    ///
    /// Emits a Definition reference row and reconciles the symbol's kind
    /// sentinel if it is still `Unknown`.
    pub fn record_definition(
        &mut self,
        name: &str,
        kind: SymbolKind,
        file: FileId,
        span: Span,
    ) -> SymbolId {
        let symbol = self.record_ref(name, RefKind::Definition, file, span);
        let entry = self.kinds.entry(symbol).or_insert(SymbolKind::Unknown);
        if *entry == SymbolKind::Unknown {
            *entry = kind;
        }
        symbol
    }

    pub fn ref_count(&self) -> u64 {
        self.ref_count
    }

    /// Flush buffered symbol kinds into the symbol table and hand back the
    /// completed store.
    pub fn finish(mut self) -> IndexStore {
        let mut entries: Vec<(SymbolId, SymbolKind)> =
            self.kinds.iter().map(|(s, k)| (*s, *k)).collect();
        entries.sort_by_key(|(symbol, _)| *symbol);
        for (symbol, kind) in entries {
            self.store.add_symbol_row(symbol, kind);
        }
        debug!(
            refs = self.ref_count,
            symbols = self.kinds.len(),
            "finished indexing pass"
        );
        self.store
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::symbol_columns;

    #[test]
    fn test_ref_before_definition_reconciles_kind() {
        let mut builder = IndexBuilder::new();
        let file = builder.file_id("a.cc");
        // Call site seen before the declaration.
        builder.record_ref("helper", RefKind::Call, file, Span::new(2, 5, 11));
        builder.record_definition(
            "helper",
            SymbolKind::Function,
            file,
            Span::new(10, 6, 12),
        );
        let store = builder.finish();

        let row = store.symbols().row(0);
        assert_eq!(
            store.kind_names().resolve(row[symbol_columns::KIND]),
            Some("Function")
        );
    }

    #[test]
    fn test_first_concrete_kind_wins() {
        let mut builder = IndexBuilder::new();
        let file = builder.file_id("a.cc");
        builder.record_definition("thing", SymbolKind::Class, file, Span::new(1, 7, 12));
        builder.record_definition("thing", SymbolKind::Function, file, Span::new(5, 6, 11));
        let store = builder.finish();

        assert_eq!(store.symbols().len(), 1);
        let row = store.symbols().row(0);
        assert_eq!(
            store.kind_names().resolve(row[symbol_columns::KIND]),
            Some("Class")
        );
    }

    #[test]
    fn test_undeclared_symbol_keeps_sentinel() {
        let mut builder = IndexBuilder::new();
        let file = builder.file_id("a.cc");
        builder.record_ref("external", RefKind::Read, file, Span::new(3, 1, 9));
        let store = builder.finish();

        let row = store.symbols().row(0);
        assert_eq!(
            store.kind_names().resolve(row[symbol_columns::KIND]),
            Some("Unknown")
        );
    }

    #[test]
    fn test_symbol_table_sorted_by_symbol() {
        let mut builder = IndexBuilder::new();
        let file = builder.file_id("a.cc");
        builder.record_ref("zeta", RefKind::Read, file, Span::new(1, 1, 5));
        builder.record_ref("alpha", RefKind::Read, file, Span::new(2, 1, 6));
        let store = builder.finish();

        let first = store.symbols().row(0)[symbol_columns::SYMBOL];
        let second = store.symbols().row(1)[symbol_columns::SYMBOL];
        assert!(first < second);
    }
}
