//! Read-only navigation queries over a completed index store.
//!
//! A [`Project`] wraps one loaded [`IndexStore`] generation. Every query
//! takes `&self`; expensive aggregates are memoized with single-assignment
//! cells so concurrent readers share one computation.

use crate::error::StorageResult;
use crate::storage::{IndexStore, ref_columns, ref_index_columns, symbol_columns};
use crate::types::{FileId, Ref, RefKind, SymbolId, SymbolKind};
use std::path::Path;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

pub struct Project {
    store: IndexStore,
    // Symbols with exactly one Definition row, sorted by symbol id.
    // Computed at most once, on first use.
    global_definitions: OnceLock<Vec<Ref>>,
    definition_scans: AtomicUsize,
}

impl Project {
    /// Open a persisted index store.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Ok(Self::from_store(IndexStore::load(path)?))
    }

    pub fn from_store(store: IndexStore) -> Self {
        Self {
            store,
            global_definitions: OnceLock::new(),
            definition_scans: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    // File lookups.

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.store.paths().get(path).map(FileId::new)
    }

    pub fn file_name(&self, file: FileId) -> Option<&str> {
        self.store.paths().resolve(file.value())
    }

    /// All indexed file paths, in interning order.
    pub fn query_all_paths(&self) -> Vec<&str> {
        self.store.paths().iter().collect()
    }

    // Symbol lookups.

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.store.symbol_names().get(name).map(SymbolId::new)
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> Option<&str> {
        self.store.symbol_names().resolve(symbol.value())
    }

    /// All symbol names, in interning order.
    pub fn query_all_symbols(&self) -> Vec<&str> {
        self.store.symbol_names().iter().collect()
    }

    /// Declared kind of a symbol, from the symbol table. An id the store
    /// has never seen yields the `Unknown` sentinel, not a failure.
    pub fn symbol_kind(&self, symbol: SymbolId) -> SymbolKind {
        self.symbol_kind_name(symbol)
            .map(SymbolKind::from_str_with_default)
            .unwrap_or(SymbolKind::Unknown)
    }

    pub fn symbol_kind_name(&self, symbol: SymbolId) -> Option<&str> {
        let row = self
            .store
            .symbols()
            .prefix_rows(&[symbol.value()])
            .next()?;
        self.store.kind_names().resolve(row[symbol_columns::KIND])
    }

    /// Interned id of a symbol-kind name, if any symbol has that kind.
    pub fn kind_id(&self, name: &str) -> Option<u32> {
        self.store.kind_names().get(name)
    }

    pub fn kind_name(&self, id: u32) -> Option<&str> {
        self.store.kind_names().resolve(id)
    }

    // Reference queries.

    /// Every reference to the named symbol, ordered by (kind, file, line).
    /// An unindexed name yields an empty list, not an error.
    pub fn query_references_of_symbol(&self, name: &str) -> Vec<Ref> {
        let Some(symbol) = self.symbol_id(name) else {
            return Vec::new();
        };
        self.store
            .ref_index()
            .prefix_rows(&[symbol.value()])
            .map(|row| self.store.ref_from_index_row(row))
            .collect()
    }

    /// References to the named symbol with one specific kind.
    pub fn query_references_of_symbol_with_kind(&self, name: &str, kind: RefKind) -> Vec<Ref> {
        let Some(symbol) = self.symbol_id(name) else {
            return Vec::new();
        };
        let Some(kind_id) = self.store.ref_kind_names().get(kind.as_str()) else {
            return Vec::new();
        };
        self.store
            .ref_index()
            .prefix_rows(&[symbol.value(), kind_id])
            .map(|row| self.store.ref_from_index_row(row))
            .collect()
    }

    /// Visit every reference inside `file` on lines
    /// `first_line..=last_line`, in ascending (line, column) order. Lines
    /// are 1-based. Each matching row is visited exactly once.
    pub fn query_file_refs_with<F>(&self, file: FileId, first_line: u32, last_line: u32, mut f: F)
    where
        F: FnMut(&Ref),
    {
        let refs = self.store.refs();
        let start = refs.range_from(&[file.value(), first_line]);
        for i in start..refs.len() {
            let row = refs.row(i);
            if row[ref_columns::FILE] != file.value() || row[ref_columns::LINE] > last_line {
                break;
            }
            f(&self.store.ref_from_row(row));
        }
    }

    /// Collecting form of [`query_file_refs_with`](Self::query_file_refs_with).
    pub fn query_file_refs(&self, file: FileId, first_line: u32, last_line: u32) -> Vec<Ref> {
        let mut out = Vec::new();
        self.query_file_refs_with(file, first_line, last_line, |r| out.push(*r));
        out
    }

    // Definition navigation.

    /// The definition site of the named symbol, if it has exactly one.
    ///
    /// A symbol defined in several places (overload sets merged by name,
    /// redefinitions across translation units) is ambiguous and yields
    /// `None` rather than an arbitrary pick.
    pub fn find_single_definition_of_symbol(&self, name: &str) -> Option<Ref> {
        let symbol = self.symbol_id(name)?;
        let defs = self.global_symbol_definitions();
        let idx = defs
            .binary_search_by_key(&symbol, |r| r.symbol)
            .ok()?;
        Some(defs[idx])
    }

    /// Symbols with exactly one Definition reference, sorted by symbol id.
    ///
    /// Computed lazily on first call; concurrent callers block on the one
    /// computation instead of repeating it.
    pub fn global_symbol_definitions(&self) -> &[Ref] {
        self.global_definitions
            .get_or_init(|| self.compute_global_definitions())
    }

    /// How many times the definition set has been computed. At most 1;
    /// exposed for concurrency tests.
    pub fn definition_scan_count(&self) -> usize {
        self.definition_scans.load(Ordering::Relaxed)
    }

    fn compute_global_definitions(&self) -> Vec<Ref> {
        self.definition_scans.fetch_add(1, Ordering::Relaxed);
        let Some(def_kind) = self
            .store
            .ref_kind_names()
            .get(RefKind::Definition.as_str())
        else {
            return Vec::new();
        };
        // ref_index is sorted by (symbol, kind, ...), so the Definition
        // rows of each symbol form one contiguous run.
        let mut defs = Vec::new();
        let mut run: Option<(u32, Ref, usize)> = None;
        for row in self.store.ref_index().iter() {
            if row[ref_index_columns::KIND] != def_kind {
                continue;
            }
            let symbol = row[ref_index_columns::SYMBOL];
            match &mut run {
                Some((s, _, count)) if *s == symbol => *count += 1,
                _ => {
                    if let Some((_, r, 1)) = run {
                        defs.push(r);
                    }
                    run = Some((symbol, self.store.ref_from_index_row(row), 1));
                }
            }
        }
        if let Some((_, r, 1)) = run {
            defs.push(r);
        }
        debug!(definitions = defs.len(), "computed global definition set");
        defs
    }
}
