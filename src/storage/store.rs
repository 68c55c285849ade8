//! The index store: named columnar tables plus string interners, persisted
//! as a single unit.

use crate::error::{StorageError, StorageResult};
use crate::storage::{StringTable, Table, TableOrder};
use crate::types::{FileId, Ref, RefKind, Span, SymbolId, SymbolKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write as _;
use std::path::Path;
use tracing::{debug, info};

/// Magic bytes at the start of every store file.
const MAGIC: &[u8; 8] = b"NAVIXIDX";
/// Bumped whenever tables, columns, or the encoding change.
const FORMAT_VERSION: u32 = 1;

/// Columns of the reference table, sorted by (file, line, start column).
pub mod ref_columns {
    pub const FILE: usize = 0;
    pub const LINE: usize = 1;
    pub const START_COL: usize = 2;
    pub const END_COL: usize = 3;
    pub const SYMBOL: usize = 4;
    pub const KIND: usize = 5;
    pub const COUNT: usize = 6;
}

/// Columns of the reference index table, sorted by (symbol, kind, file, line).
pub mod ref_index_columns {
    pub const SYMBOL: usize = 0;
    pub const KIND: usize = 1;
    pub const FILE: usize = 2;
    pub const LINE: usize = 3;
    pub const START_COL: usize = 4;
    pub const END_COL: usize = 5;
    pub const COUNT: usize = 6;
}

/// Columns of the symbol table, sorted by symbol id.
pub mod symbol_columns {
    pub const SYMBOL: usize = 0;
    pub const KIND: usize = 1;
    pub const COUNT: usize = 2;
}

/// All tables and interners produced by one indexing pass.
///
/// The store is write-once per generation: the indexer populates it, then it
/// is persisted and reopened read-only by the query layer. The `refs` and
/// `ref_index` tables always hold the identical multiset of rows under
/// different sort keys.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStore {
    refs: Table,
    ref_index: Table,
    symbols: Table,
    symbol_names: StringTable,
    kind_names: StringTable,
    ref_kind_names: StringTable,
    paths: StringTable,
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStore {
    pub fn new() -> Self {
        Self {
            refs: Table::new("refs", ref_columns::COUNT, TableOrder::Sorted),
            ref_index: Table::new("ref_index", ref_index_columns::COUNT, TableOrder::Sorted),
            symbols: Table::new("symbols", symbol_columns::COUNT, TableOrder::Sorted),
            symbol_names: StringTable::new(),
            kind_names: StringTable::new(),
            ref_kind_names: StringTable::new(),
            paths: StringTable::new(),
        }
    }

    // Write path, used by the index builder.

    pub(crate) fn intern_symbol(&mut self, name: &str) -> SymbolId {
        SymbolId::new(self.symbol_names.intern(name))
    }

    pub(crate) fn intern_path(&mut self, path: &str) -> FileId {
        FileId::new(self.paths.intern(path))
    }

    pub(crate) fn add_ref(&mut self, file: FileId, span: Span, symbol: SymbolId, kind: RefKind) {
        let kind_id = self.ref_kind_names.intern(kind.as_str());
        self.refs.append(&[
            file.value(),
            span.line,
            span.start_col,
            span.end_col,
            symbol.value(),
            kind_id,
        ]);
        self.ref_index.append(&[
            symbol.value(),
            kind_id,
            file.value(),
            span.line,
            span.start_col,
            span.end_col,
        ]);
    }

    pub(crate) fn add_symbol_row(&mut self, symbol: SymbolId, kind: SymbolKind) {
        let kind_id = self.kind_names.intern(kind.as_str());
        self.symbols.append(&[symbol.value(), kind_id]);
    }

    // Read path, used by the query layer.

    pub fn refs(&self) -> &Table {
        &self.refs
    }

    pub fn ref_index(&self) -> &Table {
        &self.ref_index
    }

    pub fn symbols(&self) -> &Table {
        &self.symbols
    }

    pub fn symbol_names(&self) -> &StringTable {
        &self.symbol_names
    }

    pub fn kind_names(&self) -> &StringTable {
        &self.kind_names
    }

    pub fn ref_kind_names(&self) -> &StringTable {
        &self.ref_kind_names
    }

    pub fn paths(&self) -> &StringTable {
        &self.paths
    }

    /// Decode the reference-kind column of a row. Kinds were interned from
    /// the closed `RefKind` enum, so the fallback is unreachable for stores
    /// this crate wrote; `Use` keeps corrupt input non-fatal.
    pub fn ref_kind_of(&self, kind_id: u32) -> RefKind {
        self.ref_kind_names
            .resolve(kind_id)
            .and_then(|s| s.parse().ok())
            .unwrap_or(RefKind::Use)
    }

    /// Build a `Ref` from a row of the reference table.
    pub fn ref_from_row(&self, row: &[u32]) -> Ref {
        Ref {
            file: FileId::new(row[ref_columns::FILE]),
            line: row[ref_columns::LINE],
            start_col: row[ref_columns::START_COL],
            end_col: row[ref_columns::END_COL],
            symbol: SymbolId::new(row[ref_columns::SYMBOL]),
            kind: self.ref_kind_of(row[ref_columns::KIND]),
        }
    }

    /// Build a `Ref` from a row of the reference index table.
    pub fn ref_from_index_row(&self, row: &[u32]) -> Ref {
        Ref {
            file: FileId::new(row[ref_index_columns::FILE]),
            line: row[ref_index_columns::LINE],
            start_col: row[ref_index_columns::START_COL],
            end_col: row[ref_index_columns::END_COL],
            symbol: SymbolId::new(row[ref_index_columns::SYMBOL]),
            kind: self.ref_kind_of(row[ref_index_columns::KIND]),
        }
    }

    // Persistence.

    /// Write the store to `path` as a single versioned file.
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let body = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| StorageError::Corrupted {
                reason: format!("encode failed: {e}"),
            })?;
        let mut file = fs::File::create(path).map_err(|e| StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let io_err = |e| StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        file.write_all(MAGIC).map_err(io_err)?;
        file.write_all(&FORMAT_VERSION.to_le_bytes()).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        info!(
            path = %path.display(),
            refs = self.refs.len(),
            symbols = self.symbols.len(),
            files = self.paths.len(),
            "saved index store"
        );
        Ok(())
    }

    /// Load a store from `path`, validating magic, version, and schema.
    /// Either fully succeeds or fully fails; never returns a half-built
    /// store.
    pub fn load(path: &Path) -> StorageResult<Self> {
        let bytes = fs::read(path).map_err(|e| StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if bytes.len() < MAGIC.len() + 4 || &bytes[..MAGIC.len()] != MAGIC {
            return Err(StorageError::BadMagic {
                path: path.to_path_buf(),
            });
        }
        let mut version_bytes = [0u8; 4];
        version_bytes.copy_from_slice(&bytes[MAGIC.len()..MAGIC.len() + 4]);
        let version = u32::from_le_bytes(version_bytes);
        if version != FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }
        let (mut store, _): (IndexStore, usize) = bincode::serde::decode_from_slice(
            &bytes[MAGIC.len() + 4..],
            bincode::config::standard(),
        )
        .map_err(|e| StorageError::Corrupted {
            reason: format!("decode failed: {e}"),
        })?;
        store.symbol_names.rebuild_lookup();
        store.kind_names.rebuild_lookup();
        store.ref_kind_names.rebuild_lookup();
        store.paths.rebuild_lookup();
        store.validate()?;
        debug!(path = %path.display(), refs = store.refs.len(), "loaded index store");
        Ok(store)
    }

    /// Schema and invariant checks applied to every loaded store.
    fn validate(&self) -> StorageResult<()> {
        let expect = [
            (&self.refs, "refs", ref_columns::COUNT),
            (&self.ref_index, "ref_index", ref_index_columns::COUNT),
            (&self.symbols, "symbols", symbol_columns::COUNT),
        ];
        for (table, name, arity) in expect {
            if table.name() != name {
                return Err(StorageError::SchemaMismatch {
                    reason: format!("expected table '{name}', found '{}'", table.name()),
                });
            }
            if table.arity() != arity {
                return Err(StorageError::SchemaMismatch {
                    reason: format!(
                        "table '{name}' has arity {}, expected {arity}",
                        table.arity()
                    ),
                });
            }
            if !table.is_aligned() {
                return Err(StorageError::Corrupted {
                    reason: format!("table '{name}' is truncated"),
                });
            }
            if !table.is_well_ordered() {
                return Err(StorageError::Corrupted {
                    reason: format!("table '{name}' violates its sort order"),
                });
            }
        }
        if self.refs.len() != self.ref_index.len() {
            return Err(StorageError::Corrupted {
                reason: format!(
                    "refs has {} rows but ref_index has {}",
                    self.refs.len(),
                    self.ref_index.len()
                ),
            });
        }
        Ok(())
    }
}
