//! AST-driven C++ reference indexer for source navigation.
//!
//! navix parses C++ sources with tree-sitter, classifies every name
//! occurrence by how it is used (called, read, written, modified,
//! address-taken, defined), and stores the result in columnar tables
//! built for two navigation shapes: all references to a symbol, and all
//! references inside a span of a file.
//!
//! # Example
//!
//! ```no_run
//! use navix::{Indexer, Project, Settings};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Arc::new(Settings::default());
//! let mut indexer = Indexer::new(settings)?;
//! indexer.index_directory(std::path::Path::new("."))?;
//!
//! let project = Project::from_store(indexer.into_store());
//! for r in project.query_references_of_symbol("main") {
//!     println!("{:?} at line {}", r.kind, r.line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod indexing;
pub mod project;
pub mod storage;
pub mod types;

pub use config::Settings;
pub use error::{IndexError, IndexResult, StorageError, StorageResult};
pub use indexing::{IndexBuilder, IndexStats, Indexer};
pub use project::Project;
pub use storage::IndexStore;
pub use types::{FileId, Ref, RefKind, Span, SymbolId, SymbolKind};
