//! Indexing pipeline: file discovery, C++ parsing, and reference
//! extraction into an index store.

pub mod builder;
pub mod context;
pub mod visitor;
pub mod walker;

pub use builder::IndexBuilder;
pub use context::ExprContext;
pub use visitor::AstIndexer;
pub use walker::FileWalker;

use crate::Settings;
use crate::error::{IndexError, IndexResult};
use crate::storage::IndexStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tree_sitter::Parser;

/// Summary of one indexing run.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub files_failed: usize,
    pub refs_recorded: u64,
}

/// Drives the indexing pass: walks files, parses each one with
/// tree-sitter, and feeds the trees through the context-propagating
/// visitor into a single [`IndexStore`].
pub struct Indexer {
    settings: Arc<Settings>,
    parser: Parser,
    builder: IndexBuilder,
    stats: IndexStats,
}

impl Indexer {
    pub fn new(settings: Arc<Settings>) -> IndexResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| IndexError::ParserInit {
                reason: e.to_string(),
            })?;
        Ok(Self {
            settings,
            parser,
            builder: IndexBuilder::new(),
            stats: IndexStats::default(),
        })
    }

    /// Index every matching file under `root`.
    ///
    /// A file that cannot be read or parsed is logged and skipped; one bad
    /// file never aborts the run.
    pub fn index_directory(&mut self, root: &Path) -> IndexResult<()> {
        let walker = FileWalker::new(Arc::clone(&self.settings));
        for path in walker.walk(root) {
            match self.index_file(&path) {
                Ok(()) => self.stats.files_indexed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    self.stats.files_failed += 1;
                }
            }
        }
        info!(
            files = self.stats.files_indexed,
            failed = self.stats.files_failed,
            "indexing complete"
        );
        Ok(())
    }

    /// Index a single file.
    pub fn index_file(&mut self, path: &Path) -> IndexResult<()> {
        let code = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.index_source(&path.to_string_lossy(), &code)
    }

    /// Index already-loaded source text under the given path name.
    pub fn index_source(&mut self, path: &str, code: &str) -> IndexResult<()> {
        let tree = self
            .parser
            .parse(code, None)
            .ok_or_else(|| IndexError::Parse {
                path: path.into(),
                reason: "parser returned no tree".to_string(),
            })?;
        let file = self.builder.file_id(path);
        let before = self.builder.ref_count();
        AstIndexer::new(&mut self.builder, code, file).index_tree(&tree);
        let recorded = self.builder.ref_count() - before;
        self.stats.refs_recorded += recorded;
        debug!(path, refs = recorded, "indexed file");
        Ok(())
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Finish the pass and hand back the completed store.
    pub fn into_store(self) -> IndexStore {
        self.builder.finish()
    }
}
