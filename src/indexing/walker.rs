//! File system walker for discovering source files to index.
//!
//! Directory traversal honors .gitignore rules and a `.navixignore` file
//! with the same syntax, and filters by the configured C++ extensions.

use crate::Settings;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Walks directories to find source files to index.
#[derive(Debug)]
pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Walk a directory and return an iterator of files to index, in a
    /// stable sorted order so repeated runs produce identical stores.
    pub fn walk(&self, root: &Path) -> impl Iterator<Item = PathBuf> + use<> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(!self.settings.indexing.include_hidden)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(None)
            .require_git(false);

        // Custom ignore patterns, same syntax as .gitignore.
        builder.add_custom_ignore_filename(".navixignore");

        let extensions = self.settings.indexing.extensions.clone();

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(move |entry| {
                let path = entry.path();
                let ext = path.extension()?.to_str()?;
                if extensions.iter().any(|e| e == ext) {
                    Some(path.to_path_buf())
                } else {
                    None
                }
            })
            .collect();
        files.sort();
        files.into_iter()
    }

    /// Count files that would be indexed (useful for dry runs).
    pub fn count_files(&self, root: &Path) -> usize {
        self.walk(root).count()
    }
}
