//! Maps import strings to files on disk.

use protean_common::FileSystem;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Import not found: {import_path} imported by {source_path}")]
    ImportNotFound {
        import_path: String,
        source_path: String,
    },
}

/// Import path resolution against an ordered list of include directories
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    include_dirs: Vec<PathBuf>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_dirs(include_dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            include_dirs: include_dirs.into_iter().collect(),
        }
    }

    pub fn add_include_dir(&mut self, dir: PathBuf) {
        self.include_dirs.push(dir);
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Resolve `import_path` as written in `importing_file`.
    ///
    /// Include directories are searched in order. The importing file's own
    /// directory is tried last, so a bundle with no include directories still
    /// finds siblings.
    pub fn resolve_import_path(
        &self,
        import_path: &str,
        importing_file: &Path,
        fs: &dyn FileSystem,
    ) -> Result<PathBuf, ResolverError> {
        let sibling_dir = importing_file.parent();
        let candidates = self
            .include_dirs
            .iter()
            .map(PathBuf::as_path)
            .chain(sibling_dir)
            .map(|dir| dir.join(import_path));

        for candidate in candidates {
            trace!(candidate = %candidate.display(), "trying import candidate");
            if !fs.exists(&candidate) {
                continue;
            }
            // Canonicalize so that one file reached two ways is loaded once
            if let Ok(resolved) = fs.canonicalize(&candidate) {
                return Ok(resolved);
            }
        }

        Err(ResolverError::ImportNotFound {
            import_path: import_path.to_string(),
            source_path: importing_file.to_string_lossy().to_string(),
        })
    }
}
