use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors shared by every protean crate
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CommonError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        CommonError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            CommonError::Read { path, .. } => path,
        }
    }
}
