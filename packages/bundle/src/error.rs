use crate::graph::GraphError;
use crate::resolver::ResolverError;
use crate::symbols::SymbolKind;
use protean_common::CommonError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading or resolving a bundle.
///
/// None of these stop loading: they are collected and returned next to
/// whatever could be built.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BundleError {
    #[error("Import not found: {import_path} imported by {source_path}")]
    ImportNotFound {
        import_path: String,
        source_path: String,
    },

    #[error("cannot read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Circular import detected: {}", format_cycle(.cycle))]
    CircularImport { cycle: Vec<PathBuf> },

    #[error("\"{name}\" is already defined in {}", .previous.display())]
    DuplicateSymbol {
        name: String,
        file: PathBuf,
        token: u32,
        previous: PathBuf,
    },

    #[error("\"{name}\" is not defined")]
    UnresolvedReference {
        name: String,
        file: PathBuf,
        token: u32,
    },

    #[error("\"{name}\" resolves to {found} {target}, expected {expected}")]
    WrongSymbolKind {
        name: String,
        target: String,
        found: SymbolKind,
        expected: &'static str,
        file: PathBuf,
        token: u32,
    },
}

impl BundleError {
    /// File and token the error points at, when it points inside a file.
    pub fn location(&self) -> Option<(&PathBuf, u32)> {
        match self {
            BundleError::DuplicateSymbol { file, token, .. }
            | BundleError::UnresolvedReference { file, token, .. }
            | BundleError::WrongSymbolKind { file, token, .. } => Some((file, *token)),
            _ => None,
        }
    }
}

fn format_cycle(cycle: &[PathBuf]) -> String {
    cycle
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<GraphError> for BundleError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::CircularDependency { cycle } => BundleError::CircularImport { cycle },
        }
    }
}

impl From<ResolverError> for BundleError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::ImportNotFound {
                import_path,
                source_path,
            } => BundleError::ImportNotFound {
                import_path,
                source_path,
            },
        }
    }
}

impl From<CommonError> for BundleError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Read { path, source } => BundleError::Read {
                path,
                message: source.to_string(),
            },
        }
    }
}
