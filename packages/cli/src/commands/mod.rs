pub mod check;
pub mod resolve;
pub mod tree;

pub use check::{check, CheckArgs};
pub use resolve::{resolve, ResolveArgs};
pub use tree::{tree, TreeArgs};

use anyhow::Result;
use protean_parser::{format_diagnostics, format_plain, Diagnostic, TokenizedBuffer};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every `.proto` file under each input; files are taken as given.
pub fn find_proto_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && path.extension().map(|e| e == "proto").unwrap_or(false) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            return Err(anyhow::anyhow!(
                "Input path does not exist: {}",
                input.display()
            ));
        }
    }

    Ok(files)
}

/// Render parse diagnostics for one file.
pub fn render_diagnostics(
    buffer: &TokenizedBuffer,
    path: &Path,
    diagnostics: &[Diagnostic],
    plain: bool,
) -> String {
    let name = path.display().to_string();
    if plain {
        format_plain(buffer, &name, diagnostics)
    } else {
        format_diagnostics(buffer, &name, diagnostics)
    }
}
