use super::render_diagnostics;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use protean_parser::{parse_with, print_tree, tokenize_with, Diagnostic, Fragment, ParseTree};
use protean_common::{FileSystem, RealFileSystem};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// .proto file to dump
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = TreeFormat::Text)]
    pub format: TreeFormat,
}

#[derive(Serialize)]
struct TreeDump<'a> {
    file: &'a Path,
    tree: &'a ParseTree,
    diagnostics: &'a [Diagnostic],
}

pub fn tree(args: TreeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = RealFileSystem.read_source(&args.file)?;
    let buffer = tokenize_with(&source, config.lex_options());
    let parsed = parse_with(&buffer, config.parse_options(), Fragment::File);

    match args.format {
        TreeFormat::Text => {
            print!("{}", print_tree(&parsed.tree, &buffer));
            eprint!(
                "{}",
                render_diagnostics(&buffer, &args.file, &parsed.diagnostics, true)
            );
        }
        TreeFormat::Json => {
            let dump = TreeDump {
                file: &args.file,
                tree: &parsed.tree,
                diagnostics: &parsed.diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }

    Ok(())
}
