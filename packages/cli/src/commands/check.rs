use super::{find_proto_files, render_diagnostics};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use protean_common::{CommonResult, FileSystem, RealFileSystem};
use protean_parser::{parse_with, tokenize_with, Fragment};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// .proto files or directories to check
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// One line per diagnostic instead of source excerpts
    #[arg(long)]
    pub plain: bool,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = find_proto_files(&args.inputs)?;
    debug!(files = files.len(), "checking");

    let summary = check_files(&files, &RealFileSystem, &config, args.plain);

    println!();
    println!(
        "{} Checked {} file(s)",
        if summary.failed() {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        },
        summary.checked
    );

    if summary.unreadable > 0 {
        println!("   {} {} file(s) could not be read", "Unreadable:".red(), summary.unreadable);
    }
    if summary.errors > 0 {
        println!(
            "   {} {} in {} file(s)",
            "Errors:".red(),
            summary.errors,
            summary.failed_files
        );
    }
    if summary.failed() {
        std::process::exit(1);
    }

    println!("   {} No issues found!", "✓".green());
    Ok(())
}

/// Totals over one `check` run.
#[derive(Debug, Default, PartialEq, Eq)]
struct CheckSummary {
    checked: usize,
    errors: usize,
    failed_files: usize,
    unreadable: usize,
}

impl CheckSummary {
    fn failed(&self) -> bool {
        self.errors > 0 || self.unreadable > 0
    }
}

/// Check every file; a file that cannot be read is reported and skipped.
fn check_files(
    files: &[PathBuf],
    fs: &dyn FileSystem,
    config: &Config,
    plain: bool,
) -> CheckSummary {
    let mut summary = CheckSummary::default();

    for file in files {
        summary.checked += 1;
        match check_file(file, fs, config, plain) {
            Ok(0) => {}
            Ok(errors) => {
                summary.failed_files += 1;
                summary.errors += errors;
            }
            Err(e) => {
                warn!(path = %file.display(), "skipping unreadable file");
                println!("{} {}", "✗".red(), file.display());
                eprintln!("  {}", e);
                summary.unreadable += 1;
            }
        }
    }

    summary
}

fn check_file(
    path: &Path,
    fs: &dyn FileSystem,
    config: &Config,
    plain: bool,
) -> CommonResult<usize> {
    let source = fs.read_source(path)?;
    let buffer = tokenize_with(&source, config.lex_options());
    let parsed = parse_with(&buffer, config.parse_options(), Fragment::File);

    if parsed.diagnostics.is_empty() {
        println!("{} {}", "✓".green(), path.display());
    } else {
        println!("{} {}", "✗".red(), path.display());
        eprint!(
            "{}",
            render_diagnostics(&buffer, path, &parsed.diagnostics, plain)
        );
    }

    Ok(parsed.diagnostics.len())
}
