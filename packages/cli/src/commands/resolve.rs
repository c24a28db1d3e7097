use super::render_diagnostics;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use protean_bundle::{Bundle, BundleError, Resolver};
use protean_common::RealFileSystem;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Entry .proto file
    pub entry: PathBuf,

    /// Extra import directory, searched after the configured ones
    #[arg(short = 'I', long = "include")]
    pub include: Vec<PathBuf>,

    /// Print every resolved reference
    #[arg(long)]
    pub references: bool,
}

pub fn resolve(args: ResolveArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let include_dirs = config
        .get_include_dirs(cwd)
        .into_iter()
        .chain(args.include.iter().map(|dir| cwd.join(dir)));
    let resolver = Resolver::with_include_dirs(include_dirs);

    let bundle = Bundle::load_with(
        &cwd.join(&args.entry),
        &resolver,
        &RealFileSystem,
        config.parse_options(),
    )?;

    let mut parse_errors = 0;
    for file in bundle.files() {
        let diagnostics = &file.parsed().diagnostics;
        if !diagnostics.is_empty() {
            parse_errors += diagnostics.len();
            eprint!(
                "{}",
                render_diagnostics(file.buffer(), file.path(), diagnostics, false)
            );
        }
    }

    let resolution = bundle.resolve();
    let errors: Vec<&BundleError> = bundle.errors().iter().chain(&resolution.errors).collect();
    for error in &errors {
        eprintln!("{} {}{}", "error:".red().bold(), location(&bundle, error), error);
    }

    if args.references {
        for reference in &resolution.references {
            let file = bundle.get_file(&reference.file);
            let (line, column) = file
                .and_then(|f| f.buffer().line_column(reference.token))
                .map_or((0, 0), |(l, c)| (l + 1, c + 1));
            println!(
                "{}:{}:{}: {} -> {} ({})",
                reference.file.display(),
                line,
                column,
                reference.name,
                reference.target.cyan(),
                reference.target_kind
            );
        }
    }

    println!();
    println!(
        "{} Loaded {} file(s), resolved {} reference(s)",
        if errors.is_empty() && parse_errors == 0 {
            "Done".green().bold()
        } else {
            "Done".red().bold()
        },
        bundle.files().len(),
        resolution.references.len()
    );

    if parse_errors > 0 || !errors.is_empty() {
        println!(
            "   {} {} parse, {} import/resolution",
            "Errors:".red(),
            parse_errors,
            errors.len()
        );
        std::process::exit(1);
    }

    Ok(())
}

/// `file:line:col: ` for errors that point into a file
fn location(bundle: &Bundle, error: &BundleError) -> String {
    let Some((path, token)) = error.location() else {
        return String::new();
    };
    match bundle
        .get_file(path)
        .and_then(|f| f.buffer().line_column(token))
    {
        Some((line, column)) => format!("{}:{}:{}: ", path.display(), line + 1, column + 1),
        None => format!("{}: ", path.display()),
    }
}
