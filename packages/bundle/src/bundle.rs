//! # Bundle
//!
//! An entry `.proto` file plus everything it imports, each tokenized and parsed
//! once, with the import graph between them.
//!
//! Loading is a worklist: the entry is queued, and every file taken off the
//! queue has its imports resolved and any file not seen before queued in turn,
//! until nothing new turns up. Problems along the way (an import that cannot be
//! found, a file that cannot be read, an import cycle) are recorded on the
//! bundle and loading carries on with what it has.
//!
//! ```no_run
//! use protean_bundle::{Bundle, Resolver};
//! use protean_common::RealFileSystem;
//! use std::path::Path;
//!
//! let resolver = Resolver::with_include_dirs(["protos".into()]);
//! let bundle = Bundle::load(Path::new("protos/api.proto"), &resolver, &RealFileSystem)?;
//! let resolution = bundle.resolve();
//! for error in bundle.errors().iter().chain(&resolution.errors) {
//!     eprintln!("{}", error);
//! }
//! # Ok::<(), protean_bundle::BundleError>(())
//! ```

use crate::error::BundleError;
use crate::graph::GraphManager;
use crate::imports::{collect_imports, package_name, ImportDecl};
use crate::resolver::Resolver;
use crate::scope::{ReferenceResolver, ResolvedReference};
use crate::symbols::{FileId, SymbolCollector, SymbolTable};
use protean_common::{walk_tree, FileSystem};
use protean_parser::{parse_with, tokenize, Fragment, ParseOptions, ParsedFile, TokenizedBuffer};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One loaded file
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    buffer: TokenizedBuffer,
    parsed: ParsedFile,
    imports: Vec<ImportDecl>,
    /// Resolved target of each entry in `imports`, `None` when not found
    resolved: Vec<Option<PathBuf>>,
    package: Option<String>,
}

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn buffer(&self) -> &TokenizedBuffer {
        &self.buffer
    }

    pub fn parsed(&self) -> &ParsedFile {
        &self.parsed
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Imports that were found, with their targets
    pub fn resolved_imports(&self) -> impl Iterator<Item = (&ImportDecl, &Path)> {
        self.imports
            .iter()
            .zip(&self.resolved)
            .filter_map(|(import, target)| Some((import, target.as_deref()?)))
    }
}

/// Result of [`Bundle::resolve`]
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub references: Vec<ResolvedReference>,
    pub errors: Vec<BundleError>,
}

#[derive(Debug, Clone, Default)]
pub struct Bundle {
    /// In load order; the entry is first
    files: Vec<SourceFile>,
    index: HashMap<PathBuf, FileId>,
    graph: GraphManager,
    errors: Vec<BundleError>,
}

impl Bundle {
    pub fn load(entry: &Path, resolver: &Resolver, fs: &dyn FileSystem) -> Result<Self, BundleError> {
        Self::load_with(entry, resolver, fs, ParseOptions::default())
    }

    /// Load `entry` and everything it imports.
    ///
    /// Fails only when the entry itself cannot be read.
    pub fn load_with(
        entry: &Path,
        resolver: &Resolver,
        fs: &dyn FileSystem,
        options: ParseOptions,
    ) -> Result<Self, BundleError> {
        let (entry, entry_source) = fs.load_source(entry)?;

        let mut bundle = Bundle::default();
        let mut seen: HashSet<PathBuf> = HashSet::from([entry.clone()]);
        let mut queue: VecDeque<(PathBuf, Option<String>)> =
            VecDeque::from([(entry, Some(entry_source))]);

        while let Some((path, source)) = queue.pop_front() {
            let source = match source.map_or_else(|| fs.read_source(&path), Ok) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read import");
                    bundle.errors.push(e.into());
                    continue;
                }
            };

            let mut file = parse_file(path, &source, options);
            debug!(
                path = %file.path.display(),
                imports = file.imports.len(),
                diagnostics = file.parsed.diagnostics.len(),
                "loaded file"
            );

            let mut dependencies = Vec::new();
            for import in &file.imports {
                match resolver.resolve_import_path(&import.path, &file.path, fs) {
                    Ok(target) => {
                        if seen.insert(target.clone()) {
                            queue.push_back((target.clone(), None));
                        }
                        dependencies.push(target.clone());
                        file.resolved.push(Some(target));
                    }
                    Err(e) => {
                        bundle.errors.push(e.into());
                        file.resolved.push(None);
                    }
                }
            }

            bundle.graph.set_dependencies(file.path.clone(), dependencies);
            bundle.index.insert(file.path.clone(), bundle.files.len());
            bundle.files.push(file);
        }

        bundle
            .errors
            .extend(bundle.graph.find_cycles().into_iter().map(BundleError::from));

        debug!(
            files = bundle.files.len(),
            errors = bundle.errors.len(),
            "bundle loaded"
        );
        Ok(bundle)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn entry(&self) -> Option<&SourceFile> {
        self.files.first()
    }

    pub fn get_file(&self, path: &Path) -> Option<&SourceFile> {
        self.index.get(path).map(|id| &self.files[*id])
    }

    /// Import and read problems found while loading
    pub fn errors(&self) -> &[BundleError] {
        &self.errors
    }

    pub fn has_parse_errors(&self) -> bool {
        self.files.iter().any(|f| f.parsed.has_errors())
    }

    pub fn get_dependencies(&self, path: &Path) -> Option<&[PathBuf]> {
        self.graph.get_dependencies(path)
    }

    /// Files that import `path`
    pub fn get_dependents(&self, path: &Path) -> Option<&[PathBuf]> {
        self.graph.get_dependents(path)
    }

    /// Files whose declarations `file` may refer to: itself, what it imports,
    /// and whatever those re-export through `import public`, transitively.
    pub fn visible_files(&self, file: FileId) -> HashSet<FileId> {
        let mut visible = HashSet::from([file]);
        let mut stack: Vec<FileId> = self.direct_imports(file, false).collect();

        while let Some(id) = stack.pop() {
            if visible.insert(id) {
                stack.extend(self.direct_imports(id, true));
            }
        }
        visible
    }

    fn direct_imports(&self, file: FileId, public_only: bool) -> impl Iterator<Item = FileId> + '_ {
        self.files[file]
            .resolved_imports()
            .filter(move |(import, _)| !public_only || import.public)
            .filter_map(|(_, target)| self.index.get(target).copied())
    }

    /// Every declaration in the bundle, plus duplicate-definition errors.
    pub fn symbol_table(&self) -> (SymbolTable, Vec<BundleError>) {
        let mut table = SymbolTable::new();
        for (id, file) in self.files.iter().enumerate() {
            let mut collector = SymbolCollector::new(&mut table, &file.buffer, id);
            walk_tree(&mut collector, &file.parsed.tree);
        }
        let paths: Vec<_> = self.files.iter().map(|f| f.path.clone()).collect();
        let errors = table.finish(&paths);
        (table, errors)
    }

    /// Resolve every type reference in every file.
    pub fn resolve(&self) -> Resolution {
        let (table, mut errors) = self.symbol_table();
        let mut references = Vec::new();

        for (id, file) in self.files.iter().enumerate() {
            let visible = self.visible_files(id);
            let mut resolver = ReferenceResolver::new(&table, &visible, &file.buffer, &file.path);
            walk_tree(&mut resolver, &file.parsed.tree);
            references.append(&mut resolver.references);
            errors.append(&mut resolver.errors);
        }

        debug!(
            symbols = table.len(),
            references = references.len(),
            errors = errors.len(),
            "resolved bundle"
        );
        Resolution { references, errors }
    }
}

fn parse_file(path: PathBuf, source: &str, options: ParseOptions) -> SourceFile {
    let buffer = tokenize(source);
    let parsed = parse_with(&buffer, options, Fragment::File);
    let imports = collect_imports(&parsed.tree, &buffer);
    let package = package_name(&parsed.tree, &buffer);
    SourceFile {
        path,
        resolved: Vec::with_capacity(imports.len()),
        buffer,
        parsed,
        imports,
        package,
    }
}
