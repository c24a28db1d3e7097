/// Import graph
///
/// Tracks which files import which other files, in import order, and finds
/// import cycles.
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Circular dependency detected: {cycle:?}")]
    CircularDependency { cycle: Vec<PathBuf> },
}

/// Manages the import graph (file -> files it imports)
#[derive(Clone, Debug, Default)]
pub struct GraphManager {
    /// file -> files it imports
    dependencies: HashMap<PathBuf, Vec<PathBuf>>,

    /// Reverse lookup: file -> files that import it
    dependents: HashMap<PathBuf, Vec<PathBuf>>,

    /// Files in the order they were added, so walks are deterministic
    order: Vec<PathBuf>,
}

impl GraphManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all dependencies for a file at once
    pub fn set_dependencies(&mut self, source: PathBuf, targets: Vec<PathBuf>) {
        if let Some(old_targets) = self.dependencies.get(&source) {
            for old_target in old_targets {
                if let Some(deps) = self.dependents.get_mut(old_target) {
                    deps.retain(|p| p != &source);
                }
            }
        } else {
            self.order.push(source.clone());
        }

        for target in &targets {
            self.dependents
                .entry(target.clone())
                .or_default()
                .push(source.clone());
        }

        self.dependencies.insert(source, targets);
    }

    pub fn get_dependencies(&self, path: &Path) -> Option<&[PathBuf]> {
        self.dependencies.get(path).map(|v| v.as_slice())
    }

    /// Files that import `path`
    pub fn get_dependents(&self, path: &Path) -> Option<&[PathBuf]> {
        self.dependents.get(path).map(|v| v.as_slice())
    }

    /// Every import cycle reachable in the graph, each reported once as the
    /// path that closes it (first file repeated at the end).
    pub fn find_cycles(&self) -> Vec<GraphError> {
        let mut cycles = Vec::new();
        let mut visited: HashSet<&Path> = HashSet::new();

        for root in &self.order {
            if visited.contains(root.as_path()) {
                continue;
            }
            // Explicit DFS: each frame is a file and the next import to look at.
            let mut stack: Vec<(&Path, usize)> = vec![(root.as_path(), 0)];
            let mut on_path: Vec<&Path> = vec![root.as_path()];
            visited.insert(root.as_path());

            while let Some((node, next)) = stack.pop() {
                let deps = self.dependencies.get(node).map_or(&[][..], |d| d.as_slice());
                let Some(dep) = deps.get(next) else {
                    on_path.pop();
                    continue;
                };
                stack.push((node, next + 1));

                if let Some(start) = on_path.iter().position(|p| *p == dep.as_path()) {
                    let mut cycle: Vec<PathBuf> =
                        on_path[start..].iter().map(|p| p.to_path_buf()).collect();
                    cycle.push(dep.clone());
                    cycles.push(GraphError::CircularDependency { cycle });
                } else if visited.insert(dep.as_path()) {
                    stack.push((dep.as_path(), 0));
                    on_path.push(dep.as_path());
                }
            }
        }

        cycles
    }
}
