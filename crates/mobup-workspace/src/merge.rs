//! Flattening Go modules into a single GOPATH-style source tree
//!
//! gomobile only understands `GOPATH/src`. Every declared module is copied to
//! `src/<module>` and vendored in place; the vendored dependencies of all
//! modules are then pooled, and for each dependency the highest version is
//! moved to `src/<dependency>`.

use crate::deps::{DependencySet, VendoredModule};
use crate::module::read_module_name;
use crate::modules_txt::{VENDOR_DIR, read_vendored_modules};
use crate::tool::ModuleTool;
use mobup_core::fs::{copy_tree, remove_dir_all_if_exists};
use mobup_core::log::{Event, LogContext};
use mobup_core::path::SlashPath;
use mobup_core::{MobupError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const SRC_DIR: &str = "src";

/// Joins a `/`-separated module name onto `base`
fn join_module(base: &Path, name: &str) -> PathBuf {
    SlashPath::from(name)
        .names()
        .iter()
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// The local directory `spec` names relative to `base_dir`, if it exists
pub fn local_source(spec: &str, base_dir: &SlashPath) -> Option<PathBuf> {
    let path = SlashPath::from(spec).resolve(base_dir).to_path_buf();
    path.exists().then_some(path)
}

/// Where the sources for `spec` are read from: a local directory relative to
/// `base_dir` if one exists, otherwise the module cache of `workspace`
pub fn module_source(spec: &str, base_dir: &SlashPath, workspace: &Path) -> PathBuf {
    local_source(spec, base_dir)
        .unwrap_or_else(|| join_module(&workspace.join("pkg").join("mod"), spec))
}

/// A declared module after it has been copied into the workspace
#[derive(Debug, Clone)]
pub struct RootModule {
    pub name: String,
    pub source: PathBuf,
    pub copy: PathBuf,
}

#[derive(Debug)]
pub struct MergeReport {
    pub roots: Vec<RootModule>,
    pub dependencies: DependencySet,
}

pub struct DependencyMerger<'a, T: ModuleTool + ?Sized> {
    workspace: PathBuf,
    base_dir: SlashPath,
    tool: &'a T,
    log: LogContext,
}

impl<'a, T: ModuleTool + ?Sized> DependencyMerger<'a, T> {
    pub fn new(
        workspace: impl Into<PathBuf>,
        base_dir: SlashPath,
        tool: &'a T,
        log: LogContext,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            base_dir,
            tool,
            log,
        }
    }

    pub fn src_dir(&self) -> PathBuf {
        self.workspace.join(SRC_DIR)
    }

    /// Location of module `name` inside the workspace
    pub fn target_dir(&self, name: &str) -> PathBuf {
        join_module(&self.src_dir(), name)
    }

    pub fn merge(&self, specs: &[String]) -> Result<MergeReport> {
        let roots = specs
            .iter()
            .map(|spec| self.resolve_root(spec))
            .collect::<Result<Vec<_>>>()?;

        // Enclosing roots first, so a later copy never wipes a nested root
        let mut staging: Vec<&RootModule> = roots.iter().collect();
        staging.sort_by_key(|r| SlashPath::from(r.name.as_str()).names().len());
        for root in staging {
            self.stage_root(root)?;
        }

        let mut dependencies = DependencySet::new();
        for root in &roots {
            for module in read_vendored_modules(&root.copy)? {
                self.log.emit(Event::DependencySeen {
                    module: &module.name,
                    version: module.version.as_str(),
                });
                let (name, version) = (module.name.clone(), module.version.to_string());
                if dependencies.offer(module) {
                    self.log.emit(Event::DependencyUpgraded {
                        module: &name,
                        version: &version,
                    });
                }
            }
        }

        self.clear_targets(&roots, &dependencies)?;
        self.move_dependencies(&roots, &dependencies)?;

        for root in &roots {
            let vendor = root.copy.join(VENDOR_DIR);
            self.log.emit(Event::Remove { path: &vendor });
            remove_dir_all_if_exists(&vendor)?;
        }

        Ok(MergeReport {
            roots,
            dependencies,
        })
    }

    /// Resolves `spec` to its sources, fetching remote modules first
    fn resolve_root(&self, spec: &str) -> Result<RootModule> {
        let source = match local_source(spec, &self.base_dir) {
            Some(path) => path,
            None => {
                self.tool.fetch(spec, &self.workspace)?;
                module_source(spec, &self.base_dir, &self.workspace)
            }
        };

        let name = read_module_name(&source)?;
        self.log.emit(Event::ModuleFound {
            path: &source,
            name: &name,
        });
        let copy = self.target_dir(&name);
        Ok(RootModule { name, source, copy })
    }

    /// Copies a root to `src/<module>` and vendors the copy
    fn stage_root(&self, root: &RootModule) -> Result<()> {
        self.log.emit(Event::Remove { path: &root.copy });
        remove_dir_all_if_exists(&root.copy)?;
        self.log.emit(Event::Copy {
            from: &root.source,
            to: &root.copy,
        });
        copy_tree(&root.source, &root.copy)?;
        self.tool.vendor(&root.copy)
    }

    /// First pass: wipe each dependency's destination exactly once.
    ///
    /// A destination that contains a root copy or a staged dependency is
    /// left alone; the second pass merges into it instead.
    fn clear_targets(&self, roots: &[RootModule], dependencies: &DependencySet) -> Result<()> {
        let protected: Vec<&Path> = roots
            .iter()
            .map(|r| r.copy.as_path())
            .chain(dependencies.iter().map(|d| d.local.as_path()))
            .collect();

        for dep in dependencies.iter() {
            if is_root(roots, &dep.name) {
                continue;
            }
            let target = self.target_dir(&dep.name);
            if protected.iter().any(|p| p.starts_with(&target)) {
                continue;
            }
            self.log.emit(Event::Remove { path: &target });
            remove_dir_all_if_exists(&target)?;
        }
        Ok(())
    }

    /// Second pass: move every winning dependency into place, in name order
    fn move_dependencies(&self, roots: &[RootModule], dependencies: &DependencySet) -> Result<()> {
        let deps: Vec<&VendoredModule> = dependencies.iter().collect();

        for (idx, dep) in deps.iter().enumerate() {
            if is_root(roots, &dep.name) {
                self.log.emit(Event::MoveSkipped {
                    from: &dep.local,
                    reason: "declared as a root module",
                });
                continue;
            }
            // Nested modules travel with their parent directory
            if !dep.local.exists() {
                self.log.emit(Event::MoveSkipped {
                    from: &dep.local,
                    reason: "already absent, moved with its parent",
                });
                continue;
            }

            let target = self.target_dir(&dep.name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| MobupError::io(format!("create {}", parent.display()), e))?;
            }
            self.log.emit(Event::Move {
                from: &dep.local,
                to: &target,
            });

            if target.exists() {
                let guarded = roots
                    .iter()
                    .map(|r| r.copy.as_path())
                    .chain(deps[idx + 1..].iter().map(|d| d.local.as_path()))
                    .any(|p| p.starts_with(&target));
                if guarded {
                    self.move_into(&dep.local, &target)?;
                    continue;
                }
                remove_dir_all_if_exists(&target)?;
            }
            rename(&dep.local, &target)?;
        }
        Ok(())
    }

    /// Moves the entries of `from` into the existing directory `to`.
    ///
    /// Directories present on both sides are merged; existing directories
    /// are never replaced by files.
    fn move_into(&self, from: &Path, to: &Path) -> Result<()> {
        let entries =
            fs::read_dir(from).map_err(|e| MobupError::io(format!("read {}", from.display()), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| MobupError::io(format!("read {}", from.display()), e))?;
            let src = entry.path();
            let dst = to.join(entry.file_name());

            if dst.is_dir() {
                if src.is_dir() {
                    self.move_into(&src, &dst)?;
                } else {
                    self.log.emit(Event::MoveSkipped {
                        from: &src,
                        reason: "destination is a directory",
                    });
                }
                continue;
            }
            if dst.exists() {
                fs::remove_file(&dst)
                    .map_err(|e| MobupError::io(format!("remove {}", dst.display()), e))?;
            }
            rename(&src, &dst)?;
        }
        Ok(())
    }
}

fn is_root(roots: &[RootModule], name: &str) -> bool {
    roots.iter().any(|r| r.name == name)
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| {
        MobupError::io(format!("move {} to {}", from.display(), to.display()), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_join_module_splits_on_slashes() {
        let joined = join_module(Path::new("/ws/src"), "github.com/acme/lib");
        assert_eq!(joined, Path::new("/ws/src/github.com/acme/lib"));
    }

    #[test]
    fn test_module_source_prefers_local_directory() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("app");
        fs::create_dir_all(base.join("libGo")).unwrap();
        let base_dir = SlashPath::from(base.as_path());
        let ws = temp.path().join("ws");

        assert_eq!(
            module_source("./libGo", &base_dir, &ws),
            SlashPath::from("libGo").resolve(&base_dir).to_path_buf()
        );
        assert_eq!(
            module_source("github.com/acme/remote", &base_dir, &ws),
            ws.join("pkg/mod/github.com/acme/remote")
        );
    }
}
