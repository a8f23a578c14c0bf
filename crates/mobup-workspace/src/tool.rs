use mobup_core::Result;
use mobup_core::exec::{CommandSpec, ProcessRunner};
use std::path::{Path, PathBuf};

/// The Go module operations the merger depends on
pub trait ModuleTool {
    /// Populates `<module_dir>/vendor` for the module rooted at `module_dir`
    fn vendor(&self, module_dir: &Path) -> Result<()>;

    /// Downloads the remote module `spec` into the module cache under
    /// `workspace`
    fn fetch(&self, spec: &str, workspace: &Path) -> Result<()>;
}

/// [`ModuleTool`] backed by the provisioned `go` binary, always in module mode
#[derive(Debug, Clone)]
pub struct GoModTool {
    go: PathBuf,
    runner: ProcessRunner,
}

impl GoModTool {
    pub fn new(go: impl Into<PathBuf>, runner: ProcessRunner) -> Self {
        Self {
            go: go.into(),
            runner,
        }
    }

    fn go(&self, dir: &Path) -> CommandSpec {
        CommandSpec::program_path(&self.go)
            .current_dir(dir)
            .env("GO111MODULE", "on")
    }
}

impl ModuleTool for GoModTool {
    fn vendor(&self, module_dir: &Path) -> Result<()> {
        self.runner
            .run(&self.go(module_dir).args(["mod", "vendor"]))
            .map(|_| ())
    }

    fn fetch(&self, spec: &str, workspace: &Path) -> Result<()> {
        self.runner
            .run(&self.go(workspace).arg("get").arg(spec))
            .map(|_| ())
    }
}
