//! Everything a command needs, resolved once from the command line

use crate::cli::Cli;
use anyhow::{Context as _, Result};
use mobup_core::cache::{ArtifactOutput, BuildCache};
use mobup_core::config::{BuildFile, HomeLayout, Target, TargetSelection};
use mobup_core::log::{Event, LogContext};
use mobup_core::path::SlashPath;
use mobup_workspace::local_source;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Context {
    pub base_dir: SlashPath,
    pub build_file: PathBuf,
    pub build: BuildFile,
    pub home: HomeLayout,
    pub targets: Vec<Target>,
    pub resources: String,
    pub lock_timeout: Option<Duration>,
    pub log: LogContext,
}

impl Context {
    /// Resolves paths and loads the build file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The current directory cannot be determined
    /// - The build file is missing or invalid
    /// - A target name is unknown
    pub fn new(cli: &Cli) -> Result<Self> {
        let cwd = env::current_dir().context("cannot determine current directory")?;
        let absolute = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                cwd.join(p)
            }
        };

        let dir = absolute(cli.dir.as_deref().unwrap_or(cwd.as_path()));
        let base_dir = SlashPath::from(dir.as_path()).normalize();
        let build_file = SlashPath::from(cli.build_file.as_str())
            .resolve(&base_dir)
            .to_path_buf();

        let log = LogContext::default();
        let build = BuildFile::from_file(&build_file)?;
        log.emit(Event::ConfigLoaded {
            path: &build_file,
            project: &build.name,
        });
        let log = log.with_project(&build.name);

        let home = match &cli.home {
            Some(root) => HomeLayout::new(absolute(root)),
            None => HomeLayout::new(HomeLayout::default_root()?),
        };

        let selection = TargetSelection::parse(&cli.target_names())?;
        let targets = build.enabled_targets(&selection);

        Ok(Self {
            base_dir,
            build_file,
            build,
            home,
            targets,
            resources: cli.resources.to_string(),
            lock_timeout: cli.lock_timeout(),
            log,
        })
    }

    pub fn project(&self) -> &str {
        &self.build.name
    }

    pub fn project_dir(&self) -> PathBuf {
        self.home.project_dir(self.project())
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.home.workspace_dir(self.project())
    }

    pub fn module_specs(&self) -> &[String] {
        self.build
            .gomobile()
            .map(|g| g.modules.as_slice())
            .unwrap_or_default()
    }

    pub fn outputs(&self) -> Vec<ArtifactOutput> {
        self.targets
            .iter()
            .map(|target| ArtifactOutput {
                target: *target,
                path: self.build.output_path(*target, &self.base_dir).to_path_buf(),
            })
            .collect()
    }

    /// Module roots that live next to the build file; remote modules are
    /// pinned by the build file alone
    pub fn local_module_roots(&self) -> Vec<PathBuf> {
        self.module_specs()
            .iter()
            .filter_map(|spec| local_source(spec, &self.base_dir))
            .collect()
    }

    pub fn build_cache(&self) -> BuildCache {
        BuildCache::new(
            self.home.cache_file(self.project()),
            &self.build_file,
            self.local_module_roots(),
            self.outputs(),
            self.log.scoped("cache"),
        )
    }
}
