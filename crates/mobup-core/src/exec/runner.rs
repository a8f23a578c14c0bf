use super::Environment;
use crate::error::{MobupError, Result};
use crate::log::{Event, LogContext};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    dir: Option<PathBuf>,
    stdin: Option<String>,
    env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            stdin: None,
            env: Vec::new(),
        }
    }

    /// `sh -c <script>`
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("sh").arg("-c").arg(script)
    }

    pub fn program_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Variable applied on top of the runner's environment
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_program(&self) -> &str {
        &self.program
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external commands with a fully specified environment.
///
/// Output is captured and replayed line by line into the log; a non-zero
/// exit becomes [`MobupError::SubprocessFailed`] carrying that output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    env: Environment,
    log: LogContext,
}

impl ProcessRunner {
    pub fn new(env: Environment, log: LogContext) -> Self {
        Self { env, log }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Same runner with `vars` layered on top
    pub fn with_vars(&self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut env = self.env.clone();
        env.extend(vars);
        Self {
            env,
            log: self.log.clone(),
        }
    }

    pub fn run(&self, spec: &CommandSpec) -> Result<String> {
        let command_line = spec.command_line();
        if let Some(dir) = &spec.dir {
            self.log.emit(Event::Chdir { path: dir });
        }
        self.log.emit(Event::Exec {
            command: &command_line,
        });

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .env_clear()
            .envs(self.env.iter())
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        if let Some(dir) = &spec.dir {
            command.current_dir(dir);
        }

        let spawn_error = |e: std::io::Error| MobupError::SubprocessFailed {
            command: command_line.clone(),
            status: "not started".to_string(),
            output: e.to_string(),
        };

        let mut child = command.spawn().map_err(spawn_error)?;
        if let (Some(input), Some(mut pipe)) = (&spec.stdin, child.stdin.take()) {
            // The child may exit without reading; that shows up in its status
            let _ = pipe.write_all(input.as_bytes());
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let failed = !output.status.success();
        for line in combined.lines().filter(|l| !l.trim().is_empty()) {
            self.log.emit(Event::ExecOutput { line, failed });
        }

        if failed {
            return Err(MobupError::SubprocessFailed {
                command: command_line,
                status: output.status.to_string(),
                output: combined,
            });
        }
        Ok(combined)
    }
}
