//! Structured diagnostics
//!
//! Components never reach for a process-wide logger. Each one is handed a
//! [`LogContext`] at construction time and reports through typed [`Event`]
//! records, which are rendered into `tracing` events with named fields. The
//! subscriber itself is installed once by the binary.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

mod event;

pub use event::{Event, HashKind};

/// Keys whose values are hidden when the environment is logged
pub const PROTECTED_ENV_KEYS: [&str; 5] = ["ssh", "rsa", "passwd", "password", "token"];

/// Placeholder logged instead of a protected value
pub const HIDDEN: &str = "<HIDDEN>";

/// Returns true if `key` looks like it carries a credential
pub fn is_protected_env_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    PROTECTED_ENV_KEYS.iter().any(|p| lower.contains(p))
}

/// Logging handle passed to every component.
///
/// Cloning is cheap; [`LogContext::scoped`] derives a handle that tags every
/// event with a different component name and keeps the project it belongs to.
#[derive(Debug, Clone)]
pub struct LogContext {
    component: &'static str,
    project: Option<Arc<str>>,
}

impl LogContext {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            project: None,
        }
    }

    /// Events are recorded inside a `project` span carrying `name`
    pub fn with_project(mut self, name: &str) -> Self {
        self.project = Some(Arc::from(name));
        self
    }

    pub fn scoped(&self, component: &'static str) -> Self {
        Self {
            component,
            project: self.project.clone(),
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn emit(&self, event: Event<'_>) {
        match self.project() {
            Some(name) => {
                let _span = tracing::info_span!("project", name).entered();
                event.record(self.component);
            }
            None => event.record(self.component),
        }
    }

    /// Runs the outcome of a cleanup step through the best-effort policy:
    /// failures are reported at debug level and then discarded.
    pub fn best_effort<T, E: fmt::Display>(
        &self,
        operation: &'static str,
        path: &Path,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.emit(Event::BestEffortFailed {
                    operation,
                    path,
                    error: &e.to_string(),
                });
                None
            }
        }
    }

    /// Emits [`Event::PhaseDone`] with the time elapsed since `started`
    pub fn phase_done(&self, phase: &'static str, started: std::time::Instant) {
        let elapsed: Duration = started.elapsed();
        self.emit(Event::PhaseDone { phase, elapsed });
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new("mobup")
    }
}
