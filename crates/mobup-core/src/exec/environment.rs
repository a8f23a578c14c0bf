use crate::log::{Event, HIDDEN, LogContext, is_protected_env_key};
use std::collections::BTreeMap;

/// Complete environment handed to every sub-process.
///
/// Later layers win: build file variables, then the inherited process
/// environment, then toolchain variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build file variables overlaid with the current process environment
    pub fn inherit<'a>(variables: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let mut env = Self::new();
        env.extend(variables.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        env.extend(std::env::vars());
        env
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn extend(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        self.vars.extend(vars);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Pairs safe to print: credential-looking values are replaced
    pub fn redacted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().map(|(k, v)| {
            if is_protected_env_key(k) {
                (k, HIDDEN)
            } else {
                (k, v)
            }
        })
    }

    pub fn log(&self, log: &LogContext) {
        for (key, value) in self.redacted() {
            log.emit(Event::SetEnv { key, value });
        }
    }
}
