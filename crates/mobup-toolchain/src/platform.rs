//! Host platform in Go naming (`GOOS`/`GOARCH`)

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    pub fn current() -> Self {
        Self::new(go_os(std::env::consts::OS), go_arch(std::env::consts::ARCH))
    }

    pub fn is_darwin(&self) -> bool {
        self.os == "darwin"
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Maps a Rust `target_os` name to `GOOS`
pub fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Maps a Rust `target_arch` name to `GOARCH`
pub fn go_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "arm" => "arm",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_names() {
        assert_eq!(go_os("macos"), "darwin");
        assert_eq!(go_os("linux"), "linux");
        assert_eq!(go_os("windows"), "windows");
        assert_eq!(go_arch("x86_64"), "amd64");
        assert_eq!(go_arch("aarch64"), "arm64");
        assert_eq!(go_arch("x86"), "386");
    }

    #[test]
    fn test_current_platform_uses_go_names() {
        let platform = Platform::current();
        assert_ne!(platform.os, "macos");
        assert_ne!(platform.arch, "x86_64");
        assert_ne!(platform.arch, "aarch64");
        assert!(!platform.os.is_empty());
    }
}
