//! Constants shared across the workspace

/// File and directory names below the home directory
pub mod home {
    pub const DIR_NAME: &str = ".mobup";
    pub const ENV_VAR: &str = "MOBUP_HOME";
    pub const TOOLCHAINS_DIR: &str = "toolchains";
    pub const CATALOG_FILE: &str = "resources.toml";
    pub const CACHE_FILE: &str = "artifacts.json";
    pub const WORKSPACE_DIR: &str = "go";
}

/// Toolchain versions used when the build file does not pin one
pub mod pins {
    pub const GO: &str = "1.12.4";
    pub const GOMOBILE: &str = "wdy-v0.0.1";
    pub const NDK: &str = "r19c";
    pub const SDK: &str = "4333796";
    pub const JDK: &str = "8u212b03";
}

pub const DEFAULT_BUILD_FILE: &str = "mobup.toml";
