use super::consts::pins;
use crate::error::{MobupError, Result};
use crate::path::SlashPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// mobup.toml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildFile {
    pub name: String,
    #[serde(default)]
    pub before_script: Vec<String>,
    /// Extra environment; the inherited process environment wins on conflicts
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildSection {
    #[serde(default)]
    pub gomobile: Option<GomobileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GomobileConfig {
    /// Local paths (relative to the base dir) or remote module specifiers
    pub modules: Vec<String>,
    /// Go packages handed to `gomobile bind`
    #[serde(default)]
    pub export: Vec<String>,
    #[serde(default)]
    pub toolchain: ToolchainPins,
    #[serde(default)]
    pub android: Option<AndroidTarget>,
    #[serde(default)]
    pub ios: Option<IosTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainPins {
    #[serde(default = "default_go")]
    pub go: String,
    #[serde(default = "default_gomobile")]
    pub gomobile: String,
    #[serde(default = "default_ndk")]
    pub ndk: String,
    #[serde(default = "default_sdk")]
    pub sdk: String,
    #[serde(default = "default_jdk")]
    pub jdk: String,
}

impl Default for ToolchainPins {
    fn default() -> Self {
        Self {
            go: default_go(),
            gomobile: default_gomobile(),
            ndk: default_ndk(),
            sdk: default_sdk(),
            jdk: default_jdk(),
        }
    }
}

fn default_go() -> String {
    pins::GO.to_string()
}

fn default_gomobile() -> String {
    pins::GOMOBILE.to_string()
}

fn default_ndk() -> String {
    pins::NDK.to_string()
}

fn default_sdk() -> String {
    pins::SDK.to_string()
}

fn default_jdk() -> String {
    pins::JDK.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidTarget {
    /// Defaults to `./<name>.aar`
    #[serde(default)]
    pub out: Option<SlashPath>,
    #[serde(default)]
    pub javapkg: Option<String>,
    #[serde(default)]
    pub ldflags: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IosTarget {
    /// Defaults to `./<name>.framework`
    #[serde(default)]
    pub out: Option<SlashPath>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub bundleid: Option<String>,
    #[serde(default)]
    pub ldflags: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// A compile target the build file can configure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Android,
    Ios,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Android, Target::Ios];

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Android => "gomobile/android",
            Target::Ios => "gomobile/ios",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Targets requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelection(Vec<Target>);

impl TargetSelection {
    pub fn all() -> Self {
        Self(Target::ALL.to_vec())
    }

    /// Parses names such as `all` or `gomobile/ios`
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Ok(Self::all());
        }
        let mut selected = Vec::new();
        for name in names {
            match name.as_ref().trim() {
                "all" => return Ok(Self::all()),
                other => {
                    let target = Target::from_str(other)?;
                    if !selected.contains(&target) {
                        selected.push(target);
                    }
                }
            }
        }
        selected.sort();
        Ok(Self(selected))
    }

    pub fn contains(&self, target: Target) -> bool {
        self.0.contains(&target)
    }
}

impl FromStr for Target {
    type Err = MobupError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gomobile/android" => Ok(Target::Android),
            "gomobile/ios" => Ok(Target::Ios),
            other => Err(MobupError::ConfigError(format!(
                "unknown target '{other}' (expected all, gomobile/android or gomobile/ios)"
            ))),
        }
    }
}

impl BuildFile {
    /// Reads and validates a build file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MobupError::ConfigError(format!("cannot read build file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: BuildFile =
            toml::from_str(content).map_err(|e| MobupError::ConfigError(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MobupError::ConfigError("project name is empty".to_string()));
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(MobupError::ConfigError(format!(
                "project name '{name}' must be a single path segment"
            )));
        }
        if self.gomobile().is_some_and(|g| g.modules.is_empty()) {
            return Err(MobupError::ConfigError(
                "build.gomobile.modules must name at least one module".to_string(),
            ));
        }
        Ok(())
    }

    pub fn gomobile(&self) -> Option<&GomobileConfig> {
        self.build.gomobile.as_ref()
    }

    /// Toolchain versions, defaulted when the gomobile section is absent
    pub fn pins(&self) -> ToolchainPins {
        self.gomobile()
            .map(|g| g.toolchain.clone())
            .unwrap_or_default()
    }

    /// Targets that are both selected and configured, in fixed order
    pub fn enabled_targets(&self, selection: &TargetSelection) -> Vec<Target> {
        let Some(gomobile) = self.gomobile() else {
            return Vec::new();
        };
        Target::ALL
            .into_iter()
            .filter(|t| selection.contains(*t))
            .filter(|t| match t {
                Target::Android => gomobile.android.is_some(),
                Target::Ios => gomobile.ios.as_ref().is_some_and(|ios| !ios.disabled),
            })
            .collect()
    }

    /// Output location of `target`, resolved against `base`
    pub fn output_path(&self, target: Target, base: &SlashPath) -> SlashPath {
        let configured = self.gomobile().and_then(|g| match target {
            Target::Android => g.android.as_ref().and_then(|a| a.out.clone()),
            Target::Ios => g.ios.as_ref().and_then(|i| i.out.clone()),
        });
        let out = configured.unwrap_or_else(|| {
            let ext = match target {
                Target::Android => "aar",
                Target::Ios => "framework",
            };
            SlashPath::from(format!("./{}.{ext}", self.name))
        });
        out.resolve(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name = "myproject"
before_script = ["./gen.sh"]

[variables]
CGO_ENABLED = "1"

[build.gomobile]
modules = ["./libGo", "github.com/acme/remote"]
export = ["mycompany/myproject/pkga"]

[build.gomobile.toolchain]
go = "1.13.1"

[build.gomobile.android]
out = "./out/lib.aar"
javapkg = "com.acme"
ldflags = "-s -w"

[build.gomobile.ios]
prefix = "ACM"
"#;

    #[test]
    fn test_parse_minimal_build_file() {
        let file = BuildFile::from_toml("name = \"demo\"").unwrap();
        assert_eq!(file.name, "demo");
        assert!(file.before_script.is_empty());
        assert!(file.gomobile().is_none());
        assert_eq!(file.pins(), ToolchainPins::default());
        assert!(file.enabled_targets(&TargetSelection::all()).is_empty());
    }

    #[test]
    fn test_parse_full_build_file() {
        let file = BuildFile::from_toml(FULL).unwrap();
        let gomobile = file.gomobile().unwrap();

        assert_eq!(file.variables.get("CGO_ENABLED").map(String::as_str), Some("1"));
        assert_eq!(gomobile.modules.len(), 2);
        assert_eq!(gomobile.export, vec!["mycompany/myproject/pkga"]);

        let pins = file.pins();
        assert_eq!(pins.go, "1.13.1");
        assert_eq!(pins.jdk, "8u212b03");
        assert_eq!(pins.sdk, "4333796");

        let android = gomobile.android.as_ref().unwrap();
        assert_eq!(android.javapkg.as_deref(), Some("com.acme"));
    }

    #[test]
    fn test_output_paths() {
        let file = BuildFile::from_toml(FULL).unwrap();
        let base = SlashPath::from("/work/app");
        assert_eq!(
            file.output_path(Target::Android, &base).to_string(),
            "/work/app/out/lib.aar"
        );
        assert_eq!(
            file.output_path(Target::Ios, &base).to_string(),
            "/work/app/myproject.framework"
        );
    }

    #[test]
    fn test_enabled_targets_respects_selection_and_disabled() {
        let file = BuildFile::from_toml(FULL).unwrap();
        assert_eq!(
            file.enabled_targets(&TargetSelection::all()),
            vec![Target::Android, Target::Ios]
        );

        let only_ios = TargetSelection::parse(&["gomobile/ios"]).unwrap();
        assert_eq!(file.enabled_targets(&only_ios), vec![Target::Ios]);

        let disabled = FULL.replace("prefix = \"ACM\"", "disabled = true");
        let file = BuildFile::from_toml(&disabled).unwrap();
        assert_eq!(
            file.enabled_targets(&TargetSelection::all()),
            vec![Target::Android]
        );
    }

    #[test]
    fn test_target_selection_parse() {
        assert_eq!(TargetSelection::parse::<&str>(&[]).unwrap(), TargetSelection::all());
        assert_eq!(
            TargetSelection::parse(&["gomobile/ios", "all"]).unwrap(),
            TargetSelection::all()
        );
        let err = TargetSelection::parse(&["gomobile/web"]).unwrap_err();
        assert!(err.to_string().starts_with("CONFIG_ERROR"));
    }

    #[test]
    fn test_rejects_bad_project_names() {
        for name in ["", "a/b", "..", "  "] {
            let toml = format!("name = \"{name}\"");
            assert!(BuildFile::from_toml(&toml).is_err(), "{name:?}");
        }
    }

    #[test]
    fn test_rejects_empty_module_list() {
        let toml = "name = \"demo\"\n[build.gomobile]\nmodules = []\n";
        assert!(BuildFile::from_toml(toml).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = BuildFile::from_file("/definitely/not/here/mobup.toml").unwrap_err();
        assert!(matches!(err, MobupError::ConfigError(_)));
    }
}
