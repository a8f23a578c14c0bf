use mobup_core::{MobupError, Result};
use std::path::Path;

pub const GO_MOD_FILE: &str = "go.mod";

/// Extracts the module path from the text of a `go.mod` file.
///
/// Only the first `module` directive counts. Quotes and trailing line
/// comments are stripped.
pub fn parse_module_name(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.split("//").next().unwrap_or(rest).trim();
        let name = rest.trim_matches(|c| c == '"' || c == '`').trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Reads the module name declared in `<dir>/go.mod`
pub fn read_module_name(dir: &Path) -> Result<String> {
    let go_mod = dir.join(GO_MOD_FILE);
    let content = std::fs::read_to_string(&go_mod).map_err(|e| MobupError::NotAModule {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_module_name(&content).ok_or_else(|| MobupError::NotAModule {
        path: dir.to_path_buf(),
        reason: "no module directive".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_module_name() {
        assert_eq!(
            parse_module_name("module github.com/acme/app\n\ngo 1.12\n").as_deref(),
            Some("github.com/acme/app")
        );
        assert_eq!(
            parse_module_name("// header\nmodule \"example.com/quoted\"\n").as_deref(),
            Some("example.com/quoted")
        );
        assert_eq!(
            parse_module_name("module example.com/x // legacy\n").as_deref(),
            Some("example.com/x")
        );
    }

    #[test]
    fn test_parse_module_name_rejects_missing_directive() {
        assert_eq!(parse_module_name("go 1.12\nrequire x v1.0.0\n"), None);
        assert_eq!(parse_module_name("modules are great\n"), None);
        assert_eq!(parse_module_name("module\n"), None);
        assert_eq!(parse_module_name(""), None);
    }

    #[test]
    fn test_read_module_name_without_go_mod() {
        let temp = TempDir::new().unwrap();
        let err = read_module_name(temp.path()).unwrap_err();
        assert!(matches!(err, MobupError::NotAModule { .. }));
        assert!(err.to_string().starts_with("NOT_A_MODULE"));
    }

    #[test]
    fn test_read_module_name_from_disk() {
        let temp = TempDir::new().unwrap();
        mobup_testkit::modules::write_module(temp.path(), "github.com/acme/lib");
        assert_eq!(read_module_name(temp.path()).unwrap(), "github.com/acme/lib");
    }
}
