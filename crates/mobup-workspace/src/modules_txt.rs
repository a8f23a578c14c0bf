//! Reader for `vendor/modules.txt`
//!
//! `go mod vendor` records one `# <module> <version>` header per vendored
//! module, optionally followed by a `=> <replacement>` clause. Package lines
//! and `## ` annotations are ignored.

use crate::deps::VendoredModule;
use crate::version::ModuleVersion;
use mobup_core::{MobupError, Result};
use std::path::Path;

pub const VENDOR_DIR: &str = "vendor";
pub const MODULES_TXT: &str = "modules.txt";

/// Module/version pairs in file order
pub fn parse_modules_txt(content: &str) -> Vec<(String, ModuleVersion)> {
    content
        .lines()
        .filter(|line| !line.starts_with("##"))
        .filter_map(|line| line.strip_prefix("# "))
        .filter_map(|header| {
            let mut fields = header.split_whitespace();
            let module = fields.next()?;
            let version = match fields.next() {
                Some(v) if v != "=>" => ModuleVersion::parse(v),
                _ => ModuleVersion::unknown(),
            };
            Some((module.to_string(), version))
        })
        .collect()
}

/// Lists the modules vendored into `<module_dir>/vendor`.
///
/// A module without dependencies has no `modules.txt`; that yields an empty
/// list.
pub fn read_vendored_modules(module_dir: &Path) -> Result<Vec<VendoredModule>> {
    let vendor = module_dir.join(VENDOR_DIR);
    let file = vendor.join(MODULES_TXT);
    let content = match std::fs::read_to_string(&file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(MobupError::io(format!("read {}", file.display()), e)),
    };

    Ok(parse_modules_txt(&content)
        .into_iter()
        .map(|(name, version)| VendoredModule {
            local: vendor.join(&name),
            name,
            version,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
# github.com/acme/lib v1.2.0
## explicit
github.com/acme/lib
github.com/acme/lib/sub
# golang.org/x/text v0.3.0
golang.org/x/text/unicode
# example.com/forked v1.0.0 => ../forked
example.com/forked
# example.com/local => ./local
example.com/local
";

    #[test]
    fn test_parse_headers_only() {
        let parsed = parse_modules_txt(SAMPLE);
        let names: Vec<&str> = parsed.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "github.com/acme/lib",
                "golang.org/x/text",
                "example.com/forked",
                "example.com/local"
            ]
        );
        assert_eq!(parsed[0].1.as_str(), "v1.2.0");
        assert_eq!(parsed[2].1.as_str(), "v1.0.0");
    }

    #[test]
    fn test_replacement_without_version_is_unparseable() {
        let parsed = parse_modules_txt(SAMPLE);
        assert!(parsed[3].1.semver().is_none());
        assert!(parse_modules_txt("# lone/module\n")[0].1.semver().is_none());
    }

    #[test]
    fn test_read_vendored_modules() {
        let temp = TempDir::new().unwrap();
        mobup_testkit::modules::write_vendor(
            temp.path(),
            &[("github.com/acme/lib", "v1.0.0"), ("example.com/x", "v0.2.0")],
        );

        let modules = read_vendored_modules(temp.path()).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "github.com/acme/lib");
        assert_eq!(
            modules[0].local,
            temp.path().join("vendor").join("github.com/acme/lib")
        );
        assert!(modules[0].local.is_dir());
    }

    #[test]
    fn test_missing_manifest_means_no_dependencies() {
        let temp = TempDir::new().unwrap();
        assert!(read_vendored_modules(temp.path()).unwrap().is_empty());
    }
}
