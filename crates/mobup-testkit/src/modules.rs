//! Fake Go module trees
//!
//! Mirrors what `go mod vendor` leaves behind closely enough for the merger:
//! a `go.mod`, one source file per package and `vendor/modules.txt`.

use std::fs;
use std::path::Path;

/// Writes `go.mod` and a single source file for module `name` into `dir`
pub fn write_module(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("go.mod"), format!("module {name}\n\ngo 1.12\n")).unwrap();
    let package = name.rsplit('/').next().unwrap_or(name);
    fs::write(
        dir.join(format!("{package}.go")),
        format!("package {package}\n"),
    )
    .unwrap();
}

/// Content written into every vendored dependency, so tests can tell which
/// version ended up in the workspace
pub fn version_marker(version: &str) -> String {
    format!("package vendored\n\n// version {version}\n")
}

/// Populates `<module_dir>/vendor` with `deps` and a matching `modules.txt`
pub fn write_vendor(module_dir: &Path, deps: &[(&str, &str)]) {
    let vendor = module_dir.join("vendor");
    fs::create_dir_all(&vendor).unwrap();
    let mut manifest = String::new();
    for (module, version) in deps {
        manifest.push_str(&format!("# {module} {version}\n## explicit\n{module}\n"));
        let dir = vendor.join(module);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("vendored.go"), version_marker(version)).unwrap();
    }
    fs::write(vendor.join("modules.txt"), manifest).unwrap();
}

/// Reads back the marker left by [`write_vendor`]
pub fn read_version(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join("vendored.go")).ok()?;
    content
        .lines()
        .find_map(|l| l.strip_prefix("// version "))
        .map(str::to_string)
}
