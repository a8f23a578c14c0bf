//! Go module workspace assembly for gomobile
//!
//! [`DependencyMerger`] turns a list of module specs into a GOPATH tree in
//! which every module and dependency appears exactly once.

pub mod deps;
pub mod merge;
pub mod module;
pub mod modules_txt;
pub mod tool;
pub mod version;

pub use deps::{DependencySet, VendoredModule};
pub use merge::{DependencyMerger, MergeReport, RootModule, local_source, module_source};
pub use module::read_module_name;
pub use tool::{GoModTool, ModuleTool};
pub use version::ModuleVersion;
