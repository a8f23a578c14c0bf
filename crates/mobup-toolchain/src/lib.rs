pub mod bind;
pub mod catalog;
pub mod env;
pub mod http;
pub mod install;
pub mod mobile;
pub mod platform;

pub use catalog::{Resource, ResourceCatalog};
pub use env::{ToolchainLayout, ToolchainSet, provision_toolchains};
pub use install::{Provisioner, ToolchainInstallation};
pub use platform::Platform;
