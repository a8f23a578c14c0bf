pub mod consts;
mod layout;
mod model;

pub use layout::HomeLayout;
pub use model::{
    AndroidTarget, BuildFile, BuildSection, GomobileConfig, IosTarget, Target, TargetSelection,
    ToolchainPins,
};
