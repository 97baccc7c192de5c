//! Module lifecycle, migrations, and layered settings shared by every crate
//! in the workspace.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
pub use settings::Settings;
