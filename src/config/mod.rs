#[cfg(feature = "cli")]
pub mod cli;
pub mod lint;
pub mod manifest;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use lint::{LintConfig, LintSettings};
pub use manifest::{ComposeManifest, ServiceDef};
