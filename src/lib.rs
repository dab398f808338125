pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{source_for, HttpManifestSource, LocalManifestSource};
pub use config::{ComposeManifest, LintConfig, LintSettings};
pub use core::{CheckReport, Checker, OutputFormat, ServiceGraph};
pub use domain::model::{Finding, Severity};
pub use domain::ports::ManifestSource;
pub use utils::error::{LintError, Result};
