pub mod checker;
pub mod report;
pub mod topology;

pub use crate::domain::model::{Finding, Severity};
pub use crate::domain::ports::ManifestSource;
pub use crate::utils::error::Result;
pub use checker::{CheckReport, Checker};
pub use report::OutputFormat;
pub use topology::ServiceGraph;
