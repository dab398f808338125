use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "compose-lint")]
#[command(about = "Validate and inspect dev-stack compose manifests")]
pub struct CliConfig {
    /// Manifest location: a file path or an http(s) URL
    #[arg(default_value = "docker-compose.yml")]
    pub manifest: String,

    /// Output format for the report (text, csv, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Suppress the header row in text and csv output
    #[arg(long)]
    pub no_header: bool,

    /// Path to a lint settings TOML file
    #[arg(long)]
    pub config: Option<String>,

    /// Treat warnings as errors for the exit code
    #[arg(long)]
    pub strict: bool,

    /// Timeout for remote manifest fetches
    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn is_remote(&self) -> bool {
        self.manifest.starts_with("http://") || self.manifest.starts_with("https://")
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.is_remote() {
            crate::utils::validation::validate_url("manifest", &self.manifest)?;
        } else {
            crate::utils::validation::validate_path("manifest", &self.manifest)?;
        }

        // Format strings are parsed later; fail early on typos
        self.output.parse::<crate::core::report::OutputFormat>()?;

        crate::utils::validation::validate_positive_number(
            "timeout_seconds",
            self.timeout_seconds as usize,
            1,
        )?;

        if let Some(config) = &self.config {
            crate::utils::validation::validate_path("config", config)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            manifest: "docker-compose.yml".to_string(),
            output: "text".to_string(),
            no_header: false,
            config: None,
            strict: false,
            timeout_seconds: 10,
            verbose: false,
            log_json: false,
        }
    }

    #[test]
    fn test_local_and_remote_detection() {
        let mut config = base_config();
        assert!(!config.is_remote());
        assert!(config.validate().is_ok());

        config.manifest = "https://ci.example.com/stacks/dev.yml".to_string();
        assert!(config.is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_output_format_is_rejected() {
        let mut config = base_config();
        config.output = "tabular3000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = base_config();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
