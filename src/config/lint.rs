use crate::utils::error::{LintError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML settings file controlling rule behavior. Absent keys
/// fall back to the defaults in `LintSettings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    pub rules: Option<RuleSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSettings {
    pub require_loopback_ports: Option<bool>,
    pub require_pinned_images: Option<bool>,
    pub allowed_restart_policies: Option<Vec<String>>,
    pub max_services: Option<usize>,
}

/// Resolved settings the checker runs with.
#[derive(Debug, Clone)]
pub struct LintSettings {
    pub require_loopback_ports: bool,
    pub require_pinned_images: bool,
    pub allowed_restart_policies: Vec<String>,
    pub max_services: usize,
}

impl Default for LintSettings {
    fn default() -> Self {
        LintSettings {
            require_loopback_ports: true,
            require_pinned_images: false,
            allowed_restart_policies: vec![
                "no".to_string(),
                "always".to_string(),
                "on-failure".to_string(),
                "unless-stopped".to_string(),
            ],
            max_services: 50,
        }
    }
}

impl LintConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| LintError::ConfigValidationError {
            field: "lint_config".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn into_settings(self) -> LintSettings {
        let defaults = LintSettings::default();
        match self.rules {
            None => defaults,
            Some(rules) => LintSettings {
                require_loopback_ports: rules
                    .require_loopback_ports
                    .unwrap_or(defaults.require_loopback_ports),
                require_pinned_images: rules
                    .require_pinned_images
                    .unwrap_or(defaults.require_pinned_images),
                allowed_restart_policies: rules
                    .allowed_restart_policies
                    .unwrap_or(defaults.allowed_restart_policies),
                max_services: rules.max_services.unwrap_or(defaults.max_services),
            },
        }
    }
}

impl Validate for LintSettings {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_positive_number(
            "rules.max_services",
            self.max_services,
            1,
        )?;

        let known = ["no", "always", "on-failure", "unless-stopped"];
        for policy in &self.allowed_restart_policies {
            if !known.contains(&policy.as_str()) {
                return Err(LintError::InvalidConfigValueError {
                    field: "rules.allowed_restart_policies".to_string(),
                    value: policy.clone(),
                    reason: format!("Unknown policy. Valid policies: {}", known.join(", ")),
                });
            }
        }

        Ok(())
    }
}
