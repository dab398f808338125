use crate::utils::error::{LintError, Result};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LintError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Service names must be addressable as hostnames between linked containers.
pub fn validate_service_name(field_name: &str, name: &str) -> Result<()> {
    let re = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$").unwrap();
    if !re.is_match(name) {
        return Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Service names may only contain alphanumerics, '.', '_' and '-', and must not start with a separator".to_string(),
        });
    }
    Ok(())
}

pub fn validate_env_key(field_name: &str, key: &str) -> Result<()> {
    // Dots are allowed: search-index images take settings like
    // discovery.type through the environment
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").unwrap();
    if !re.is_match(key) {
        return Err(LintError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: key.to_string(),
            reason: "Environment keys must match [A-Za-z_][A-Za-z0-9_.]*".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("manifest", "https://example.com/stack.yml").is_ok());
        assert!(validate_url("manifest", "http://example.com/stack.yml").is_ok());
        assert!(validate_url("manifest", "").is_err());
        assert!(validate_url("manifest", "not-a-url").is_err());
        assert!(validate_url("manifest", "ftp://example.com/stack.yml").is_err());
    }

    #[test]
    fn test_validate_service_name() {
        assert!(validate_service_name("services", "timesketch").is_ok());
        assert!(validate_service_name("services", "es-node_1.local").is_ok());
        assert!(validate_service_name("services", "-leading-dash").is_err());
        assert!(validate_service_name("services", "spaced name").is_err());
        assert!(validate_service_name("services", "").is_err());
    }

    #[test]
    fn test_validate_env_key() {
        assert!(validate_env_key("environment", "POSTGRES_USER").is_ok());
        assert!(validate_env_key("environment", "_private").is_ok());
        assert!(validate_env_key("environment", "discovery.type").is_ok());
        assert!(validate_env_key("environment", "1BAD").is_err());
        assert!(validate_env_key("environment", "BAD-DASH").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }
}
