use crate::utils::error::{LintError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// A published port in `[ip:]host:container[/protocol]` form.
///
/// A bare `container` entry exposes the port without publishing it to a
/// fixed host port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_ip: Option<IpAddr>,
    pub host_port: Option<u16>,
    pub container_port: u16,
    pub protocol: Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl PortMapping {
    pub fn is_loopback(&self) -> bool {
        matches!(self.host_ip, Some(ip) if ip.is_loopback())
    }
}

fn invalid_port(value: &str, reason: impl Into<String>) -> LintError {
    LintError::InvalidConfigValueError {
        field: "ports".to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_port_number(value: &str, raw: &str) -> Result<u16> {
    let port: u16 = value
        .parse()
        .map_err(|_| invalid_port(raw, format!("'{}' is not a valid port number", value)))?;
    if port == 0 {
        return Err(invalid_port(raw, "Port 0 is not addressable"));
    }
    Ok(port)
}

impl FromStr for PortMapping {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        let (spec, protocol) = match s.rsplit_once('/') {
            Some((spec, "tcp")) => (spec, Protocol::Tcp),
            Some((spec, "udp")) => (spec, Protocol::Udp),
            Some((_, proto)) => {
                return Err(invalid_port(s, format!("Unknown protocol '{}'", proto)))
            }
            None => (s, Protocol::Tcp),
        };

        let parts: Vec<&str> = spec.split(':').collect();
        match parts.as_slice() {
            [container] => Ok(PortMapping {
                host_ip: None,
                host_port: None,
                container_port: parse_port_number(container, s)?,
                protocol,
            }),
            [host, container] => Ok(PortMapping {
                host_ip: None,
                host_port: Some(parse_port_number(host, s)?),
                container_port: parse_port_number(container, s)?,
                protocol,
            }),
            [ip, host, container] => {
                let host_ip: IpAddr = ip
                    .parse()
                    .map_err(|_| invalid_port(s, format!("'{}' is not a valid bind address", ip)))?;
                Ok(PortMapping {
                    host_ip: Some(host_ip),
                    host_port: Some(parse_port_number(host, s)?),
                    container_port: parse_port_number(container, s)?,
                    protocol,
                })
            }
            _ => Err(invalid_port(
                s,
                "Expected [ip:]host:container[/protocol] form",
            )),
        }
    }
}

/// A mount in `[source:]target[:mode]` form. Source is a host path or a
/// named volume; an entry without a source is an anonymous volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub source: Option<String>,
    pub target: String,
    pub mode: AccessMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    ReadWrite,
    ReadOnly,
}

fn invalid_volume(value: &str, reason: impl Into<String>) -> LintError {
    LintError::InvalidConfigValueError {
        field: "volumes".to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for VolumeMount {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let (source, target, mode) = match parts.as_slice() {
            [target] => (None, *target, AccessMode::ReadWrite),
            [source, target] => (Some(source.to_string()), *target, AccessMode::ReadWrite),
            [source, target, mode] => {
                let mode = match *mode {
                    "rw" => AccessMode::ReadWrite,
                    "ro" => AccessMode::ReadOnly,
                    other => {
                        return Err(invalid_volume(
                            s,
                            format!("Unknown access mode '{}', expected 'ro' or 'rw'", other),
                        ))
                    }
                };
                (Some(source.to_string()), *target, mode)
            }
            _ => return Err(invalid_volume(s, "Expected [source:]target[:mode] form")),
        };

        if target.is_empty() {
            return Err(invalid_volume(s, "Mount target cannot be empty"));
        }
        if !target.starts_with('/') {
            return Err(invalid_volume(s, "Mount target must be an absolute path"));
        }
        if let Some(src) = &source {
            if src.is_empty() {
                return Err(invalid_volume(s, "Mount source cannot be empty"));
            }
        }

        Ok(VolumeMount {
            source,
            target: target.to_string(),
            mode,
        })
    }
}

/// One `KEY=VALUE` environment entry. A bare `KEY` passes the variable
/// through from the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: Option<String>,
}

impl FromStr for EnvEntry {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = match s.split_once('=') {
            Some((key, value)) => (key, Some(value.to_string())),
            None => (s, None),
        };
        crate::utils::validation::validate_env_key("environment", key)?;
        Ok(EnvEntry {
            key: key.to_string(),
            value,
        })
    }
}

/// A `service[:alias]` link reference. Resolution uses the service part;
/// the alias only affects in-container naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub service: String,
    pub alias: Option<String>,
}

impl FromStr for LinkRef {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        let (service, alias) = match s.split_once(':') {
            Some((service, alias)) => (service, Some(alias.to_string())),
            None => (s, None),
        };
        if service.is_empty() {
            return Err(LintError::InvalidConfigValueError {
                field: "links".to_string(),
                value: s.to_string(),
                reason: "Link target cannot be empty".to_string(),
            });
        }
        Ok(LinkRef {
            service: service.to_string(),
            alias,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartPolicy {
    No,
    Always,
    OnFailure { max_retries: Option<u32> },
    UnlessStopped,
}

impl RestartPolicy {
    /// Canonical name without a retry count, for allow-list matching.
    pub fn name(&self) -> &'static str {
        match self {
            RestartPolicy::No => "no",
            RestartPolicy::Always => "always",
            RestartPolicy::OnFailure { .. } => "on-failure",
            RestartPolicy::UnlessStopped => "unless-stopped",
        }
    }
}

impl FromStr for RestartPolicy {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "no" => Ok(RestartPolicy::No),
            "always" => Ok(RestartPolicy::Always),
            "unless-stopped" => Ok(RestartPolicy::UnlessStopped),
            "on-failure" => Ok(RestartPolicy::OnFailure { max_retries: None }),
            other => {
                if let Some(retries) = other.strip_prefix("on-failure:") {
                    let max_retries: u32 = retries.parse().map_err(|_| {
                        LintError::InvalidConfigValueError {
                            field: "restart".to_string(),
                            value: s.to_string(),
                            reason: format!("'{}' is not a valid retry count", retries),
                        }
                    })?;
                    return Ok(RestartPolicy::OnFailure {
                        max_retries: Some(max_retries),
                    });
                }
                Err(LintError::InvalidConfigValueError {
                    field: "restart".to_string(),
                    value: s.to_string(),
                    reason: "Expected one of: no, always, on-failure[:N], unless-stopped"
                        .to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One lint result tied to a rule and, usually, a service and field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub service: Option<String>,
    pub field: String,
    pub message: String,
}

impl Finding {
    pub fn new(
        rule: &str,
        severity: Severity,
        service: Option<&str>,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Finding {
            rule: rule.to_string(),
            severity,
            service: service.map(|s| s.to_string()),
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// `service.field` location label used in text and CSV output.
    pub fn location(&self) -> String {
        match &self.service {
            Some(service) => format!("{}.{}", service, self.field),
            None => self.field.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_mapping_full_form() {
        let port: PortMapping = "127.0.0.1:5000:5000".parse().unwrap();
        assert!(port.is_loopback());
        assert_eq!(port.host_port, Some(5000));
        assert_eq!(port.container_port, 5000);
        assert_eq!(port.protocol, Protocol::Tcp);
    }

    #[test]
    fn test_port_mapping_short_forms() {
        let port: PortMapping = "8844:8844".parse().unwrap();
        assert_eq!(port.host_ip, None);
        assert_eq!(port.host_port, Some(8844));

        let exposed: PortMapping = "9200".parse().unwrap();
        assert_eq!(exposed.host_port, None);
        assert_eq!(exposed.container_port, 9200);
    }

    #[test]
    fn test_port_mapping_udp() {
        let port: PortMapping = "514:514/udp".parse().unwrap();
        assert_eq!(port.protocol, Protocol::Udp);
        assert!("514:514/sctp".parse::<PortMapping>().is_err());
    }

    #[test]
    fn test_port_mapping_rejects_garbage() {
        assert!("abc:5000".parse::<PortMapping>().is_err());
        assert!("0:5000".parse::<PortMapping>().is_err());
        assert!("1:2:3:4".parse::<PortMapping>().is_err());
        assert!("999999:80".parse::<PortMapping>().is_err());
    }

    #[test]
    fn test_volume_mount_forms() {
        let anon: VolumeMount = "/var/lib/postgresql/data".parse().unwrap();
        assert_eq!(anon.source, None);
        assert_eq!(anon.mode, AccessMode::ReadWrite);

        let bind: VolumeMount = "./timesketch:/usr/local/src/timesketch:ro".parse().unwrap();
        assert_eq!(bind.source.as_deref(), Some("./timesketch"));
        assert_eq!(bind.target, "/usr/local/src/timesketch");
        assert_eq!(bind.mode, AccessMode::ReadOnly);
    }

    #[test]
    fn test_volume_mount_rejects_bad_specs() {
        assert!("relative/target".parse::<VolumeMount>().is_err());
        assert!("./src:/app:zz".parse::<VolumeMount>().is_err());
        assert!(":/app".parse::<VolumeMount>().is_err());
    }

    #[test]
    fn test_env_entry() {
        let entry: EnvEntry = "POSTGRES_PASSWORD=secret=with=equals".parse().unwrap();
        assert_eq!(entry.key, "POSTGRES_PASSWORD");
        assert_eq!(entry.value.as_deref(), Some("secret=with=equals"));

        let passthrough: EnvEntry = "CHOKIDAR_USEPOLLING".parse().unwrap();
        assert_eq!(passthrough.value, None);

        assert!("1BAD=x".parse::<EnvEntry>().is_err());
    }

    #[test]
    fn test_link_ref() {
        let plain: LinkRef = "postgres".parse().unwrap();
        assert_eq!(plain.service, "postgres");
        assert_eq!(plain.alias, None);

        let aliased: LinkRef = "elasticsearch:search".parse().unwrap();
        assert_eq!(aliased.service, "elasticsearch");
        assert_eq!(aliased.alias.as_deref(), Some("search"));
    }

    #[test]
    fn test_restart_policy() {
        assert_eq!("always".parse::<RestartPolicy>().unwrap(), RestartPolicy::Always);
        assert_eq!(
            "on-failure:3".parse::<RestartPolicy>().unwrap(),
            RestartPolicy::OnFailure {
                max_retries: Some(3)
            }
        );
        assert_eq!("on-failure".parse::<RestartPolicy>().unwrap().name(), "on-failure");
        assert!("sometimes".parse::<RestartPolicy>().is_err());
        assert!("on-failure:lots".parse::<RestartPolicy>().is_err());
    }

    #[test]
    fn test_finding_location() {
        let finding = Finding::new("ports", Severity::Error, Some("redis"), "ports", "bad");
        assert_eq!(finding.location(), "redis.ports");

        let global = Finding::new("version", Severity::Info, None, "version", "missing");
        assert_eq!(global.location(), "version");
    }
}
