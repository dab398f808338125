use crate::config::lint::LintSettings;
use crate::config::manifest::{ComposeManifest, ServiceDef};
use crate::core::topology::ServiceGraph;
use crate::domain::model::{
    EnvEntry, Finding, LinkRef, PortMapping, Protocol, RestartPolicy, Severity, VolumeMount,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Validation engine. Runs every schema-level check against a parsed
/// manifest and collects findings; it never mutates or executes anything.
pub struct Checker {
    settings: LintSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
    pub services_checked: usize,
    pub generated_at: DateTime<Utc>,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.error_count() == 0 && self.warning_count() == 0
    }

    /// Exit code contract: errors = 1, warnings only = 2, clean = 0.
    /// Strict mode promotes warnings to the error exit code.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.error_count() > 0 {
            1
        } else if self.warning_count() > 0 {
            if strict {
                1
            } else {
                2
            }
        } else {
            0
        }
    }
}

impl Checker {
    pub fn new(settings: LintSettings) -> Self {
        Checker { settings }
    }

    pub fn run(&self, manifest: &ComposeManifest) -> CheckReport {
        let mut findings = Vec::new();

        self.check_version(manifest, &mut findings);
        self.check_service_count(manifest, &mut findings);

        for (name, service) in &manifest.services {
            self.check_service_name(name, &mut findings);
            self.check_image_or_build(name, service, &mut findings);
            self.check_ports(name, service, &mut findings);
            self.check_links(manifest, name, service, &mut findings);
            self.check_depends_on(manifest, name, service, &mut findings);
            self.check_environment(name, service, &mut findings);
            self.check_restart(name, service, &mut findings);
            self.check_volumes(name, service, &mut findings);
        }

        self.check_port_collisions(manifest, &mut findings);
        self.check_cycles(manifest, &mut findings);

        let report = CheckReport {
            findings,
            services_checked: manifest.services.len(),
            generated_at: Utc::now(),
        };

        tracing::info!(
            "Checked {} services: {} errors, {} warnings, {} infos",
            report.services_checked,
            report.error_count(),
            report.warning_count(),
            report.info_count()
        );

        report
    }

    fn check_version(&self, manifest: &ComposeManifest, findings: &mut Vec<Finding>) {
        if manifest.version.is_none() {
            findings.push(Finding::new(
                "version",
                Severity::Info,
                None,
                "version",
                "No top-level version declared",
            ));
        }
    }

    fn check_service_count(&self, manifest: &ComposeManifest, findings: &mut Vec<Finding>) {
        if manifest.services.is_empty() {
            findings.push(Finding::new(
                "services",
                Severity::Error,
                None,
                "services",
                "The manifest defines no services",
            ));
        } else if manifest.services.len() > self.settings.max_services {
            findings.push(Finding::new(
                "max-services",
                Severity::Warning,
                None,
                "services",
                format!(
                    "{} services defined, limit is {}",
                    manifest.services.len(),
                    self.settings.max_services
                ),
            ));
        }
    }

    fn check_service_name(&self, name: &str, findings: &mut Vec<Finding>) {
        if let Err(e) = crate::utils::validation::validate_service_name("services", name) {
            findings.push(Finding::new(
                "service-name",
                Severity::Error,
                Some(name),
                "name",
                e.to_string(),
            ));
        }
    }

    fn check_image_or_build(&self, name: &str, service: &ServiceDef, findings: &mut Vec<Finding>) {
        if service.image.is_none() && service.build.is_none() {
            findings.push(Finding::new(
                "image-or-build",
                Severity::Error,
                Some(name),
                "image",
                "Service declares neither an image nor a build context",
            ));
            return;
        }

        if self.settings.require_pinned_images {
            if let Some(image) = &service.image {
                // A ':' inside the registry part (registry:5000/app) is not a tag
                let tag = image
                    .rsplit_once(':')
                    .map(|(_, tag)| tag)
                    .filter(|tag| !tag.contains('/'));
                match tag {
                    None => findings.push(Finding::new(
                        "pinned-image",
                        Severity::Warning,
                        Some(name),
                        "image",
                        format!("Image '{}' has no tag and will float", image),
                    )),
                    Some("latest") => findings.push(Finding::new(
                        "pinned-image",
                        Severity::Warning,
                        Some(name),
                        "image",
                        format!("Image '{}' is pinned to 'latest', which floats", image),
                    )),
                    Some(_) => {}
                }
            }
        }
    }

    fn check_ports(&self, name: &str, service: &ServiceDef, findings: &mut Vec<Finding>) {
        let Some(ports) = &service.ports else {
            return;
        };

        for raw in ports {
            match PortMapping::from_str(raw) {
                Err(e) => findings.push(Finding::new(
                    "ports",
                    Severity::Error,
                    Some(name),
                    "ports",
                    e.to_string(),
                )),
                Ok(port) => {
                    if self.settings.require_loopback_ports
                        && port.host_port.is_some()
                        && !port.is_loopback()
                    {
                        findings.push(Finding::new(
                            "loopback-ports",
                            Severity::Warning,
                            Some(name),
                            "ports",
                            format!(
                                "'{}' publishes beyond loopback; bind 127.0.0.1 for a dev stack",
                                raw
                            ),
                        ));
                    }
                }
            }
        }
    }

    fn check_links(
        &self,
        manifest: &ComposeManifest,
        name: &str,
        service: &ServiceDef,
        findings: &mut Vec<Finding>,
    ) {
        let Some(links) = &service.links else {
            return;
        };

        for raw in links {
            match LinkRef::from_str(raw) {
                Err(e) => findings.push(Finding::new(
                    "links",
                    Severity::Error,
                    Some(name),
                    "links",
                    e.to_string(),
                )),
                Ok(link) => {
                    if link.service == name {
                        findings.push(Finding::new(
                            "links",
                            Severity::Error,
                            Some(name),
                            "links",
                            "Service links to itself",
                        ));
                    } else if manifest.service(&link.service).is_none() {
                        findings.push(Finding::new(
                            "links",
                            Severity::Error,
                            Some(name),
                            "links",
                            format!("Link target '{}' is not a defined service", link.service),
                        ));
                    }
                }
            }
        }
    }

    fn check_depends_on(
        &self,
        manifest: &ComposeManifest,
        name: &str,
        service: &ServiceDef,
        findings: &mut Vec<Finding>,
    ) {
        let Some(deps) = &service.depends_on else {
            return;
        };

        for dep in deps {
            if dep == name {
                findings.push(Finding::new(
                    "depends-on",
                    Severity::Error,
                    Some(name),
                    "depends_on",
                    "Service depends on itself",
                ));
            } else if manifest.service(dep).is_none() {
                findings.push(Finding::new(
                    "depends-on",
                    Severity::Error,
                    Some(name),
                    "depends_on",
                    format!("Dependency '{}' is not a defined service", dep),
                ));
            }
        }
    }

    fn check_environment(&self, name: &str, service: &ServiceDef, findings: &mut Vec<Finding>) {
        match service.environment_entries() {
            Err(e) => findings.push(Finding::new(
                "environment",
                Severity::Error,
                Some(name),
                "environment",
                e.to_string(),
            )),
            Ok(entries) => {
                let mut seen: HashSet<&str> = HashSet::new();
                for EnvEntry { key, .. } in &entries {
                    if !seen.insert(key.as_str()) {
                        findings.push(Finding::new(
                            "environment",
                            Severity::Warning,
                            Some(name),
                            "environment",
                            format!("Duplicate environment key '{}'; the last value wins", key),
                        ));
                    }
                }
            }
        }
    }

    fn check_restart(&self, name: &str, service: &ServiceDef, findings: &mut Vec<Finding>) {
        let Some(raw) = &service.restart else {
            return;
        };

        match RestartPolicy::from_str(raw) {
            Err(e) => findings.push(Finding::new(
                "restart",
                Severity::Error,
                Some(name),
                "restart",
                e.to_string(),
            )),
            Ok(policy) => {
                if !self
                    .settings
                    .allowed_restart_policies
                    .iter()
                    .any(|allowed| allowed == policy.name())
                {
                    findings.push(Finding::new(
                        "restart",
                        Severity::Error,
                        Some(name),
                        "restart",
                        format!(
                            "Restart policy '{}' is not in the allowed set ({})",
                            policy.name(),
                            self.settings.allowed_restart_policies.join(", ")
                        ),
                    ));
                }
            }
        }
    }

    fn check_volumes(&self, name: &str, service: &ServiceDef, findings: &mut Vec<Finding>) {
        let Some(volumes) = &service.volumes else {
            return;
        };

        let mut targets: HashSet<String> = HashSet::new();
        for raw in volumes {
            match VolumeMount::from_str(raw) {
                Err(e) => findings.push(Finding::new(
                    "volumes",
                    Severity::Error,
                    Some(name),
                    "volumes",
                    e.to_string(),
                )),
                Ok(mount) => {
                    if !targets.insert(mount.target.clone()) {
                        findings.push(Finding::new(
                            "volumes",
                            Severity::Error,
                            Some(name),
                            "volumes",
                            format!("Duplicate mount target '{}'", mount.target),
                        ));
                    }
                }
            }
        }
    }

    /// Two services publishing the same host port cannot start together,
    /// whether or not one of them names an explicit bind address.
    fn check_port_collisions(&self, manifest: &ComposeManifest, findings: &mut Vec<Finding>) {
        let mut published: HashMap<(u16, Protocol), String> = HashMap::new();

        for (name, service) in &manifest.services {
            let Some(ports) = &service.ports else {
                continue;
            };
            for raw in ports {
                let Ok(port) = PortMapping::from_str(raw) else {
                    continue; // already reported by check_ports
                };
                let Some(host_port) = port.host_port else {
                    continue;
                };
                match published.entry((host_port, port.protocol)) {
                    std::collections::hash_map::Entry::Occupied(entry) => {
                        findings.push(Finding::new(
                            "port-collision",
                            Severity::Error,
                            Some(name),
                            "ports",
                            format!(
                                "Host port {} is already published by service '{}'",
                                host_port,
                                entry.get()
                            ),
                        ));
                    }
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        entry.insert(name.clone());
                    }
                }
            }
        }
    }

    fn check_cycles(&self, manifest: &ComposeManifest, findings: &mut Vec<Finding>) {
        let graph = ServiceGraph::from_manifest(manifest);
        if let Err(e) = graph.startup_order() {
            findings.push(Finding::new(
                "dependency-cycle",
                Severity::Error,
                None,
                "links",
                e.to_string(),
            ));
        }
    }
}
