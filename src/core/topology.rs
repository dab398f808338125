use crate::config::manifest::ComposeManifest;
use crate::utils::error::{LintError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Dependency graph over the services declared in a manifest. Edges come
/// from `links` and `depends_on`; an edge points at the service that must
/// be up first.
#[derive(Debug, Clone)]
pub struct ServiceGraph {
    /// service -> services it depends on
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl ServiceGraph {
    pub fn from_manifest(manifest: &ComposeManifest) -> Self {
        let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, service) in &manifest.services {
            let deps: BTreeSet<String> = service.dependency_names().into_iter().collect();
            edges.insert(name.clone(), deps);
        }
        ServiceGraph { edges }
    }

    pub fn services(&self) -> Vec<&str> {
        self.edges.keys().map(|s| s.as_str()).collect()
    }

    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.edges
            .get(name)
            .map(|deps| deps.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.contains(name))
            .map(|(svc, _)| svc.as_str())
            .collect()
    }

    /// Edge targets that have no service definition, as (service, target)
    /// pairs.
    pub fn unknown_targets(&self) -> Vec<(String, String)> {
        let mut unknown = Vec::new();
        for (service, deps) in &self.edges {
            for dep in deps {
                if !self.edges.contains_key(dep) {
                    unknown.push((service.clone(), dep.clone()));
                }
            }
        }
        unknown
    }

    /// Startup order, dependencies first. Kahn's algorithm over the sorted
    /// edge map, so equal ranks come out alphabetically and the order is
    /// stable across runs. Unknown edge targets are ignored here; they are
    /// reported as findings by the checker.
    pub fn startup_order(&self) -> Result<Vec<String>> {
        let mut remaining: BTreeMap<&str, BTreeSet<&str>> = self
            .edges
            .iter()
            .map(|(svc, deps)| {
                let known: BTreeSet<&str> = deps
                    .iter()
                    .filter(|d| self.edges.contains_key(*d))
                    .map(|d| d.as_str())
                    .collect();
                (svc.as_str(), known)
            })
            .collect();

        let mut order = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let ready: Vec<&str> = remaining
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(svc, _)| *svc)
                .collect();

            if ready.is_empty() {
                // Every remaining service waits on another: a cycle
                let stuck = remaining
                    .keys()
                    .next()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                return Err(LintError::ManifestError {
                    message: format!(
                        "Dependency cycle detected involving service '{}'",
                        stuck
                    ),
                });
            }

            for svc in &ready {
                remaining.remove(svc);
                order.push(svc.to_string());
            }
            for deps in remaining.values_mut() {
                for svc in &ready {
                    deps.remove(svc);
                }
            }
        }

        Ok(order)
    }

    pub fn has_cycle(&self) -> bool {
        self.startup_order().is_err()
    }
}
