use crate::domain::model::{EnvEntry, LinkRef};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

/// Typed view of a compose-style service manifest. Unknown keys are
/// ignored; this is a validation model, not a round-trip representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeManifest {
    pub version: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDef {
    pub image: Option<String>,
    pub build: Option<BuildDef>,
    pub command: Option<CommandDef>,
    pub ports: Option<Vec<String>>,
    pub links: Option<Vec<String>>,
    pub depends_on: Option<Vec<String>>,
    pub environment: Option<EnvironmentDef>,
    pub restart: Option<String>,
    pub volumes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildDef {
    Context(String),
    Detailed {
        context: String,
        dockerfile: Option<String>,
        args: Option<HashMap<String, String>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandDef {
    Shell(String),
    Exec(Vec<String>),
}

/// The schema allows both `- KEY=VALUE` lists and `KEY: VALUE` maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvironmentDef {
    List(Vec<String>),
    Map(BTreeMap<String, Option<String>>),
}

impl ComposeManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let manifest: ComposeManifest = serde_yaml::from_str(&processed)?;
        Ok(manifest)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDef> {
        self.services.get(name)
    }

    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(|s| s.as_str()).collect()
    }
}

impl ServiceDef {
    /// Normalized environment entries across both schema forms. Map
    /// entries with a null value become empty-string values.
    pub fn environment_entries(&self) -> Result<Vec<EnvEntry>> {
        match &self.environment {
            None => Ok(Vec::new()),
            Some(EnvironmentDef::List(entries)) => {
                entries.iter().map(|e| EnvEntry::from_str(e)).collect()
            }
            Some(EnvironmentDef::Map(map)) => map
                .iter()
                .map(|(key, value)| {
                    crate::utils::validation::validate_env_key("environment", key)?;
                    Ok(EnvEntry {
                        key: key.clone(),
                        value: Some(value.clone().unwrap_or_default()),
                    })
                })
                .collect(),
        }
    }

    /// Service names this service declares an edge to, from both `links`
    /// and `depends_on`. Entries that fail to parse are skipped here;
    /// the checker reports them separately.
    pub fn dependency_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(links) = &self.links {
            for link in links {
                if let Ok(link_ref) = LinkRef::from_str(link) {
                    names.push(link_ref.service);
                }
            }
        }
        if let Some(deps) = &self.depends_on {
            for dep in deps {
                if !names.contains(dep) {
                    names.push(dep.clone());
                }
            }
        }
        names
    }
}

/// Replace `${VAR}` and `${VAR:-default}` in the raw manifest text.
/// Unset variables without a default stay verbatim so that later error
/// messages point at the real text.
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap();

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        match std::env::var(var_name) {
            Ok(value) => value,
            Err(_) => match caps.get(2) {
                Some(default) => default.as_str().to_string(),
                None => caps[0].to_string(),
            },
        }
    })
    .to_string()
}
