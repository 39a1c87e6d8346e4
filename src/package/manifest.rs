use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";

/// Which dependency field of a manifest a check looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Dependencies,
    DevDependencies,
}

impl DependencyKind {
    /// Field name as written in `package.json`
    pub fn field_name(&self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
        }
    }
}

/// Dependency declarations: package name to version range, in manifest order.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct DependencyMap(Map<String, Value>);

impl DependencyMap {
    /// The declared range for `name`. Non-string declarations are rendered as JSON.
    pub fn range(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|value| match value {
            Value::String(range) => range.clone(),
            other => other.to_string(),
        })
    }

    /// Two-space indented JSON dump, as printed in failure messages
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| format!("{:?}", self.0))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DependencyMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }
}

/// Parsed `package.json`, limited to the fields the matchers inspect
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub private: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_dependency_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub dependencies: Option<DependencyMap>,
    #[serde(
        default,
        deserialize_with = "deserialize_dependency_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub dev_dependencies: Option<DependencyMap>,
}

impl Manifest {
    pub fn new(name: impl Into<String>) -> Self {
        Manifest {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_dependencies(mut self, deps: DependencyMap) -> Self {
        self.dependencies = Some(deps);
        self
    }

    pub fn with_dev_dependencies(mut self, deps: DependencyMap) -> Self {
        self.dev_dependencies = Some(deps);
        self
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse package manifest")
    }

    /// Read `<dir>/package.json`
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        let content = runtime
            .read_to_string(&path)
            .with_context(|| format!("No readable {} in {}", MANIFEST_FILE, dir.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    pub fn dependencies_of(&self, kind: DependencyKind) -> Option<&DependencyMap> {
        match kind {
            DependencyKind::Dependencies => self.dependencies.as_ref(),
            DependencyKind::DevDependencies => self.dev_dependencies.as_ref(),
        }
    }
}

/// A dependency field that is present but not an object counts as absent.
fn deserialize_dependency_map<'de, D>(deserializer: D) -> Result<Option<DependencyMap>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(Some(DependencyMap(map))),
        None | Some(Value::Null) => Ok(None),
        Some(other) => {
            warn!("Ignoring dependency field that is not a mapping: {}", other);
            Ok(None)
        }
    }
}
