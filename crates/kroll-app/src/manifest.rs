//! ---
//! kr_section: "02-application-model"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Application descriptor, manifests and component resolution."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::dependency::{Dependency, DependencyKind};
use crate::errors::ManifestError;

/// Parsed bundle manifest.
///
/// ```text
/// #appname: Demo
/// #appid: com.example.demo
/// #version: 1.0.0
/// runtime: 1.2.0
/// sdk: >=1.2.0
/// tiui: 1.2.0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// `#appid`
    pub id: String,
    /// `#appname`
    pub name: String,
    /// `#version`
    pub version: Option<String>,
    /// `#publisher`
    pub publisher: Option<String>,
    /// `#url`
    pub url: Option<String>,
    /// `#guid`
    pub guid: Option<String>,
    /// `#desc`
    pub description: Option<String>,
    /// `#image`
    pub image: Option<String>,
    /// Any other `#property` lines, in file order.
    pub properties: IndexMap<String, String>,
    /// Dependency lines, in file order.
    pub dependencies: Vec<Dependency>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        fs::read_to_string(path)?.parse()
    }

    /// The runtime dependency.
    pub fn runtime(&self) -> Option<&Dependency> {
        self.dependencies
            .iter()
            .find(|dep| dep.kind == DependencyKind::Runtime)
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut properties = IndexMap::new();
        let mut dependencies = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if let Some(property) = key.strip_prefix('#') {
                properties.insert(property.trim().to_owned(), value.trim().to_owned());
                continue;
            }
            let dependency = Dependency::from_manifest_entry(key, value).ok_or_else(|| {
                ManifestError::InvalidEntry {
                    line: index + 1,
                    content: line.to_owned(),
                }
            })?;
            dependencies.push(dependency);
        }

        let id = take_required(&mut properties, "appid")?;
        let name = take_required(&mut properties, "appname")?;
        let manifest = Manifest {
            id,
            name,
            version: take_optional(&mut properties, "version"),
            publisher: take_optional(&mut properties, "publisher"),
            url: take_optional(&mut properties, "url"),
            guid: take_optional(&mut properties, "guid"),
            description: take_optional(&mut properties, "desc"),
            image: take_optional(&mut properties, "image"),
            properties,
            dependencies,
        };
        if manifest.runtime().is_none() {
            return Err(ManifestError::MissingRuntime);
        }
        Ok(manifest)
    }
}

fn take_optional(properties: &mut IndexMap<String, String>, key: &str) -> Option<String> {
    properties
        .shift_remove(key)
        .filter(|value| !value.is_empty())
}

fn take_required(
    properties: &mut IndexMap<String, String>,
    key: &'static str,
) -> Result<String, ManifestError> {
    take_optional(properties, key).ok_or(ManifestError::MissingProperty(key))
}
