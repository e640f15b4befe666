//! ---
//! kr_section: "02-application-model"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Application descriptor, manifests and component resolution."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::version::compare_versions;

/// Category of a required unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// The runtime the application launches into.
    Runtime,
    /// A runtime module, named by its manifest key.
    Module,
    /// The desktop platform SDK.
    PlatformSdk,
    /// The mobile SDK.
    MobileSdk,
}

impl DependencyKind {
    /// Whether installing this kind provides the rest of the platform.
    pub fn is_sdk(self) -> bool {
        match self {
            DependencyKind::PlatformSdk | DependencyKind::MobileSdk => true,
            DependencyKind::Runtime | DependencyKind::Module => false,
        }
    }

    /// Map a manifest dependency key onto its kind.
    pub fn from_manifest_key(key: &str) -> Self {
        match key {
            "runtime" => DependencyKind::Runtime,
            "sdk" => DependencyKind::PlatformSdk,
            "mobilesdk" => DependencyKind::MobileSdk,
            _ => DependencyKind::Module,
        }
    }

    /// Directory holding components of this kind under a search root.
    pub fn directory(self) -> &'static str {
        match self {
            DependencyKind::Runtime => "runtime",
            DependencyKind::Module => "modules",
            DependencyKind::PlatformSdk => "sdk",
            DependencyKind::MobileSdk => "mobilesdk",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DependencyKind::Runtime => "runtime",
            DependencyKind::Module => "module",
            DependencyKind::PlatformSdk => "sdk",
            DependencyKind::MobileSdk => "mobilesdk",
        };
        f.write_str(label)
    }
}

/// Version constraint attached to a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    /// `=`, also used when no operator is given.
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl Requirement {
    /// Split a manifest value such as `>=1.2.0` into its operator and version.
    pub fn split(value: &str) -> (Self, &str) {
        let value = value.trim();
        let (requirement, rest) = if let Some(rest) = value.strip_prefix(">=") {
            (Requirement::Gte, rest)
        } else if let Some(rest) = value.strip_prefix("<=") {
            (Requirement::Lte, rest)
        } else if let Some(rest) = value.strip_prefix('>') {
            (Requirement::Gt, rest)
        } else if let Some(rest) = value.strip_prefix('<') {
            (Requirement::Lt, rest)
        } else if let Some(rest) = value.strip_prefix('=') {
            (Requirement::Eq, rest)
        } else {
            (Requirement::Eq, value)
        };
        (requirement, rest.trim())
    }

    /// Whether `candidate` satisfies this operator against `wanted`.
    pub fn accepts(self, candidate: &str, wanted: &str) -> bool {
        let ordering = compare_versions(candidate, wanted);
        match self {
            Requirement::Eq => ordering == Ordering::Equal,
            Requirement::Gt => ordering == Ordering::Greater,
            Requirement::Gte => ordering != Ordering::Less,
            Requirement::Lt => ordering == Ordering::Less,
            Requirement::Lte => ordering != Ordering::Greater,
        }
    }

    /// Manifest spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Requirement::Eq => "=",
            Requirement::Gt => ">",
            Requirement::Gte => ">=",
            Requirement::Lt => "<",
            Requirement::Lte => "<=",
        }
    }
}

/// A request for a named, versioned unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Category of the unit.
    pub kind: DependencyKind,
    /// Unit name; `runtime`, `sdk` and `mobilesdk` for the non-module kinds.
    pub name: String,
    /// Requested version.
    pub version: String,
    /// Constraint applied to `version`.
    pub requirement: Requirement,
}

impl Dependency {
    /// Exact-version dependency.
    pub fn new(kind: DependencyKind, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            version: version.into(),
            requirement: Requirement::Eq,
        }
    }

    /// Replace the version constraint.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    /// Build a dependency from a manifest `key: value` line. Returns `None` when
    /// the key or version is empty.
    pub fn from_manifest_entry(key: &str, value: &str) -> Option<Self> {
        let key = key.trim();
        let (requirement, version) = Requirement::split(value);
        if key.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            kind: DependencyKind::from_manifest_key(key),
            name: key.to_owned(),
            version: version.to_owned(),
            requirement,
        })
    }

    /// Whether a component of `version` satisfies this request.
    pub fn is_satisfied_by(&self, version: &str) -> bool {
        self.requirement.accepts(version, &self.version)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.name, self.requirement.symbol(), self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_keys_map_to_kinds() {
        assert_eq!(DependencyKind::from_manifest_key("runtime"), DependencyKind::Runtime);
        assert_eq!(DependencyKind::from_manifest_key("sdk"), DependencyKind::PlatformSdk);
        assert_eq!(DependencyKind::from_manifest_key("mobilesdk"), DependencyKind::MobileSdk);
        assert_eq!(DependencyKind::from_manifest_key("tiui"), DependencyKind::Module);
    }

    #[test]
    fn only_sdk_kinds_are_sdks() {
        assert!(DependencyKind::PlatformSdk.is_sdk());
        assert!(DependencyKind::MobileSdk.is_sdk());
        assert!(!DependencyKind::Runtime.is_sdk());
        assert!(!DependencyKind::Module.is_sdk());
    }

    #[test]
    fn operators_are_split_from_versions() {
        assert_eq!(Requirement::split(">= 1.2.0"), (Requirement::Gte, "1.2.0"));
        assert_eq!(Requirement::split("<=2"), (Requirement::Lte, "2"));
        assert_eq!(Requirement::split(">1"), (Requirement::Gt, "1"));
        assert_eq!(Requirement::split("<1"), (Requirement::Lt, "1"));
        assert_eq!(Requirement::split("=1.0"), (Requirement::Eq, "1.0"));
        assert_eq!(Requirement::split("1.0"), (Requirement::Eq, "1.0"));
    }

    #[test]
    fn requirements_accept_expected_versions() {
        let dep = Dependency::new(DependencyKind::Module, "tiui", "1.2.0")
            .with_requirement(Requirement::Gte);
        assert!(dep.is_satisfied_by("1.2.0"));
        assert!(dep.is_satisfied_by("1.3"));
        assert!(!dep.is_satisfied_by("1.1.9"));

        let exact = Dependency::new(DependencyKind::Runtime, "runtime", "1.2");
        assert!(exact.is_satisfied_by("1.2.0"));
        assert!(!exact.is_satisfied_by("1.2.1"));

        assert!(Requirement::Lt.accepts("0.9", "1.0"));
        assert!(!Requirement::Gt.accepts("1.0", "1.0"));
        assert!(Requirement::Lte.accepts("1.0", "1.0"));
    }

    #[test]
    fn empty_entries_are_rejected() {
        assert!(Dependency::from_manifest_entry("tiui", " ").is_none());
        assert!(Dependency::from_manifest_entry("", "1.0").is_none());
        let dep = Dependency::from_manifest_entry("sdk", ">=1.2").unwrap();
        assert_eq!(dep.kind, DependencyKind::PlatformSdk);
        assert_eq!(dep.to_string(), "sdk >=1.2");
    }
}
