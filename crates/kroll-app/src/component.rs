//! ---
//! kr_section: "02-application-model"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Application descriptor, manifests and component resolution."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::dependency::{Dependency, DependencyKind};
use crate::version::compare_versions;

/// A satisfied dependency bound to a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Category of the unit.
    pub kind: DependencyKind,
    /// Unit name.
    pub name: String,
    /// Installed version.
    pub version: String,
    /// Directory holding the component.
    pub path: PathBuf,
    /// Whether the component was found inside the application bundle.
    pub bundled: bool,
}

impl Component {
    /// Installed (non-bundled) component.
    pub fn new(
        kind: DependencyKind,
        name: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            version: version.into(),
            path: path.into(),
            bundled: false,
        }
    }
}

/// Directory under `root` whose children are the installed versions of `name`.
///
/// Layout: `<root>/<kind dir>/<os>/<version>` and, for modules,
/// `<root>/modules/<os>/<name>/<version>`.
pub fn versions_directory(root: &Path, kind: DependencyKind, name: &str) -> PathBuf {
    let base = root.join(kind.directory()).join(std::env::consts::OS);
    match kind {
        DependencyKind::Module => base.join(name),
        DependencyKind::Runtime | DependencyKind::PlatformSdk | DependencyKind::MobileSdk => base,
    }
}

/// Install location of one version of a component under `root`.
pub fn install_path(root: &Path, kind: DependencyKind, name: &str, version: &str) -> PathBuf {
    versions_directory(root, kind, name).join(version)
}

/// Best component under `root` satisfying `dependency`: the highest matching version.
pub fn find_best(root: &Path, dependency: &Dependency, bundled: bool) -> Option<Component> {
    let directory = versions_directory(root, dependency.kind, &dependency.name);
    WalkDir::new(&directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| {
            let version = entry.file_name().to_str()?.to_owned();
            dependency.is_satisfied_by(&version).then(|| Component {
                kind: dependency.kind,
                name: dependency.name.clone(),
                version,
                path: entry.into_path(),
                bundled,
            })
        })
        .max_by(|a, b| compare_versions(&a.version, &b.version))
}
