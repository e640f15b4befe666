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

use tracing::debug;

use crate::component::{self, Component};
use crate::dependency::{Dependency, DependencyKind};
use crate::errors::AppError;
use crate::manifest::Manifest;

/// Marker file whose presence means the bundle finished installing.
pub const INSTALLED_MARKER: &str = ".installed";

/// Manifest-derived representation of an installed bundle.
#[derive(Debug, Clone)]
pub struct Application {
    /// Installation root; bundled components resolve against it.
    pub path: PathBuf,
    /// Manifest file this descriptor was loaded from.
    pub manifest_path: PathBuf,
    /// Resolved runtime, set by [`Application::resolve_dependencies`].
    pub runtime: Option<Component>,
    /// Resolved modules, in manifest order.
    pub modules: Vec<Component>,
    /// Resolved SDKs, in manifest order.
    pub sdks: Vec<Component>,
    manifest: Manifest,
    arguments: Vec<String>,
    search_paths: Vec<PathBuf>,
}

impl Application {
    /// Load the manifest at `manifest_path`.
    ///
    /// `base` is the installation root. When absent the manifest's parent
    /// directory is used, which is the normal layout of a bundle.
    pub fn load(manifest_path: &Path, base: Option<&Path>) -> Result<Self, AppError> {
        let manifest = Manifest::from_path(manifest_path).map_err(|source| AppError::Manifest {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let path = match base {
            Some(base) => base.to_path_buf(),
            None => manifest_path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .ok_or_else(|| AppError::NoApplicationPath(manifest_path.to_path_buf()))?,
        };
        debug!(
            app_id = %manifest.id,
            manifest = %manifest_path.display(),
            path = %path.display(),
            "application manifest loaded"
        );
        Ok(Self {
            path,
            manifest_path: manifest_path.to_path_buf(),
            runtime: None,
            modules: Vec::new(),
            sdks: Vec::new(),
            manifest,
            arguments: Vec::new(),
            search_paths: Vec::new(),
        })
    }

    /// Runtime homes searched after the bundle itself, in order.
    pub fn with_search_paths(mut self, search_paths: Vec<PathBuf>) -> Self {
        self.search_paths = search_paths;
        self
    }

    /// Application identifier (`#appid`).
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    /// Display name (`#appname`).
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Application version, if the manifest declares one.
    pub fn version(&self) -> Option<&str> {
        self.manifest.version.as_deref()
    }

    /// The parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Declared dependencies, in manifest order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.manifest.dependencies
    }

    /// Resolve every declared dependency and return those that could not be satisfied.
    ///
    /// Previous results are discarded first. The bundle is searched before the
    /// runtime homes; within the first root holding a match the highest
    /// satisfying version is taken.
    pub fn resolve_dependencies(&mut self) -> Vec<Dependency> {
        self.runtime = None;
        self.modules.clear();
        self.sdks.clear();

        let mut missing = Vec::new();
        for dependency in &self.manifest.dependencies {
            let found = std::iter::once((self.path.as_path(), true))
                .chain(self.search_paths.iter().map(|root| (root.as_path(), false)))
                .find_map(|(root, bundled)| component::find_best(root, dependency, bundled));
            match found {
                Some(component) => {
                    debug!(
                        name = %component.name,
                        version = %component.version,
                        path = %component.path.display(),
                        bundled = component.bundled,
                        "dependency resolved"
                    );
                    match component.kind {
                        DependencyKind::Runtime => self.runtime = Some(component),
                        DependencyKind::Module => self.modules.push(component),
                        DependencyKind::PlatformSdk | DependencyKind::MobileSdk => {
                            self.sdks.push(component)
                        }
                    }
                }
                None => {
                    debug!(dependency = %dependency, "dependency unresolved");
                    missing.push(dependency.clone());
                }
            }
        }
        missing
    }

    /// Runtime, modules and SDKs from the last resolution.
    pub fn resolved_components(&self) -> Vec<Component> {
        self.runtime
            .iter()
            .chain(self.modules.iter())
            .chain(self.sdks.iter())
            .cloned()
            .collect()
    }

    /// Whether the bundle has completed installation.
    pub fn is_installed(&self) -> bool {
        self.path.join(INSTALLED_MARKER).is_file()
    }

    /// Replace the captured command-line arguments.
    pub fn set_arguments(&mut self, arguments: Vec<String>) {
        self.arguments = arguments;
    }

    /// Captured command-line arguments, including the program name.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Whether an argument named `name` was passed.
    ///
    /// Leading dashes and any `=value` suffix are ignored on both sides, so
    /// `--debug`, `-debug` and `debug=1` all match `debug`.
    pub fn has_argument(&self, name: &str) -> bool {
        let wanted = argument_key(name);
        !wanted.is_empty()
            && self
                .arguments
                .iter()
                .skip(1)
                .any(|argument| argument_key(argument) == wanted)
    }
}

fn argument_key(argument: &str) -> &str {
    let stripped = argument.trim_start_matches('-');
    stripped.split('=').next().unwrap_or(stripped)
}
