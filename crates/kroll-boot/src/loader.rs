//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};

use anyhow::Result;
use kroll_app::{AppError, Application, Component, Dependency};
use kroll_common::config::BootConfig;

use crate::collaborators::{ApplicationLoader, BootApplication};

/// Loads [`Application`] descriptors from manifest files on disk.
#[derive(Debug, Clone, Default)]
pub struct FsApplicationLoader {
    search_paths: Vec<PathBuf>,
}

impl FsApplicationLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    pub fn from_config(config: &BootConfig) -> Result<Self> {
        Ok(Self::new(config.paths.runtime_homes()?))
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl ApplicationLoader for FsApplicationLoader {
    type Application = Application;

    fn load(&self, manifest: &Path, base: Option<&Path>) -> Result<Application, AppError> {
        Ok(Application::load(manifest, base)?.with_search_paths(self.search_paths.clone()))
    }
}

impl BootApplication for Application {
    fn id(&self) -> &str {
        Application::id(self)
    }

    fn name(&self) -> &str {
        Application::name(self)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn runtime_path(&self) -> Option<&Path> {
        self.runtime.as_ref().map(|runtime| runtime.path.as_path())
    }

    fn modules(&self) -> &[Component] {
        &self.modules
    }

    fn resolved_components(&self) -> Vec<Component> {
        Application::resolved_components(self)
    }

    fn resolve_dependencies(&mut self) -> Vec<Dependency> {
        Application::resolve_dependencies(self)
    }

    fn is_installed(&self) -> bool {
        Application::is_installed(self)
    }

    fn has_argument(&self, name: &str) -> bool {
        Application::has_argument(self, name)
    }

    fn set_arguments(&mut self, arguments: Vec<String>) {
        Application::set_arguments(self, arguments)
    }

    fn arguments(&self) -> &[String] {
        Application::arguments(self)
    }
}
