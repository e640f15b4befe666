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

use crate::collaborators::BootApplication;

/// State threaded through the boot steps once an application is loaded.
///
/// Holds exactly one active descriptor. Update substitution swaps the whole
/// descriptor and records the marker it came from.
#[derive(Debug)]
pub struct BootContext<A> {
    home: PathBuf,
    manifest_path: PathBuf,
    arguments: Vec<String>,
    application: A,
    update_file: Option<PathBuf>,
}

impl<A: BootApplication> BootContext<A> {
    pub fn new(home: PathBuf, manifest_path: PathBuf, arguments: Vec<String>, application: A) -> Self {
        Self {
            home,
            manifest_path,
            arguments,
            application,
            update_file: None,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Arguments captured from the process command line.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn application(&self) -> &A {
        &self.application
    }

    pub fn application_mut(&mut self) -> &mut A {
        &mut self.application
    }

    /// Install `update` as the active descriptor and return the one it replaces.
    pub fn replace_application(&mut self, update: A, update_file: PathBuf) -> A {
        self.update_file = Some(update_file);
        std::mem::replace(&mut self.application, update)
    }

    /// Marker file of the applied update, if any.
    pub fn update_file(&self) -> Option<&Path> {
        self.update_file.as_deref()
    }

    pub fn update_occurred(&self) -> bool {
        self.update_file.is_some()
    }
}
