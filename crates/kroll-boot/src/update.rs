//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::path::PathBuf;

use tracing::{debug, info};

use crate::collaborators::{ApplicationLoader, BootApplication, BootPlatform};
use crate::context::BootContext;

/// Detects a pending self-update and substitutes its descriptor.
///
/// The update service drops a manifest named `update_filename` into the
/// application's data directory. When it loads, it replaces the active
/// descriptor; it is resolved against the original installation path so
/// bundled components are still found.
pub struct UpdateDetector<'a, L: ApplicationLoader> {
    loader: &'a L,
    platform: &'a dyn BootPlatform,
    update_filename: &'a str,
}

impl<'a, L: ApplicationLoader> UpdateDetector<'a, L> {
    pub fn new(loader: &'a L, platform: &'a dyn BootPlatform, update_filename: &'a str) -> Self {
        Self {
            loader,
            platform,
            update_filename,
        }
    }

    /// Location of the update marker for `app_id`.
    pub fn marker_path(&self, app_id: &str) -> PathBuf {
        self.platform
            .application_data_directory(app_id)
            .join(self.update_filename)
    }

    /// Substitute the update descriptor if one is present and loadable.
    ///
    /// Returns whether a substitution happened. A marker that fails to load is
    /// ignored and the original descriptor stays active.
    pub fn detect(&self, context: &mut BootContext<L::Application>) -> bool {
        let marker = self.marker_path(context.application().id());
        if !marker.is_file() {
            debug!(marker = %marker.display(), "no pending update");
            return false;
        }

        match self.loader.load(&marker, Some(context.application().path())) {
            Ok(mut update) => {
                update.set_arguments(context.arguments().to_vec());
                info!(
                    app_id = %update.id(),
                    marker = %marker.display(),
                    "pending update found; using update manifest"
                );
                context.replace_application(update, marker);
                true
            }
            Err(err) => {
                debug!(
                    marker = %marker.display(),
                    error = %err,
                    "ignoring unreadable update manifest"
                );
                false
            }
        }
    }
}
