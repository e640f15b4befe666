//! ---
//! kr_section: "02-application-model"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Application descriptor, manifests and component resolution."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! Application descriptors for Kroll bundles.
//!
//! A bundle ships a plain-text manifest naming its runtime, modules and SDKs.
//! [`Application`] parses that manifest and resolves each [`Dependency`] into a
//! concrete [`Component`] on disk, first inside the bundle and then in the
//! configured runtime homes.

pub mod application;
pub mod component;
pub mod dependency;
pub mod errors;
pub mod manifest;
pub mod version;

pub use application::{Application, INSTALLED_MARKER};
pub use component::Component;
pub use dependency::{Dependency, DependencyKind, Requirement};
pub use errors::{AppError, ManifestError};
pub use manifest::Manifest;
pub use version::compare_versions;
