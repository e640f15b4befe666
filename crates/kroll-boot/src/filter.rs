//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use kroll_app::Dependency;

/// Narrow an install list to the SDK entries when any are present.
///
/// Installing an SDK provides the runtime and modules, so the remaining
/// entries are left for the next resolution pass. Without SDK entries the
/// input is returned unchanged. Order is preserved.
pub fn filter_for_sdk_install(dependencies: Vec<Dependency>) -> Vec<Dependency> {
    if !dependencies.iter().any(|dep| dep.kind.is_sdk()) {
        return dependencies;
    }
    dependencies
        .into_iter()
        .filter(|dep| dep.kind.is_sdk())
        .collect()
}
