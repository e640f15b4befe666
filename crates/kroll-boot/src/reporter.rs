//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use kroll_app::{Component, Dependency};

/// Observer for resolution diagnostics and user-visible failures.
pub trait BootReporter {
    /// A component found by resolution; only called when the debug argument is set.
    fn resolved(&mut self, component: &Component);
    /// A dependency resolution could not satisfy; only called when the debug argument is set.
    fn unresolved(&mut self, dependency: &Dependency);
    /// A failure the user must see.
    fn error(&mut self, message: &str);
}

/// Writes diagnostics to stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl BootReporter for ConsoleReporter {
    fn resolved(&mut self, component: &Component) {
        println!(
            "Resolved: ({} {}) {}",
            component.name,
            component.version,
            component.path.display()
        );
    }

    fn unresolved(&mut self, dependency: &Dependency) {
        eprintln!("Unresolved: {} {}", dependency.name, dependency.version);
    }

    fn error(&mut self, message: &str) {
        eprintln!("{message}");
    }
}
