//! ---
//! kr_section: "03-boot-orchestration"
//! kr_subsection: "module"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Boot sequencing from manifest load to runtime handoff."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use std::ffi::{OsStr, OsString};
use std::path::Path;

use indexmap::IndexMap;
use kroll_app::Component;
use serde::{Serialize, Serializer};
use tracing::debug;

/// Set once the launcher has prepared the environment.
pub const BOOTSTRAP_ENV: &str = "KR_BOOTSTRAPPED";
pub const BOOTSTRAP_VALUE: &str = "YES";
pub const HOME_ENV: &str = "KR_HOME";
pub const RUNTIME_ENV: &str = "KR_RUNTIME";
pub const MODULES_ENV: &str = "KR_MODULES";

/// Token terminating each entry of the module list.
#[cfg(windows)]
pub const MODULE_SEPARATOR: &str = ";";
#[cfg(not(windows))]
pub const MODULE_SEPARATOR: &str = ":";

/// Process environment mutation.
pub trait Environment {
    fn set(&mut self, key: &str, value: &OsStr);
    fn get(&self, key: &str) -> Option<OsString>;
}

/// [`Environment`] backed by the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn set(&mut self, key: &str, value: &OsStr) {
        std::env::set_var(key, value);
    }

    fn get(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// Concatenate each path followed by [`MODULE_SEPARATOR`], in order.
///
/// Paths are kept byte for byte; nothing is re-encoded.
pub fn module_list<'a, I>(paths: I) -> OsString
where
    I: IntoIterator<Item = &'a Path>,
{
    paths.into_iter().fold(OsString::new(), |mut list, path| {
        list.push(path);
        list.push(MODULE_SEPARATOR);
        list
    })
}

/// Variables handed to the launched runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchEnvironment {
    #[serde(serialize_with = "serialize_lossy")]
    variables: IndexMap<String, OsString>,
    #[serde(skip)]
    module_list: OsString,
}

/// Reports render values as text; the launched process gets the raw bytes.
fn serialize_lossy<S: Serializer>(
    variables: &IndexMap<String, OsString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        variables
            .iter()
            .map(|(key, value)| (key, value.to_string_lossy())),
    )
}

impl LaunchEnvironment {
    pub fn assemble(app_path: &Path, runtime_path: &Path, modules: &[Component]) -> Self {
        let module_list = module_list(modules.iter().map(|module| module.path.as_path()));
        let mut variables = IndexMap::new();
        variables.insert(BOOTSTRAP_ENV.to_owned(), OsString::from(BOOTSTRAP_VALUE));
        variables.insert(HOME_ENV.to_owned(), app_path.as_os_str().to_owned());
        variables.insert(RUNTIME_ENV.to_owned(), runtime_path.as_os_str().to_owned());
        variables.insert(MODULES_ENV.to_owned(), module_list.clone());
        Self {
            variables,
            module_list,
        }
    }

    pub fn variables(&self) -> &IndexMap<String, OsString> {
        &self.variables
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.variables.get(key).map(OsString::as_os_str)
    }

    pub fn module_list(&self) -> &OsStr {
        &self.module_list
    }

    /// Write every variable into `environment`.
    pub fn apply(&self, environment: &mut dyn Environment) {
        for (key, value) in &self.variables {
            debug!(key = %key, value = ?value, "setting launch variable");
            environment.set(key, value);
        }
    }
}
