//! ---
//! kr_section: "05-testing"
//! kr_subsection: "integration-tests"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Integration and validation tests for the Kroll boot stack."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
mod support;

use kroll_app::{Dependency, DependencyKind, Requirement};
use kroll_boot::environment::{BOOTSTRAP_ENV, HOME_ENV, MODULES_ENV, RUNTIME_ENV};
use kroll_boot::{BootError, BootOptions, MODULE_SEPARATOR};
use support::{boot, Sandbox, ScriptedInstaller, LAUNCH_FAILURE};

const APP_ID: &str = "com.example.demo";

const MANIFEST: &str = "\
#appname: Demo
#appid: com.example.demo
#version: 1.0.0
runtime: 1.0.0
tiui: >=1.0
tinetwork: 2.0
";

const UPDATED_MANIFEST: &str = "\
#appname: Demo
#appid: com.example.demo
#version: 1.1.0
runtime: 1.1.0
tiui: >=1.0
tinetwork: 2.0
";

fn runnable_sandbox() -> Sandbox {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("manifest", MANIFEST);
    sandbox.install(&sandbox.app, DependencyKind::Runtime, "runtime", "1.0.0");
    sandbox.install(&sandbox.runtime_home, DependencyKind::Module, "tiui", "1.0");
    sandbox.install(&sandbox.runtime_home, DependencyKind::Module, "tiui", "1.5");
    sandbox.install(&sandbox.runtime_home, DependencyKind::Module, "tinetwork", "2.0");
    sandbox.mark_installed();
    sandbox
}

#[test]
fn runnable_bundle_hands_off_with_assembled_environment() {
    let sandbox = runnable_sandbox();
    let (orchestrator, recorder) =
        sandbox.orchestrator(ScriptedInstaller::new(&sandbox.runtime_home), BootOptions::default());

    let err = boot(orchestrator, &["Demo", "--start-page=index.html"]);
    assert!(matches!(err, BootError::HandoffFailed(ref detail) if detail == LAUNCH_FAILURE));

    let recorder = recorder.lock();
    assert!(recorder.installs.is_empty());
    assert_eq!(recorder.launches.len(), 1);

    let runtime = kroll_app::component::install_path(&sandbox.app, DependencyKind::Runtime, "runtime", "1.0.0");
    let tiui = kroll_app::component::install_path(&sandbox.runtime_home, DependencyKind::Module, "tiui", "1.5");
    let tinetwork =
        kroll_app::component::install_path(&sandbox.runtime_home, DependencyKind::Module, "tinetwork", "2.0");
    let modules = format!(
        "{}{sep}{}{sep}",
        tiui.display(),
        tinetwork.display(),
        sep = MODULE_SEPARATOR
    );

    let launch = &recorder.launches[0];
    assert_eq!(launch.runtime, runtime);
    assert_eq!(launch.arguments, vec!["Demo", "--start-page=index.html"]);
    assert_eq!(launch.variables.get(MODULES_ENV), Some(&modules));

    let env = &recorder.environment;
    assert_eq!(env.get(BOOTSTRAP_ENV).map(String::as_str), Some("YES"));
    assert_eq!(env.get(HOME_ENV), Some(&sandbox.app.to_string_lossy().into_owned()));
    assert_eq!(env.get(RUNTIME_ENV), Some(&runtime.to_string_lossy().into_owned()));
    assert_eq!(env.get(MODULES_ENV), Some(&modules));
}

#[test]
fn missing_module_is_installed_then_resolved() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("manifest", MANIFEST);
    sandbox.install(&sandbox.app, DependencyKind::Runtime, "runtime", "1.0.0");
    sandbox.install(&sandbox.runtime_home, DependencyKind::Module, "tiui", "1.0");
    sandbox.mark_installed();

    let installer = ScriptedInstaller::new(&sandbox.runtime_home).providing(DependencyKind::Module, "tinetwork", "2.0");
    let (orchestrator, recorder) = sandbox.orchestrator(installer, BootOptions::default());

    let err = boot(orchestrator, &["Demo"]);
    assert!(matches!(err, BootError::HandoffFailed(_)));

    let recorder = recorder.lock();
    assert_eq!(recorder.installs.len(), 1);
    assert_eq!(recorder.installs[0].app_id, APP_ID);
    assert_eq!(
        recorder.installs[0].dependencies,
        vec![Dependency::new(DependencyKind::Module, "tinetwork", "2.0")]
    );
    assert_eq!(recorder.launches.len(), 1);
    assert!(recorder.environment[MODULES_ENV].contains("tinetwork"));
}

#[test]
fn first_run_installs_unmarked_bundle() {
    let sandbox = runnable_sandbox();
    std::fs::remove_file(sandbox.app.join(kroll_app::INSTALLED_MARKER)).unwrap();

    let (orchestrator, recorder) =
        sandbox.orchestrator(ScriptedInstaller::new(&sandbox.runtime_home), BootOptions::default());
    boot(orchestrator, &["Demo"]);

    let recorder = recorder.lock();
    assert_eq!(recorder.installs.len(), 1);
    assert!(recorder.installs[0].dependencies.is_empty());
    assert_eq!(recorder.launches.len(), 1);
    assert!(sandbox.app.join(kroll_app::INSTALLED_MARKER).is_file());
}

#[test]
fn pending_update_is_installed_applied_and_consumed() {
    let sandbox = runnable_sandbox();
    let marker = sandbox.write_update(APP_ID, ".update", UPDATED_MANIFEST);

    let installer =
        ScriptedInstaller::new(&sandbox.runtime_home).providing(DependencyKind::Runtime, "runtime", "1.1.0");
    let (orchestrator, recorder) = sandbox.orchestrator(installer, BootOptions::default());

    let err = boot(orchestrator, &["Demo", "debug"]);
    assert!(matches!(err, BootError::HandoffFailed(_)));
    assert!(!marker.exists());

    let recorder = recorder.lock();
    let install = &recorder.installs[0];
    assert_eq!(install.update_file.as_deref(), Some(marker.as_path()));
    assert_eq!(
        install.dependencies,
        vec![Dependency::new(DependencyKind::Runtime, "runtime", "1.1.0")]
    );
    assert_eq!(recorder.unresolved, vec!["runtime =1.1.0"]);

    let launch = &recorder.launches[0];
    assert_eq!(
        launch.runtime,
        kroll_app::component::install_path(&sandbox.runtime_home, DependencyKind::Runtime, "runtime", "1.1.0")
    );
    assert_eq!(launch.arguments, vec!["Demo", "debug"]);
    // The update is rooted at the original installation.
    assert_eq!(recorder.environment[HOME_ENV], sandbox.app.to_string_lossy());
}

#[test]
fn missing_manifest_stops_before_anything_else() {
    let sandbox = Sandbox::new();
    let (orchestrator, recorder) =
        sandbox.orchestrator(ScriptedInstaller::new(&sandbox.runtime_home), BootOptions::default());

    let err = boot(orchestrator, &["Demo"]);
    assert_eq!(err.exit_code(), 11);

    let recorder = recorder.lock();
    assert_eq!(
        recorder.errors,
        vec![format!(
            "Application packaging error: no manifest was found at: {}",
            sandbox.app.join("manifest").display()
        )]
    );
    assert!(recorder.installs.is_empty());
    assert!(recorder.launches.is_empty());
    assert!(recorder.environment.is_empty());
}

#[test]
fn manifest_without_runtime_is_a_packaging_error() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("manifest", "#appname: Demo\n#appid: com.example.demo\ntiui: 1.0\n");
    let (orchestrator, recorder) =
        sandbox.orchestrator(ScriptedInstaller::new(&sandbox.runtime_home), BootOptions::default());

    let err = boot(orchestrator, &["Demo"]);
    assert_eq!(err.exit_code(), 12);
    assert!(recorder.lock().errors[0].starts_with("Application packaging error: could not read manifest at: "));
}

#[test]
fn cancelled_install_exits_without_message() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("manifest", MANIFEST);
    let marker = sandbox.write_update(APP_ID, ".update", UPDATED_MANIFEST);

    let installer = ScriptedInstaller::new(&sandbox.runtime_home).cancelled();
    let (orchestrator, recorder) = sandbox.orchestrator(installer, BootOptions::default());

    let err = boot(orchestrator, &["Demo"]);
    match &err {
        BootError::Unresolved { missing, installed } => {
            assert_eq!(missing.len(), 3);
            assert!(!installed);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 21);

    let recorder = recorder.lock();
    assert_eq!(recorder.installs.len(), 1);
    assert!(recorder.errors.is_empty());
    assert!(recorder.launches.is_empty());
    assert!(marker.exists());
}

#[test]
fn failing_installer_keeps_update_marker() {
    let sandbox = runnable_sandbox();
    let marker = sandbox.write_update(APP_ID, ".update", UPDATED_MANIFEST);

    let installer = ScriptedInstaller::new(&sandbox.runtime_home).failing();
    let (orchestrator, recorder) = sandbox.orchestrator(installer, BootOptions::default());

    let err = boot(orchestrator, &["Demo"]);
    assert!(matches!(err, BootError::InstallerFailed));
    assert!(marker.exists());
    assert!(recorder.lock().errors.is_empty());
}

#[test]
fn sdk_dependency_is_installed_alone() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(
        "manifest",
        "#appname: Demo\n#appid: com.example.demo\nruntime: 1.0.0\nsdk: >=1.4.0\ntiui: 1.0\n",
    );
    sandbox.mark_installed();
    let installer = ScriptedInstaller::new(&sandbox.runtime_home)
        .providing(DependencyKind::Runtime, "runtime", "1.0.0")
        .providing(DependencyKind::PlatformSdk, "sdk", "1.4.2")
        .providing(DependencyKind::Module, "tiui", "1.0");
    let (orchestrator, recorder) = sandbox.orchestrator(installer, BootOptions::default());

    boot(orchestrator, &["Demo"]);

    let recorder = recorder.lock();
    assert_eq!(
        recorder.installs[0].dependencies,
        vec![Dependency::new(DependencyKind::PlatformSdk, "sdk", "1.4.0").with_requirement(Requirement::Gte)]
    );
    assert_eq!(recorder.launches.len(), 1);
}

#[test]
fn force_install_reinstalls_runnable_bundle() {
    let sandbox = runnable_sandbox();
    let (orchestrator, recorder) =
        sandbox.orchestrator(ScriptedInstaller::new(&sandbox.runtime_home), BootOptions::default());

    boot(orchestrator, &["Demo", "--force-install", "--debug"]);

    let recorder = recorder.lock();
    assert_eq!(recorder.installs.len(), 1);
    assert!(recorder.installs[0].force);
    assert_eq!(recorder.resolved, vec!["runtime 1.0.0", "tiui 1.5", "tinetwork 2.0"]);
    assert_eq!(recorder.launches.len(), 1);
}
