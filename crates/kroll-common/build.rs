//! ---
//! kr_section: "01-core-functionality"
//! kr_subsection: "build"
//! kr_type: "source"
//! kr_scope: "code"
//! kr_description: "Build metadata emission for version reporting."
//! kr_version: "v0.0.0-prealpha"
//! kr_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Outside a git checkout vergen emits placeholder git values.
    EmitBuilder::builder()
        .all_build()
        .all_cargo()
        .all_git()
        .emit()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
