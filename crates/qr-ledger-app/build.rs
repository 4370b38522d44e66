use std::fs;
use std::path::{Path, PathBuf};

/// Finds the workspace-level `VERSION` file above this crate.
fn locate_version_file(manifest_dir: &Path) -> PathBuf {
    manifest_dir
        .ancestors()
        .map(|dir| dir.join("VERSION"))
        .find(|candidate| candidate.is_file())
        .expect("VERSION file must exist in an ancestor of the crate")
}

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_path = locate_version_file(&manifest_dir);
    println!("cargo:rerun-if-changed={}", version_path.display());

    let contents = fs::read_to_string(&version_path).expect("read VERSION file");
    let version = contents.lines().next().unwrap_or_default().trim();
    assert!(
        !version.is_empty() && version.split('.').all(|part| !part.is_empty()),
        "VERSION must hold a dotted version on its first line, got {version:?}"
    );

    println!("cargo:rustc-env=QR_LEDGER_VERSION={version}");
}
