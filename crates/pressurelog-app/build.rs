//! Stamps `PRESSURELOG_BUILD_ID` as `YYYY.MM.DD+g<short-sha>`, with
//! `+unknown` in place of the commit when building outside a git checkout
//! (source tarballs, vendored builds).

use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");

    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_owned())
        .filter(|sha| !sha.is_empty())
        .map_or_else(|| "unknown".to_owned(), |sha| format!("g{sha}"));

    println!(
        "cargo:rustc-env=PRESSURELOG_BUILD_ID={}+{commit}",
        Utc::now().format("%Y.%m.%d")
    );
}
