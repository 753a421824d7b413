//! Build identification for the rfsc-an startup banner
//!
//! Sets `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` for `env!()`.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    emit("GIT_HASH", &git_revision().unwrap_or_else(|| UNKNOWN.into()));
    emit("BUILD_TIMESTAMP", &chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());
    emit("BUILD_PROFILE", &env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.into()));

    // Pick up new commits without forcing a rebuild on every source change
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={key}={value}");
}

/// Short commit id, with a `-dirty` suffix for uncommitted changes
fn git_revision() -> Option<String> {
    let hash = git(&["rev-parse", "--short=8", "HEAD"])?;
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());
    Some(if dirty { format!("{hash}-dirty") } else { hash })
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
