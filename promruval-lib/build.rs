//! This build script validates the default configuration file (`default_config.yaml`)
//! and exports the build metadata printed by the `version` command.

#![allow(
    clippy::redundant_pub_crate,
    reason = "pub(crate) is correct in library context but appears redundant in build script"
)]
#![allow(dead_code, reason = "Some items may be unused in this build script context")]
#![allow(unused_imports, reason = "Some items may be unused in this build script context")]

use camino::Utf8PathBuf;
use ohno::IntoAppError;
use std::env;
use std::process::{self, Command};

type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[path = "src/config/mod.rs"]
mod config;

fn main() {
    println!("cargo:rerun-if-changed=default_config.yaml");
    println!("cargo:rerun-if-changed=src/config");
    println!("cargo:rerun-if-changed=../.git/HEAD");

    println!("cargo:rustc-env=PROMRUVAL_BUILD_DATE={}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("cargo:rustc-env=PROMRUVAL_BUILD_COMMIT={}", build_commit());

    if let Err(e) = check_default_config() {
        eprintln!("unable to load default_config.yaml: {e:?}");
        process::exit(1);
    }
}

fn check_default_config() -> Result<()> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").into_app_err("CARGO_MANIFEST_DIR should be set during build")?;
    let config_path = Utf8PathBuf::from(&manifest_dir).join("default_config.yaml");

    let config = config::Config::load(&config_path)?;
    if config.validation_rules.is_empty() {
        ohno::bail!("default_config.yaml defines no validation rules");
    }

    Ok(())
}

fn build_commit() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|commit| commit.trim().to_string())
        .filter(|commit| !commit.is_empty())
        .unwrap_or_else(|| "none".to_string())
}
