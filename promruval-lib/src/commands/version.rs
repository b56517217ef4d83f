use super::Host;
use super::common::emit;
use crate::Result;
use std::env;

/// Print the version and build metadata.
pub fn print_version<H: Host>(host: &mut H) -> Result<()> {
    let built_by = env::var("USER").unwrap_or_else(|_| "unknown".to_string());

    emit(
        host,
        &format!(
            "Version: {}\nBuild date: {}\nBuild commit: {}\nBuilt by: {built_by}\n",
            env!("CARGO_PKG_VERSION"),
            env!("PROMRUVAL_BUILD_DATE"),
            env!("PROMRUVAL_BUILD_COMMIT"),
        ),
    )
}
