//! Process level helpers shared by the commands.

use super::Host;
use crate::Result;
use ohno::IntoAppError;
use std::io::Write;

/// Initialize the `env_logger` backend.
///
/// `info` by default and `debug` when requested; `RUST_LOG` overrides both.
/// Targets are only printed at debug level. Calling this more than once in a
/// process keeps the first logger.
pub fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(debug)
        .try_init();
}

/// Write rendered text to the host output and flush it before any exit.
pub fn emit<H: Host>(host: &mut H, text: &str) -> Result<()> {
    let mut output = host.output();
    output.write_all(text.as_bytes()).into_app_err("writing output")?;
    output.flush().into_app_err("writing output")
}
