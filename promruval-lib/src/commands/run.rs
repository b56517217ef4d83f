//! Command dispatch logic for promruval

use super::{DocsArgs, ValidateArgs, generate_docs, init_logging, print_version, validate_rules};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use ohno::IntoAppError;
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "promruval", author, version, long_about = None)]
#[command(about = "Validate Prometheus rule files against user-defined validation rules")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print version and build information
    Version,
    /// Validate Prometheus rule files
    Validate(ValidateArgs),
    /// Print human readable documentation of the configured validation rules
    ValidationDocs(DocsArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments, initializes logging and
/// executes the corresponding subcommand. It's designed to be called from
/// main.rs with the program arguments.
///
/// Help and version requests print to the output and succeed. A malformed
/// command line is written to the error output and a failing command is logged
/// once; in both cases the host is asked to exit with status 1 and the error is
/// returned.
///
/// # Errors
///
/// Returns an error if the command line cannot be parsed or the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(host.output(), "{}", e.render());
            return Ok(());
        }
        Err(e) => {
            let _ = write!(host.error(), "{}", e.render());
            host.exit(1);
            return Err(e).into_app_err("invalid command line");
        }
    };

    init_logging(matches!(&cli.command, Command::Validate(args) if args.debug));

    let result = match &cli.command {
        Command::Version => print_version(host),
        Command::Validate(validate_args) => validate_rules(host, validate_args).await,
        Command::ValidationDocs(docs_args) => generate_docs(host, docs_args),
    };

    if let Err(e) = &result {
        log::error!("{e}");
        host.exit(1);
    }

    result
}
