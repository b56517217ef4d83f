//! Command-line interface and orchestration for promruval
//!
//! This module parses the command line and drives the other modules end to
//! end. It owns the process level contract: logging setup, fatal error
//! handling and the exit status.
//!
//! # Commands
//!
//! - **validate**: load the validation config, assemble the validation rules
//!   (applying `--disable-rule`/`--enable-rule`), expand the path patterns,
//!   validate every file and render the report. Exits with status 1 when the
//!   report failed.
//! - **validation-docs**: render the full configured rule set as text,
//!   Markdown or HTML. Never reads rule files and never talks to a backend.
//! - **version**: print build metadata.
//!
//! # Execution Flow
//!
//! [`run`] parses the arguments, initializes logging and dispatches to the
//! command handler. Any error returned by a handler is fatal: it is logged
//! once, the host is asked to exit with status 1, and the error is returned
//! to the caller.
//!
//! All output goes through the [`Host`] trait so the whole flow, exit status
//! included, can be exercised in-process by tests.

mod common;
mod docs;
mod host;
mod run;
mod validate;
mod version;

pub use common::init_logging;
pub use docs::{DocsArgs, DocsFormat, generate_docs};
pub use host::Host;
pub use run::run;
pub use validate::{OutputFormat, ValidateArgs, validate_rules};
pub use version::print_version;

#[cfg(test)]
pub use host::TestHost;
