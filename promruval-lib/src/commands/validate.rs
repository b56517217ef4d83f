use super::Host;
use super::common::emit;
use crate::Result;
use crate::config::Config;
use crate::files;
use crate::prometheus::{CacheFlush, PrometheusClient};
use crate::reports::{ValidationReport, generate_json, generate_text, generate_yaml};
use crate::rules::{RuleFilters, assemble};
use crate::validate::validate_files;
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ohno::IntoAppError;

const LOG_TARGET: &str = "  validate";

/// Indentation of the text report, in spaces per level
const TEXT_INDENT: usize = 2;

/// Format of the validation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented human readable tree
    Text,

    /// Pretty printed JSON document
    Json,

    /// YAML document
    Yaml,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the validation configuration file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config_file: Utf8PathBuf,

    /// Name of a validation rule to skip, may be repeated
    #[arg(long, short = 'd', value_name = "NAME")]
    pub disable_rule: Vec<String>,

    /// Name of a validation rule to run exclusively, may be repeated
    #[arg(long, short = 'e', value_name = "NAME")]
    pub enable_rule: Vec<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Format of the validation report
    #[arg(long, short = 'o', value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,

    /// Use colors in the text report
    #[arg(long)]
    pub color: bool,

    /// Rule files to validate, glob patterns are expanded
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,
}

/// Validate the rule files named on the command line and render the report.
///
/// Requests exit status 1 from the host when the report failed. Errors
/// returned from here are fatal and leave the report unrendered.
pub async fn validate_rules<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let config = Config::load(&args.config_file)?;

    let filters = RuleFilters {
        disabled: args.disable_rule.clone(),
        enabled: args.enable_rule.clone(),
    };
    let rules = assemble(&config.validation_rules, &filters)?;
    log::info!(target: LOG_TARGET, "Loaded {} validation rules from '{}'", rules.len(), args.config_file);

    let files = files::resolve(&args.paths)?;
    log::info!(target: LOG_TARGET, "Resolved {} rule files", files.len());

    let client = if config.has_backend() {
        let client = PrometheusClient::new(&config.prometheus).into_app_err("failed to initialize prometheus client")?;
        log::info!(target: LOG_TARGET, "Using backend at '{}'", client.base_url());
        Some(client)
    } else {
        None
    };

    let cache = CacheFlush::new(client.as_ref());
    let report = validate_files(&files, &rules, config.exclude_annotation(), client.as_ref()).await;
    cache.flush();

    let rendered = render(&report, args.output, args.color)?;
    emit(host, &rendered)?;

    if report.failed {
        host.exit(1);
    }

    Ok(())
}

fn render(report: &ValidationReport, format: OutputFormat, use_colors: bool) -> Result<String> {
    let mut rendered = String::new();
    match format {
        OutputFormat::Text => generate_text(report, TEXT_INDENT, use_colors, &mut rendered)?,
        OutputFormat::Json => generate_json(report, &mut rendered)?,
        OutputFormat::Yaml => generate_yaml(report, &mut rendered)?,
    }

    Ok(rendered)
}
