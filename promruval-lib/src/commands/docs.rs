use super::Host;
use super::common::emit;
use crate::Result;
use crate::config::Config;
use crate::docs::{generate_html, generate_markdown, generate_text};
use crate::rules::{RuleFilters, assemble};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Format of the validation rule documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocsFormat {
    /// Plain text list
    Text,

    /// Markdown document
    Markdown,

    /// Self-contained HTML page
    Html,
}

#[derive(Parser, Debug)]
pub struct DocsArgs {
    /// Path to the validation configuration file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config_file: Utf8PathBuf,

    /// Format of the documentation
    #[arg(long, short = 'o', value_name = "FORMAT", default_value = "text")]
    pub output: DocsFormat,
}

/// Render human readable documentation of every configured validation rule.
pub fn generate_docs<H: Host>(host: &mut H, args: &DocsArgs) -> Result<()> {
    let config = Config::load(&args.config_file)?;
    let rules = assemble(&config.validation_rules, &RuleFilters::default())?;

    let mut rendered = String::new();
    match args.output {
        DocsFormat::Text => generate_text(&rules, &mut rendered)?,
        DocsFormat::Markdown => generate_markdown(&rules, &mut rendered)?,
        DocsFormat::Html => generate_html(&rules, &mut rendered)?,
    }

    emit(host, &rendered)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::TestHost;
    use std::fs;

    fn config_file(dir: &tempfile::TempDir, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join("config.yaml")).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_text_docs() {
        let tmp = tempfile::tempdir().unwrap();
        let args = DocsArgs {
            config_file: config_file(
                &tmp,
                "validationRules:\n  - name: small-groups\n    scope: Group\n    validations:\n      - type: maxRulesPerGroup\n        params:\n          limit: 10\n",
            ),
            output: DocsFormat::Text,
        };

        let mut host = TestHost::new();
        generate_docs(&mut host, &args).unwrap();
        assert!(host.output_text().starts_with("small-groups (Group)\n  - "));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_validator_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let args = DocsArgs {
            config_file: config_file(&tmp, "validationRules:\n  - name: broken\n    scope: Alert\n    validations:\n      - type: noSuchValidator\n"),
            output: DocsFormat::Markdown,
        };

        let mut host = TestHost::new();
        let err = generate_docs(&mut host, &args).unwrap_err();
        assert!(err.to_string().contains("loading validator config for validation rule 'broken'"));
        assert!(host.output_buf.is_empty());
    }
}
