//! Execution of validation rules over rule files
//!
//! Files are processed one after another in the order given, duplicates
//! included. A file that cannot be loaded is recorded as a file error and the
//! run moves on to the next file. Within a file, `Group` scoped validation rules
//! are applied to each group and the other scopes to each matching rule, unless
//! the rule lists the validation rule in its exclude annotation.

mod exclusions;

pub use exclusions::excluded_rules;

use crate::config::Scope;
use crate::prometheus::PrometheusClient;
use crate::reports::{FileReport, GroupReport, RuleReport, ValidationReport, Violation};
use crate::rulefile::{Rule, RuleFile, RuleGroup};
use crate::rules::ValidationRule;
use crate::validators::Subject;
use camino::{Utf8Path, Utf8PathBuf};
use std::time::Instant;

const LOG_TARGET: &str = "  validate";

/// Apply the validation rules to every file and collect the outcome.
pub async fn validate_files(
    files: &[Utf8PathBuf],
    rules: &[ValidationRule],
    exclude_annotation: &str,
    client: Option<&PrometheusClient>,
) -> ValidationReport {
    let start = Instant::now();
    let mut report = ValidationReport::new(rules);

    for file in files {
        report.push_file(validate_file(file, rules, exclude_annotation, client).await);
    }

    report.duration = start.elapsed();
    log::info!(target: LOG_TARGET,
        "Validated {} files with {} validation rules in {}ms, {} errors found",
        report.files_count,
        rules.len(),
        report.duration.as_millis(),
        report.errors_count
    );

    report
}

async fn validate_file(
    path: &Utf8Path,
    rules: &[ValidationRule],
    exclude_annotation: &str,
    client: Option<&PrometheusClient>,
) -> FileReport {
    log::debug!(target: LOG_TARGET, "Validating file '{path}'");

    let file = match RuleFile::load(path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Cannot validate '{path}': {e}");
            return FileReport::failed(path.to_string(), e.to_string());
        }
    };

    let mut groups = Vec::with_capacity(file.groups.len());
    for group in &file.groups {
        groups.push(validate_group(group, rules, exclude_annotation, client).await);
    }

    FileReport::loaded(path.to_string(), groups)
}

async fn validate_group(
    group: &RuleGroup,
    rules: &[ValidationRule],
    exclude_annotation: &str,
    client: Option<&PrometheusClient>,
) -> GroupReport {
    let mut errors = Vec::new();
    for rule in rules.iter().filter(|r| r.scope() == Scope::Group) {
        run_validators(rule, Subject::Group(group), client, &mut errors).await;
    }

    let mut rule_reports = Vec::with_capacity(group.rules.len());
    for rule in &group.rules {
        rule_reports.push(validate_rule(rule, rules, exclude_annotation, client).await);
    }

    GroupReport::new(group.name.clone(), errors, rule_reports)
}

async fn validate_rule(rule: &Rule, rules: &[ValidationRule], exclude_annotation: &str, client: Option<&PrometheusClient>) -> RuleReport {
    let excluded = excluded_rules(rule, exclude_annotation);

    let mut errors = Vec::new();
    for validation_rule in rules.iter().filter(|r| r.scope().covers_rule(rule.is_alert())) {
        if excluded.iter().any(|name| name == validation_rule.name()) {
            log::debug!(target: LOG_TARGET, "Rule '{}' excludes validation rule '{}'", rule.name(), validation_rule.name());
            continue;
        }

        run_validators(validation_rule, Subject::Rule(rule), client, &mut errors).await;
    }

    RuleReport::new(rule.name().to_string(), rule.kind(), excluded, errors)
}

async fn run_validators(rule: &ValidationRule, subject: Subject<'_>, client: Option<&PrometheusClient>, errors: &mut Vec<Violation>) {
    for validator in rule.validators() {
        for message in validator.validate(subject, client).await {
            errors.push(Violation {
                validation_rule: rule.name().to_string(),
                validator: validator.kind().to_string(),
                message,
            });
        }
    }
}
