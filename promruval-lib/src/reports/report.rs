use crate::config::Scope;
use crate::rules::ValidationRule;
use crate::rulefile::RuleKind;
use core::time::Duration;
use serde::Serialize;

/// Outcome of one validation run over all files.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Whether any file failed to load or any violation was found
    pub failed: bool,

    /// Wall-clock time spent validating
    #[serde(with = "humantime_serde")]
    pub duration: Duration,

    pub files_count: usize,

    /// File errors plus violations
    pub errors_count: usize,

    /// The validation rules that were applied
    pub validation_rules: Vec<RuleSummary>,

    pub files: Vec<FileReport>,
}

/// A validation rule as it was applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummary {
    pub name: String,
    pub scope: Scope,
    pub validators: Vec<ValidatorSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSummary {
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub name: String,
    pub valid: bool,

    /// Why the file could not be validated at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub name: String,
    pub valid: bool,

    /// Violations found on the group itself
    pub errors: Vec<Violation>,

    pub rules: Vec<RuleReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleReport {
    pub name: String,
    pub kind: RuleKind,
    pub valid: bool,

    /// Validation rules skipped for this rule through the exclude annotation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_rules: Vec<String>,

    pub errors: Vec<Violation>,
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub validation_rule: String,
    pub validator: String,
    pub message: String,
}

impl ValidationReport {
    /// An empty report for the given rule set.
    #[must_use]
    pub fn new(rules: &[ValidationRule]) -> Self {
        Self {
            failed: false,
            duration: Duration::ZERO,
            files_count: 0,
            errors_count: 0,
            validation_rules: rules.iter().map(RuleSummary::from).collect(),
            files: Vec::new(),
        }
    }

    /// Add a file report, updating the totals.
    pub fn push_file(&mut self, file: FileReport) {
        self.errors_count += file.errors_count();
        self.failed |= !file.valid;
        self.files_count += 1;
        self.files.push(file);
    }
}

impl From<&ValidationRule> for RuleSummary {
    fn from(rule: &ValidationRule) -> Self {
        Self {
            name: rule.name().to_string(),
            scope: rule.scope(),
            validators: rule
                .validators()
                .iter()
                .map(|v| ValidatorSummary {
                    kind: v.kind().to_string(),
                    description: v.describe(),
                })
                .collect(),
        }
    }
}

impl FileReport {
    /// A file that could not be loaded.
    #[must_use]
    pub fn failed(name: String, error: String) -> Self {
        Self {
            name,
            valid: false,
            error: Some(error),
            groups: Vec::new(),
        }
    }

    /// A loaded file, valid when none of its groups carry violations.
    #[must_use]
    pub fn loaded(name: String, groups: Vec<GroupReport>) -> Self {
        Self {
            name,
            valid: groups.iter().all(|g| g.valid),
            error: None,
            groups,
        }
    }

    #[must_use]
    pub fn errors_count(&self) -> usize {
        usize::from(self.error.is_some()) + self.groups.iter().map(GroupReport::errors_count).sum::<usize>()
    }
}

impl GroupReport {
    #[must_use]
    pub fn new(name: String, errors: Vec<Violation>, rules: Vec<RuleReport>) -> Self {
        Self {
            name,
            valid: errors.is_empty() && rules.iter().all(|r| r.valid),
            errors,
            rules,
        }
    }

    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.errors.len() + self.rules.iter().map(|r| r.errors.len()).sum::<usize>()
    }
}

impl RuleReport {
    #[must_use]
    pub fn new(name: String, kind: RuleKind, excluded_rules: Vec<String>, errors: Vec<Violation>) -> Self {
        Self {
            name,
            kind,
            valid: errors.is_empty(),
            excluded_rules,
            errors,
        }
    }
}
