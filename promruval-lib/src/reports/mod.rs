//! Validation report model and renderers
//!
//! The report is a tree of files, groups and rules carrying the violations
//! found, plus the list of validation rules that were applied. Three renderers
//! are provided, each through a `generate` function writing to a
//! `core::fmt::Write`:
//! - **Text**: indented tree for terminals, optionally colored
//! - **JSON**: pretty printed, camelCase keys
//! - **YAML**: same structure as JSON

mod json;
mod report;
mod text;
mod yaml;

pub use json::generate as generate_json;
pub use report::{FileReport, GroupReport, RuleReport, RuleSummary, ValidationReport, ValidatorSummary, Violation};
pub use text::generate as generate_text;
pub use yaml::generate as generate_yaml;

/// Report shared by the renderer tests: one failing file, one clean file, one unloadable file.
#[cfg(test)]
pub(crate) fn test_report() -> ValidationReport {
    use crate::config::Scope;
    use crate::rulefile::RuleKind;

    let mut report = ValidationReport::new(&[]);
    report.validation_rules.push(RuleSummary {
        name: "has-severity".to_string(),
        scope: Scope::Alert,
        validators: vec![ValidatorSummary {
            kind: "hasLabels".to_string(),
            description: "Rule has labels `severity`.".to_string(),
        }],
    });

    let failing = RuleReport::new(
        "InstanceDown".to_string(),
        RuleKind::Alert,
        Vec::new(),
        vec![Violation {
            validation_rule: "has-severity".to_string(),
            validator: "hasLabels".to_string(),
            message: "missing label `severity`".to_string(),
        }],
    );
    let passing = RuleReport::new("job:up:sum".to_string(), RuleKind::Recording, Vec::new(), Vec::new());

    report.push_file(FileReport::loaded(
        "rules/a.yaml".to_string(),
        vec![GroupReport::new("node".to_string(), Vec::new(), vec![failing, passing])],
    ));
    report.push_file(FileReport::loaded(
        "rules/b.yaml".to_string(),
        vec![GroupReport::new("api".to_string(), Vec::new(), Vec::new())],
    ));
    report.push_file(FileReport::failed(
        "rules/broken.yaml".to_string(),
        "parsing rule file 'rules/broken.yaml'".to_string(),
    ));

    report
}
