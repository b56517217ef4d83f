//! Human readable documentation of the configured validation rules
//!
//! Each generator lists every validation rule with its scope and one sentence
//! per validator describing what is checked.

mod html;
mod markdown;
mod text;

pub use html::generate as generate_html;
pub use markdown::generate as generate_markdown;
pub use text::generate as generate_text;

#[cfg(test)]
pub(crate) fn test_rules() -> Vec<crate::rules::ValidationRule> {
    use crate::config::Config;
    use crate::rules::{RuleFilters, assemble};

    let yaml = r"
validationRules:
  - name: has-severity
    scope: Alert
    validations:
      - type: hasLabels
        params:
          labels: [severity]
      - type: labelHasAllowedValue
        params:
          label: severity
          allowedValues: [warning, critical]
  - name: <script>
    scope: All rules
    validations: []
";
    let config = Config::from_yaml(yaml).unwrap();
    assemble(&config.validation_rules, &RuleFilters::default()).unwrap()
}
