use super::ValidationRule;
use crate::Result;
use crate::config::ValidationRuleConfig;
use crate::validators::new_from_config;
use ohno::IntoAppError;

const LOG_TARGET: &str = "     rules";

/// Name filters given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RuleFilters {
    /// Validation rules never to run
    pub disabled: Vec<String>,

    /// Validation rules to run exclusively
    pub enabled: Vec<String>,
}

/// Whether a validation rule named `name` survives the command line filters.
///
/// A disabled name always wins. Every enabled entry must then equal `name`,
/// which means two or more distinct enabled names exclude every rule.
#[must_use]
pub fn is_included(name: &str, disabled: &[String], enabled: &[String]) -> bool {
    if disabled.iter().any(|d| d == name) {
        return false;
    }

    enabled.iter().all(|e| e == name)
}

/// Build the validation rules to run, in configuration order.
///
/// Fails on the first validator that cannot be built; no partial rule set is returned.
pub fn assemble(definitions: &[ValidationRuleConfig], filters: &RuleFilters) -> Result<Vec<ValidationRule>> {
    if let Some(first) = filters.enabled.first()
        && filters.enabled.iter().any(|e| e != first)
    {
        log::warn!(target: LOG_TARGET, "Several different --enable-rule names were given, no validation rule can match all of them");
    }

    let mut rules = Vec::new();
    for definition in definitions {
        if !is_included(&definition.name, &filters.disabled, &filters.enabled) {
            log::debug!(target: LOG_TARGET, "Skipping validation rule '{}'", definition.name);
            continue;
        }

        let mut rule = ValidationRule::new(definition.name.clone(), definition.scope);
        for validator_config in &definition.validations {
            let validator = new_from_config(validator_config)
                .into_app_err_with(|| format!("loading validator config for validation rule '{}'", definition.name))?;

            match validator {
                Some(validator) => rule.add_validator(validator),
                None => log::debug!(target: LOG_TARGET,
                    "Validator '{}' of rule '{}' has nothing to check, skipping it",
                    validator_config.validator_type,
                    definition.name
                ),
            }
        }

        rules.push(rule);
    }

    Ok(rules)
}
