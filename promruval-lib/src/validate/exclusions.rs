use crate::rulefile::Rule;

/// Validation rule names a rule opts out of.
///
/// Alerting rules list them in the annotation named `key`; recording rules
/// have no annotations and use a label of the same name instead. The value is
/// a comma separated list.
#[must_use]
pub fn excluded_rules(rule: &Rule, key: &str) -> Vec<String> {
    let value = if rule.is_alert() { rule.annotations.get(key) } else { rule.labels.get(key) };

    value
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
