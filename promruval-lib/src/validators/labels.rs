use super::{Subject, Validator, anchored_regex, boxed, quoted_list, ready};
use crate::Result;
use crate::prometheus::PrometheusClient;
use crate::rulefile::Rule;
use futures::future::BoxFuture;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct LabelsParams {
    labels: Vec<String>,
    #[serde(default)]
    search_in_expr: bool,
}

/// Whether the expression mentions `label` as a whole word, e.g. in a matcher or a `by` clause.
fn expr_mentions(expr: &str, label: &str) -> bool {
    Regex::new(&format!(r"\b{}\b", regex::escape(label))).is_ok_and(|re| re.is_match(expr))
}

fn has_label(rule: &Rule, label: &str, search_in_expr: bool) -> bool {
    rule.labels.contains_key(label) || (search_in_expr && expr_mentions(&rule.expr, label))
}

/// Requires rules to carry all of the given labels.
#[derive(Debug)]
pub struct HasLabels {
    labels: Vec<String>,
    search_in_expr: bool,
}

impl HasLabels {
    pub fn from_params(params: LabelsParams) -> Result<Option<Box<dyn Validator>>> {
        if params.labels.is_empty() {
            return Ok(None);
        }

        boxed(Self {
            labels: params.labels,
            search_in_expr: params.search_in_expr,
        })
    }
}

impl Validator for HasLabels {
    fn kind(&self) -> &'static str {
        "hasLabels"
    }

    fn describe(&self) -> String {
        let mut text = format!("Rule has labels {}", quoted_list(&self.labels));
        if self.search_in_expr {
            text.push_str(" (labels used in the expression count as present)");
        }
        text.push('.');
        text
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = subject.as_rule().map_or_else(Vec::new, |rule| {
            self.labels
                .iter()
                .filter(|label| !has_label(rule, label, self.search_in_expr))
                .map(|label| format!("missing label `{label}`"))
                .collect()
        });
        ready(messages)
    }
}

/// Forbids rules from carrying any of the given labels.
#[derive(Debug)]
pub struct DoesNotHaveLabels {
    labels: Vec<String>,
    search_in_expr: bool,
}

impl DoesNotHaveLabels {
    pub fn from_params(params: LabelsParams) -> Result<Option<Box<dyn Validator>>> {
        if params.labels.is_empty() {
            return Ok(None);
        }

        boxed(Self {
            labels: params.labels,
            search_in_expr: params.search_in_expr,
        })
    }
}

impl Validator for DoesNotHaveLabels {
    fn kind(&self) -> &'static str {
        "doesNotHaveLabels"
    }

    fn describe(&self) -> String {
        let mut text = format!("Rule does not have labels {}", quoted_list(&self.labels));
        if self.search_in_expr {
            text.push_str(" (neither set nor used in the expression)");
        }
        text.push('.');
        text
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = subject.as_rule().map_or_else(Vec::new, |rule| {
            self.labels
                .iter()
                .filter(|label| has_label(rule, label, self.search_in_expr))
                .map(|label| format!("forbidden label `{label}` is used"))
                .collect()
        });
        ready(messages)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct LabelRegexpParams {
    label: String,
    regexp: String,
}

/// Requires a label, when present, to fully match a regular expression.
#[derive(Debug)]
pub struct LabelMatchesRegexp {
    label: String,
    pattern: String,
    regex: Regex,
}

impl LabelMatchesRegexp {
    pub fn from_params(params: LabelRegexpParams) -> Result<Option<Box<dyn Validator>>> {
        let regex = anchored_regex(&params.regexp)?;
        boxed(Self {
            label: params.label,
            pattern: params.regexp,
            regex,
        })
    }
}

impl Validator for LabelMatchesRegexp {
    fn kind(&self) -> &'static str {
        "labelMatchesRegexp"
    }

    fn describe(&self) -> String {
        format!("Label `{}`, if present, matches regular expression `{}`.", self.label, self.pattern)
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = match subject.as_rule().and_then(|rule| rule.labels.get(&self.label)) {
            Some(value) if !self.regex.is_match(value) => {
                vec![format!("label `{}` value '{value}' does not match `{}`", self.label, self.pattern)]
            }
            _ => Vec::new(),
        };
        ready(messages)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AllowedValueParams {
    label: String,
    allowed_values: Vec<String>,
    #[serde(default)]
    comma_separated_value: bool,
    #[serde(default)]
    ignore_case: bool,
}

/// Restricts the values a label may take.
#[derive(Debug)]
pub struct LabelHasAllowedValue {
    label: String,
    allowed_values: Vec<String>,
    comma_separated_value: bool,
    ignore_case: bool,
}

impl LabelHasAllowedValue {
    pub fn from_params(params: AllowedValueParams) -> Result<Option<Box<dyn Validator>>> {
        if params.allowed_values.is_empty() {
            return Ok(None);
        }

        boxed(Self {
            label: params.label,
            allowed_values: params.allowed_values,
            comma_separated_value: params.comma_separated_value,
            ignore_case: params.ignore_case,
        })
    }

    fn is_allowed(&self, value: &str) -> bool {
        self.allowed_values.iter().any(|allowed| {
            if self.ignore_case {
                allowed.eq_ignore_ascii_case(value)
            } else {
                allowed == value
            }
        })
    }
}

impl Validator for LabelHasAllowedValue {
    fn kind(&self) -> &'static str {
        "labelHasAllowedValue"
    }

    fn describe(&self) -> String {
        let mut text = format!("Label `{}`, if present, has one of the values {}", self.label, quoted_list(&self.allowed_values));
        if self.comma_separated_value {
            text.push_str(" (the value may be a comma separated list)");
        }
        if self.ignore_case {
            text.push_str(", ignoring case");
        }
        text.push('.');
        text
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let Some(value) = subject.as_rule().and_then(|rule| rule.labels.get(&self.label)) else {
            return ready(Vec::new());
        };

        let values: Vec<&str> = if self.comma_separated_value {
            value.split(',').map(str::trim).collect()
        } else {
            vec![value.as_str()]
        };

        let messages = values
            .into_iter()
            .filter(|v| !self.is_allowed(v))
            .map(|v| format!("label `{}` has value '{v}', allowed values are {}", self.label, quoted_list(&self.allowed_values)))
            .collect();
        ready(messages)
    }
}
