//! Validators and the factory building them from configuration
//!
//! A validator is one check applied to a rule group or a single rule. It
//! returns the list of violations it found, an empty list meaning the subject
//! passed. Validators that do not apply to the subject they are handed (a
//! group-level check given a rule, an alert-only check given a recording rule)
//! report nothing.
//!
//! [`new_from_config`] decodes the opaque `params` of a validator configuration
//! into the parameters of the named validator type. Decoding is strict so a
//! misspelled parameter fails loudly instead of silently using a default.

mod alerts;
mod annotations;
mod backend;
mod groups;
mod labels;

use crate::Result;
use crate::config::ValidatorConfig;
use crate::prometheus::PrometheusClient;
use crate::rulefile::{Rule, RuleGroup, parse_duration};
use core::fmt::Debug;
use core::time::Duration;
use futures::future::BoxFuture;
use ohno::{IntoAppError, app_err};
use regex::Regex;
use serde::de::DeserializeOwned;
use strsim::normalized_damerau_levenshtein;

const MIN_SUGGESTION_SCORE: f64 = 0.8;

/// The object a validator inspects.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Group(&'a RuleGroup),
    Rule(&'a Rule),
}

impl<'a> Subject<'a> {
    #[must_use]
    pub const fn as_rule(self) -> Option<&'a Rule> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub const fn as_group(self) -> Option<&'a RuleGroup> {
        match self {
            Self::Group(group) => Some(group),
            Self::Rule(_) => None,
        }
    }

    /// The subject if it is an alerting rule.
    #[must_use]
    pub fn as_alert(self) -> Option<&'a Rule> {
        self.as_rule().filter(|rule| rule.is_alert())
    }
}

/// A single check applied to rule groups or rules.
pub trait Validator: Debug + Send + Sync {
    /// The configuration type name of this validator.
    fn kind(&self) -> &'static str;

    /// One human readable sentence describing what is checked.
    fn describe(&self) -> String;

    /// Check the subject, returning one message per violation.
    fn validate<'a>(&'a self, subject: Subject<'a>, client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>>;
}

/// Every validator type the factory knows about.
pub const VALIDATOR_TYPES: &[&str] = &[
    "hasAllowedEvaluationInterval",
    "maxRulesPerGroup",
    "hasAllowedLimit",
    "hasLabels",
    "doesNotHaveLabels",
    "labelMatchesRegexp",
    "labelHasAllowedValue",
    "hasAnnotations",
    "doesNotHaveAnnotations",
    "annotationMatchesRegexp",
    "annotationIsValidURL",
    "forIsNotLongerThan",
    "expressionCanBeEvaluated",
];

/// Build a validator from its configuration.
///
/// Returns `Ok(None)` when the configuration asks for nothing to be checked,
/// such as a label list that is empty.
pub fn new_from_config(config: &ValidatorConfig) -> Result<Option<Box<dyn Validator>>> {
    build(config).into_app_err_with(|| format!("invalid '{}' validator", config.validator_type))
}

fn build(config: &ValidatorConfig) -> Result<Option<Box<dyn Validator>>> {
    let params = &config.params;

    match config.validator_type.as_str() {
        "hasAllowedEvaluationInterval" => groups::HasAllowedEvaluationInterval::from_params(decode(params)?),
        "maxRulesPerGroup" => groups::MaxRulesPerGroup::from_params(decode(params)?),
        "hasAllowedLimit" => groups::HasAllowedLimit::from_params(decode(params)?),
        "hasLabels" => labels::HasLabels::from_params(decode(params)?),
        "doesNotHaveLabels" => labels::DoesNotHaveLabels::from_params(decode(params)?),
        "labelMatchesRegexp" => labels::LabelMatchesRegexp::from_params(decode(params)?),
        "labelHasAllowedValue" => labels::LabelHasAllowedValue::from_params(decode(params)?),
        "hasAnnotations" => annotations::HasAnnotations::from_params(decode(params)?),
        "doesNotHaveAnnotations" => annotations::DoesNotHaveAnnotations::from_params(decode(params)?),
        "annotationMatchesRegexp" => annotations::AnnotationMatchesRegexp::from_params(decode(params)?),
        "annotationIsValidURL" => annotations::AnnotationIsValidUrl::from_params(decode(params)?),
        "forIsNotLongerThan" => alerts::ForIsNotLongerThan::from_params(decode(params)?),
        "expressionCanBeEvaluated" => backend::ExpressionCanBeEvaluated::from_params(decode(params)?),
        other => Err(unknown_type(other)),
    }
}

fn unknown_type(name: &str) -> ohno::AppError {
    let suggestion = VALIDATOR_TYPES
        .iter()
        .map(|known| (normalized_damerau_levenshtein(name, known), *known))
        .filter(|(score, _)| *score >= MIN_SUGGESTION_SCORE)
        .max_by(|a, b| a.0.total_cmp(&b.0));

    match suggestion {
        Some((_, known)) => app_err!("unknown validator type '{name}', did you mean '{known}'?"),
        None => app_err!("unknown validator type '{name}'"),
    }
}

/// Strictly decode validator parameters, a missing `params` block decoding as an empty mapping.
fn decode<P: DeserializeOwned>(params: &serde_yaml::Value) -> Result<P> {
    let value = if params.is_null() {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
    } else {
        params.clone()
    };

    serde_yaml::from_value(value).into_app_err("invalid params")
}

/// Compile a regular expression matched against a whole value, the way Prometheus anchors label matchers.
fn anchored_regex(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).into_app_err_with(|| format!("invalid regexp '{pattern}'"))
}

fn duration_param(name: &str, text: &str) -> Result<Duration> {
    parse_duration(text).into_app_err_with(|| format!("invalid duration for '{name}'"))
}

fn boxed<V: Validator + 'static>(validator: V) -> Result<Option<Box<dyn Validator>>> {
    Ok(Some(Box::new(validator)))
}

fn ready<'a>(messages: Vec<String>) -> BoxFuture<'a, Vec<String>> {
    Box::pin(core::future::ready(messages))
}

/// Render a list of names as `a`, `b`, `c` for descriptions.
fn quoted_list(items: &[String]) -> String {
    items.iter().map(|item| format!("`{item}`")).collect::<Vec<_>>().join(", ")
}
