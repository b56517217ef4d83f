//! Annotation checks. Only alerting rules carry annotations, so recording rules
//! and groups are never reported by these validators.

use super::{Subject, Validator, anchored_regex, boxed, quoted_list, ready};
use crate::Result;
use crate::prometheus::PrometheusClient;
use futures::future::BoxFuture;
use regex::Regex;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AnnotationsParams {
    annotations: Vec<String>,
}

#[derive(Debug)]
pub struct HasAnnotations {
    annotations: Vec<String>,
}

impl HasAnnotations {
    pub fn from_params(params: AnnotationsParams) -> Result<Option<Box<dyn Validator>>> {
        if params.annotations.is_empty() {
            return Ok(None);
        }

        boxed(Self {
            annotations: params.annotations,
        })
    }
}

impl Validator for HasAnnotations {
    fn kind(&self) -> &'static str {
        "hasAnnotations"
    }

    fn describe(&self) -> String {
        format!("Alert has annotations {}.", quoted_list(&self.annotations))
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = subject.as_alert().map_or_else(Vec::new, |rule| {
            self.annotations
                .iter()
                .filter(|name| !rule.annotations.contains_key(*name))
                .map(|name| format!("missing annotation `{name}`"))
                .collect()
        });
        ready(messages)
    }
}

#[derive(Debug)]
pub struct DoesNotHaveAnnotations {
    annotations: Vec<String>,
}

impl DoesNotHaveAnnotations {
    pub fn from_params(params: AnnotationsParams) -> Result<Option<Box<dyn Validator>>> {
        if params.annotations.is_empty() {
            return Ok(None);
        }

        boxed(Self {
            annotations: params.annotations,
        })
    }
}

impl Validator for DoesNotHaveAnnotations {
    fn kind(&self) -> &'static str {
        "doesNotHaveAnnotations"
    }

    fn describe(&self) -> String {
        format!("Alert does not have annotations {}.", quoted_list(&self.annotations))
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = subject.as_alert().map_or_else(Vec::new, |rule| {
            self.annotations
                .iter()
                .filter(|name| rule.annotations.contains_key(*name))
                .map(|name| format!("forbidden annotation `{name}` is used"))
                .collect()
        });
        ready(messages)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AnnotationRegexpParams {
    annotation: String,
    regexp: String,
}

#[derive(Debug)]
pub struct AnnotationMatchesRegexp {
    annotation: String,
    pattern: String,
    regex: Regex,
}

impl AnnotationMatchesRegexp {
    pub fn from_params(params: AnnotationRegexpParams) -> Result<Option<Box<dyn Validator>>> {
        let regex = anchored_regex(&params.regexp)?;
        boxed(Self {
            annotation: params.annotation,
            pattern: params.regexp,
            regex,
        })
    }
}

impl Validator for AnnotationMatchesRegexp {
    fn kind(&self) -> &'static str {
        "annotationMatchesRegexp"
    }

    fn describe(&self) -> String {
        format!(
            "Annotation `{}`, if present, matches regular expression `{}`.",
            self.annotation, self.pattern
        )
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = match subject.as_alert().and_then(|rule| rule.annotations.get(&self.annotation)) {
            Some(value) if !self.regex.is_match(value) => {
                vec![format!("annotation `{}` value '{value}' does not match `{}`", self.annotation, self.pattern)]
            }
            _ => Vec::new(),
        };
        ready(messages)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AnnotationUrlParams {
    annotation: String,
}

#[derive(Debug)]
pub struct AnnotationIsValidUrl {
    annotation: String,
}

impl AnnotationIsValidUrl {
    pub fn from_params(params: AnnotationUrlParams) -> Result<Option<Box<dyn Validator>>> {
        boxed(Self {
            annotation: params.annotation,
        })
    }
}

impl Validator for AnnotationIsValidUrl {
    fn kind(&self) -> &'static str {
        "annotationIsValidURL"
    }

    fn describe(&self) -> String {
        format!("Annotation `{}`, if present, is a valid absolute URL.", self.annotation)
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = match subject.as_alert().and_then(|rule| rule.annotations.get(&self.annotation)) {
            Some(value) => match Url::parse(value) {
                Ok(url) if url.cannot_be_a_base() => vec![format!("annotation `{}` value '{value}' is not a valid URL", self.annotation)],
                Ok(_) => Vec::new(),
                Err(e) => vec![format!("annotation `{}` value '{value}' is not a valid URL: {e}", self.annotation)],
            },
            None => Vec::new(),
        };
        ready(messages)
    }
}
