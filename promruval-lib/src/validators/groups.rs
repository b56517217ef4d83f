use super::{Subject, Validator, boxed, duration_param, ready};
use crate::Result;
use crate::prometheus::PrometheusClient;
use crate::rulefile::{format_duration, parse_duration};
use core::time::Duration;
use futures::future::BoxFuture;
use ohno::bail;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct IntervalParams {
    #[serde(default)]
    minimum: Option<String>,
    #[serde(default)]
    maximum: Option<String>,
    #[serde(default)]
    interval_must_be_set: bool,
}

/// Checks a group's evaluation interval against allowed bounds.
#[derive(Debug)]
pub struct HasAllowedEvaluationInterval {
    minimum: Option<Duration>,
    maximum: Option<Duration>,
    must_be_set: bool,
}

impl HasAllowedEvaluationInterval {
    pub fn from_params(params: IntervalParams) -> Result<Option<Box<dyn Validator>>> {
        let minimum = params.minimum.as_deref().map(|text| duration_param("minimum", text)).transpose()?;
        let maximum = params.maximum.as_deref().map(|text| duration_param("maximum", text)).transpose()?;

        if let (Some(min), Some(max)) = (minimum, maximum)
            && min > max
        {
            bail!("minimum {} is greater than maximum {}", format_duration(min), format_duration(max));
        }

        if minimum.is_none() && maximum.is_none() && !params.interval_must_be_set {
            return Ok(None);
        }

        boxed(Self {
            minimum,
            maximum,
            must_be_set: params.interval_must_be_set,
        })
    }

    fn check(&self, interval: Option<&str>) -> Vec<String> {
        let Some(text) = interval else {
            return if self.must_be_set {
                vec!["evaluation interval is not set".to_string()]
            } else {
                Vec::new()
            };
        };

        let interval = match parse_duration(text) {
            Ok(interval) => interval,
            Err(e) => return vec![format!("evaluation interval '{text}' is invalid: {e}")],
        };

        let mut messages = Vec::new();
        if let Some(min) = self.minimum
            && interval < min
        {
            messages.push(format!("evaluation interval {text} is shorter than the allowed minimum {}", format_duration(min)));
        }

        if let Some(max) = self.maximum
            && interval > max
        {
            messages.push(format!("evaluation interval {text} is longer than the allowed maximum {}", format_duration(max)));
        }

        messages
    }
}

impl Validator for HasAllowedEvaluationInterval {
    fn kind(&self) -> &'static str {
        "hasAllowedEvaluationInterval"
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.must_be_set {
            parts.push("must be set".to_string());
        }
        if let Some(min) = self.minimum {
            parts.push(format!("must be at least {}", format_duration(min)));
        }
        if let Some(max) = self.maximum {
            parts.push(format!("must be at most {}", format_duration(max)));
        }
        format!("Group evaluation interval {}.", parts.join(" and "))
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        ready(subject.as_group().map(|group| self.check(group.interval.as_deref())).unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MaxRulesParams {
    limit: usize,
}

/// Caps the number of rules in a group.
#[derive(Debug)]
pub struct MaxRulesPerGroup {
    limit: usize,
}

impl MaxRulesPerGroup {
    pub fn from_params(params: MaxRulesParams) -> Result<Option<Box<dyn Validator>>> {
        boxed(Self { limit: params.limit })
    }
}

impl Validator for MaxRulesPerGroup {
    fn kind(&self) -> &'static str {
        "maxRulesPerGroup"
    }

    fn describe(&self) -> String {
        format!("Group does not have more than {} rules.", self.limit)
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = match subject.as_group() {
            Some(group) if group.rules.len() > self.limit => {
                vec![format!("group has {} rules, the allowed maximum is {}", group.rules.len(), self.limit)]
            }
            _ => Vec::new(),
        };
        ready(messages)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct LimitParams {
    limit: u64,
    #[serde(default)]
    must_be_set: bool,
}

/// Checks the alert/series `limit` of a group.
#[derive(Debug)]
pub struct HasAllowedLimit {
    limit: u64,
    must_be_set: bool,
}

impl HasAllowedLimit {
    pub fn from_params(params: LimitParams) -> Result<Option<Box<dyn Validator>>> {
        boxed(Self {
            limit: params.limit,
            must_be_set: params.must_be_set,
        })
    }
}

impl Validator for HasAllowedLimit {
    fn kind(&self) -> &'static str {
        "hasAllowedLimit"
    }

    fn describe(&self) -> String {
        if self.must_be_set {
            format!("Group limit must be set and not exceed {}.", self.limit)
        } else {
            format!("Group limit, if set, does not exceed {}.", self.limit)
        }
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let messages = match subject.as_group().map(|group| group.limit) {
            Some(None) if self.must_be_set => vec!["group limit is not set".to_string()],
            // Prometheus treats a zero limit as no limit at all
            Some(Some(0)) if self.must_be_set => vec!["group limit is 0, which disables the limit".to_string()],
            Some(Some(limit)) if limit > self.limit => vec![format!("group limit {limit} exceeds the allowed maximum {}", self.limit)],
            _ => Vec::new(),
        };
        ready(messages)
    }
}
