use super::{Subject, Validator, boxed, duration_param, ready};
use crate::Result;
use crate::prometheus::PrometheusClient;
use crate::rulefile::{format_duration, parse_duration};
use core::time::Duration;
use futures::future::BoxFuture;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ForParams {
    limit: String,
}

/// Caps how long an alert may stay pending before firing.
#[derive(Debug)]
pub struct ForIsNotLongerThan {
    limit: Duration,
}

impl ForIsNotLongerThan {
    pub fn from_params(params: ForParams) -> Result<Option<Box<dyn Validator>>> {
        boxed(Self {
            limit: duration_param("limit", &params.limit)?,
        })
    }
}

impl Validator for ForIsNotLongerThan {
    fn kind(&self) -> &'static str {
        "forIsNotLongerThan"
    }

    fn describe(&self) -> String {
        format!("Alert `for` is not longer than {}.", format_duration(self.limit))
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, _client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        let Some(text) = subject.as_alert().and_then(|rule| rule.for_duration.as_deref()) else {
            return ready(Vec::new());
        };

        let messages = match parse_duration(text) {
            Ok(duration) if duration > self.limit => {
                vec![format!("alert `for` is {text}, the allowed maximum is {}", format_duration(self.limit))]
            }
            Ok(_) => Vec::new(),
            Err(e) => vec![format!("alert `for` value '{text}' is invalid: {e}")],
        };
        ready(messages)
    }
}
