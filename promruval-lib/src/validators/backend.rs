use super::{Subject, Validator, boxed, duration_param};
use crate::Result;
use crate::prometheus::PrometheusClient;
use crate::rulefile::format_duration;
use core::time::Duration;
use futures::future::BoxFuture;
use serde::Deserialize;

const LOG_TARGET: &str = "   backend";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EvaluationParams {
    #[serde(default)]
    time_series_limit: Option<usize>,
    #[serde(default)]
    evaluation_duration_limit: Option<String>,
}

/// Runs a rule's expression against the backend and checks it succeeds within limits.
#[derive(Debug)]
pub struct ExpressionCanBeEvaluated {
    time_series_limit: Option<usize>,
    evaluation_duration_limit: Option<Duration>,
}

impl ExpressionCanBeEvaluated {
    pub fn from_params(params: EvaluationParams) -> Result<Option<Box<dyn Validator>>> {
        let evaluation_duration_limit = params
            .evaluation_duration_limit
            .as_deref()
            .map(|text| duration_param("evaluationDurationLimit", text))
            .transpose()?;

        boxed(Self {
            time_series_limit: params.time_series_limit,
            evaluation_duration_limit,
        })
    }
}

impl Validator for ExpressionCanBeEvaluated {
    fn kind(&self) -> &'static str {
        "expressionCanBeEvaluated"
    }

    fn describe(&self) -> String {
        let mut text = "Expression can be successfully evaluated on the live backend".to_string();
        if let Some(limit) = self.time_series_limit {
            text.push_str(&format!(", returns at most {limit} series"));
        }
        if let Some(limit) = self.evaluation_duration_limit {
            text.push_str(&format!(", evaluates within {}", format_duration(limit)));
        }
        text.push('.');
        text
    }

    fn validate<'a>(&'a self, subject: Subject<'a>, client: Option<&'a PrometheusClient>) -> BoxFuture<'a, Vec<String>> {
        Box::pin(async move {
            let Some(rule) = subject.as_rule() else {
                return Vec::new();
            };

            let Some(client) = client else {
                log::debug!(target: LOG_TARGET, "No prometheus backend configured, skipping evaluation of '{}'", rule.name());
                return Vec::new();
            };

            let outcome = match client.query(&rule.expr).await {
                Ok(outcome) => outcome,
                Err(e) => return vec![format!("expression cannot be evaluated: {e}")],
            };

            let mut messages = Vec::new();
            if let Some(limit) = self.time_series_limit
                && outcome.series > limit
            {
                messages.push(format!("expression returned {} series, the allowed maximum is {limit}", outcome.series));
            }

            if let Some(limit) = self.evaluation_duration_limit
                && outcome.duration > limit
            {
                messages.push(format!(
                    "expression took {}ms to evaluate, the allowed maximum is {}",
                    outcome.duration.as_millis(),
                    format_duration(limit)
                ));
            }

            messages
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrometheusConfig;
    use crate::rulefile::Rule;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rule() -> Rule {
        Rule {
            record: Some("job:up:sum".to_string()),
            expr: "sum by (job) (up)".to_string(),
            ..Rule::default()
        }
    }

    fn validator(series: Option<usize>) -> Box<dyn Validator> {
        ExpressionCanBeEvaluated::from_params(EvaluationParams {
            time_series_limit: series,
            evaluation_duration_limit: None,
        })
        .unwrap()
        .unwrap()
    }

    fn client_for(server: &MockServer, dir: &tempfile::TempDir) -> PrometheusClient {
        PrometheusClient::new(&PrometheusConfig {
            url: server.uri(),
            cache_file: dir.path().join("cache.json"),
            ..PrometheusConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_without_client_reports_nothing() {
        assert!(validator(Some(1)).validate(Subject::Rule(&rule()), None).await.is_empty());
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_series_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"resultType": "vector", "result": [{"metric": {}, "value": [1.0, "1"]}, {"metric": {}, "value": [1.0, "2"]}]}
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = client_for(&server, &tmp);

        assert!(validator(Some(2)).validate(Subject::Rule(&rule()), Some(&client)).await.is_empty());
        assert_eq!(
            validator(Some(1)).validate(Subject::Rule(&rule()), Some(&client)).await,
            vec!["expression returned 2 series, the allowed maximum is 1"]
        );
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_query_failure_is_a_violation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "status": "error",
                "errorType": "execution",
                "error": "query timed out"
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = client_for(&server, &tmp);

        let messages = validator(None).validate(Subject::Rule(&rule()), Some(&client)).await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("expression cannot be evaluated"));
        assert!(messages[0].contains("query timed out"));
    }

    #[test]
    fn test_describe() {
        let v = ExpressionCanBeEvaluated::from_params(EvaluationParams {
            time_series_limit: Some(100),
            evaluation_duration_limit: Some("5s".to_string()),
        })
        .unwrap()
        .unwrap();
        assert_eq!(
            v.describe(),
            "Expression can be successfully evaluated on the live backend, returns at most 100 series, evaluates within 5s."
        );
    }
}
