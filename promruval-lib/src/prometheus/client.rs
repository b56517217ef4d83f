use super::cache::{self, CacheDocument};
use crate::Result;
use crate::config::PrometheusConfig;
use chrono::Utc;
use core::time::Duration;
use ohno::{IntoAppError, app_err, bail};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use url::Url;

const LOG_TARGET: &str = "prometheus";

/// What running a query against the backend produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Number of series (or samples for scalar results) returned
    pub series: usize,

    /// Wall-clock time the backend took to answer
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    result: serde_json::Value,
}

/// Client for the Prometheus HTTP query API.
///
/// Outcomes are cached per expression for the lifetime of the client and can
/// be persisted with [`PrometheusClient::dump_cache`].
#[derive(Debug)]
pub struct PrometheusClient {
    http: reqwest::Client,
    base_url: String,
    query_url: Url,
    cache_file: PathBuf,
    cache: Mutex<BTreeMap<String, QueryOutcome>>,
}

impl PrometheusClient {
    /// Create a client for the configured backend, pre-populating the cache from a fresh cache file.
    pub fn new(config: &PrometheusConfig) -> Result<Self> {
        let base_url = config.url.trim_end_matches('/').to_string();
        let query_url =
            Url::parse(&format!("{base_url}/api/v1/query")).into_app_err_with(|| format!("invalid prometheus URL '{}'", config.url))?;
        if !matches!(query_url.scheme(), "http" | "https") {
            bail!("unsupported prometheus URL scheme '{}'", query_url.scheme());
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.http_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).into_app_err_with(|| format!("invalid HTTP header name '{name}'"))?;
            let header_value = HeaderValue::from_str(value).into_app_err_with(|| format!("invalid value for HTTP header '{name}'"))?;
            let _ = headers.insert(header_name, header_value);
        }

        if let Some(token_file) = &config.bearer_token_file {
            let token = fs::read_to_string(token_file)
                .into_app_err_with(|| format!("unable to read bearer token file '{}'", token_file.display()))?;
            let mut auth_val = HeaderValue::from_str(&format!("Bearer {}", token.trim())).into_app_err("invalid bearer token")?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("promruval/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()
            .into_app_err("unable to create HTTP client")?;

        let cache = cache::load_fresh(&config.cache_file, &base_url, config.max_cache_age, Utc::now()).unwrap_or_default();

        Ok(Self {
            http,
            base_url,
            query_url,
            cache_file: config.cache_file.clone(),
            cache: Mutex::new(cache),
        })
    }

    /// Base URL of the backend, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run an instant query, answering from the cache when the expression was seen before.
    pub async fn query(&self, expr: &str) -> Result<QueryOutcome> {
        if let Some(outcome) = self.cached(expr) {
            log::debug!(target: LOG_TARGET, "Cache hit for query '{expr}'");
            return Ok(outcome);
        }

        let outcome = self.query_backend(expr).await?;

        let _ = self
            .cache
            .lock()
            .map_err(|_poisoned| app_err!("query cache lock poisoned"))?
            .insert(expr.to_string(), outcome);

        Ok(outcome)
    }

    fn cached(&self, expr: &str) -> Option<QueryOutcome> {
        self.cache.lock().ok()?.get(expr).copied()
    }

    async fn query_backend(&self, expr: &str) -> Result<QueryOutcome> {
        let mut url = self.query_url.clone();
        let _ = url.query_pairs_mut().append_pair("query", expr);

        log::debug!(target: LOG_TARGET, "Querying '{expr}'");
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .send()
            .await
            .into_app_err_with(|| format!("unable to query {}", self.base_url))?;
        let status = response.status();
        let body = response.bytes().await.into_app_err("unable to read query response")?;
        let duration = start.elapsed();

        let parsed: QueryResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(e).into_app_err("malformed query response"),
            Err(_) => bail!("query failed with HTTP {status}"),
        };

        if parsed.status != "success" {
            bail!(
                "query failed: {}: {}",
                parsed.error_type.as_deref().unwrap_or("unknown"),
                parsed.error.as_deref().unwrap_or("no error message")
            );
        }

        let data = parsed.data.ok_or_else(|| app_err!("query response has no data"))?;
        let series = match data.result_type.as_str() {
            "vector" | "matrix" => data.result.as_array().map_or(0, Vec::len),
            _ => 1,
        };

        log::debug!(target: LOG_TARGET, "Query '{expr}' returned {series} series in {}ms", duration.as_millis());
        Ok(QueryOutcome { series, duration })
    }

    /// Number of outcomes currently cached.
    #[must_use]
    pub fn cached_queries(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }

    /// Persist the cache to the configured cache file; failures are only logged.
    pub fn dump_cache(&self) {
        let queries = match self.cache.lock() {
            Ok(cache) => cache.clone(),
            Err(_) => {
                log::warn!(target: LOG_TARGET, "Query cache lock poisoned, not persisting it");
                return;
            }
        };

        let count = queries.len();
        let doc = CacheDocument {
            url: self.base_url.clone(),
            timestamp: Utc::now(),
            queries,
        };

        match cache::save(&doc, &self.cache_file) {
            Ok(()) => log::debug!(target: LOG_TARGET, "Persisted {count} cached queries to '{}'", self.cache_file.display()),
            Err(e) => log::warn!(target: LOG_TARGET, "Could not persist query cache: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str, cache_file: PathBuf) -> PrometheusConfig {
        PrometheusConfig {
            url: url.to_string(),
            cache_file,
            ..PrometheusConfig::default()
        }
    }

    fn vector_response(series: usize) -> serde_json::Value {
        let result: Vec<serde_json::Value> = (0..series)
            .map(|i| serde_json::json!({"metric": {"instance": format!("host-{i}")}, "value": [1.0, "1"]}))
            .collect();
        serde_json::json!({"status": "success", "data": {"resultType": "vector", "result": result}})
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let tmp = std::env::temp_dir().join("promruval-unused-cache.json");
        let _ = PrometheusClient::new(&config("not a url", tmp.clone())).unwrap_err();
        let _ = PrometheusClient::new(&config("ftp://prometheus", tmp)).unwrap_err();
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_new_rejects_missing_token_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config("http://localhost:9090", tmp.path().join("cache.json"));
        config.bearer_token_file = Some(tmp.path().join("missing-token"));
        let err = PrometheusClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("bearer token file"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_new_rejects_bad_header() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config("http://localhost:9090", tmp.path().join("cache.json"));
        let _ = config.http_headers.insert("bad header".to_string(), "x".to_string());
        let err = PrometheusClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("invalid HTTP header name"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_trailing_slash_is_trimmed() {
        let tmp = tempfile::tempdir().unwrap();
        let client = PrometheusClient::new(&config("http://localhost:9090/", tmp.path().join("cache.json"))).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9090");
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_query_counts_series_and_caches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .and(query_param("query", "up"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vector_response(3)))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = PrometheusClient::new(&config(&server.uri(), tmp.path().join("cache.json"))).unwrap();

        let first = client.query("up").await.unwrap();
        assert_eq!(first.series, 3);

        let second = client.query("up").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(client.cached_queries(), 1);
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_query_error_is_reported_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "parse error at char 4"
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = PrometheusClient::new(&config(&server.uri(), tmp.path().join("cache.json"))).unwrap();

        let err = client.query("up{").await.unwrap_err();
        assert!(err.to_string().contains("bad_data"));
        assert!(err.to_string().contains("parse error"));
        assert_eq!(client.cached_queries(), 0);
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_http_failure_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = PrometheusClient::new(&config(&server.uri(), tmp.path().join("cache.json"))).unwrap();

        let err = client.query("up").await.unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_scalar_result_counts_as_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"resultType": "scalar", "result": [1.0, "42"]}
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = PrometheusClient::new(&config(&server.uri(), tmp.path().join("cache.json"))).unwrap();

        assert_eq!(client.query("scalar(up)").await.unwrap().series, 1);
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_headers_and_bearer_token_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer s3cret"))
            .and(header("x-scope-orgid", "team-a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vector_response(1)))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let token_file = tmp.path().join("token");
        fs::write(&token_file, "s3cret\n").unwrap();

        let mut config = config(&server.uri(), tmp.path().join("cache.json"));
        config.bearer_token_file = Some(token_file);
        let _ = config.http_headers.insert("X-Scope-OrgID".to_string(), "team-a".to_string());

        let client = PrometheusClient::new(&config).unwrap();
        assert_eq!(client.query("up").await.unwrap().series, 1);
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri does not support network calls")]
    async fn test_dumped_cache_is_reused_by_next_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vector_response(2)))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let cache_file = tmp.path().join("cache.json");

        let client = PrometheusClient::new(&config(&server.uri(), cache_file.clone())).unwrap();
        let _ = client.query("up").await.unwrap();
        client.dump_cache();
        assert!(cache_file.exists());

        let reloaded = PrometheusClient::new(&config(&server.uri(), cache_file)).unwrap();
        assert_eq!(reloaded.cached_queries(), 1);
        assert_eq!(reloaded.query("up").await.unwrap().series, 2);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_dump_cache_failure_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let client = PrometheusClient::new(&config("http://localhost:9090", blocker.join("cache.json"))).unwrap();
        client.dump_cache();
        assert!(!blocker.join("cache.json").exists());
    }
}
