//! Validation configuration file model
//!
//! The configuration is a YAML document decoded strictly: unknown keys anywhere
//! in the document are a hard error. Loading is all-or-nothing, a partially
//! decoded configuration is never handed to the rest of the tool.

mod scope;

pub use scope::Scope;

use crate::Result;
use camino::Utf8Path;
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// The example configuration shipped with the tool, checked by the build script.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yaml");

/// Annotation used to exclude validation rules per object unless the config overrides it.
pub const DEFAULT_EXCLUDE_ANNOTATION: &str = "disabled_validation_rules";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Config {
    /// Overrides the name of the annotation listing validation rules to skip for a rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_exclude_annotation: Option<String>,

    /// Connection to the Prometheus-compatible backend used by some validators
    #[serde(default)]
    pub prometheus: PrometheusConfig,

    /// Validation rules, in the order they are applied
    #[serde(default)]
    pub validation_rules: Vec<ValidationRuleConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrometheusConfig {
    /// Base URL of the backend, an empty URL disables it
    #[serde(default)]
    pub url: String,

    /// Timeout of a single query
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Skip verification of the backend TLS certificate
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    /// File the query cache is persisted to between runs
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Age after which a persisted cache is discarded
    #[serde(default = "default_max_cache_age", with = "humantime_serde")]
    pub max_cache_age: Duration,

    /// File holding a bearer token sent with every query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_file: Option<PathBuf>,

    /// Extra HTTP headers sent with every query
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub http_headers: BTreeMap<String, String>,
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_cache_file() -> PathBuf {
    PathBuf::from(".promruval_cache.json")
}

const fn default_max_cache_age() -> Duration {
    Duration::from_hours(1)
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: default_timeout(),
            insecure_skip_tls_verify: false,
            cache_file: default_cache_file(),
            max_cache_age: default_max_cache_age(),
            bearer_token_file: None,
            http_headers: BTreeMap::new(),
        }
    }
}

/// A named validation rule as written in the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ValidationRuleConfig {
    pub name: String,
    pub scope: Scope,
    #[serde(default)]
    pub validations: Vec<ValidatorConfig>,
}

/// Configuration of a single validator.
///
/// The parameters are kept opaque here and decoded by the validator factory,
/// which knows the shape each validator type expects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    #[serde(rename = "type")]
    pub validator_type: String,

    #[serde(default, skip_serializing_if = "serde_yaml::Value::is_null")]
    pub params: serde_yaml::Value,
}

impl Config {
    /// Load and strictly decode a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not well-formed YAML, or contains unknown fields
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("loading config file '{path}'"))?;
        let config = Self::from_yaml(&text).into_app_err_with(|| format!("parsing config file '{path}'"))?;
        Ok(config)
    }

    /// Decode a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// The annotation name used to exclude validation rules per object.
    #[must_use]
    pub fn exclude_annotation(&self) -> &str {
        match self.custom_exclude_annotation.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_EXCLUDE_ANNOTATION,
        }
    }

    /// Whether a backend URL is configured.
    #[must_use]
    pub fn has_backend(&self) -> bool {
        !self.prometheus.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_yaml_parses() {
        let config = Config::from_yaml(DEFAULT_CONFIG_YAML).unwrap();
        assert!(!config.validation_rules.is_empty());
        assert!(!config.has_backend());
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_yaml("validationRules: []").unwrap();
        assert!(config.validation_rules.is_empty());
        assert_eq!(config.exclude_annotation(), DEFAULT_EXCLUDE_ANNOTATION);
        assert_eq!(config.prometheus.timeout, Duration::from_secs(30));
        assert_eq!(config.prometheus.max_cache_age, Duration::from_hours(1));
        assert_eq!(config.prometheus.cache_file, PathBuf::from(".promruval_cache.json"));
    }

    #[test]
    fn test_full_config() {
        let yaml = r"
customExcludeAnnotation: skip_checks
prometheus:
  url: https://prometheus.example.com
  timeout: 10s
  insecureSkipTlsVerify: true
  cacheFile: /tmp/cache.json
  maxCacheAge: 2h
  httpHeaders:
    X-Scope-OrgID: team-a
validationRules:
  - name: has-severity
    scope: Alert
    validations:
      - type: hasLabels
        params:
          labels: [severity]
  - name: group-interval
    scope: Group
    validations:
      - type: hasAllowedEvaluationInterval
        params:
          minimum: 30s
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.exclude_annotation(), "skip_checks");
        assert!(config.has_backend());
        assert_eq!(config.prometheus.timeout, Duration::from_secs(10));
        assert!(config.prometheus.insecure_skip_tls_verify);
        assert_eq!(config.prometheus.max_cache_age, Duration::from_hours(2));
        assert_eq!(config.prometheus.http_headers.get("X-Scope-OrgID").map(String::as_str), Some("team-a"));
        assert_eq!(config.validation_rules.len(), 2);
        assert_eq!(config.validation_rules[0].name, "has-severity");
        assert_eq!(config.validation_rules[0].scope, Scope::Alert);
        assert_eq!(config.validation_rules[0].validations[0].validator_type, "hasLabels");
        assert_eq!(config.validation_rules[1].scope, Scope::Group);
    }

    #[test]
    fn test_empty_custom_exclude_annotation_uses_default() {
        let config = Config::from_yaml("customExcludeAnnotation: ''").unwrap();
        assert_eq!(config.exclude_annotation(), DEFAULT_EXCLUDE_ANNOTATION);
    }

    #[test]
    fn test_rejects_unknown_top_level_field() {
        let result = Config::from_yaml("validationRulez: []");
        assert!(result.is_err(), "misspelled field should be rejected");
    }

    #[test]
    fn test_rejects_unknown_prometheus_field() {
        let result = Config::from_yaml("prometheus:\n  uri: http://localhost:9090\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_rule_field() {
        let yaml = "validationRules:\n  - name: a\n    scope: Alert\n    validators: []\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_unknown_validator_field() {
        let yaml = "validationRules:\n  - name: a\n    scope: Alert\n    validations:\n      - type: hasLabels\n        parameters: {}\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_validator_without_params() {
        let yaml = "validationRules:\n  - name: a\n    scope: Alert\n    validations:\n      - type: expressionCanBeEvaluated\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.validation_rules[0].validations[0].params.is_null());
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(Config::from_yaml("validationRules: [").is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::try_from(tmp.path().join("missing.yaml")).unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("loading config file"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_reports_parse_context() {
        let tmp = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::try_from(tmp.path().join("bad.yaml")).unwrap();
        fs::write(&path, "unknownKey: true\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("parsing config file"));
    }
}
