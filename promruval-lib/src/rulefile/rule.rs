use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;

/// Whether a rule produces alerts or recorded series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum RuleKind {
    #[strum(serialize = "alert")]
    #[serde(rename = "alert")]
    Alert,

    #[strum(serialize = "recording rule")]
    #[serde(rename = "recordingRule")]
    Recording,
}

/// A single alerting or recording rule.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    pub expr: String,

    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_firing_for: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Rule {
    /// The alert or record name, whichever is set.
    #[must_use]
    pub fn name(&self) -> &str {
        self.alert.as_deref().or(self.record.as_deref()).unwrap_or_default()
    }

    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        if self.alert.is_some() { RuleKind::Alert } else { RuleKind::Recording }
    }

    #[must_use]
    pub const fn is_alert(&self) -> bool {
        self.alert.is_some()
    }

    /// Checks the alert/record exclusivity Prometheus enforces.
    pub(super) fn check_shape(&self) -> Option<&'static str> {
        match (&self.alert, &self.record) {
            (Some(_), Some(_)) => Some("only one of 'alert' and 'record' may be set"),
            (None, None) => Some("one of 'alert' or 'record' must be set"),
            (Some(name), None) | (None, Some(name)) if name.trim().is_empty() => Some("rule name must not be empty"),
            _ => None,
        }
    }
}
