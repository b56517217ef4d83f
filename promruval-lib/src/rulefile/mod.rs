//! Prometheus rule file model
//!
//! Rule files are YAML documents holding a list of rule groups, each with an
//! ordered list of alerting or recording rules. Decoding is strict: unknown keys
//! and rules that are neither (or both) alerting and recording are rejected.

mod duration;
mod group;
mod rule;

pub use duration::{format_duration, parse_duration};
pub use group::RuleGroup;
pub use rule::{Rule, RuleKind};

use crate::Result;
use camino::Utf8Path;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

impl RuleFile {
    /// Read and decode a rule file from disk.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading rule file '{path}'"))?;
        Self::parse(&text).into_app_err_with(|| format!("parsing rule file '{path}'"))
    }

    /// Decode a rule file from YAML text.
    pub fn parse(text: &str) -> Result<Self> {
        // An empty document is a file with no groups.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: Self = serde_yaml::from_str(text).into_app_err("malformed rule file")?;

        for group in &file.groups {
            if group.name.trim().is_empty() {
                bail!("rule group name must not be empty");
            }

            for (index, rule) in group.rules.iter().enumerate() {
                if let Some(problem) = rule.check_shape() {
                    bail!("group '{}', rule #{}: {problem}", group.name, index + 1);
                }
            }
        }

        Ok(file)
    }
}
