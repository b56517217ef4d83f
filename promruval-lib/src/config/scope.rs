use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The structural level of a rule file a validation rule is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Display, EnumIter)]
pub enum Scope {
    /// Each rule group in a file.
    #[serde(rename = "Group")]
    #[strum(serialize = "Group")]
    Group,

    /// Each alerting rule.
    #[serde(rename = "Alert")]
    #[strum(serialize = "Alert")]
    Alert,

    /// Each recording rule.
    #[serde(rename = "Recording rule")]
    #[strum(serialize = "Recording rule")]
    RecordingRule,

    /// Every rule, alerting or recording.
    #[serde(rename = "All rules")]
    #[strum(serialize = "All rules")]
    AllRules,
}

impl Scope {
    /// Whether a rule of the given kind falls under this scope.
    #[must_use]
    pub const fn covers_rule(self, is_alert: bool) -> bool {
        match self {
            Self::Group => false,
            Self::Alert => is_alert,
            Self::RecordingRule => !is_alert,
            Self::AllRules => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display_matches_config_names() {
        assert_eq!(Scope::Group.to_string(), "Group");
        assert_eq!(Scope::Alert.to_string(), "Alert");
        assert_eq!(Scope::RecordingRule.to_string(), "Recording rule");
        assert_eq!(Scope::AllRules.to_string(), "All rules");
    }

    #[test]
    fn test_scope_deserialize() {
        let scope: Scope = serde_yaml::from_str("Recording rule").unwrap();
        assert_eq!(scope, Scope::RecordingRule);

        let scope: Scope = serde_yaml::from_str("All rules").unwrap();
        assert_eq!(scope, Scope::AllRules);
    }

    #[test]
    fn test_every_scope_parses_from_its_display_name() {
        use strum::IntoEnumIterator;

        for scope in Scope::iter() {
            let parsed: Scope = serde_yaml::from_str(&format!("'{scope}'")).unwrap();
            assert_eq!(parsed, scope);
        }
    }

    #[test]
    fn test_scope_deserialize_unknown() {
        let result: Result<Scope, _> = serde_yaml::from_str("File");
        assert!(result.is_err());
    }

    #[test]
    fn test_covers_rule() {
        assert!(Scope::Alert.covers_rule(true));
        assert!(!Scope::Alert.covers_rule(false));
        assert!(Scope::RecordingRule.covers_rule(false));
        assert!(!Scope::RecordingRule.covers_rule(true));
        assert!(Scope::AllRules.covers_rule(true));
        assert!(Scope::AllRules.covers_rule(false));
        assert!(!Scope::Group.covers_rule(true));
        assert!(!Scope::Group.covers_rule(false));
    }
}
