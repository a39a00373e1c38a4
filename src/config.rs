use std::collections::HashSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How much a pass reports about its decisions on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Off,
    Info,
    Debug,
}

/// The optimization passes known to the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassName {
    RemoveSuperMethods,
}

impl PassName {
    pub const ALL: [PassName; 1] = [PassName::RemoveSuperMethods];

    pub fn as_str(&self) -> &'static str {
        match self {
            PassName::RemoveSuperMethods => "remove_super_methods",
        }
    }
}

impl Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassName::ALL
            .into_iter()
            .find(|pass| pass.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPass {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub optimizer: OptimizerSection,

    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OptimizerSection {
    /// Passes to run, in order. All known passes run when omitted.
    pub passes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown pass '{name}' in [optimizer] passes")]
    UnknownPass { name: String },
    #[error("Pass '{name}' is listed more than once in [optimizer] passes")]
    DuplicatePass { name: String },
}

impl OptimizerConfig {
    /// Parse OptimizerConfig from a TOML string and validate the pass list
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let config: OptimizerConfig = toml::from_str(toml_str)?;
        config.passes()?;
        Ok(config)
    }

    /// The configured passes, in the order they should run
    pub fn passes(&self) -> Result<Vec<PassName>, ConfigError> {
        let Some(names) = &self.optimizer.passes else {
            return Ok(PassName::ALL.to_vec());
        };

        let mut seen = HashSet::new();
        let mut passes = Vec::with_capacity(names.len());
        for name in names {
            let pass = name.parse::<PassName>()?;
            if !seen.insert(pass) {
                return Err(ConfigError::DuplicatePass { name: name.clone() });
            }
            passes.push(pass);
        }
        Ok(passes)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_empty_config_enables_all_passes() {
        let config = OptimizerConfig::from_toml_str("").unwrap();
        assert_eq!(config.passes().unwrap(), vec![PassName::RemoveSuperMethods]);
        assert_eq!(config.log_level(), LogLevel::Off);
    }

    #[test]
    fn test_parse_config_with_passes_and_log_level() {
        let toml_str = indoc! {r#"
            [optimizer]
            passes = ["remove_super_methods"]

            [log]
            level = "debug"
        "#};
        let config = OptimizerConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.passes().unwrap(), vec![PassName::RemoveSuperMethods]);
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_parse_config_with_no_passes() {
        let toml_str = indoc! {r#"
            [optimizer]
            passes = []
        "#};
        let config = OptimizerConfig::from_toml_str(toml_str).unwrap();
        assert!(config.passes().unwrap().is_empty());
    }

    #[test]
    fn test_parse_unknown_pass_error() {
        let toml_str = indoc! {r#"
            [optimizer]
            passes = ["inline_everything"]
        "#};
        let result = OptimizerConfig::from_toml_str(toml_str);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unknown pass 'inline_everything'")
        );
    }

    #[test]
    fn test_parse_duplicate_pass_error() {
        let toml_str = indoc! {r#"
            [optimizer]
            passes = ["remove_super_methods", "remove_super_methods"]
        "#};
        let result = OptimizerConfig::from_toml_str(toml_str);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("more than once"));
    }

    #[test]
    fn test_parse_invalid_log_level_error() {
        let toml_str = indoc! {r#"
            [log]
            level = "verbose"
        "#};
        assert!(OptimizerConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_parse_unknown_field_error() {
        let toml_str = indoc! {r#"
            [optimizer]
            pases = ["remove_super_methods"]
        "#};
        assert!(OptimizerConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_log_levels_are_ordered_by_verbosity() {
        assert!(LogLevel::Off < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
    }
}
