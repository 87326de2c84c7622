//! Named deployments to validate.
//!
//! Targets are layered with the `config` crate: the built-in targets first,
//! then an optional TOML file, then `BABEL_`-prefixed environment variables
//! such as `BABEL_TARGETS__PROD__NODENORM_URL`.
//!
//! ```toml
//! [targets.local]
//! nodenorm_url = "http://localhost:8080/"
//! nameres_url = "http://localhost:2433/"
//! ```

use crate::error::{SourceError, SourceResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Target used when none is named.
pub const DEFAULT_TARGET: &str = "dev";

/// Selects every configured target.
pub const ALL_TARGETS: &str = "all";

/// One NodeNorm and NameRes deployment pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub nodenorm_url: String,
    pub nameres_url: String,
}

impl Target {
    pub fn new(nodenorm_url: &str, nameres_url: &str) -> Self {
        Self {
            nodenorm_url: nodenorm_url.to_string(),
            nameres_url: nameres_url.to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeNorm {}, NameRes {}", self.nodenorm_url, self.nameres_url)
    }
}

/// All known targets, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default)]
    pub targets: BTreeMap<String, Target>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TargetsConfig {
    /// The public Translator deployments.
    pub fn builtin() -> Self {
        let targets = [
            (
                "dev",
                Target::new(
                    "https://nodenormalization-sri.renci.org/",
                    "https://name-resolution-sri.renci.org/",
                ),
            ),
            (
                "ci",
                Target::new(
                    "https://nodenorm.ci.transltr.io/",
                    "https://name-lookup.ci.transltr.io/",
                ),
            ),
            (
                "test",
                Target::new(
                    "https://nodenorm.test.transltr.io/",
                    "https://name-lookup.test.transltr.io/",
                ),
            ),
            (
                "prod",
                Target::new("https://nodenorm.transltr.io/", "https://name-lookup.transltr.io/"),
            ),
        ]
        .into_iter()
        .map(|(name, target)| (name.to_string(), target))
        .collect();

        Self { targets }
    }

    /// Load targets from the built-ins, an optional file and the environment.
    pub fn load(path: Option<&str>) -> SourceResult<Self> {
        Self::load_with_env(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("BABEL")
            .prefix_separator("_")
            .separator("__")
    }

    fn load_with_env(path: Option<&str>, env: config::Environment) -> SourceResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&Self::builtin())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(env);

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn get(&self, name: &str) -> SourceResult<&Target> {
        self.targets
            .get(name)
            .ok_or_else(|| SourceError::UnknownTarget {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    /// Expand target names: none means the default target, `all` means
    /// every configured target. Duplicates keep their first position.
    pub fn select(&self, names: &[String]) -> SourceResult<Vec<(String, Target)>> {
        if names.iter().any(|n| n == ALL_TARGETS) {
            return Ok(self
                .targets
                .iter()
                .map(|(name, target)| (name.clone(), target.clone()))
                .collect());
        }

        let default = [DEFAULT_TARGET.to_string()];
        let names = if names.is_empty() { &default[..] } else { names };

        let mut selected: Vec<(String, Target)> = Vec::with_capacity(names.len());
        for name in names {
            if selected.iter().any(|(n, _)| n == name) {
                continue;
            }
            selected.push((name.clone(), self.get(name)?.clone()));
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> config::Environment {
        TargetsConfig::environment().source(Some(config::Map::new()))
    }

    #[test]
    fn test_builtin_targets() {
        let config = TargetsConfig::builtin();
        assert_eq!(config.names(), vec!["ci", "dev", "prod", "test"]);
        assert_eq!(
            config.get("prod").unwrap().nodenorm_url,
            "https://nodenorm.transltr.io/"
        );
    }

    #[test]
    fn test_select_defaults_to_dev() {
        let config = TargetsConfig::builtin();
        let selected = config.select(&[]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0, "dev");
    }

    #[test]
    fn test_select_all_and_duplicates() {
        let config = TargetsConfig::builtin();
        assert_eq!(config.select(&["all".into()]).unwrap().len(), 4);

        let names: Vec<String> = config
            .select(&["prod".into(), "dev".into(), "prod".into()])
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["prod", "dev"]);
    }

    #[test]
    fn test_unknown_target() {
        let err = TargetsConfig::builtin()
            .select(&["staging".into()])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown target 'staging', expected one of: ci, dev, prod, test"
        );
    }

    #[test]
    fn test_file_adds_and_overrides_targets() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[targets.local]\nnodenorm_url = \"http://localhost:8080/\"\nnameres_url = \"http://localhost:2433/\"\n\n[targets.dev]\nnameres_url = \"http://localhost:9999/\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = TargetsConfig::load_with_env(Some(path), no_env()).unwrap();

        assert_eq!(config.get("local").unwrap().nodenorm_url, "http://localhost:8080/");
        let dev = config.get("dev").unwrap();
        assert_eq!(dev.nameres_url, "http://localhost:9999/");
        assert_eq!(dev.nodenorm_url, "https://nodenormalization-sri.renci.org/");
        assert_eq!(config.names().len(), 5);
    }

    #[test]
    fn test_environment_overrides() {
        let mut vars = config::Map::new();
        vars.insert(
            "BABEL_TARGETS__PROD__NODENORM_URL".to_string(),
            "http://proxy/".to_string(),
        );
        let env = TargetsConfig::environment().source(Some(vars));

        let config = TargetsConfig::load_with_env(None, env).unwrap();
        assert_eq!(config.get("prod").unwrap().nodenorm_url, "http://proxy/");
        assert_eq!(config.get("prod").unwrap().nameres_url, "https://name-lookup.transltr.io/");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = TargetsConfig::load_with_env(Some("/nonexistent/targets.toml"), no_env());
        assert!(matches!(err, Err(SourceError::Config(_))));
    }
}
