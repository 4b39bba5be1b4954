use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// How log lines are rendered on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("SURVEY_LOG_FORMAT must be pretty or json, got {:?}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Logging
    pub log_format: LogFormat,

    // Store
    pub store_path: Option<PathBuf>,

    // Seeding
    pub seed_demo: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::from_str(&lookup("ENV").unwrap_or_else(|| "dev".to_string()));

        // Logging
        let log_format = match lookup("SURVEY_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw)?,
            None if env.is_prod() => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        // Store
        let store_path = lookup("SURVEY_STORE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        // Seeding
        let seed_demo = match lookup("SURVEY_SEED_DEMO") {
            Some(raw) => parse_bool(&raw)?,
            None => true,
        };

        Ok(Settings {
            env,
            log_format,
            store_path,
            seed_demo,
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("SURVEY_SEED_DEMO must be a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_dev_in_memory_with_seeding() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.env, Environment::Dev);
        assert_eq!(s.log_format, LogFormat::Pretty);
        assert_eq!(s.store_path, None);
        assert!(s.seed_demo);
    }

    #[test]
    fn reads_store_path_and_seed_flag() {
        let s = settings(&[
            ("ENV", "Production"),
            ("SURVEY_STORE_PATH", " /tmp/survey.json "),
            ("SURVEY_SEED_DEMO", "off"),
        ])
        .unwrap();
        assert!(s.env.is_prod());
        assert_eq!(s.log_format, LogFormat::Json);
        assert_eq!(s.store_path, Some(PathBuf::from("/tmp/survey.json")));
        assert!(!s.seed_demo);
    }

    #[test]
    fn blank_store_path_means_memory() {
        let s = settings(&[("SURVEY_STORE_PATH", "   ")]).unwrap();
        assert_eq!(s.store_path, None);
    }

    #[test]
    fn log_format_overrides_environment_default() {
        let s = settings(&[("ENV", "prod"), ("SURVEY_LOG_FORMAT", " Pretty ")]).unwrap();
        assert_eq!(s.log_format, LogFormat::Pretty);
        assert!(settings(&[("SURVEY_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn rejects_garbage_seed_flag() {
        assert!(settings(&[("SURVEY_SEED_DEMO", "maybe")]).is_err());
    }
}
