use std::{env::var, fmt, path::PathBuf};

use anyhow::{Context, bail};
use exam_utils::attempt::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_DRIVING_HOURS, Rules};
use sentry::types::Dsn;
use tracing::warn;

const DEFAULT_EXAMS_FILE: &str = "exams.json";

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub environment: Environment,
    pub exams_file: PathBuf,
    pub max_attempts: u32,
    pub min_driving_hours: u32,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl EnvVars {
    pub fn new() -> anyhow::Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Reads every setting through `lookup`, so tests need not touch the process environment
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let exams_file = match lookup("EXAMS_FILE") {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => {
                warn!("EXAMS_FILE not set. Defaulting to {DEFAULT_EXAMS_FILE}");
                PathBuf::from(DEFAULT_EXAMS_FILE)
            }
        };

        let max_attempts = match lookup("MAX_ATTEMPTS") {
            Some(v) => {
                let n: u32 = v
                    .parse()
                    .with_context(|| format!("MAX_ATTEMPTS is not a whole number: '{v}'"))?;
                if n == 0 {
                    bail!("MAX_ATTEMPTS must be at least 1");
                }
                n
            }
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let min_driving_hours = match lookup("MIN_DRIVING_HOURS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("MIN_DRIVING_HOURS is not a whole number: '{v}'"))?,
            None => DEFAULT_MIN_DRIVING_HOURS,
        };

        let environment = match lookup("ENVIRONMENT") {
            Some(v) => v.into(),
            None => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        let sentry_dsn = match lookup("SENTRY_DSN") {
            Some(dsn_string) => {
                if !valid_sentry_dsn(&dsn_string) {
                    bail!("SENTRY_DSN is not valid DSN.");
                }
                Some(dsn_string)
            }
            None => None,
        };

        Ok(Self {
            environment,
            exams_file,
            max_attempts,
            min_driving_hours,
            sentry_dsn,
        })
    }

    pub fn rules(&self) -> Rules {
        Rules {
            max_attempts: self.max_attempts,
            min_driving_hours: self.min_driving_hours,
        }
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
