use crate::config::{
    default_output_file, default_period, DEFAULT_HISTORY_FILE, DEFAULT_PARTICIPANTS_FILE,
};
use crate::core::assignment::DEFAULT_MAX_ATTEMPTS;
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub exchange: ExchangeConfig,
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub name: String,
    pub period: Option<String>,
    pub max_attempts: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub participants_file: Option<String>,
    pub history_file: Option<String>,
    pub output_file: Option<String>,
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn participants_file(&self) -> &str {
        self.storage
            .participants_file
            .as_deref()
            .unwrap_or(DEFAULT_PARTICIPANTS_FILE)
    }

    fn history_file(&self) -> &str {
        self.storage
            .history_file
            .as_deref()
            .unwrap_or(DEFAULT_HISTORY_FILE)
    }

    fn output_file(&self) -> &str {
        self.storage
            .output_file
            .as_deref()
            .unwrap_or_else(|| default_output_file(self.output_format()))
    }

    fn output_format(&self) -> OutputFormat {
        self.storage.output_format.unwrap_or_default()
    }

    fn max_attempts(&self) -> usize {
        self.exchange.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn seed(&self) -> Option<u64> {
        self.exchange.seed
    }

    fn period(&self) -> String {
        self.exchange.period.clone().unwrap_or_else(default_period)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("exchange.name", &self.exchange.name)?;
        validate_path("storage.data_dir", &self.storage.data_dir)?;
        validate_path("storage.participants_file", self.participants_file())?;
        validate_path("storage.history_file", self.history_file())?;
        validate_path("storage.output_file", self.output_file())?;
        validate_file_extension("storage.participants_file", self.participants_file(), &["csv"])?;
        validate_file_extension("storage.history_file", self.history_file(), &["csv"])?;
        validate_file_extension(
            "storage.output_file",
            self.output_file(),
            &[self.output_format().extension()],
        )?;
        validate_positive_number("exchange.max_attempts", self.max_attempts(), 1)?;
        Ok(())
    }
}
