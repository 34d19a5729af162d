use crate::config::{
    default_output_file, default_period, DEFAULT_HISTORY_FILE, DEFAULT_PARTICIPANTS_FILE,
};
use crate::core::assignment::DEFAULT_MAX_ATTEMPTS;
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_number, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Assign Secret Santa recipients without repeating past pairings")]
pub struct CliConfig {
    /// Directory holding the participant, history and output files
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_PARTICIPANTS_FILE)]
    pub participants_file: String,

    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    pub history_file: String,

    /// Report file (defaults to new_secret_santa.csv or .json, following --format)
    #[arg(long)]
    pub output_file: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Shuffles to try before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Fix the RNG seed to reproduce a run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Label stored with this run's history rows (defaults to the current year)
    #[arg(long)]
    pub period: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn participants_file(&self) -> &str {
        &self.participants_file
    }

    fn history_file(&self) -> &str {
        &self.history_file
    }

    fn output_file(&self) -> &str {
        self.output_file
            .as_deref()
            .unwrap_or_else(|| default_output_file(self.format))
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn period(&self) -> String {
        self.period.clone().unwrap_or_else(default_period)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("participants_file", &self.participants_file)?;
        validate_path("history_file", &self.history_file)?;
        validate_path("output_file", self.output_file())?;
        validate_file_extension("participants_file", &self.participants_file, &["csv"])?;
        validate_file_extension("history_file", &self.history_file, &["csv"])?;
        validate_file_extension("output_file", self.output_file(), &[self.format.extension()])?;
        validate_positive_number("max_attempts", self.max_attempts, 1)?;
        Ok(())
    }
}
