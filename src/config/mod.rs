#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::domain::model::OutputFormat;
use chrono::Datelike;

pub const DEFAULT_PARTICIPANTS_FILE: &str = "employees.csv";
pub const DEFAULT_HISTORY_FILE: &str = "previous_assignment_history.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "new_secret_santa.csv";
pub const DEFAULT_JSON_OUTPUT_FILE: &str = "new_secret_santa.json";

/// Report file used when none is configured, matching the report format.
pub fn default_output_file(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Csv => DEFAULT_OUTPUT_FILE,
        OutputFormat::Json => DEFAULT_JSON_OUTPUT_FILE,
    }
}

/// Period label used when none is configured: the current year.
pub fn default_period() -> String {
    chrono::Local::now().year().to_string()
}
