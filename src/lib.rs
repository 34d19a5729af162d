pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{storage::LocalStorage, toml_config::TomlConfig};
pub use core::{
    assignment::{AssignmentConfig, AssignmentEngine},
    history::History,
    pipeline::ExchangePipeline,
    runner::{ExchangeRunner, RunSummary},
};
pub use domain::model::{Assignment, FormattedPairing, OutputFormat, Pairing, Participant};
pub use utils::error::{Result, SantaError};
