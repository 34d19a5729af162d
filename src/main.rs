use clap::Parser;
use secret_santa::core::ConfigProvider;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{CliConfig, ExchangePipeline, ExchangeRunner, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting secret-santa CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!(
        "Period {} with up to {} attempts",
        config.period(),
        config.max_attempts()
    );

    let storage = LocalStorage::new(config.data_dir.clone());
    let pipeline = ExchangePipeline::new(storage, config);
    let runner = ExchangeRunner::new(pipeline);

    match runner.run().await {
        Ok(summary) => {
            println!("🎅 Secret Santa assignments generated successfully!");
            for pairing in &summary.pairings {
                println!(
                    "  {} <{}> -> {} <{}>",
                    pairing.giver_name,
                    pairing.giver_id,
                    pairing.recipient_name,
                    pairing.recipient_id
                );
            }
            println!("📁 Output saved to: {}", summary.output_path);
            println!(
                "📜 {} new pairings added to history",
                summary.history_entries_added
            );
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
