use anyhow::Context;
use clap::Parser;
use secret_santa::adapters::csv_codec;
use secret_santa::core::{ConfigProvider, Storage};
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{ExchangePipeline, ExchangeRunner, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-santa")]
#[command(about = "Secret Santa assignment driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "santa.toml")]
    config: String,

    /// Enable verbose output (overrides [logging].verbose)
    #[arg(short, long)]
    verbose: bool,

    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Load and check the input files without assigning or writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("Loaded configuration from {}", args.config);

    if let Some(seed) = args.seed {
        config.exchange.seed = Some(seed);
        tracing::info!("Seed overridden to {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        return perform_dry_run(&config).await;
    }

    let storage = LocalStorage::new(config.data_dir().to_string());
    let pipeline = ExchangePipeline::new(storage, config);
    let runner = ExchangeRunner::new(pipeline);

    match runner.run().await {
        Ok(summary) => {
            println!(
                "✅ {} pairings written to {}",
                summary.pairings.len(),
                summary.output_path
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Exchange: {}", config.exchange.name);
    println!("  Period: {}", config.period());
    println!("  Data dir: {}", config.data_dir());
    println!("  Participants: {}", config.participants_file());
    println!("  History: {}", config.history_file());
    println!("  Output: {} ({:?})", config.output_file(), config.output_format());
    println!("  Max attempts: {}", config.max_attempts());

    if let Some(seed) = config.seed() {
        println!("  Seed: {}", seed);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new(config.data_dir().to_string());

    let data = storage.read_file(config.participants_file()).await?;
    let participants = csv_codec::decode_participants(&data)?;
    println!("👥 {} participants", participants.len());

    match storage.read_file_if_exists(config.history_file()).await? {
        Some(data) => {
            let entries = csv_codec::decode_history(&data)?;
            let history = csv_codec::history_from_entries(&entries);
            println!(
                "📜 {} history rows, {} distinct pairings across {} givers",
                entries.len(),
                history.pair_count(),
                history.giver_count()
            );
        }
        None => println!("📜 No history file yet"),
    }

    if participants.len() < 2 {
        println!("⚠️ At least two participants are needed for an assignment");
    }

    println!("✅ Dry run complete, nothing was written.");
    Ok(())
}
