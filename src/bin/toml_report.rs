use clap::Parser;
use house_usage::config::toml_config::TomlConfig;
use house_usage::core::report::format_table;
use house_usage::utils::{logger, validation::Validate};
use house_usage::{LocalStorage, ReportEngine, RestBookingStore, UsageReportPipeline};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Usage report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "house-usage.toml")]
    config: String,

    /// Override the report month (YYYY-MM)
    #[arg(long)]
    month: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the report without writing the bundle
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(args.verbose || config.verbose());
    tracing::info!("Loaded configuration from {}", args.config);

    if let Some(month) = args.month {
        tracing::info!("Report month overridden to {}", month);
        config.report.month = Some(month);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let store = RestBookingStore::from_config(&config)?;
    let storage = LocalStorage::new(config.report.output_path.clone());
    let engine = ReportEngine::new(UsageReportPipeline::new(store, storage, config));

    let result = if args.dry_run {
        engine.preview().await.map(|report| (report.records, None))
    } else {
        engine
            .run()
            .await
            .map(|outcome| (outcome.records, Some(outcome.output_path)))
    };

    match result {
        Ok((records, output_path)) => {
            println!("{}", format_table(&records));
            if let Some(path) = output_path {
                println!("📁 Report saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "Usage report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
