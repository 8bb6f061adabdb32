use clap::Parser;
use house_usage::core::report::format_table;
use house_usage::utils::{logger, validation::Validate};
use house_usage::{
    CliConfig, LocalStorage, ReportEngine, RestBookingStore, UsageError, UsageReportPipeline,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // Logging
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting house-usage report");
    tracing::debug!(
        store_url = %config.store_url,
        month = ?config.month,
        output_path = %config.output_path,
        "CLI config"
    );

    // Validate config
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "Usage report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // Exit code follows severity
        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: CliConfig) -> Result<(), UsageError> {
    // Build store, storage and pipeline
    let dry_run = config.dry_run;
    let store = RestBookingStore::from_config(&config)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let engine = ReportEngine::new(UsageReportPipeline::new(store, storage, config));

    if dry_run {
        tracing::info!("Dry run: the report bundle will not be written");
        let report = engine.preview().await?;
        println!("{}", format_table(&report.records));
        return Ok(());
    }

    let outcome = engine.run().await?;
    println!("{}", format_table(&outcome.records));
    println!("📁 Report saved to: {}", outcome.output_path);
    Ok(())
}
