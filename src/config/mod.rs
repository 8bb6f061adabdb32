pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "house-usage")]
#[command(about = "Monthly per-house usage report for the family booking calendar")]
pub struct CliConfig {
    #[arg(long, env = "STORE_URL")]
    pub store_url: String,

    #[arg(long, env = "STORE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, help = "Month to report on as YYYY-MM (default: previous completed month)")]
    pub month: Option<String>,

    #[arg(long, default_value = "./reports")]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Print the report without writing the bundle")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn store_url(&self) -> &str {
        &self.store_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn report_month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_store_settings(self)?;
        validation::validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

/// Checks shared by every config source that talks to the store.
pub fn validate_store_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_url("store_url", config.store_url())?;
    validation::validate_non_empty_string("api_key", config.api_key())?;
    validation::validate_range("timeout_seconds", config.timeout_seconds(), 1, 300)?;

    if let Some(month) = config.report_month() {
        crate::core::interval::MonthWindow::parse(month)?;
    }

    Ok(())
}
