pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

pub use crate::adapters::RestBookingStore;
pub use crate::core::{
    interval::{overlap_days, MonthWindow},
    pipeline::UsageReportPipeline,
    report::{ReportEngine, ReportOutcome},
    usage::compute_usage,
};
pub use domain::model::{Booking, BookingRequest, BookingStatus, House, UsageRecord};
pub use utils::error::{Result, UsageError};
