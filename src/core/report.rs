use crate::core::{Pipeline, UsageReport};
use crate::domain::model::UsageRecord;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub month: String,
    pub records: Vec<UsageRecord>,
    pub output_path: String,
}

/// Plain-text table of records, one line per house.
pub fn format_table(records: &[UsageRecord]) -> String {
    let name_width = records
        .iter()
        .map(|r| r.house_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("House".len());

    let mut lines = vec![format!(
        "{:<name_width$}  {:>7}  {:>4}  {:>4}  {:>7}",
        "House", "Month", "Days", "Of", "Usage"
    )];
    for record in records {
        lines.push(format!(
            "{:<name_width$}  {:>7}  {:>4}  {:>4}  {:>6.1}%",
            record.house_name,
            record.month,
            record.days_with_bookings,
            record.total_days,
            record.usage_rate * 100.0
        ));
    }
    lines.join("\n")
}

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract and transform only; nothing is written.
    pub async fn preview(&self) -> Result<UsageReport> {
        tracing::info!("Extracting houses and bookings...");
        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} houses and {} bookings for {}",
            snapshot.houses.len(),
            snapshot.bookings.len(),
            snapshot.window.label()
        );

        tracing::info!("Aggregating usage...");
        let report = self.pipeline.transform(snapshot).await?;
        tracing::info!("Aggregated usage for {} houses", report.records.len());

        Ok(report)
    }

    pub async fn run(&self) -> Result<ReportOutcome> {
        tracing::info!("Starting usage report...");
        let report = self.preview().await?;

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(&report).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(ReportOutcome {
            month: report.window.label(),
            records: report.records,
            output_path,
        })
    }
}
