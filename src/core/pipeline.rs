use crate::core::interval::MonthWindow;
use crate::core::usage::compute_usage;
use crate::core::{BookingStore, ConfigProvider, Pipeline, Snapshot, Storage, UsageReport};
use crate::domain::model::UsageRecord;
use crate::utils::error::{Result, UsageError};
use chrono::Local;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const CSV_HEADER: [&str; 6] = [
    "houseId",
    "houseName",
    "month",
    "daysWithBookings",
    "totalDays",
    "usageRate",
];

/// Fetches one month of bookings, aggregates usage per house and writes a
/// `usage-YYYY-MM.zip` bundle holding `usage.csv` and `usage.json`.
pub struct UsageReportPipeline<B: BookingStore, S: Storage, C: ConfigProvider> {
    store: B,
    storage: S,
    config: C,
}

impl<B: BookingStore, S: Storage, C: ConfigProvider> UsageReportPipeline<B, S, C> {
    pub fn new(store: B, storage: S, config: C) -> Self {
        Self {
            store,
            storage,
            config,
        }
    }

    /// The configured month, or the previous completed month in local time.
    pub fn window(&self) -> Result<MonthWindow> {
        match self.config.report_month() {
            Some(label) => MonthWindow::parse(label),
            None => MonthWindow::previous_completed(Local::now().date_naive()),
        }
    }
}

pub fn bundle_name(window: &MonthWindow) -> String {
    format!("usage-{}.zip", window.label())
}

pub fn render_csv(records: &[UsageRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| UsageError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| UsageError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[async_trait::async_trait]
impl<B: BookingStore, S: Storage, C: ConfigProvider> Pipeline for UsageReportPipeline<B, S, C> {
    async fn extract(&self) -> Result<Snapshot> {
        let window = self.window()?;
        tracing::debug!("Fetching houses and bookings for {}", window);

        // Houses first so a house with no bookings still gets a record
        let houses = self.store.list_houses().await?;
        let bookings = self.store.list_bookings(&window).await?;

        for booking in bookings.iter().filter(|b| b.end_date <= b.start_date) {
            tracing::warn!(
                "Booking {} ends on {} before it starts on {}; it will count as 0 days",
                booking.id,
                booking.end_date,
                booking.start_date
            );
        }

        tracing::debug!(
            "Fetched {} houses and {} bookings",
            houses.len(),
            bookings.len()
        );

        Ok(Snapshot {
            window,
            houses,
            bookings,
        })
    }

    async fn transform(&self, snapshot: Snapshot) -> Result<UsageReport> {
        let records = compute_usage(&snapshot.houses, &snapshot.bookings, &snapshot.window);

        // Render both report formats
        let csv_output = render_csv(&records)?;
        let json_output = serde_json::to_string_pretty(&records)?;

        Ok(UsageReport {
            window: snapshot.window,
            records,
            csv_output,
            json_output,
        })
    }

    async fn load(&self, report: &UsageReport) -> Result<String> {
        let bundle = bundle_name(&report.window);
        let output_path = format!("{}/{}", self.config.output_path(), bundle);

        // Build the zip bundle in memory
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            // CSV
            zip.start_file::<_, ()>("usage.csv", FileOptions::default())?;
            zip.write_all(report.csv_output.as_bytes())?;

            // JSON
            zip.start_file::<_, ()>("usage.json", FileOptions::default())?;
            zip.write_all(report.json_output.as_bytes())?;

            // Finish and take back the underlying Vec<u8>
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        // Save the bundle
        tracing::debug!("Writing {} ({} bytes) to storage", bundle, zip_data.len());
        self.storage.write_file(&bundle, &zip_data).await?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Booking, BookingRequest, BookingStatus, House};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Returns its rows unfiltered so the aggregator's own filtering is exercised.
    struct MockStore {
        houses: Vec<House>,
        bookings: Vec<Booking>,
        requested: Arc<Mutex<Vec<MonthWindow>>>,
    }

    impl BookingStore for MockStore {
        async fn list_houses(&self) -> Result<Vec<House>> {
            Ok(self.houses.clone())
        }

        async fn list_bookings(&self, window: &MonthWindow) -> Result<Vec<Booking>> {
            self.requested.lock().await.push(*window);
            Ok(self.bookings.clone())
        }

        async fn create_booking(&self, _request: &BookingRequest) -> Result<Booking> {
            unimplemented!("reports never create bookings")
        }

        async fn cancel_booking(&self, id: i64) -> Result<Booking> {
            Err(UsageError::BookingNotFound { id })
        }

        async fn delete_booking(&self, _id: i64) -> Result<()> {
            Ok(())
        }
    }

    struct MockConfig {
        month: Option<String>,
        output_path: String,
    }

    impl ConfigProvider for MockConfig {
        fn store_url(&self) -> &str {
            "http://store.test"
        }

        fn api_key(&self) -> &str {
            "test-key"
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn report_month(&self) -> Option<&str> {
            self.month.as_deref()
        }

        fn timeout_seconds(&self) -> u64 {
            30
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(id: i64, house_id: i64, start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id,
            house_id,
            created_by: "user-1".to_string(),
            guest_count: 3,
            start_date: date(start),
            end_date: date(end),
            status,
            note: None,
        }
    }

    fn pipeline(
        month: Option<&str>,
        storage: MockStorage,
    ) -> UsageReportPipeline<MockStore, MockStorage, MockConfig> {
        let store = MockStore {
            houses: vec![
                House {
                    id: 1,
                    name: "Cabin".to_string(),
                },
                House {
                    id: 2,
                    name: "Beach House".to_string(),
                },
            ],
            bookings: vec![
                booking(1, 1, "2026-01-10", "2026-01-15", BookingStatus::Active),
                booking(2, 1, "2026-01-14", "2026-01-20", BookingStatus::Active),
                booking(3, 2, "2025-12-28", "2026-01-03", BookingStatus::Active),
                booking(4, 2, "2026-01-20", "2026-01-25", BookingStatus::Cancelled),
                booking(5, 2, "2026-03-01", "2026-03-04", BookingStatus::Active),
            ],
            requested: Arc::new(Mutex::new(Vec::new())),
        };
        let config = MockConfig {
            month: month.map(str::to_string),
            output_path: "reports".to_string(),
        };
        UsageReportPipeline::new(store, storage, config)
    }

    #[tokio::test]
    async fn test_extract_uses_configured_month() {
        let pipeline = pipeline(Some("2026-01"), MockStorage::new());

        let snapshot = pipeline.extract().await.unwrap();

        assert_eq!(snapshot.window, MonthWindow::new(2026, 1).unwrap());
        assert_eq!(snapshot.houses.len(), 2);
        assert_eq!(snapshot.bookings.len(), 5);
        let requested = pipeline.store.requested.lock().await;
        assert_eq!(requested.as_slice(), &[MonthWindow::new(2026, 1).unwrap()]);
    }

    #[tokio::test]
    async fn test_extract_defaults_to_previous_month() {
        let pipeline = pipeline(None, MockStorage::new());

        let expected = MonthWindow::previous_completed(Local::now().date_naive()).unwrap();
        assert_eq!(pipeline.window().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_extract_rejects_bad_month() {
        let pipeline = pipeline(Some("2026-13"), MockStorage::new());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, UsageError::InvalidMonth { .. }));
    }

    #[tokio::test]
    async fn test_transform_aggregates_and_renders() {
        let pipeline = pipeline(Some("2026-01"), MockStorage::new());
        let snapshot = pipeline.extract().await.unwrap();

        let report = pipeline.transform(snapshot).await.unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].days_with_bookings, 11);
        assert_eq!(report.records[1].days_with_bookings, 2);

        let lines: Vec<&str> = report.csv_output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "houseId,houseName,month,daysWithBookings,totalDays,usageRate"
        );
        assert!(lines[1].starts_with("1,Cabin,2026-01,11,31,"));
        assert!(lines[2].starts_with("2,Beach House,2026-01,2,31,"));

        let json: Vec<UsageRecord> = serde_json::from_str(&report.json_output).unwrap();
        assert_eq!(json, report.records);
    }

    #[test]
    fn test_render_csv_without_records_keeps_header() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "houseId,houseName,month,daysWithBookings,totalDays,usageRate"
        );
    }

    #[tokio::test]
    async fn test_load_writes_bundle() {
        let storage = MockStorage::new();
        let pipeline = pipeline(Some("2026-01"), storage.clone());
        let snapshot = pipeline.extract().await.unwrap();
        let report = pipeline.transform(snapshot).await.unwrap();

        let output_path = pipeline.load(&report).await.unwrap();
        assert_eq!(output_path, "reports/usage-2026-01.zip");

        let zip_bytes = storage.get_file("usage-2026-01.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(file_names, vec!["usage.csv", "usage.json"]);

        let csv_read = {
            let mut file = archive.by_name("usage.csv").unwrap();
            let mut content = String::new();
            std::io::Read::read_to_string(&mut file, &mut content).unwrap();
            content
        };
        assert_eq!(csv_read, report.csv_output);
    }
}
