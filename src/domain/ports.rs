use crate::core::interval::MonthWindow;
use crate::domain::model::{Booking, BookingRequest, House, Snapshot, UsageReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// Destination for finished report bundles.
pub trait Storage: Send + Sync {
    fn write_file(&self, path: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

/// The external relational store holding houses and bookings.
pub trait BookingStore: Send + Sync {
    fn list_houses(&self) -> impl Future<Output = Result<Vec<House>>> + Send;

    /// Active bookings whose range intersects `window`.
    fn list_bookings(&self, window: &MonthWindow)
        -> impl Future<Output = Result<Vec<Booking>>> + Send;

    fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = Result<Booking>> + Send;

    fn cancel_booking(&self, id: i64) -> impl Future<Output = Result<Booking>> + Send;

    fn delete_booking(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn store_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Explicit `YYYY-MM` month to report on; `None` means the previous completed month.
    fn report_month(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Snapshot>;
    async fn transform(&self, snapshot: Snapshot) -> Result<UsageReport>;
    async fn load(&self, report: &UsageReport) -> Result<String>;
}
