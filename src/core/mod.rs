pub mod interval;
pub mod pipeline;
pub mod report;
pub mod usage;

pub use crate::domain::model::{Snapshot, UsageReport};
pub use crate::domain::ports::{BookingStore, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
