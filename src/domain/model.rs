use crate::core::interval::MonthWindow;
use crate::utils::error::{Result, UsageError};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest stay a single booking may cover, in nights.
pub const MAX_NIGHTS: i64 = 7;

/// Longest free-text note accepted on a booking.
pub const MAX_NOTE_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A stay at one house over the half-open range `[start_date, end_date)`.
///
/// The guest occupies the nights `start_date` through `end_date - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub house_id: i64,
    pub created_by: String,
    pub guest_count: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload for a new booking, checked before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub house_id: i64,
    pub created_by: String,
    pub guest_count: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BookingRequest {
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

impl Validate for BookingRequest {
    fn validate(&self) -> Result<()> {
        if self.guest_count < 1 {
            return Err(UsageError::ValidationError {
                message: "guest_count must be at least 1".to_string(),
            });
        }

        if self.start_date >= self.end_date {
            return Err(UsageError::ValidationError {
                message: format!(
                    "end_date {} must be after start_date {}",
                    self.end_date, self.start_date
                ),
            });
        }

        if self.nights() > MAX_NIGHTS {
            return Err(UsageError::ValidationError {
                message: format!(
                    "a booking may cover at most {} nights, got {}",
                    MAX_NIGHTS,
                    self.nights()
                ),
            });
        }

        if let Some(note) = &self.note {
            if note.chars().count() > MAX_NOTE_LENGTH {
                return Err(UsageError::ValidationError {
                    message: format!("note exceeds {} characters", MAX_NOTE_LENGTH),
                });
            }
        }

        Ok(())
    }
}

/// Houses and bookings fetched from the store for one report month.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub window: MonthWindow,
    pub houses: Vec<House>,
    pub bookings: Vec<Booking>,
}

/// Occupancy of one house over one calendar month.
///
/// `usage_rate` is not capped at 1: overlapping bookings for the same house
/// are summed independently, so `days_with_bookings` can exceed `total_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub house_id: i64,
    pub house_name: String,
    pub month: String,
    pub days_with_bookings: i64,
    pub total_days: i64,
    pub usage_rate: f64,
}

#[derive(Debug, Clone)]
pub struct UsageReport {
    pub window: MonthWindow,
    pub records: Vec<UsageRecord>,
    pub csv_output: String,
    pub json_output: String,
}
