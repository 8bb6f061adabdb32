use crate::core::interval::MonthWindow;
use crate::core::{BookingStore, ConfigProvider};
use crate::domain::model::{Booking, BookingRequest, BookingStatus, House};
use crate::utils::error::{Result, UsageError};
use crate::utils::validation::Validate;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for a PostgREST-style API in front of the `houses` and `bookings` tables.
#[derive(Debug, Clone)]
pub struct RestBookingStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestBookingStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.store_url(),
            config.api_key(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        tracing::debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Store response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UsageError::StoreError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Malformed rows are logged and skipped so one bad row cannot sink a report.
fn parse_booking_row(row: serde_json::Value) -> Option<Booking> {
    let id = row.get("id").cloned().unwrap_or(serde_json::Value::Null);
    match serde_json::from_value::<Booking>(row) {
        Ok(booking) => Some(booking),
        Err(e) => {
            tracing::warn!("Skipping malformed booking row {}: {}", id, e);
            None
        }
    }
}

impl BookingStore for RestBookingStore {
    async fn list_houses(&self) -> Result<Vec<House>> {
        let builder = self
            .request(Method::GET, "houses")
            .query(&[("select", "id,name"), ("order", "id.asc")]);
        self.send(builder).await
    }

    async fn list_bookings(&self, window: &MonthWindow) -> Result<Vec<Booking>> {
        let builder = self.request(Method::GET, "bookings").query(&[
            ("select", "*".to_string()),
            ("status", format!("eq.{}", BookingStatus::Active.as_str())),
            ("start_date", format!("lt.{}", window.end)),
            ("end_date", format!("gt.{}", window.start)),
            ("order", "start_date.asc".to_string()),
        ]);
        let rows: Vec<serde_json::Value> = self.send(builder).await?;

        Ok(rows.into_iter().filter_map(parse_booking_row).collect())
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
        request.validate()?;

        let builder = self
            .request(Method::POST, "bookings")
            .header("Prefer", "return=representation")
            .json(request);
        let rows: Vec<Booking> = self.send(builder).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| UsageError::ProcessingError {
                message: "Store did not return the created booking".to_string(),
            })
    }

    async fn cancel_booking(&self, id: i64) -> Result<Booking> {
        let builder = self
            .request(Method::PATCH, "bookings")
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "status": BookingStatus::Cancelled }));
        let rows: Vec<Booking> = self.send(builder).await?;

        rows.into_iter()
            .next()
            .ok_or(UsageError::BookingNotFound { id })
    }

    async fn delete_booking(&self, id: i64) -> Result<()> {
        let builder = self
            .request(Method::DELETE, "bookings")
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let rows: Vec<Booking> = self.send(builder).await?;

        if rows.is_empty() {
            return Err(UsageError::BookingNotFound { id });
        }
        Ok(())
    }
}
