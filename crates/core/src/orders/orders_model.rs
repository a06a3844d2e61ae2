//! Order domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::olo_timestamp::{OloTimestamp, OloTimestampError, PlatformTimeZone};

/// Domain model representing a stored order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub store_number: String,
    pub store_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub time_placed: String,
    pub time_ready: String,
}

impl Order {
    pub fn ready_at(&self, zone: &PlatformTimeZone) -> Result<DateTime<Utc>, OloTimestampError> {
        let ready: OloTimestamp = self.time_ready.parse()?;
        Ok(ready.at(zone)?.with_timezone(&Utc))
    }

    /// An order is active while `now` is strictly before its ready time.
    /// Time placed plays no part.
    pub fn is_active(
        &self,
        now: DateTime<Utc>,
        zone: &PlatformTimeZone,
    ) -> Result<bool, OloTimestampError> {
        Ok(now < self.ready_at(zone)?)
    }

    /// Store name for display, falling back to the store number.
    pub fn display_name(&self) -> String {
        match self.store_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Store #{}", self.store_number),
        }
    }
}

/// Input model for inserting a validated order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub store_number: String,
    pub store_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub time_placed: String,
    pub time_ready: String,
}
