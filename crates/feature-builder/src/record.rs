//! Flight Records

use crate::calendar::{self, PeriodOfDay};
use crate::error::FeatureError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used throughout the historical dataset
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Departures later than this many minutes are labeled delayed
pub const DELAY_THRESHOLD_MINUTES: f64 = 15.0;

/// Flight type (`TIPOVUELO` in the dataset schema)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightType {
    /// International flight
    #[serde(rename = "I")]
    International,
    /// National flight
    #[serde(rename = "N")]
    National,
}

/// A single flight observation
///
/// Departure timestamps are only carried by training data; inference requests
/// supply the categorical fields alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Airline name (`OPERA`)
    pub airline: String,
    /// Flight type (`TIPOVUELO`)
    pub flight_type: FlightType,
    /// Month 1-12 (`MES`)
    pub month: u8,
    /// Scheduled departure (`Fecha-I`), `YYYY-MM-DD HH:MM:SS`
    pub scheduled_departure: Option<String>,
    /// Actual departure (`Fecha-O`), `YYYY-MM-DD HH:MM:SS`
    pub actual_departure: Option<String>,
}

impl FlightRecord {
    /// Create an inference-time record with no departure timestamps
    pub fn new(airline: impl Into<String>, flight_type: FlightType, month: u8) -> Self {
        Self {
            airline: airline.into(),
            flight_type,
            month,
            scheduled_departure: None,
            actual_departure: None,
        }
    }

    fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, FeatureError> {
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| FeatureError::Format {
            field,
            value: value.to_string(),
        })
    }

    fn scheduled(&self) -> Result<NaiveDateTime, FeatureError> {
        let value = self
            .scheduled_departure
            .as_deref()
            .ok_or(FeatureError::MissingField("Fecha-I"))?;
        Self::parse_timestamp("Fecha-I", value)
    }

    fn actual(&self) -> Result<NaiveDateTime, FeatureError> {
        let value = self
            .actual_departure
            .as_deref()
            .ok_or(FeatureError::MissingField("Fecha-O"))?;
        Self::parse_timestamp("Fecha-O", value)
    }

    /// Period of day the scheduled departure falls in, if any
    pub fn period_of_day(&self) -> Result<Option<PeriodOfDay>, FeatureError> {
        Ok(calendar::period_of_day(self.scheduled()?.time()))
    }

    /// Whether the scheduled departure falls in the high season
    pub fn is_high_season(&self) -> Result<bool, FeatureError> {
        Ok(calendar::is_high_season(self.scheduled()?.date()))
    }

    /// Difference between actual and scheduled departure in minutes
    ///
    /// Negative for early departures.
    pub fn minutes_late(&self) -> Result<f64, FeatureError> {
        let scheduled = self.scheduled()?;
        let actual = self.actual()?;
        Ok((actual - scheduled).num_seconds() as f64 / 60.0)
    }

    /// Binary delay label: 1 if departure is more than 15 minutes late
    pub fn delay_label(&self) -> Result<u8, FeatureError> {
        Ok(u8::from(self.minutes_late()? > DELAY_THRESHOLD_MINUTES))
    }
}
