use crate::errors::InvalidTimestampError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const HOURS_IN_DAY: u32 = 24;
pub const HOURS_IN_NON_LEAP_YEAR: usize = 8760;
pub const MONTHS_IN_YEAR: usize = 12;

// e.g. "20230101:0010"
const TIMESTAMP_FORMAT: &str = "%Y%m%d:%H%M";

/// The hour a record belongs to. Minutes present in source data are discarded, so two
/// timestamps are equal exactly when their year, month, day and hour are equal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(try_from = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn from_ymd_h(year: i32, month: u32, day: u32, hour: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, 0, 0)
            .map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Zero-based month index (0 = January).
    pub fn month_index(&self) -> usize {
        self.0.month0() as usize
    }

    pub(crate) fn day_key(&self) -> (i32, u32, u32) {
        (self.year(), self.month(), self.day())
    }
}

impl FromStr for Timestamp {
    type Err = InvalidTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .ok()
            .and_then(|date_time| date_time.with_minute(0))
            .map(Self)
            .ok_or_else(|| InvalidTimestampError::new(s))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = InvalidTimestampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

/// One hour of measured/modelled weather on a module plane.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TimeSeriesEntry {
    pub time: Timestamp,
    /// global irradiance on the inclined plane, in W/m2
    #[serde(rename = "G(i)")]
    pub global_irradiance: f64,
    /// sun height, in degrees
    #[serde(rename = "H_sun")]
    pub sun_height: f64,
    /// air temperature at 2m, in degrees C
    #[serde(rename = "T2m")]
    pub air_temperature: f64,
    /// wind speed at 10m, in m/s
    #[serde(rename = "WS10m")]
    pub wind_speed: f64,
    #[serde(rename = "Int")]
    pub intensity: f64,
}
