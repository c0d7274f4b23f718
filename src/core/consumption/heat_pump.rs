use crate::compare_floats::max_of_2;
use crate::time_series::TimeSeriesEntry;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_valid::Validate;
use tracing::warn;

/// A daily period in which the heat pump may run, from `start` (inclusive) to `end` (exclusive),
/// in hours of the day. Written as `[start, end]` in input files.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Validate)]
#[serde(from = "(u32, u32)")]
pub struct HeatingWindow {
    #[validate(maximum = 24)]
    pub start: u32,
    #[validate(maximum = 24)]
    pub end: u32,
}

impl From<(u32, u32)> for HeatingWindow {
    fn from((start, end): (u32, u32)) -> Self {
        Self { start, end }
    }
}

impl HeatingWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of hours in the window. Windows that end at or before their start are empty.
    pub fn hours(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, hour_of_day: u32) -> bool {
        self.start <= hour_of_day && hour_of_day < self.end
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct HeatPumpSystem {
    /// electricity used by the heat pump over the year, in kWh
    #[validate(minimum = 0.)]
    pub yearly_electricity_consumption_kwh: f64,
    /// outdoor temperature (degrees C) below which the building needs heating
    #[serde(default = "default_inside_temp")]
    pub inside_temp: f64,
    /// Windows must not overlap. The day's energy is divided by the summed window lengths, so
    /// overlapping windows leave part of it undistributed.
    #[serde(default = "default_heating_times")]
    #[validate]
    pub heating_times: Vec<HeatingWindow>,
}

fn default_inside_temp() -> f64 {
    15.
}

fn default_heating_times() -> Vec<HeatingWindow> {
    vec![HeatingWindow::new(8, 18)]
}

impl HeatPumpSystem {
    pub fn new(
        yearly_electricity_consumption_kwh: f64,
        inside_temp: f64,
        heating_times: Vec<HeatingWindow>,
    ) -> Self {
        Self {
            yearly_electricity_consumption_kwh,
            inside_temp,
            heating_times,
        }
    }

    fn heating_hours_per_day(&self) -> u32 {
        self.heating_times.iter().map(HeatingWindow::hours).sum()
    }

    fn is_heating_hour(&self, hour_of_day: u32) -> bool {
        self.heating_times
            .iter()
            .any(|window| window.contains(hour_of_day))
    }
}

/// Generate the hourly electricity consumption (in kWh) of a heat pump.
///
/// Each day's share of the yearly consumption is proportional to that day's heating degree
/// hours (the sum of `inside_temp - outside_temp` over hours colder than `inside_temp`). The
/// day's energy is spread evenly over the hours inside the heating windows; the other hours get
/// nothing. If no hour of the year is colder than `inside_temp` the profile is all zeros.
pub fn generate_heat_pump_consumption_profile(
    entries: &[TimeSeriesEntry],
    heat_pump_system: &HeatPumpSystem,
) -> Vec<f64> {
    let mut daily_temp_diff: IndexMap<(i32, u32, u32), f64> = IndexMap::new();
    for entry in entries {
        let temp_diff = max_of_2(heat_pump_system.inside_temp - entry.air_temperature, 0.);
        *daily_temp_diff.entry(entry.time.day_key()).or_default() += temp_diff;
    }

    let total_temp_diff = daily_temp_diff.values().sum::<f64>();
    let scaling_factor = if total_temp_diff > 0. {
        heat_pump_system.yearly_electricity_consumption_kwh / total_temp_diff
    } else {
        0.
    };

    let heating_hours = heat_pump_system.heating_hours_per_day();
    if heating_hours == 0 && scaling_factor > 0. {
        warn!("Heat pump has heating demand but no heating hours; its consumption will be zero");
    }

    entries
        .iter()
        .map(|entry| {
            let daily_consumption = daily_temp_diff
                .get(&entry.time.day_key())
                .copied()
                .unwrap_or_default()
                * scaling_factor;
            if heating_hours > 0 && heat_pump_system.is_heating_hour(entry.time.hour()) {
                daily_consumption / heating_hours as f64
            } else {
                0.
            }
        })
        .collect()
}
