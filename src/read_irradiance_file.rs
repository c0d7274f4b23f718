use crate::core::orientation::{Azimuth, Orientation, Slope};
use crate::time_series::{TimeSeriesEntry, Timestamp};
use anyhow::Context;
use serde::Deserialize;
use std::io::Read;

/// Hourly irradiance and weather for one module orientation, as exported by PVGIS
/// ("hourly radiation" tool, JSON output).
#[derive(Clone, Debug, Deserialize)]
pub struct SolarRadiationData {
    inputs: Inputs,
    outputs: Outputs,
}

#[derive(Clone, Debug, Deserialize)]
struct Inputs {
    mounting_system: MountingSystem,
}

#[derive(Clone, Debug, Deserialize)]
struct MountingSystem {
    fixed: FixedMountingSystem,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct FixedMountingSystem {
    slope: Slope,
    azimuth: Azimuth,
}

#[derive(Clone, Debug, Deserialize)]
struct Outputs {
    hourly: Vec<TimeSeriesEntry>,
}

impl SolarRadiationData {
    pub fn new(orientation: Orientation, hourly: Vec<TimeSeriesEntry>) -> Self {
        Self {
            inputs: Inputs {
                mounting_system: MountingSystem {
                    fixed: FixedMountingSystem {
                        slope: orientation.slope,
                        azimuth: orientation.azimuth,
                    },
                },
            },
            outputs: Outputs { hourly },
        }
    }

    pub fn orientation(&self) -> Orientation {
        let FixedMountingSystem { slope, azimuth } = self.inputs.mounting_system.fixed;
        Orientation::new(slope, azimuth)
    }

    pub fn hourly(&self) -> &[TimeSeriesEntry] {
        &self.outputs.hourly
    }

    pub fn times(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.outputs.hourly.iter().map(|entry| entry.time)
    }

    /// Drop all entries outside the given calendar year. Source files usually span several years.
    pub fn restrict_to_year(&mut self, year: i32) {
        self.outputs.hourly.retain(|entry| entry.time.year() == year);
    }
}

pub fn irradiance_data_from_json(json: impl Read) -> anyhow::Result<SolarRadiationData> {
    serde_json::from_reader(json).context("Could not parse the irradiance data file")
}
