use crate::core::consumption::heat_pump::HeatPumpSystem;
use crate::core::energy_supply::elec_battery::StorageInput;
use crate::core::energy_supply::pv::PhotovoltaicSystem;
use crate::core::energy_supply::tariff::Prices;
use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use serde_valid::Validate;
use std::io::{BufReader, Read};

/// Read and validate a project description from JSON.
pub fn ingest_input(json: impl Read) -> anyhow::Result<Input> {
    let input: Input = serde_json::from_reader(BufReader::new(json))
        .context("Could not parse the project input")?;
    input.check()?;
    Ok(input)
}

/// A household and its hardware, as described in a project input file.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Input {
    /// Calendar year to simulate. Irradiance entries from other years are ignored; when absent
    /// the irradiance data is used as given.
    #[serde(default)]
    pub year: Option<i32>,
    #[validate]
    pub pv_system: PhotovoltaicSystem,
    /// yearly electricity use of the household excluding the heat pump, in kWh
    #[validate(minimum = 0.)]
    pub regular_consumption_kwh: f64,
    #[serde(default)]
    pub heat_pump: Option<HeatPumpSystem>,
    #[serde(default)]
    #[validate]
    pub storage: StorageInput,
    #[serde(default)]
    #[validate]
    pub prices: Prices,
}

impl Input {
    fn check(&self) -> anyhow::Result<()> {
        self.validate().map_err(|e| anyhow!("Invalid project input: {e}"))?;
        if let Some(heat_pump) = &self.heat_pump {
            heat_pump
                .validate()
                .map_err(|e| anyhow!("Invalid heat pump input: {e}"))?;
        }
        if let Some(maximum_power) = self.pv_system.maximum_power_kw {
            if maximum_power < 0. {
                bail!("Maximum PV power must not be negative, got {maximum_power} kW");
            }
        }
        if let Some(tolerance) = self.pv_system.orientation_tolerance {
            if tolerance < 0. {
                bail!("Orientation tolerance must not be negative, got {tolerance} degrees");
            }
        }
        Ok(())
    }
}
