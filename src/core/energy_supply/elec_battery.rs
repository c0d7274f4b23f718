use crate::compare_floats::{max_of_2, min_of_2};
use crate::errors::ConfigurationError;
use itertools::Itertools;
use serde::Deserialize;
use serde_valid::Validate;

/// Battery configuration for a simulation run.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct StorageInput {
    /// usable capacity of the battery, in kWh
    #[serde(default = "default_capacity")]
    #[validate(minimum = 0.)]
    pub capacity: f64,
    /// efficiency applied to each of charging and discharging (between 0 & 1)
    #[serde(default = "default_efficiency")]
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 1.)]
    pub charge_discharge_efficiency: f64,
}

fn default_capacity() -> f64 {
    2.
}

fn default_efficiency() -> f64 {
    0.9
}

impl Default for StorageInput {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            charge_discharge_efficiency: default_efficiency(),
        }
    }
}

/// An object to represent an electric battery system
#[derive(Debug)]
pub struct ElectricBattery {
    /// the maximum capacity of the battery (kWh)
    capacity: f64,
    /// efficiency of a single charge or discharge (between 0 & 1)
    charge_discharge_efficiency: f64,
    /// the current energy stored in the battery at the end of hour (kWh)
    current_energy_stored: f64,
}

impl ElectricBattery {
    /// Arguments:
    /// * `capacity` - the maximum capacity of the battery (kWh), at least 0
    /// * `charge_discharge_efficiency` - efficiency of a single charge or discharge
    ///                                   (above 0, at most 1); applied on the way in and again
    ///                                   on the way out
    ///
    /// The battery starts empty.
    pub fn new(capacity: f64, charge_discharge_efficiency: f64) -> Result<Self, ConfigurationError> {
        if !(capacity >= 0. && charge_discharge_efficiency > 0. && charge_discharge_efficiency <= 1.)
        {
            return Err(ConfigurationError::InvalidStorage {
                capacity,
                efficiency: charge_discharge_efficiency,
            });
        }
        Ok(Self {
            capacity,
            charge_discharge_efficiency,
            current_energy_stored: 0.,
        })
    }

    pub fn from_input(input: &StorageInput) -> Result<Self, ConfigurationError> {
        Self::new(input.capacity, input.charge_discharge_efficiency)
    }

    pub fn current_energy_stored(&self) -> f64 {
        self.current_energy_stored
    }

    /// Charge the battery from surplus energy.
    ///
    /// Returns the energy taken from the surplus (kWh). Only the surplus less charging losses
    /// reaches storage, and no more than the remaining headroom is accepted.
    pub fn charge(&mut self, surplus: f64) -> f64 {
        let headroom = self.capacity - self.current_energy_stored;
        let energy_accepted = min_of_2(surplus * self.charge_discharge_efficiency, headroom);
        self.current_energy_stored =
            min_of_2(self.current_energy_stored + energy_accepted, self.capacity);
        // rounding must never draw more than the surplus
        min_of_2(energy_accepted / self.charge_discharge_efficiency, surplus)
    }

    /// Discharge the battery to cover a deficit.
    ///
    /// Returns the energy delivered (kWh), which is what leaves storage less discharging losses.
    pub fn discharge(&mut self, deficit: f64) -> f64 {
        let energy_released = min_of_2(
            deficit / self.charge_discharge_efficiency,
            self.current_energy_stored,
        );
        self.current_energy_stored -= energy_released;
        min_of_2(energy_released * self.charge_discharge_efficiency, deficit)
    }
}

/// Hourly energy flows of a household, all in kWh per hour. Every series has the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergyFlowData {
    pub production: Vec<f64>,
    pub consumption: Vec<f64>,
    /// energy drawn from the grid
    pub energy_buy: Vec<f64>,
    /// energy fed into the grid
    pub energy_sell: Vec<f64>,
    /// energy consumed directly from production or via the battery
    pub self_usage: Vec<f64>,
    /// surplus energy drawn into the battery, before charging losses
    pub energy_to_storage: Vec<f64>,
    /// energy delivered by the battery, after discharging losses
    pub energy_from_storage: Vec<f64>,
    /// energy held in the battery at the end of each hour
    pub storage_level: Vec<f64>,
}

impl EnergyFlowData {
    fn with_capacity(steps: usize) -> Self {
        Self {
            production: Vec::with_capacity(steps),
            consumption: Vec::with_capacity(steps),
            energy_buy: Vec::with_capacity(steps),
            energy_sell: Vec::with_capacity(steps),
            self_usage: Vec::with_capacity(steps),
            energy_to_storage: Vec::with_capacity(steps),
            energy_from_storage: Vec::with_capacity(steps),
            storage_level: Vec::with_capacity(steps),
        }
    }

    pub fn len(&self) -> usize {
        self.production.len()
    }

    pub fn is_empty(&self) -> bool {
        self.production.is_empty()
    }
}

/// Route production and consumption through the battery hour by hour, working out what is
/// bought, sold and used on site.
///
/// Surplus production charges the battery first and anything it cannot take is sold; a deficit
/// is covered from the battery first and anything it cannot supply is bought. The decision is
/// made on the current hour alone. Every run starts with an empty battery; the level at the end
/// of the run is the last value of `storage_level`.
pub fn compute_production_consumption(
    production: &[f64],
    consumption: &[f64],
    storage: &StorageInput,
) -> Result<EnergyFlowData, ConfigurationError> {
    if production.len() != consumption.len() {
        return Err(ConfigurationError::MismatchedFlowLengths {
            production: production.len(),
            consumption: consumption.len(),
        });
    }

    let mut battery = ElectricBattery::from_input(storage)?;

    let mut flows = EnergyFlowData::with_capacity(production.len());

    for (&prod, &con) in production.iter().zip_eq(consumption) {
        let (energy_buy, energy_sell, energy_to_storage, energy_from_storage) = if prod >= con {
            let excess = prod - con;
            let energy_to_storage = battery.charge(excess);
            (0., excess - energy_to_storage, energy_to_storage, 0.)
        } else {
            let deficit = con - prod;
            let energy_from_storage = battery.discharge(deficit);
            (
                max_of_2(deficit - energy_from_storage, 0.),
                0.,
                0.,
                energy_from_storage,
            )
        };

        flows.production.push(prod);
        flows.consumption.push(con);
        flows.energy_buy.push(energy_buy);
        flows.energy_sell.push(energy_sell);
        flows
            .self_usage
            .push(min_of_2(prod, con) + energy_from_storage);
        flows.energy_to_storage.push(energy_to_storage);
        flows.energy_from_storage.push(energy_from_storage);
        flows.storage_level.push(battery.current_energy_stored());
    }

    Ok(flows)
}
