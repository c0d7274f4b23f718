use crate::compare_floats::min_of_2;
use crate::core::orientation::{Azimuth, Orientation, Slope};
use crate::core::units::{watt_hours_to_kilowatt_hours, REFERENCE_IRRADIANCE};
use crate::errors::ConfigurationError;
use crate::read_irradiance_file::SolarRadiationData;
use crate::time_series::{TimeSeriesEntry, Timestamp};
use serde::Deserialize;
use serde_valid::Validate;
use tracing::{debug, warn};

/// System performance ratio used when none is configured: inverter, wiring, soiling and
/// temperature losses not otherwise modelled per module.
pub const DEFAULT_PERFORMANCE_RATIO: f64 = 0.85;

/// A group of identical PV modules sharing one orientation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PvModule {
    pub slope: Slope,
    pub azimuth: Azimuth,
    /// peak power of a single module, in kWp
    #[serde(default = "default_peak_power")]
    #[validate(minimum = 0.)]
    pub peak_power: f64,
    /// number of modules in the group
    #[serde(default = "default_module_count")]
    pub count: u32,
}

fn default_peak_power() -> f64 {
    0.5
}

fn default_module_count() -> u32 {
    1
}

impl PvModule {
    pub fn new(orientation: Orientation, peak_power: f64, count: u32) -> Self {
        Self {
            slope: orientation.slope,
            azimuth: orientation.azimuth,
            peak_power,
            count,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.slope, self.azimuth)
    }

    /// Energy (in kWh) produced by the module group for each entry.
    ///
    /// Irradiance on the module plane is taken relative to the 1000 W/m2 rating condition, so
    /// peak power (kW) * irradiance (W/m2) gives Wh per hour, converted to kWh.
    fn produce_energy(&self, entries: &[TimeSeriesEntry], performance_ratio: f64) -> Vec<f64> {
        let peak_power_w = self.peak_power * REFERENCE_IRRADIANCE;
        entries
            .iter()
            .map(|entry| {
                let energy_wh = peak_power_w
                    * (entry.global_irradiance / REFERENCE_IRRADIANCE)
                    * self.count as f64
                    * performance_ratio;
                watt_hours_to_kilowatt_hours(energy_wh)
            })
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PhotovoltaicSystem {
    #[validate]
    pub modules: Vec<PvModule>,
    /// limit on the combined output of all modules, in kW (e.g. the inverter or legal feed-in limit)
    #[serde(default)]
    pub maximum_power_kw: Option<f64>,
    #[serde(default = "default_performance_ratio")]
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 1.)]
    pub performance_ratio: f64,
    /// When set, module orientations match irradiance data sets within this many degrees
    /// instead of requiring identical values.
    #[serde(default)]
    pub orientation_tolerance: Option<f64>,
}

fn default_performance_ratio() -> f64 {
    DEFAULT_PERFORMANCE_RATIO
}

impl PhotovoltaicSystem {
    pub fn new(modules: Vec<PvModule>, maximum_power_kw: Option<f64>) -> Self {
        Self {
            modules,
            maximum_power_kw,
            performance_ratio: DEFAULT_PERFORMANCE_RATIO,
            orientation_tolerance: None,
        }
    }

    pub fn with_performance_ratio(self, performance_ratio: f64) -> Self {
        Self {
            performance_ratio,
            ..self
        }
    }

    pub fn with_orientation_tolerance(self, orientation_tolerance: f64) -> Self {
        Self {
            orientation_tolerance: Some(orientation_tolerance),
            ..self
        }
    }

    /// Find the irradiance data set for the module's orientation. When a tolerance lets several
    /// data sets match, the one closest to the module's orientation is used.
    fn solar_data_for_module<'a>(
        &self,
        module: &PvModule,
        available_data: &'a [SolarRadiationData],
    ) -> Result<&'a SolarRadiationData, ConfigurationError> {
        let orientation = module.orientation();
        let candidates = available_data
            .iter()
            .filter(|data| orientation.matches(&data.orientation(), self.orientation_tolerance))
            .collect::<Vec<_>>();
        if candidates.len() > 1 {
            debug!(
                "{} irradiance data sets match module orientation {orientation}, using the closest",
                candidates.len()
            );
        }
        candidates
            .into_iter()
            .min_by(|a, b| {
                orientation
                    .distance(&a.orientation())
                    .total_cmp(&orientation.distance(&b.orientation()))
            })
            .ok_or(ConfigurationError::NoMatchingOrientation {
                slope: orientation.slope.value,
                azimuth: orientation.azimuth.value,
            })
    }
}

/// Hourly production of a PV system, aligned with the timestamps of the irradiance data.
#[derive(Clone, Debug, PartialEq)]
pub struct Production {
    pub times: Vec<Timestamp>,
    /// energy produced per hour, in kWh
    pub total: Vec<f64>,
}

/// Check that all data sets cover the same hours, returning the shared timestamps.
fn shared_times(all_solar_data: &[SolarRadiationData]) -> Result<Vec<Timestamp>, ConfigurationError> {
    let (first, others) = all_solar_data
        .split_first()
        .ok_or(ConfigurationError::NoIrradianceData)?;
    let times = first.times().collect::<Vec<_>>();

    for data in others {
        if data.hourly().len() != times.len() {
            return Err(ConfigurationError::MismatchedSeriesLength {
                expected: times.len(),
                actual: data.hourly().len(),
            });
        }
        if let Some(index) = data
            .times()
            .zip(times.iter())
            .position(|(time, reference)| time != *reference)
        {
            return Err(ConfigurationError::MismatchedTimestamps { index });
        }
    }

    Ok(times)
}

/// Compute the hourly energy production (in kWh) of a PV system using the irradiance data set
/// matching each module's orientation.
///
/// When a maximum power is configured the summed output of all modules is clipped to it
/// every hour; energy above the limit is discarded.
pub fn compute_production(
    system: &PhotovoltaicSystem,
    all_solar_data: &[SolarRadiationData],
) -> Result<Production, ConfigurationError> {
    let times = shared_times(all_solar_data)?;

    if system.orientation_tolerance.is_some() {
        warn!(
            "Matching module orientations to irradiance data within a tolerance of {:?} degrees",
            system.orientation_tolerance
        );
    }

    let mut total = vec![0.; times.len()];
    for module in &system.modules {
        let solar_data = system.solar_data_for_module(module, all_solar_data)?;
        debug!(
            "Module group of {} x {} kWp uses irradiance data for {}",
            module.count,
            module.peak_power,
            solar_data.orientation()
        );
        let production = module.produce_energy(solar_data.hourly(), system.performance_ratio);
        for (hour_total, module_production) in total.iter_mut().zip(production) {
            *hour_total += module_production;
        }
    }

    if let Some(maximum_power) = system.maximum_power_kw {
        // one-hour steps, so a power limit in kW is an energy limit in kWh
        for hour_total in total.iter_mut() {
            *hour_total = min_of_2(*hour_total, maximum_power);
        }
    }

    Ok(Production { times, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn entries(irradiances: &[f64]) -> Vec<TimeSeriesEntry> {
        irradiances
            .iter()
            .enumerate()
            .map(|(hour, irradiance)| TimeSeriesEntry {
                time: Timestamp::from_ymd_h(2023, 6, 21, hour as u32).unwrap(),
                global_irradiance: *irradiance,
                sun_height: 0.,
                air_temperature: 20.,
                wind_speed: 0.,
                intensity: 0.,
            })
            .collect()
    }

    fn east() -> Orientation {
        Orientation::new(Slope::VERTICAL, Azimuth::EAST)
    }

    fn west() -> Orientation {
        Orientation::new(Slope::VERTICAL, Azimuth::WEST)
    }

    #[fixture]
    fn solar_data() -> Vec<SolarRadiationData> {
        vec![
            SolarRadiationData::new(east(), entries(&[0., 800., 400., 100.])),
            SolarRadiationData::new(west(), entries(&[0., 100., 400., 900.])),
        ]
    }

    #[rstest]
    fn test_produce_energy_single_module(solar_data: Vec<SolarRadiationData>) {
        let system = PhotovoltaicSystem::new(vec![PvModule::new(east(), 0.5, 4)], None)
            .with_performance_ratio(1.);
        let production = compute_production(&system, &solar_data).unwrap();

        assert_eq!(production.times.len(), 4);
        let expected = [0., 1.6, 0.8, 0.2];
        for (actual, expected) in production.total.iter().zip(expected) {
            assert_relative_eq!(*actual, expected, max_relative = 1e-12);
        }
    }

    #[rstest]
    fn test_produce_energy_sums_modules_and_applies_performance_ratio(
        solar_data: Vec<SolarRadiationData>,
    ) {
        let system = PhotovoltaicSystem::new(
            vec![PvModule::new(east(), 0.5, 2), PvModule::new(west(), 0.4, 1)],
            None,
        )
        .with_performance_ratio(0.8);
        let production = compute_production(&system, &solar_data).unwrap();

        let expected = [0., 0.672, 0.448, 0.368];
        for (actual, expected) in production.total.iter().zip(expected) {
            assert_relative_eq!(*actual, expected, max_relative = 1e-12);
        }
    }

    #[rstest]
    fn test_maximum_power_clips_each_hour(solar_data: Vec<SolarRadiationData>) {
        let system = PhotovoltaicSystem::new(
            vec![PvModule::new(east(), 0.5, 4), PvModule::new(west(), 0.5, 4)],
            Some(0.8),
        )
        .with_performance_ratio(1.);
        let production = compute_production(&system, &solar_data).unwrap();

        assert_eq!(production.total, vec![0., 0.8, 0.8, 0.8]);
    }

    #[rstest]
    fn test_no_modules_produce_nothing(solar_data: Vec<SolarRadiationData>) {
        let system = PhotovoltaicSystem::new(vec![], None);
        let production = compute_production(&system, &solar_data).unwrap();
        assert_eq!(production.total, vec![0.; 4]);
    }

    #[rstest]
    fn test_missing_orientation_is_error() {
        let solar_data = vec![
            SolarRadiationData::new(east(), entries(&[100.])),
            SolarRadiationData::new(west(), entries(&[100.])),
        ];
        let module = PvModule::new(Orientation::new(Slope::new(45.), Azimuth::new(10.)), 0.5, 1);
        let system = PhotovoltaicSystem::new(vec![module], None);

        assert_eq!(
            compute_production(&system, &solar_data),
            Err(ConfigurationError::NoMatchingOrientation {
                slope: 45.,
                azimuth: 10.
            })
        );
    }

    #[rstest]
    fn test_orientation_tolerance_matches_nearby_data_set() {
        let solar_data = vec![SolarRadiationData::new(
            Orientation::new(Slope::new(35.), Azimuth::new(0.)),
            entries(&[1000.]),
        )];
        let module = PvModule::new(Orientation::new(Slope::new(35.2), Azimuth::SOUTH), 1., 1);

        let exact = PhotovoltaicSystem::new(vec![module.clone()], None);
        assert!(compute_production(&exact, &solar_data).is_err());

        let tolerant = PhotovoltaicSystem::new(vec![module], None)
            .with_performance_ratio(1.)
            .with_orientation_tolerance(0.5);
        assert_eq!(
            compute_production(&tolerant, &solar_data).unwrap().total,
            vec![1.]
        );
    }

    #[rstest]
    fn test_orientation_tolerance_prefers_closest_data_set() {
        let module = PvModule::new(east(), 1., 1);
        let steep_east = Orientation::new(Slope::new(45.), Azimuth::EAST);
        let solar_data = vec![
            SolarRadiationData::new(steep_east, entries(&[900.])),
            SolarRadiationData::new(east(), entries(&[300.])),
        ];
        let system = PhotovoltaicSystem::new(vec![module], None)
            .with_performance_ratio(1.)
            .with_orientation_tolerance(50.);

        let production = compute_production(&system, &solar_data).unwrap();
        assert_relative_eq!(production.total[0], 0.3, max_relative = 1e-12);
    }

    #[rstest]
    fn test_no_irradiance_data_is_error() {
        let system = PhotovoltaicSystem::new(vec![], None);
        assert_eq!(
            compute_production(&system, &[]),
            Err(ConfigurationError::NoIrradianceData)
        );
    }

    #[rstest]
    fn test_mismatched_lengths_is_error() {
        let solar_data = vec![
            SolarRadiationData::new(east(), entries(&[0., 100., 200.])),
            SolarRadiationData::new(west(), entries(&[0., 100.])),
        ];
        let system = PhotovoltaicSystem::new(vec![], None);
        assert_eq!(
            compute_production(&system, &solar_data),
            Err(ConfigurationError::MismatchedSeriesLength {
                expected: 3,
                actual: 2
            })
        );
    }

    #[rstest]
    fn test_mismatched_timestamps_is_error() {
        let mut shifted = entries(&[0., 100., 200.]);
        shifted[1].time = Timestamp::from_ymd_h(2023, 6, 22, 1).unwrap();
        let solar_data = vec![
            SolarRadiationData::new(east(), entries(&[0., 100., 200.])),
            SolarRadiationData::new(west(), shifted),
        ];
        let system = PhotovoltaicSystem::new(vec![], None);
        assert_eq!(
            compute_production(&system, &solar_data),
            Err(ConfigurationError::MismatchedTimestamps { index: 1 })
        );
    }
}
