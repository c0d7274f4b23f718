use crate::errors::ConfigurationError;
use crate::time_series::{TimeSeriesEntry, HOURS_IN_DAY, HOURS_IN_NON_LEAP_YEAR};

/// Relative household electricity use for each hour of the day: low overnight, a morning peak
/// and a higher evening peak.
// TODO replace with the BDEW H0 standard load profile, which also varies by season and weekday
const TYPICAL_DAILY_PROFILE: [f64; HOURS_IN_DAY as usize] = [
    0.08, 0.07, 0.06, 0.05, 0.04, 0.04, 0.05, 0.07, 0.10, 0.12, 0.13, 0.10, // 00:00 - 11:00
    0.09, 0.08, 0.06, 0.06, 0.07, 0.09, 0.13, 0.16, 0.15, 0.12, 0.10, 0.09, // 12:00 - 23:00
];

/// Generate a typical household electricity consumption profile (in kWh per hour) for the
/// given entries, scaled so the whole profile adds up to `total_consumption_kwh`.
///
/// The entries must cover exactly one non-leap year of hours.
pub fn generate_typical_consumption_profile(
    entries: &[TimeSeriesEntry],
    total_consumption_kwh: f64,
) -> Result<Vec<f64>, ConfigurationError> {
    if entries.len() != HOURS_IN_NON_LEAP_YEAR {
        return Err(ConfigurationError::UnexpectedEntryCount {
            expected: HOURS_IN_NON_LEAP_YEAR,
            actual: entries.len(),
        });
    }

    // scale the daily shape so that each day adds up to 1
    let profile_sum = TYPICAL_DAILY_PROFILE.iter().sum::<f64>();
    let relative_profile = entries
        .iter()
        .map(|entry| TYPICAL_DAILY_PROFILE[entry.time.hour() as usize] / profile_sum)
        .collect::<Vec<_>>();

    let scaling_factor = total_consumption_kwh / relative_profile.iter().sum::<f64>();

    Ok(relative_profile
        .into_iter()
        .map(|value| value * scaling_factor)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_series::Timestamp;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn entries_for_hours(hours: usize) -> Vec<TimeSeriesEntry> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 10, 0)
            .unwrap();
        (0..hours)
            .map(|hour| TimeSeriesEntry {
                time: (start + Duration::hours(hour as i64))
                    .format("%Y%m%d:%H%M")
                    .to_string()
                    .parse::<Timestamp>()
                    .unwrap(),
                global_irradiance: 0.,
                sun_height: 0.,
                air_temperature: 10.,
                wind_speed: 0.,
                intensity: 0.,
            })
            .collect()
    }

    #[fixture]
    fn year_of_entries() -> Vec<TimeSeriesEntry> {
        entries_for_hours(HOURS_IN_NON_LEAP_YEAR)
    }

    #[rstest]
    #[case(1000.)]
    #[case(3456.7)]
    #[case(0.)]
    fn test_profile_sums_to_annual_total(
        year_of_entries: Vec<TimeSeriesEntry>,
        #[case] total_consumption: f64,
    ) {
        let profile =
            generate_typical_consumption_profile(&year_of_entries, total_consumption).unwrap();
        assert_eq!(profile.len(), HOURS_IN_NON_LEAP_YEAR);
        assert_relative_eq!(
            profile.iter().sum::<f64>(),
            total_consumption,
            epsilon = 1e-9,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn test_profile_repeats_daily_shape(year_of_entries: Vec<TimeSeriesEntry>) {
        let profile = generate_typical_consumption_profile(&year_of_entries, 365.).unwrap();

        // 1 kWh per day, so each hour is its share of the daily shape
        let profile_sum = TYPICAL_DAILY_PROFILE.iter().sum::<f64>();
        for (hour, value) in profile.iter().take(48).enumerate() {
            assert_relative_eq!(
                *value,
                TYPICAL_DAILY_PROFILE[hour % 24] / profile_sum,
                max_relative = 1e-9
            );
        }
        // evening peak is higher than the night
        assert!(profile[19] > profile[4]);
    }

    #[rstest]
    #[case(8784)]
    #[case(24)]
    #[case(0)]
    fn test_wrong_number_of_entries_is_error(#[case] hours: usize) {
        assert_eq!(
            generate_typical_consumption_profile(&entries_for_hours(hours), 1000.),
            Err(ConfigurationError::UnexpectedEntryCount {
                expected: 8760,
                actual: hours
            })
        );
    }
}
