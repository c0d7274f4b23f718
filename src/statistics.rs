//! Monthly totals of hourly series, for reporting.
use crate::time_series::{Timestamp, MONTHS_IN_YEAR};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyData {
    pub name: String,
    pub year: i32,
    /// totals for January to December
    pub data: [f64; MONTHS_IN_YEAR],
}

/// Sum values into the calendar month of their timestamp.
pub fn aggregate_monthly(times: &[Timestamp], values: &[f64]) -> [f64; MONTHS_IN_YEAR] {
    let mut data_per_month = [0.; MONTHS_IN_YEAR];
    for (time, value) in times.iter().zip(values) {
        data_per_month[time.month_index()] += value;
    }
    data_per_month
}

pub fn aggregate_monthly_data(
    times: &[Timestamp],
    named_series: &[(&str, &[f64])],
) -> Vec<MonthlyData> {
    let year = times.first().map(Timestamp::year).unwrap_or_default();
    named_series
        .iter()
        .map(|(name, values)| MonthlyData {
            name: name.to_string(),
            year,
            data: aggregate_monthly(times, values),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn times() -> Vec<Timestamp> {
        vec![
            Timestamp::from_ymd_h(2023, 1, 31, 22).unwrap(),
            Timestamp::from_ymd_h(2023, 1, 31, 23).unwrap(),
            Timestamp::from_ymd_h(2023, 2, 1, 0).unwrap(),
            Timestamp::from_ymd_h(2023, 12, 31, 23).unwrap(),
        ]
    }

    #[rstest]
    fn test_aggregate_monthly(times: Vec<Timestamp>) {
        let monthly = aggregate_monthly(&times, &[1., 2., 4., 8.]);
        assert_eq!(
            monthly,
            [3., 4., 0., 0., 0., 0., 0., 0., 0., 0., 0., 8.]
        );
    }

    #[rstest]
    fn test_aggregate_monthly_data(times: Vec<Timestamp>) {
        let production: &[f64] = &[0.5, 0.5, 1., 0.];
        let consumption: &[f64] = &[1., 1., 1., 1.];
        let monthly = aggregate_monthly_data(
            &times,
            &[
                ("Solar Production", production),
                ("Total Consumption", consumption),
            ],
        );

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].name, "Solar Production");
        assert_eq!(monthly[0].year, 2023);
        assert_eq!(monthly[0].data[0], 1.);
        assert_eq!(monthly[1].data[11], 1.);
        assert_eq!(monthly[1].data.iter().sum::<f64>(), 4.);
    }

    #[rstest]
    fn test_aggregate_without_times() {
        let no_values: &[f64] = &[];
        let monthly = aggregate_monthly_data(&[], &[("Energy Buy", no_values)]);
        assert_eq!(monthly[0].year, 0);
        assert_eq!(monthly[0].data, [0.; 12]);
    }
}
