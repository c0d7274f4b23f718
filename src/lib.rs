mod compare_floats;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod read_irradiance_file;
pub mod statistics;
pub mod time_series;


#[macro_use]
extern crate is_close;

use crate::compare_floats::total;
use crate::core::consumption::heat_pump::generate_heat_pump_consumption_profile;
use crate::core::consumption::household::generate_typical_consumption_profile;
use crate::core::energy_supply::elec_battery::{compute_production_consumption, EnergyFlowData};
use crate::core::energy_supply::pv::compute_production;
use crate::core::energy_supply::tariff::FinancialSummary;
use crate::errors::{EnergyFlowError, OutputError};
use crate::input::ingest_input;
use crate::output::Output;
use crate::read_irradiance_file::SolarRadiationData;
use crate::statistics::{aggregate_monthly_data, MonthlyData};
use crate::time_series::{Timestamp, MONTHS_IN_YEAR};
use csv::WriterBuilder;
use std::io::Read;
use tracing::{debug, info};

pub const HOURLY_OUTPUT_KEY: &str = "hourly";
pub const MONTHLY_OUTPUT_KEY: &str = "monthly";

/// Everything calculated for one simulated year.
#[derive(Clone, Debug)]
pub struct RunResults {
    pub times: Vec<Timestamp>,
    /// household consumption excluding the heat pump, in kWh per hour
    pub regular_consumption: Vec<f64>,
    /// heat pump consumption in kWh per hour (zeros when there is no heat pump)
    pub heat_pump_consumption: Vec<f64>,
    pub energy_flow: EnergyFlowData,
    pub monthly: Vec<MonthlyData>,
    pub financial_summary: FinancialSummary,
}

/// Run a full simulation: work out PV production and household consumption for every hour of
/// the irradiance data, route them through the battery, and summarise the result per month and
/// in money.
///
/// Each irradiance data set holds the hourly data for one module orientation; every module of
/// the PV system needs a data set with its orientation.
pub fn run_project(
    input: impl Read,
    mut irradiance: Vec<SolarRadiationData>,
    output: impl Output,
) -> Result<RunResults, EnergyFlowError> {
    let input = ingest_input(input)?;

    if let Some(year) = input.year {
        for data in irradiance.iter_mut() {
            data.restrict_to_year(year);
        }
        debug!("Restricted irradiance data to the year {year}");
    }

    let production = compute_production(&input.pv_system, &irradiance)?;
    info!(
        "Total PV production: {:.2} kWh over {} hours",
        total(&production.total),
        production.times.len()
    );

    // every data set covers the same hours, so the first one stands in for the weather
    let entries = irradiance
        .first()
        .map(SolarRadiationData::hourly)
        .unwrap_or_default();

    let regular_consumption =
        generate_typical_consumption_profile(entries, input.regular_consumption_kwh)?;
    let heat_pump_consumption = match &input.heat_pump {
        Some(heat_pump) => generate_heat_pump_consumption_profile(entries, heat_pump),
        None => vec![0.; entries.len()],
    };
    let consumption = regular_consumption
        .iter()
        .zip(&heat_pump_consumption)
        .map(|(regular, heat_pump)| regular + heat_pump)
        .collect::<Vec<_>>();
    info!(
        "Total consumption: {:.2} kWh (regular {:.2} kWh, heat pump {:.2} kWh)",
        total(&consumption),
        total(&regular_consumption),
        total(&heat_pump_consumption)
    );

    let energy_flow =
        compute_production_consumption(&production.total, &consumption, &input.storage)?;
    info!(
        "Energy bought: {:.2} kWh, sold: {:.2} kWh, used on site: {:.2} kWh",
        total(&energy_flow.energy_buy),
        total(&energy_flow.energy_sell),
        total(&energy_flow.self_usage)
    );

    let monthly = aggregate_monthly_data(
        &production.times,
        &[
            ("Solar Production", energy_flow.production.as_slice()),
            ("Regular Consumption", regular_consumption.as_slice()),
            ("Heatpump Consumption", heat_pump_consumption.as_slice()),
            ("Total Consumption", energy_flow.consumption.as_slice()),
            ("Energy Buy", energy_flow.energy_buy.as_slice()),
            ("Energy Sell", energy_flow.energy_sell.as_slice()),
            ("Self Usage", energy_flow.self_usage.as_slice()),
        ],
    );

    let financial_summary = FinancialSummary::from_energy_flow(&energy_flow, &input.prices);
    info!(
        "Gain from self usage: {:.2} EUR, from selling: {:.2} EUR",
        financial_summary.gain_self_usage, financial_summary.gain_sell
    );

    let results = RunResults {
        times: production.times,
        regular_consumption,
        heat_pump_consumption,
        energy_flow,
        monthly,
        financial_summary,
    };

    if !output.is_noop() {
        write_hourly_output_file(&output, &results)
            .and_then(|_| write_monthly_output_file(&output, &results.monthly))
            .map_err(|e| EnergyFlowError::ErrorInOutput(OutputError::new(e)))?;
    }

    Ok(results)
}

fn write_hourly_output_file(output: &impl Output, results: &RunResults) -> anyhow::Result<()> {
    debug!("writing out to {HOURLY_OUTPUT_KEY}");
    let writer = output.writer_for_location_key(HOURLY_OUTPUT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "Time",
        "Solar Production",
        "Regular Consumption",
        "Heatpump Consumption",
        "Total Consumption",
        "Energy Buy",
        "Energy Sell",
        "Self Usage",
        "Energy To Storage",
        "Energy From Storage",
        "Storage Level",
    ])?;
    let mut units_row = vec![""];
    units_row.extend(["[kWh]"; 10]);
    writer.write_record(&units_row)?;

    let flow = &results.energy_flow;
    for (index, time) in results.times.iter().enumerate() {
        let mut row = vec![time.to_string()];
        row.extend(
            [
                flow.production[index],
                results.regular_consumption[index],
                results.heat_pump_consumption[index],
                flow.consumption[index],
                flow.energy_buy[index],
                flow.energy_sell[index],
                flow.self_usage[index],
                flow.energy_to_storage[index],
                flow.energy_from_storage[index],
                flow.storage_level[index],
            ]
            .iter()
            .map(f64::to_string),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;

    Ok(())
}

fn write_monthly_output_file(output: &impl Output, monthly: &[MonthlyData]) -> anyhow::Result<()> {
    debug!("writing out to {MONTHLY_OUTPUT_KEY}");
    let writer = output.writer_for_location_key(MONTHLY_OUTPUT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings = vec!["Year", "Month"];
    headings.extend(monthly.iter().map(|series| series.name.as_str()));
    writer.write_record(&headings)?;

    let year = monthly.first().map(|series| series.year).unwrap_or_default();
    for month_index in 0..MONTHS_IN_YEAR {
        let mut row = vec![year.to_string(), (month_index + 1).to_string()];
        row.extend(
            monthly
                .iter()
                .map(|series| series.data[month_index].to_string()),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;

    Ok(())
}
