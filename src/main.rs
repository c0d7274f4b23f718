extern crate home_energy_flow;

use anyhow::Context;
use clap::Parser;
use home_energy_flow::output::FileOutput;
use home_energy_flow::read_irradiance_file::{irradiance_data_from_json, SolarRadiationData};
use home_energy_flow::statistics::MonthlyData;
use home_energy_flow::{run_project, RunResults};
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct EnergyFlowArgs {
    #[arg(help = "Path to the project description in .json format")]
    input_file: PathBuf,
    #[arg(
        long,
        short,
        required = true,
        help = "Path to a PVGIS hourly irradiance file in .json format, one per module orientation"
    )]
    irradiance_file: Vec<PathBuf>,
    #[arg(
        long,
        short,
        help = "Directory to write results to (defaults to the directory of the input file)"
    )]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = EnergyFlowArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting tracing subscriber failed")?;

    let irradiance = args
        .irradiance_file
        .iter()
        .map(|path| load_irradiance_file(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let output_path = match args.output_dir {
        Some(dir) => dir,
        None => args
            .input_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    fs::create_dir_all(&output_path)?;
    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("results");
    let file_output = FileOutput::new(output_path, format!("{input_file_stem}_{{}}.csv"));

    let results = run_project(
        BufReader::new(File::open(&args.input_file).with_context(|| {
            format!("Could not open input file {}", args.input_file.display())
        })?),
        irradiance,
        &file_output,
    )?;

    print_summary(&results);

    Ok(())
}

fn load_irradiance_file(path: &Path) -> anyhow::Result<SolarRadiationData> {
    debug!("Loading irradiance data from {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Could not open irradiance file {}", path.display()))?;
    irradiance_data_from_json(BufReader::new(file))
        .with_context(|| format!("Could not load irradiance file {}", path.display()))
}

fn print_summary(results: &RunResults) {
    print_monthly_table(&results.monthly);

    let summary = &results.financial_summary;
    println!();
    println!("Gain from self usage: {:>10.2} EUR", summary.gain_self_usage);
    println!("Gain from selling:    {:>10.2} EUR", summary.gain_sell);
    println!("Total gain:           {:>10.2} EUR", summary.total_gain);
}

fn print_monthly_table(monthly: &[MonthlyData]) {
    let name_width = monthly
        .iter()
        .map(|series| series.name.len())
        .max()
        .unwrap_or_default();

    if let Some(year) = monthly.first().map(|series| series.year) {
        println!("Monthly totals for {year} [kWh]");
    }
    print!("{:name_width$}", "");
    for month in MONTH_NAMES {
        print!(" {month:>8}");
    }
    println!(" {:>9}", "Total");

    for series in monthly {
        print!("{:name_width$}", series.name);
        for value in series.data {
            print!(" {value:>8.1}");
        }
        println!(" {:>9.1}", series.data.iter().sum::<f64>());
    }
}
