use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use spectro_lab::analysis::simulate;
use spectro_lab::data::model::{DataTable, InstrumentMode, SpectrumSample};
use spectro_lab::data::writer::{write_csv, write_json, write_parquet};

/// Write simulated instrument data for every mode as CSV, JSON and Parquet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = "sample_data")]
    output_dir: PathBuf,

    /// Noise seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

fn spectrum_table(mode: InstrumentMode, samples: &[SpectrumSample]) -> DataTable {
    DataTable::new(
        mode.keys().iter().map(|k| k.to_string()).collect(),
        samples.iter().map(|s| vec![s.x, s.y]).collect(),
    )
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let mut noise = simulate::NoiseSource::new(args.seed);
    let standards = (0..6)
        .map(|i| -> Result<Vec<f64>> {
            let c = 5.0 * i as f64;
            Ok(vec![c, 0.025 * c + 0.015 + noise.gauss(0.0, 0.005)?])
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let datasets = [
        (
            "uvvis",
            InstrumentMode::UvVis,
            spectrum_table(InstrumentMode::UvVis, &simulate::uvvis_spectrum(args.seed)?),
        ),
        (
            "calibration",
            InstrumentMode::Calibration,
            DataTable::new(
                InstrumentMode::Calibration.keys().iter().map(|k| k.to_string()).collect(),
                standards,
            ),
        ),
        (
            "chromatogram",
            InstrumentMode::Chromatography,
            DataTable::new(
                InstrumentMode::Chromatography.keys().iter().map(|k| k.to_string()).collect(),
                simulate::chromatogram(args.seed, 5)
                    .iter()
                    .map(|p| vec![p.retention_time, p.height, p.width])
                    .collect(),
            ),
        ),
        (
            "ftir",
            InstrumentMode::Ftir,
            spectrum_table(InstrumentMode::Ftir, &simulate::ftir_spectrum(args.seed)?),
        ),
    ];

    for (stem, mode, table) in &datasets {
        let base = args.output_dir.join(stem);
        write_csv(table, &base.with_extension("csv"))?;
        write_json(table, *mode, &base.with_extension("json"))?;
        write_parquet(table, &base.with_extension("parquet"))?;
        log::info!("{mode}: {} rows", table.len());
    }

    println!(
        "Wrote {} datasets (csv, json, parquet) to {}",
        datasets.len(),
        args.output_dir.display()
    );
    Ok(())
}
