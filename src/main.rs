use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use spectro_lab::LabConfig;
use spectro_lab::app::SpectroLabApp;

/// Spectro Lab - UV-Vis, GC and FTIR instrument simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML settings file (defaults to ./spectro-lab.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the default settings as TOML and exit
    #[arg(long, action)]
    write_template: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_template {
        print!("{}", LabConfig::default().to_toml()?);
        return Ok(());
    }

    let config = LabConfig::load(args.config.as_deref())?;
    log::debug!("Settings: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectro Lab – Instrument Simulator",
        options,
        Box::new(|_cc| Ok(Box::new(SpectroLabApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
