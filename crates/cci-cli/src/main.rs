//! cci CLI: contrast code image of a single picture.

use anyhow::{Context, Result};
use cci::app::{load_config, run_cci, BorderKind, CciConfig};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cci")]
#[command(about = "Per-pixel contrast code: the window size with the lowest decay-weighted local standard deviation")]
#[command(version)]
struct Cli {
    /// Input image. Required unless given by --config.
    image: Option<PathBuf>,

    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Priority of larger windows, in [0, 100). 0 weights all sizes equally.
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Comma-separated odd window sizes, smallest first (default 3,5,7,9,11,13,15).
    #[arg(long, value_delimiter = ',')]
    scales: Option<Vec<u32>>,

    /// Border handling: reflect, reflect101, replicate or constant.
    #[arg(long)]
    border: Option<BorderKind>,

    /// Fill value for --border constant.
    #[arg(long)]
    border_value: Option<f64>,

    /// Where to write the JSON summary (default <image>.cci.json).
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Where to write the rendered codes (default <image>.cci.png).
    #[arg(long)]
    out_png: Option<PathBuf>,

    /// off, error, warn, info, debug or trace.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<CciConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => CciConfig::default(),
        };

        if let Some(image) = self.image {
            cfg.image = image;
        }
        if cfg.image.as_os_str().is_empty() {
            anyhow::bail!("no input image: pass a path or set \"image\" in --config");
        }
        if self.tolerance.is_some() {
            cfg.tolerance = self.tolerance;
        }
        if self.scales.is_some() {
            cfg.scales = self.scales;
        }
        if self.border.is_some() {
            cfg.border = self.border;
        }
        if self.border_value.is_some() {
            cfg.border_value = self.border_value;
        }
        if self.out_json.is_some() {
            cfg.output_json = self.out_json;
        }
        if self.out_png.is_some() {
            cfg.output_png = self.out_png;
        }
        if self.log_level.is_some() {
            cfg.log_level = self.log_level;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cfg = Cli::parse().into_config()?;

    let level = cci::logger::parse_level(cfg.log_level.as_deref()).map_err(anyhow::Error::msg)?;
    cci::logger::init_with_level(level).context("installing logger")?;

    let dump = run_cci(&cfg)?;
    for (size, count) in dump.scales.iter().zip(&dump.histogram) {
        let share = 100.0 * *count as f64 / f64::from(dump.width * dump.height);
        info!("{size:>3}x{size:<3} {count:>9} px ({share:5.1}%)");
    }
    println!(
        "{}: {}x{} px, tolerance {}, {:.2} ms",
        dump.image,
        dump.width,
        dump.height,
        dump.tolerance,
        dump.gray_ms + dump.dispersion_ms + dump.select_ms
    );

    Ok(())
}
