//! Shared application-level helpers for the CLI and examples.
//!
//! These functions wire up I/O (load image, JSON summary, PNG rendering)
//! around the `cci` APIs so both the CLI and examples share the same
//! behavior.

use crate::image::{cci_image_trace, cci_to_gray_image};
use anyhow::{Context, Result};
use cci_core::{BorderMode, CciParams, ScaleSet};
use image::ImageReader;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path, path::PathBuf, str::FromStr};

/// Tolerance used when neither the config nor the command line sets one.
/// Zero gives every scale the same weight.
pub const DEFAULT_TOLERANCE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    Reflect,
    Reflect101,
    Replicate,
    Constant,
}

impl FromStr for BorderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reflect" | "symmetric" => Ok(BorderKind::Reflect),
            "reflect101" | "mirror" => Ok(BorderKind::Reflect101),
            "replicate" | "clamp" | "nearest" => Ok(BorderKind::Replicate),
            "constant" => Ok(BorderKind::Constant),
            other => Err(format!(
                "invalid border '{other}', expected reflect|reflect101|replicate|constant"
            )),
        }
    }
}

impl BorderKind {
    pub fn to_mode(self, value: f64) -> BorderMode {
        match self {
            BorderKind::Reflect => BorderMode::Reflect,
            BorderKind::Reflect101 => BorderMode::Reflect101,
            BorderKind::Replicate => BorderMode::Replicate,
            BorderKind::Constant => BorderMode::Constant(value),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CciConfig {
    pub image: PathBuf,
    pub tolerance: Option<f64>,
    pub scales: Option<Vec<u32>>,
    pub border: Option<BorderKind>,
    /// Fill value for `border = "constant"`.
    pub border_value: Option<f64>,
    pub output_json: Option<PathBuf>,
    pub output_png: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl CciConfig {
    pub fn params(&self) -> Result<CciParams> {
        let scales = match &self.scales {
            Some(sizes) => ScaleSet::new(sizes.clone()).context("invalid scales")?,
            None => ScaleSet::reference(),
        };
        let border = self
            .border
            .unwrap_or(BorderKind::Reflect)
            .to_mode(self.border_value.unwrap_or(0.0));
        Ok(CciParams { scales, border })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }
}

#[derive(Debug, Serialize)]
pub struct CciDump {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub tolerance: f64,
    pub scales: Vec<u32>,
    pub border: String,
    /// Pixel count per contrast code, indexed like `scales`.
    pub histogram: Vec<usize>,
    pub gray_ms: f64,
    pub dispersion_ms: f64,
    pub select_ms: f64,
}

/// Compute the contrast code image described by `cfg` and write its outputs.
///
/// The JSON summary goes to `output_json` (default `<image>.cci.json`) and
/// the rendered codes to `output_png` (default `<image>.cci.png`).
pub fn run_cci(cfg: &CciConfig) -> Result<CciDump> {
    let params = cfg.params()?;
    let tolerance = cfg.tolerance();

    let img = ImageReader::open(&cfg.image)
        .with_context(|| format!("opening image {}", cfg.image.display()))?
        .decode()
        .with_context(|| format!("decoding image {}", cfg.image.display()))?
        .to_rgb8();
    info!(
        "loaded {} ({}x{}), tolerance {tolerance}",
        cfg.image.display(),
        img.width(),
        img.height()
    );

    let res = cci_image_trace(&img, tolerance, &params)
        .with_context(|| format!("computing contrast code image for {}", cfg.image.display()))?;
    debug!(
        "gray {:.2} ms, dispersion {:.2} ms, select {:.2} ms",
        res.gray_ms, res.dispersion_ms, res.select_ms
    );

    let num_scales = params.scales.len();
    let dump = CciDump {
        image: cfg.image.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        tolerance,
        scales: params.scales.sizes().to_vec(),
        border: format!("{:?}", params.border),
        histogram: res.cci.histogram(num_scales),
        gray_ms: res.gray_ms,
        dispersion_ms: res.dispersion_ms,
        select_ms: res.select_ms,
    };

    let json_out = cfg
        .output_json
        .clone()
        .unwrap_or_else(|| cfg.image.with_extension("cci.json"));
    write_json(&json_out, &dump)?;
    info!("saved JSON summary to {}", json_out.display());

    let png_out = cfg
        .output_png
        .clone()
        .unwrap_or_else(|| cfg.image.with_extension("cci.png"));
    cci_to_gray_image(&res.cci, num_scales)
        .save(&png_out)
        .with_context(|| format!("writing {}", png_out.display()))?;
    info!("saved code rendering to {}", png_out.display());

    Ok(dump)
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<CciConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: CciConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_names_parse() {
        assert_eq!("Reflect".parse::<BorderKind>(), Ok(BorderKind::Reflect));
        assert_eq!("clamp".parse::<BorderKind>(), Ok(BorderKind::Replicate));
        assert!("wrap".parse::<BorderKind>().is_err());
        assert_eq!(
            BorderKind::Constant.to_mode(12.0),
            BorderMode::Constant(12.0)
        );
    }

    #[test]
    fn config_defaults_to_reference_params() {
        let cfg: CciConfig = serde_json::from_str(r#"{ "image": "x.png" }"#).unwrap();
        let params = cfg.params().unwrap();
        assert_eq!(params, CciParams::default());
        assert_eq!(cfg.tolerance(), DEFAULT_TOLERANCE);
    }

    #[test]
    fn config_overrides_are_applied_and_validated() {
        let cfg: CciConfig = serde_json::from_str(
            r#"{ "image": "x.png", "tolerance": 40, "scales": [3, 7], "border": "constant", "border_value": 5 }"#,
        )
        .unwrap();
        let params = cfg.params().unwrap();
        assert_eq!(params.scales.sizes(), &[3, 7]);
        assert_eq!(params.border, BorderMode::Constant(5.0));
        assert_eq!(cfg.tolerance(), 40.0);

        let bad = CciConfig {
            scales: Some(vec![4]),
            ..CciConfig::default()
        };
        assert!(bad.params().is_err());
    }
}
