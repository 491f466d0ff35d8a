use anyhow::Context;
use cci::{cci_image_trace, cci_to_gray_image, CciParams};
use image::ImageReader;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input: PathBuf = args
        .next()
        .context("usage: dump_cci <image> [--tolerance T]")?
        .into();

    let mut tolerance = 0.0f64;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tolerance" => {
                let v = args.next().context("expected a number after --tolerance")?;
                tolerance = v
                    .parse()
                    .context("could not parse tolerance (use a number in [0, 100))")?;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let img = ImageReader::open(&input)?.decode()?.to_rgb8();
    let params = CciParams::default();

    let started = Instant::now();
    let res = cci_image_trace(&img, tolerance, &params)?;
    let total_ms = started.elapsed().as_secs_f64() * 1000.0;

    println!("image {}x{} pixels", img.width(), img.height());
    println!("cci: {:7.2} ms", total_ms);
    println!(" -       gray: {:7.2} ms", res.gray_ms);
    println!(" - dispersion: {:7.2} ms", res.dispersion_ms);
    println!(" -     select: {:7.2} ms", res.select_ms);

    let hist = res.cci.histogram(params.scales.len());
    for (size, count) in params.scales.sizes().iter().zip(&hist) {
        println!("{size:>3}x{size:<3} {count:>9}");
    }

    let out = input.with_extension("cci.png");
    cci_to_gray_image(&res.cci, params.scales.len()).save(&out)?;
    println!("Saved code rendering to {}", out.display());

    Ok(())
}
