use cci_core::{
    compute_cci_intensity, compute_contrast_code_image, dispersion_stack, local_std, BorderMode,
    CciError, CciParams, ChannelOrder, ColorImage, IntensityImage, ScaleSet,
};
use image::{Rgb, RgbImage};
use rand::prelude::*;

fn random_rgb(w: u32, h: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(w, h, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]))
}

fn to_color(img: &RgbImage) -> ColorImage {
    ColorImage::from_u8(
        img.width() as usize,
        img.height() as usize,
        3,
        ChannelOrder::Rgb,
        img.as_raw(),
    )
    .expect("valid color image")
}

#[test]
fn output_shape_and_range_follow_input() {
    let img = to_color(&random_rgb(40, 27, 1));
    let cci = compute_contrast_code_image(&img, 30.0).unwrap();

    assert_eq!((cci.w, cci.h), (40, 27));
    assert_eq!(cci.data.len(), 40 * 27);
    assert!(cci.data.iter().all(|&c| c < 7));
}

#[test]
fn repeated_runs_are_bit_identical() {
    let img = to_color(&random_rgb(33, 31, 2));
    let a = compute_contrast_code_image(&img, 42.0).unwrap();
    let b = compute_contrast_code_image(&img, 42.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn largest_scale_share_grows_with_tolerance() {
    let img = to_color(&random_rgb(48, 48, 3));
    let mut previous = 0usize;
    for tolerance in [0.0, 25.0, 50.0, 75.0, 99.0] {
        let cci = compute_contrast_code_image(&img, tolerance).unwrap();
        let largest = cci.histogram(7)[6];
        assert!(
            largest >= previous,
            "tolerance {tolerance}: {largest} < {previous}"
        );
        previous = largest;
    }

    let at_zero = compute_contrast_code_image(&img, 0.0).unwrap().histogram(7)[6];
    let at_fifty = compute_contrast_code_image(&img, 50.0).unwrap().histogram(7)[6];
    assert!(at_fifty >= at_zero);
}

#[test]
fn constant_image_at_zero_tolerance_picks_smallest_scale() {
    let img = to_color(&RgbImage::from_pixel(20, 18, Rgb([90, 140, 200])));
    let cci = compute_contrast_code_image(&img, 0.0).unwrap();
    assert!(cci.data.iter().all(|&c| c == 0));
}

#[test]
fn all_zero_3x3_with_minimum_scale_is_valid() {
    let img = IntensityImage::from_vec(3, 3, vec![0.0; 9]).unwrap();
    let params = CciParams {
        scales: ScaleSet::new(vec![3]).unwrap(),
        border: BorderMode::Reflect,
    };
    let cci = compute_cci_intensity(&img, 0.0, &params).unwrap();
    assert_eq!(cci.data, vec![0; 9]);
}

#[test]
fn every_scale_contributes_to_selection() {
    // A single shared map for all scales would collapse the output to one code.
    let img = to_color(&random_rgb(32, 32, 4));
    let cci = compute_contrast_code_image(&img, 0.0).unwrap();
    let used = cci.histogram(7).iter().filter(|&&n| n > 0).count();
    assert!(used > 1, "only {used} distinct code(s) in output");

    let gray = img.to_intensity().unwrap();
    let stack = dispersion_stack(&gray, &ScaleSet::reference(), BorderMode::Reflect).unwrap();
    assert_ne!(stack.slice(0).data, stack.slice(6).data);
}

#[test]
fn oversized_scale_is_an_error_not_a_truncation() {
    let img = IntensityImage::from_vec(5, 5, vec![3.0; 25]).unwrap();
    assert_eq!(
        local_std(&img, 15, BorderMode::Reflect),
        Err(CciError::ScaleTooLarge { size: 15, limit: 5 })
    );

    let color = to_color(&random_rgb(5, 5, 5));
    assert!(matches!(
        compute_contrast_code_image(&color, 10.0),
        Err(CciError::ScaleTooLarge { .. })
    ));
}

#[test]
fn invalid_tolerance_is_rejected() {
    let img = to_color(&random_rgb(16, 16, 6));
    for t in [-1.0, 100.0, 250.0] {
        assert_eq!(
            compute_contrast_code_image(&img, t),
            Err(CciError::InvalidTolerance(t))
        );
    }
}

#[test]
fn hand_built_inputs_with_short_buffers_are_rejected() {
    let color = ColorImage {
        w: 20,
        h: 20,
        channels: 3,
        order: ChannelOrder::Rgb,
        data: vec![1.0; 30],
    };
    assert!(matches!(
        compute_contrast_code_image(&color, 10.0),
        Err(CciError::InvalidShape { .. })
    ));

    let gray = IntensityImage {
        w: 20,
        h: 20,
        data: vec![1.0; 30],
    };
    assert!(matches!(
        compute_cci_intensity(&gray, 10.0, &CciParams::default()),
        Err(CciError::InvalidShape { .. })
    ));
}

#[test]
fn non_finite_border_fill_is_rejected() {
    let img = to_color(&random_rgb(16, 16, 7));
    let params = CciParams {
        border: BorderMode::Constant(f64::NAN),
        ..CciParams::default()
    };
    assert!(matches!(
        cci_core::compute_contrast_code_image_with(&img, 10.0, &params),
        Err(CciError::NonFiniteFill(_))
    ));
}
