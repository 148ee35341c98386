//! Dispatcher integration tests
//!
//! Exercises the public scaling surface end to end: dimension law, uniform
//! images, the preallocated-destination path and the error scenarios.

use image::{ImageBuffer, Rgb, Rgba};
use pixelscale::{
    all_algorithms, is_scale_supported, output_size, scale, scale_into, supported_scales, Algorithm, Backend,
    Canvas, ScaleError, ScaleSupport, Scaler,
};
use sha2::{Digest, Sha256};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Factors worth trying for a support set.
fn sample_factors(support: ScaleSupport) -> Vec<f32> {
    match support {
        ScaleSupport::Fixed(scales) => scales.to_vec(),
        ScaleSupport::Arbitrary { min, max } => vec![min, 1.5, 2.0, 2.75, max.min(5.0)]
            .into_iter()
            .filter(|&s| s >= min && s <= max)
            .collect(),
    }
}

fn sprite(width: u32, height: u32) -> Canvas<Rgba<u8>> {
    ImageBuffer::from_fn(width, height, |x, y| match (x * 7 + y * 3) % 5 {
        0 => Rgba([0, 0, 0, 255]),
        1 => Rgba([255, 255, 255, 255]),
        2 => Rgba([220, 40, 40, 255]),
        3 => Rgba([40, 80, 220, 128]),
        _ => Rgba([250, 220, 30, 255]),
    })
}

fn digest(img: &Canvas<Rgba<u8>>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(img.width().to_le_bytes());
    hasher.update(img.height().to_le_bytes());
    hasher.update(img.as_raw());
    format!("{:x}", hasher.finalize())
}

#[test]
fn test_dimension_law_for_every_supported_factor() {
    let src = sprite(13, 9);
    for backend in Backend::ALL {
        let scaler = Scaler::new(backend);
        for &algorithm in all_algorithms() {
            for factor in sample_factors(supported_scales(algorithm, backend)) {
                let out = scaler
                    .scale(&src, algorithm, factor)
                    .unwrap_or_else(|e| panic!("{} {}x on {}: {}", algorithm, factor, backend, e));
                let expected = if algorithm.is_fixed_2x() {
                    (26, 18)
                } else {
                    ((13.0 * factor).floor() as u32, (9.0 * factor).floor() as u32)
                };
                assert_eq!(out.dimensions(), expected, "{} {}x on {}", algorithm, factor, backend);
                assert_eq!(out.dimensions(), output_size(algorithm, 13, 9, factor));
            }
        }
    }
}

#[test]
fn test_uniform_image_invariance() {
    let gray = Rgba([97, 97, 97, 255]);
    let src: Canvas<Rgba<u8>> = ImageBuffer::from_pixel(6, 5, gray);
    for backend in Backend::ALL {
        let scaler = Scaler::new(backend);
        for &algorithm in all_algorithms() {
            for factor in sample_factors(supported_scales(algorithm, backend)) {
                let out = scaler.scale(&src, algorithm, factor).unwrap();
                assert!(
                    out.pixels().all(|p| *p == gray),
                    "{} {}x on {} changed a uniform image",
                    algorithm,
                    factor,
                    backend
                );
            }
        }
    }
}

#[test]
fn test_capability_consistency() {
    for backend in Backend::ALL {
        for &algorithm in all_algorithms() {
            let support = supported_scales(algorithm, backend);
            for &s in support.scales() {
                assert!(is_scale_supported(algorithm, backend, s));
            }
            if !support.is_arbitrary() {
                for s in [0.5, 1.0, 2.5, 5.0, 6.0] {
                    assert_eq!(is_scale_supported(algorithm, backend, s), support.scales().contains(&s));
                }
            }
            for s in [0.0, -2.0, f32::NAN, f32::INFINITY] {
                assert!(!is_scale_supported(algorithm, backend, s));
            }
        }
    }
}

#[test]
fn test_scenario_a_checkerboard_keeps_two_colors() {
    let src: Canvas<Rgb<u8>> = ImageBuffer::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { BLACK } else { WHITE });
    for algorithm in [Algorithm::Epx, Algorithm::Eagle, Algorithm::Scale, Algorithm::ScaleSfx] {
        let out = scale(&src, algorithm, 2.0).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().any(|p| *p == BLACK), "{}", algorithm);
        assert!(out.pixels().any(|p| *p == WHITE), "{}", algorithm);
        assert!(out.pixels().all(|p| *p == BLACK || *p == WHITE), "{}", algorithm);
    }
}

#[test]
fn test_scenario_b_solid_gray_at_3x() {
    let gray = Rgb([128u8, 128, 128]);
    let src: Canvas<Rgb<u8>> = ImageBuffer::from_pixel(8, 8, gray);
    for &algorithm in all_algorithms() {
        if !is_scale_supported(algorithm, Backend::Cpu, 3.0) || supported_scales(algorithm, Backend::Cpu).is_arbitrary()
        {
            continue;
        }
        let out = scale(&src, algorithm, 3.0).unwrap();
        assert_eq!(out.dimensions(), (24, 24));
        assert!(out.pixels().all(|p| *p == gray), "{}", algorithm);
    }
}

#[test]
fn test_scenario_c_preallocated_destination_for_wrong_factor() {
    let src = sprite(8, 8);
    let mut dst: Canvas<Rgba<u8>> = ImageBuffer::new(16, 16);
    let err = Scaler::default()
        .scale_into_at(&src, &mut dst, Algorithm::Scale, 3.0)
        .unwrap_err();
    assert_eq!(
        err,
        ScaleError::DimensionMismatch {
            algorithm: Algorithm::Scale,
            input: (8, 8),
            output: (16, 16),
            expected: (24, 24),
        }
    );
    assert!(dst.pixels().all(|p| *p == Rgba([0, 0, 0, 0])), "destination was touched");
}

#[test]
fn test_scenario_d_unsupported_factor_carries_supported_set() {
    let src = sprite(4, 4);
    let err = scale(&src, Algorithm::Hq, 5.0).unwrap_err();
    match &err {
        ScaleError::UnsupportedScale { requested, supported, .. } => {
            assert_eq!(*requested, 5.0);
            assert_eq!(supported.scales(), &[2.0, 3.0, 4.0]);
            assert!(!supported.is_arbitrary());
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.to_string(), "HQ algorithm doesn't support 5x scaling. Supported scales: 2x, 3x, 4x");
}

#[test]
fn test_preallocated_destination_infers_factor() {
    let src = sprite(10, 6);
    let mut dst: Canvas<Rgba<u8>> = ImageBuffer::new(30, 18);
    scale_into(&src, &mut dst, Algorithm::Hq).unwrap();
    assert_eq!(dst, scale(&src, Algorithm::Hq, 3.0).unwrap());
}

#[test]
fn test_non_uniform_destination_is_rejected() {
    let src = sprite(10, 10);
    let mut dst: Canvas<Rgba<u8>> = ImageBuffer::new(20, 30);
    let err = scale_into(&src, &mut dst, Algorithm::Nearest).unwrap_err();
    assert!(matches!(err, ScaleError::NonUniformScale { .. }));
}

#[test]
fn test_inferred_unsupported_factor_is_rejected_before_dimensions() {
    let src = sprite(10, 10);
    let mut dst: Canvas<Rgba<u8>> = ImageBuffer::new(50, 50);
    let err = scale_into(&src, &mut dst, Algorithm::Scale).unwrap_err();
    assert!(matches!(err, ScaleError::UnsupportedScale { requested, .. } if requested == 5.0));
}

#[test]
fn test_backend_without_algorithm_rejects() {
    let src = sprite(4, 4);
    let err = Scaler::new(Backend::Raster).scale(&src, Algorithm::Xbr, 2.0).unwrap_err();
    assert_eq!(err.supported_scales(), Some(ScaleSupport::NONE));
}

#[test]
fn test_output_is_deterministic_across_runs_and_threads() {
    let src = sprite(31, 23);
    for (algorithm, factor) in [
        (Algorithm::Hq, 4.0),
        (Algorithm::Xbr, 3.0),
        (Algorithm::OmniScale, 2.5),
        (Algorithm::Super2xSai, 2.0),
    ] {
        let parallel = Scaler::default().with_band_rows(4).scale(&src, algorithm, factor).unwrap();
        let sequential = Scaler::default().with_parallel(false).scale(&src, algorithm, factor).unwrap();
        let again = Scaler::default().with_band_rows(4).scale(&src, algorithm, factor).unwrap();
        assert_eq!(digest(&parallel), digest(&sequential), "{} {}x", algorithm, factor);
        assert_eq!(digest(&parallel), digest(&again), "{} {}x", algorithm, factor);
    }
}

#[test]
fn test_concurrent_calls_are_independent() {
    let a = sprite(16, 12);
    let b: Canvas<Rgba<u8>> = ImageBuffer::from_pixel(9, 9, Rgba([1, 2, 3, 4]));
    let expected_a = scale(&a, Algorithm::Hq, 2.0).unwrap();
    let expected_b = scale(&b, Algorithm::Xbr, 4.0).unwrap();

    std::thread::scope(|s| {
        let ha = s.spawn(|| scale(&a, Algorithm::Hq, 2.0).unwrap());
        let hb = s.spawn(|| scale(&b, Algorithm::Xbr, 4.0).unwrap());
        assert_eq!(ha.join().unwrap(), expected_a);
        assert_eq!(hb.join().unwrap(), expected_b);
    });
}

#[test]
fn test_sixteen_bit_channels_scale_natively() {
    let src: Canvas<Rgb<u16>> = ImageBuffer::from_fn(4, 4, |x, _| if x < 2 { Rgb([0, 0, 0]) } else { Rgb([65535, 65535, 65535]) });
    let out = scale(&src, Algorithm::AaScale, 2.0).unwrap();
    assert_eq!(out.dimensions(), (8, 8));
    assert!(out.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(7, 7), Rgb([65535, 65535, 65535]));
}
