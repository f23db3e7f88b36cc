use pa_das::*;

use super::*;

#[rstest::rstest]
#[case(false)]
#[cfg_attr(feature = "gpu", case(true))]
#[test]
fn reconstruct_point_source(#[case] gpu: bool) -> anyhow::Result<()> {
    let volume = engine().reconstruct(
        &point_source()?,
        &Settings {
            gpu: Some(gpu),
            ..settings()
        },
    )?;

    let (xdim, ydim, zdim) = volume.dim();
    assert_eq!(48, ydim);
    assert_eq!(1, zdim);

    let expect_x = xdim - 1 - (SOURCE.0 / SPACING_MM).round() as usize;
    let expect_y = (SOURCE.1 / SPACING_MM).round() as usize;
    let (x, y, z) = volume.argmax().ok_or(anyhow::anyhow!("empty volume"))?;
    assert!(x.abs_diff(expect_x) <= 1, "x = {x}, expected {expect_x}");
    assert!(y.abs_diff(expect_y) <= 1, "y = {y}, expected {expect_y}");
    assert_eq!(0, z);

    approx::assert_abs_diff_eq!(1., volume[[x, y, z]]);
    assert!(volume.iter().all(|v| (0. ..=1.).contains(v)));
    Ok(())
}

#[rstest::rstest]
#[case((4, 20, 0), (0.3, 2.0), Some(false))]
#[case((4, 20, 0), (0.3, 2.0), None)]
#[case((3, 15, 0), (0.4, 1.5), Some(false))]
#[case((3, 15, 0), (0.4, 1.5), None)]
#[test]
fn reconstruct_impulse(
    #[case] expect: (usize, usize, usize),
    #[case] source: (f32, f32),
    #[case] bandpass: Option<bool>,
) -> anyhow::Result<()> {
    let volume = engine().reconstruct(
        &impulse(source)?,
        &Settings {
            perform_bandpass_filtering: bandpass,
            ..settings()
        },
    )?;
    assert_eq!(Some(expect), volume.argmax());
    assert_eq!(1, volume.iter().filter(|&&v| v == 1.).count());
    Ok(())
}

#[cfg(feature = "gpu")]
#[rstest::rstest]
#[case(None)]
#[case(Some(ApodizationMethod::Hann))]
#[test]
fn gpu_matches_cpu(#[case] apodization: Option<ApodizationMethod>) -> anyhow::Result<()> {
    let data = point_source()?;
    let settings = Settings {
        apodization_method: apodization,
        ..settings()
    };
    let cpu = engine().reconstruct(&data, &settings)?;
    let gpu = engine().reconstruct(
        &data,
        &Settings {
            gpu: Some(true),
            ..settings.clone()
        },
    )?;

    assert_eq!(cpu.dim(), gpu.dim());
    cpu.iter().zip(gpu.iter()).for_each(|(&c, &g)| {
        approx::assert_relative_eq!(c, g, epsilon = 1e-5, max_relative = 1e-5);
    });
    Ok(())
}

#[test]
fn reconstruct_point_source_with_bmode() -> anyhow::Result<()> {
    let volume = engine().reconstruct(
        &point_source()?,
        &Settings {
            bmode_method: Some(BModeMethod::HilbertTransform),
            bmode_after_reconstruction: Some(true),
            ..settings()
        },
    )?;

    let (xdim, _, _) = volume.dim();
    let (x, y, _) = volume.argmax().ok_or(anyhow::anyhow!("empty volume"))?;
    assert!(x.abs_diff(xdim - 4) <= 1);
    assert!(y.abs_diff(20) <= 2);
    Ok(())
}

#[test]
fn deterministic() -> anyhow::Result<()> {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let data = TimeSeriesData::new(ndarray::Array2::from_shape_simple_fn(
        (NUM_SENSORS, NUM_SAMPLES),
        || rng.random_range(-1.0..1.0),
    ))?;
    let settings = Settings {
        apodization_method: Some(ApodizationMethod::Hamming),
        perform_bandpass_filtering: None,
        ..settings()
    };

    let a = engine().reconstruct(&data, &settings)?;
    let b = engine().reconstruct(&data, &settings)?;
    assert_eq!(a, b);
    Ok(())
}
