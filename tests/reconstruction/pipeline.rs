use ndarray::Array2;
use pa_das::*;

use super::*;

#[test]
fn bandpass_enabled_by_default() -> anyhow::Result<()> {
    let data = point_source()?;

    let off = engine().reconstruct(&data, &settings())?;
    let default = engine().reconstruct(
        &data,
        &Settings {
            perform_bandpass_filtering: None,
            ..settings()
        },
    )?;
    let on = engine().reconstruct(
        &data,
        &Settings {
            perform_bandpass_filtering: Some(true),
            ..settings()
        },
    )?;

    assert_ne!(off, default);
    assert_eq!(on, default);
    Ok(())
}

// Bin 48 of 128 at 40 MHz, well above the default 8 MHz low-pass cutoff.
fn with_high_frequency_tone(data: &TimeSeriesData) -> anyhow::Result<TimeSeriesData> {
    let tone = Array2::from_shape_fn((NUM_SENSORS, NUM_SAMPLES), |(_, t)| {
        0.5 * (2. * std::f32::consts::PI * 48. * t as f32 / NUM_SAMPLES as f32).cos()
    });
    Ok(TimeSeriesData::new(Array2::clone(data) + tone)?)
}

fn max_abs_diff(a: &ReconstructedVolume, b: &ReconstructedVolume) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0., f32::max)
}

#[test]
fn bandpass_removes_high_frequency_tone() -> anyhow::Result<()> {
    let clean = point_source()?;
    let noisy = with_high_frequency_tone(&clean)?;

    let off = Settings {
        perform_bandpass_filtering: Some(false),
        ..settings()
    };
    assert!(
        max_abs_diff(
            &engine().reconstruct(&clean, &off)?,
            &engine().reconstruct(&noisy, &off)?
        ) > 0.05
    );

    let default = Settings {
        perform_bandpass_filtering: None,
        ..settings()
    };
    assert!(
        max_abs_diff(
            &engine().reconstruct(&clean, &default)?,
            &engine().reconstruct(&noisy, &default)?
        ) < 1e-3
    );
    Ok(())
}

#[test]
fn bandpass_cutoffs_applied() -> anyhow::Result<()> {
    let data = point_source()?;
    let default = engine().reconstruct(
        &data,
        &Settings {
            perform_bandpass_filtering: Some(true),
            ..settings()
        },
    )?;
    let narrow = engine().reconstruct(
        &data,
        &Settings {
            perform_bandpass_filtering: Some(true),
            bandpass_cutoff_lowpass: Some(4e6),
            bandpass_cutoff_highpass: Some(1e6),
            ..settings()
        },
    )?;
    assert_ne!(default, narrow);
    Ok(())
}

#[rstest::rstest]
#[case(None)]
#[case(Some(ApodizationMethod::Box))]
#[test]
fn uniform_apodization_is_noop(#[case] method: Option<ApodizationMethod>) -> anyhow::Result<()> {
    let data = point_source()?;
    let expect = engine().reconstruct(&data, &settings())?;
    let volume = engine().reconstruct(
        &data,
        &Settings {
            apodization_method: method,
            ..settings()
        },
    )?;
    assert_eq!(expect, volume);
    Ok(())
}

#[test]
fn hann_excludes_first_sensor() -> anyhow::Result<()> {
    let data = TimeSeriesData::new(Array2::from_shape_fn(
        (NUM_SENSORS, NUM_SAMPLES),
        |(j, t)| if j == 0 { t as f32 + 1. } else { 0. },
    ))?;

    let uniform = engine().reconstruct(&data, &settings())?;
    assert!(uniform.iter().any(|&v| v > 0.));

    let hann = engine().reconstruct(
        &data,
        &Settings {
            apodization_method: Some(ApodizationMethod::Hann),
            ..settings()
        },
    )?;
    assert!(hann.iter().all(|&v| v == 0.));
    Ok(())
}

#[test]
fn differential_mode_changes_signal() -> anyhow::Result<()> {
    let data = point_source()?;
    let pressure = engine().reconstruct(&data, &settings())?;
    let differential = engine().reconstruct(
        &data,
        &Settings {
            reconstruction_mode: Some(ReconstructionMode::Differential),
            ..settings()
        },
    )?;
    assert_eq!(pressure.dim(), differential.dim());
    assert_ne!(pressure, differential);
    Ok(())
}

#[test]
fn bmode_flags_without_method_ignored() -> anyhow::Result<()> {
    let data = point_source()?;
    let expect = engine().reconstruct(&data, &settings())?;
    let volume = engine().reconstruct(
        &data,
        &Settings {
            bmode_before_reconstruction: Some(true),
            bmode_after_reconstruction: Some(true),
            ..settings()
        },
    )?;
    assert_eq!(expect, volume);
    Ok(())
}

#[test]
fn bmode_before_reconstruction() -> anyhow::Result<()> {
    let positive = point_source()?;
    let mut data = positive.clone().into_inner();
    data.row_mut(3).mapv_inplace(|v| -v);
    let data = TimeSeriesData::new(data)?;

    let expect = engine().reconstruct(&positive, &settings())?;
    let rectified = engine().reconstruct(
        &data,
        &Settings {
            bmode_method: Some(BModeMethod::AbsoluteValue),
            bmode_before_reconstruction: Some(true),
            ..settings()
        },
    )?;
    assert_eq!(expect, rectified);

    let raw = engine().reconstruct(&data, &settings())?;
    assert_ne!(expect, raw);
    Ok(())
}

#[test]
fn zero_contribution_sentinel() -> anyhow::Result<()> {
    let mut data = Array2::zeros((NUM_SENSORS, NUM_SAMPLES));
    data.column_mut(0).fill(1.);
    let data = TimeSeriesData::new(data)?;

    let nan = DelayAndSum::new(
        engine().registry().clone(),
        ReconstructionOption {
            zero_contribution: ZeroContributionPolicy::Nan,
            ..Default::default()
        },
    )
    .reconstruct(&data, &settings())?;
    assert!(nan.iter().any(|v| v.is_nan()));
    assert!(nan.iter().any(|v| !v.is_nan()));

    let zero = engine().reconstruct(&data, &settings())?;
    assert!(zero.iter().all(|v| !v.is_nan()));
    assert!(zero.iter().any(|&v| v == 1.));
    Ok(())
}

#[test]
fn small_memory_hint() -> anyhow::Result<()> {
    let data = point_source()?;
    let expect = engine().reconstruct(&data, &settings())?;
    let volume = DelayAndSum::new(
        engine().registry().clone(),
        ReconstructionOption {
            memory_limits_hint_mb: 0,
            ..Default::default()
        },
    )
    .reconstruct(&data, &settings())?;
    assert_eq!(expect, volume);
    Ok(())
}

#[test]
fn shape_mismatch() -> anyhow::Result<()> {
    let data = TimeSeriesData::new(Array2::zeros((NUM_SENSORS + 1, NUM_SAMPLES)))?;
    assert!(matches!(
        engine().reconstruct(&data, &settings()),
        Err(ReconstructionError::ShapeMismatch {
            positions: NUM_SENSORS,
            elements: 9
        })
    ));
    Ok(())
}
