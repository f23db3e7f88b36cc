mod reconstruction;

use ndarray::Array2;
use pa_das::*;

#[test]
fn facade_uses_defaults() -> anyhow::Result<()> {
    let mut data = Array2::from_elem((100, 64), 0.01);
    data.row_mut(50)[20] = 1.;
    let data = TimeSeriesData::new(data)?;

    let volume = reconstruct_delay_and_sum(
        &data,
        Some(Settings {
            gpu: Some(false),
            ..Default::default()
        }),
        DEFAULT_SPEED_OF_SOUND,
        DEFAULT_TIME_SPACING,
        DEFAULT_SENSOR_SPACING,
    )?;

    let (_, ydim, zdim) = volume.dim();
    assert_eq!(25, ydim);
    assert_eq!(1, zdim);
    approx::assert_abs_diff_eq!(DEFAULT_SENSOR_SPACING, volume.spacing_mm());
    Ok(())
}

#[test]
fn facade_keeps_present_settings() -> anyhow::Result<()> {
    let data = TimeSeriesData::new(Array2::from_elem((100, 64), 0.01))?;

    let volume = reconstruct_delay_and_sum(
        &data,
        Some(Settings {
            spacing_mm: Some(0.5),
            sensor_sampling_rate_mhz: Some(20.),
            gpu: Some(false),
            ..Default::default()
        }),
        DEFAULT_SPEED_OF_SOUND,
        DEFAULT_TIME_SPACING,
        DEFAULT_SENSOR_SPACING,
    )?;

    // 64 samples at 20 MHz travel 4.928 mm
    assert_eq!((100, 10, 1), volume.dim());
    assert_eq!(0.5, volume.spacing_mm());
    Ok(())
}

#[test]
fn facade_unknown_device() -> anyhow::Result<()> {
    let data = TimeSeriesData::new(Array2::zeros((1, 8)))?;
    let r = reconstruct_delay_and_sum(
        &data,
        Some(Settings {
            device: Some("msot_acuity_echo".to_owned()),
            ..Default::default()
        }),
        DEFAULT_SPEED_OF_SOUND,
        DEFAULT_TIME_SPACING,
        DEFAULT_SENSOR_SPACING,
    );
    assert!(matches!(r, Err(ReconstructionError::UnknownDevice(_))));
    Ok(())
}

#[test]
fn missing_speed_of_sound() -> anyhow::Result<()> {
    let data = TimeSeriesData::new(Array2::zeros((100, 8)))?;
    let r = DelayAndSum::default().reconstruct(
        &data,
        &Settings {
            sensor_sampling_rate_mhz: Some(40.),
            spacing_mm: Some(0.1),
            device: Some(DeviceRegistry::LINEAR_ARRAY.to_owned()),
            ..Default::default()
        },
    );
    match r {
        Err(e @ ReconstructionError::MissingParameter(_)) => {
            assert_eq!(
                "Please specify a value for speed_of_sound or wavelength",
                e.to_string()
            );
        }
        r => panic!("unexpected result: {r:?}"),
    }
    Ok(())
}

#[test]
fn error_display() {
    assert_eq!(
        "Number of sensor positions (100) does not match number of sensor elements (3)",
        ReconstructionError::ShapeMismatch {
            positions: 100,
            elements: 3
        }
        .to_string()
    );
    assert_eq!(
        "Data field speed_of_sound for wavelength 700 nm not found",
        ReconstructionError::FieldNotFound {
            field: DataField::SpeedOfSound,
            wavelength: 700
        }
        .to_string()
    );
}
