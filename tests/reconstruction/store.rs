use ndarray::{ArrayD, IxDyn};
use pa_das::*;

use super::*;

const WAVELENGTH: u32 = 800;

fn store() -> anyhow::Result<MemoryFieldStore> {
    Ok(MemoryFieldStore::new()
        .with_field(
            DataField::TimeSeriesData,
            WAVELENGTH,
            point_source()?.into_inner().into_dyn(),
        )
        .with_field(
            DataField::SpeedOfSound,
            WAVELENGTH,
            ArrayD::from_shape_vec(
                IxDyn(&[2, 2, 1]),
                vec![
                    SPEED_OF_SOUND - 20.,
                    SPEED_OF_SOUND + 20.,
                    SPEED_OF_SOUND - 10.,
                    SPEED_OF_SOUND + 10.,
                ],
            )?,
        ))
}

#[test]
fn run_with_speed_of_sound_field() -> anyhow::Result<()> {
    let mut store = store()?;
    let settings = Settings {
        speed_of_sound: None,
        wavelength: Some(WAVELENGTH),
        ..settings()
    };

    let volume = engine().run(&settings, &mut store)?;

    let expect = engine().reconstruct(&point_source()?, &super::settings())?;
    assert_eq!(expect, volume);
    assert_eq!(
        volume.clone().into_inner().into_dyn(),
        store.load_field(DataField::ReconstructedData, WAVELENGTH)?
    );
    Ok(())
}

#[test]
fn reconstruct_with_store() -> anyhow::Result<()> {
    let store = store()?;
    let volume = engine().reconstruct_with_store(
        &point_source()?,
        &Settings {
            speed_of_sound: None,
            wavelength: Some(WAVELENGTH),
            ..settings()
        },
        &store,
    )?;
    let (_, ydim, zdim) = volume.dim();
    assert_eq!(48, ydim);
    assert_eq!(1, zdim);
    Ok(())
}

#[test]
fn explicit_speed_of_sound_wins() -> anyhow::Result<()> {
    let mut store = store()?;
    let settings = Settings {
        speed_of_sound: Some(1540.),
        wavelength: Some(WAVELENGTH),
        ..settings()
    };
    let volume = engine().run(&settings, &mut store)?;
    let expect = engine().reconstruct(&point_source()?, &settings)?;
    assert_eq!(expect, volume);
    Ok(())
}

#[test]
fn missing_time_series() {
    let mut store = MemoryFieldStore::new();
    assert!(matches!(
        engine().run(
            &Settings {
                wavelength: Some(WAVELENGTH),
                ..settings()
            },
            &mut store
        ),
        Err(ReconstructionError::FieldNotFound {
            field: DataField::TimeSeriesData,
            wavelength: WAVELENGTH
        })
    ));
}

#[test]
fn invalid_time_series_dimension() {
    let mut store = MemoryFieldStore::new().with_field(
        DataField::TimeSeriesData,
        WAVELENGTH,
        ArrayD::zeros(IxDyn(&[NUM_SENSORS, NUM_SAMPLES, 2])),
    );
    assert!(matches!(
        engine().run(
            &Settings {
                wavelength: Some(WAVELENGTH),
                ..settings()
            },
            &mut store
        ),
        Err(ReconstructionError::InvalidDimension(3))
    ));
}
