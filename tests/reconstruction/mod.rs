mod pipeline;
mod point_source;
mod store;

use nalgebra::Point3;
use ndarray::Array2;
use pa_das::*;

const DEVICE: &str = "linear8";
const NUM_SENSORS: usize = 8;
const NUM_SAMPLES: usize = 128;
const SPEED_OF_SOUND: f32 = 1500.;
const SAMPLING_RATE_MHZ: f32 = 40.;
const SPACING_MM: f32 = 0.1;

/// Point source position [mm]: lateral x and depth.
const SOURCE: (f32, f32) = (0.3, 2.0);

fn engine() -> DelayAndSum {
    DelayAndSum::new(
        DeviceRegistry::default().with_device(
            DEVICE,
            SensorArray::new(
                (0..NUM_SENSORS)
                    .map(|j| Point3::new(j as f32 * SPACING_MM, 0., 0.))
                    .collect(),
            ),
        ),
        ReconstructionOption::default(),
    )
}

fn settings() -> Settings {
    Settings {
        speed_of_sound: Some(SPEED_OF_SOUND),
        sensor_sampling_rate_mhz: Some(SAMPLING_RATE_MHZ),
        spacing_mm: Some(SPACING_MM),
        device: Some(DEVICE.to_owned()),
        gpu: Some(false),
        perform_bandpass_filtering: Some(false),
        ..Default::default()
    }
}

fn samples_per_mm() -> f32 {
    1. / (SPEED_OF_SOUND * 1e-3 / SAMPLING_RATE_MHZ)
}

/// A single unit sample per channel at the arrival time from `source`.
fn impulse(source: (f32, f32)) -> anyhow::Result<TimeSeriesData> {
    let mut data = Array2::zeros((NUM_SENSORS, NUM_SAMPLES));
    data.rows_mut().into_iter().enumerate().for_each(|(j, mut row)| {
        let dx = source.0 - j as f32 * SPACING_MM;
        let t = ((dx * dx + source.1 * source.1).sqrt() * samples_per_mm()).round() as usize;
        row[t] = 1.;
    });
    Ok(TimeSeriesData::new(data)?)
}

/// A Gaussian pulse emitted at [`SOURCE`], on top of a small baseline.
fn point_source() -> anyhow::Result<TimeSeriesData> {
    let samples_per_mm = samples_per_mm();
    let sigma = 3.;
    Ok(TimeSeriesData::new(Array2::from_shape_fn(
        (NUM_SENSORS, NUM_SAMPLES),
        |(j, t)| {
            let dx = SOURCE.0 - j as f32 * SPACING_MM;
            let delay = (dx * dx + SOURCE.1 * SOURCE.1).sqrt() * samples_per_mm;
            let dt = t as f32 - delay;
            0.01 + (-dt * dt / (2. * sigma * sigma)).exp()
        },
    ))?)
}
