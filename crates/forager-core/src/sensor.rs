use crate::body::Pose;
use crate::config::{ForagerConfig, SensorLayout};
use crate::constants::{ODOR_CHANNELS, SENSOR_FLOOR, SENSOR_LOG_OFFSET};
use crate::field::FieldSampler;

/// Log-compress a raw concentration onto the decision scale.
///
/// Values at or below the floor (and NaN) read as zero.
pub fn compress(raw: f64) -> f64 {
    if raw > SENSOR_FLOOR {
        SENSOR_LOG_OFFSET + raw.log10()
    } else {
        0.0
    }
}

/// Compressed per-channel readings on each side of the body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorReading {
    pub left: [f64; ODOR_CHANNELS],
    pub right: [f64; ODOR_CHANNELS],
}

impl SensorReading {
    /// Perceived value of a channel: mean of the two sides.
    pub fn bilateral(&self, channel: usize) -> f64 {
        (self.left[channel] + self.right[channel]) / 2.0
    }

    pub fn difference(&self, channel: usize) -> f64 {
        self.left[channel] - self.right[channel]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SamplePoint {
    offset_deg: f64,
    distance_factor: f64,
    weight: f64,
}

const ORAL_VEIL_WEIGHT: f64 = 2.0;
const BODY_WEIGHT: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct SensorArray {
    left: Vec<SamplePoint>,
    right: Vec<SamplePoint>,
}

impl SensorArray {
    pub fn new(layout: SensorLayout, distance_factor: f64, half_angle_deg: f64) -> Self {
        let left = match layout {
            SensorLayout::Bilateral => vec![SamplePoint {
                offset_deg: half_angle_deg,
                distance_factor,
                weight: 1.0,
            }],
            // Two oral-veil tips ahead and one flank point per side.
            SensorLayout::OralVeil => vec![
                SamplePoint {
                    offset_deg: half_angle_deg / 2.0,
                    distance_factor,
                    weight: ORAL_VEIL_WEIGHT,
                },
                SamplePoint {
                    offset_deg: half_angle_deg,
                    distance_factor,
                    weight: ORAL_VEIL_WEIGHT,
                },
                SamplePoint {
                    offset_deg: 90.0,
                    distance_factor: distance_factor / 2.0,
                    weight: BODY_WEIGHT,
                },
            ],
        };
        let right = left
            .iter()
            .map(|p| SamplePoint {
                offset_deg: -p.offset_deg,
                ..*p
            })
            .collect();
        Self { left, right }
    }

    pub fn from_config(config: &ForagerConfig) -> Self {
        Self::new(
            config.sensor_layout,
            config.sensor_distance_factor,
            config.sensor_half_angle_deg,
        )
    }

    /// World positions of the left and right sample points.
    pub fn sample_points(&self, pose: &Pose) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let locate = |points: &[SamplePoint]| -> Vec<[f64; 2]> {
            points
                .iter()
                .map(|p| pose.point_at(p.offset_deg, p.distance_factor * pose.size))
                .collect()
        };
        (locate(&self.left), locate(&self.right))
    }

    pub fn read<S: FieldSampler + ?Sized>(&self, pose: &Pose, sampler: &S) -> SensorReading {
        debug_assert!(sampler.channels() >= ODOR_CHANNELS);
        SensorReading {
            left: read_side(&self.left, pose, sampler),
            right: read_side(&self.right, pose, sampler),
        }
    }
}

/// Weighted mean of raw concentrations over one side, then compressed.
fn read_side<S: FieldSampler + ?Sized>(
    points: &[SamplePoint],
    pose: &Pose,
    sampler: &S,
) -> [f64; ODOR_CHANNELS] {
    let mut raw = [0.0; ODOR_CHANNELS];
    let mut total_weight = 0.0;
    for p in points {
        let [x, y] = pose.point_at(p.offset_deg, p.distance_factor * pose.size);
        let sample = sampler.sample(x, y);
        for (acc, value) in raw.iter_mut().zip(sample) {
            *acc += p.weight * value;
        }
        total_weight += p.weight;
    }
    raw.map(|v| compress(v / total_weight))
}
