use serde::{Deserialize, Serialize};

/// Instantaneous acceleration including gravity, in device-local axes (m/s²).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelerationSample {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a sample from a reading whose axes may be missing.
    /// Missing or NaN axes read as 0.
    pub fn from_axes(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self {
            x: axis_or_zero(x),
            y: axis_or_zero(y),
            z: axis_or_zero(z),
        }
    }

    /// All three axes are zero: the sensor delivered nothing usable.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// L1 distance to another sample. Cheap proxy for jerk between readings.
    pub fn l1_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

fn axis_or_zero(axis: Option<f64>) -> f64 {
    match axis {
        Some(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}
