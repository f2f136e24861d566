//! Persisted attach point data.
//!
//! Stored as `x, y, z, ox, oy, oz[, size]` and copied into a live
//! [`AttachPoint`] whenever a part's geometry is (re)built.

use std::str::FromStr;

use cgmath::Vector3;

use crate::{
    data_structures::part::AttachPoint, error::ConfigError, resources::safe_parse_f32,
    resources::safe_parse_i32,
};

/// Size class used when the stored data has no seventh field.
pub const DEFAULT_NODE_SIZE: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachPointSnapshot {
    position: Vector3<f32>,
    orientation: Vector3<f32>,
    size: i32,
}

impl AttachPointSnapshot {
    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        let fields: Vec<&str> = data.split(',').map(str::trim).collect();
        if fields.len() < 6 {
            return Err(ConfigError::TooFewFields {
                value: data.to_string(),
                expected: 6,
                found: fields.len(),
            });
        }
        let values: Vec<f32> = fields[..6].iter().copied().map(safe_parse_f32).collect();
        let size = fields
            .get(6)
            .copied()
            .map(safe_parse_i32)
            .unwrap_or(DEFAULT_NODE_SIZE);
        Ok(Self {
            position: Vector3::new(values[0], values[1], values[2]),
            orientation: Vector3::new(values[3], values[4], values[5]),
            size,
        })
    }

    /// Builds a snapshot from numeric literals; `size` is rounded to the nearest integer.
    pub fn from_values(x: f32, y: f32, z: f32, rx: f32, ry: f32, rz: f32, size: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: Vector3::new(rx, ry, rz),
            size: size.round() as i32,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn orientation(&self) -> Vector3<f32> {
        self.orientation
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Copies the stored state into both the current and original fields of `point`.
    pub fn seed(&self, point: &mut AttachPoint) {
        point.position = self.position;
        point.original_position = self.position;
        point.orientation = self.orientation;
        point.original_orientation = self.orientation;
        point.size = self.size;
    }
}

impl FromStr for AttachPointSnapshot {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
