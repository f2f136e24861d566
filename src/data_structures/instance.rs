//! Transform data for parts and hierarchy nodes.
//!
//! An [`Instance`] is a position, a rotation and a non-uniform scale. It is
//! used both as the world transform of a part and as the local transform of a
//! node inside a part's transform hierarchy.

use std::ops::Mul;

use cgmath::{InnerSpace, One, Rotation, Vector3};

use crate::resources::config::Axis;

/// Position, rotation (as quaternion) and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_position_rotation(
        position: cgmath::Vector3<f32>,
        rotation: cgmath::Quaternion<f32>,
    ) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Local point to world space (scale, rotate, translate).
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.position + self.transform_vector(point)
    }

    /// World point to local space. Zero scale components map to zero.
    pub fn inverse_transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        let unrotated = self.rotation.invert().rotate_vector(point - self.position);
        Vector3::new(
            safe_div(unrotated.x, self.scale.x),
            safe_div(unrotated.y, self.scale.y),
            safe_div(unrotated.z, self.scale.z),
        )
    }

    /// Local vector to world space; affected by rotation and scale but not position.
    pub fn transform_vector(&self, vector: Vector3<f32>) -> Vector3<f32> {
        let scaled = Vector3::new(
            self.scale.x * vector.x,
            self.scale.y * vector.y,
            self.scale.z * vector.z,
        );
        self.rotation.rotate_vector(scaled)
    }

    /// Local direction to world space; only affected by rotation.
    pub fn transform_direction(&self, direction: Vector3<f32>) -> Vector3<f32> {
        self.rotation.rotate_vector(direction)
    }

    /// World-space unit vector pointing along `axis` of this transform.
    pub fn axis(&self, axis: Axis) -> Vector3<f32> {
        self.transform_direction(axis.local_vector()).normalize()
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }
}

fn safe_div(value: f32, scale: f32) -> f32 {
    if scale == 0.0 { 0.0 } else { value / scale }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = cgmath::Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let new_position = self.transform_point(rhs.position);

        Instance {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Quaternion, Rotation3};

    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn inverse_undoes_transform_point() {
        let instance = Instance {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Quaternion::from_angle_y(Deg(90.0)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let p = Vector3::new(0.5, -1.0, 4.0);
        assert!(close(instance.inverse_transform_point(instance.transform_point(p)), p));
    }

    #[test]
    fn composition_matches_nested_transform() {
        let parent = Instance::from_position_rotation(
            Vector3::new(0.0, 1.0, 0.0),
            Quaternion::from_angle_z(Deg(90.0)),
        );
        let child = Instance::from(Vector3::new(1.0, 0.0, 0.0));
        let world = &parent * &child;
        assert!(close(world.position, Vector3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn axis_follows_rotation() {
        let instance = Instance::from_position_rotation(
            Vector3::new(5.0, 5.0, 5.0),
            Quaternion::from_angle_y(Deg(90.0)),
        );
        assert!(close(instance.axis(Axis::ZPlus), Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(instance.axis(Axis::XNeg), Vector3::new(0.0, 0.0, 1.0)));
    }
}
