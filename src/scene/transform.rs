use glam::{Affine3A, EulerRot, Quat, Vec3};

/// Local TRS transform of a scene node.
///
/// Rotation is stored as a quaternion; the editor serializes either Euler
/// angles (`rotation`, yaw-pitch-roll order) or a quaternion
/// (`rotationQuaternion`), and both are folded into [`Transform::rotation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Sets the rotation from editor Euler angles (radians, X/Y/Z components).
    ///
    /// The editor applies yaw (Y), then pitch (X), then roll (Z).
    pub fn set_rotation_euler(&mut self, euler: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::YXZ, euler.y, euler.x, euler.z);
    }

    /// Returns the rotation as editor Euler angles (X/Y/Z components).
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (y, x, z) = self.rotation.to_euler(EulerRot::YXZ);
        Vec3::new(x, y, z)
    }

    /// Local matrix built from scale, rotation and translation.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_round_trips_through_quaternion() {
        let mut transform = Transform::new();
        let euler = Vec3::new(0.3, -1.1, 0.25);
        transform.set_rotation_euler(euler);
        assert!(transform.rotation_euler().abs_diff_eq(euler, 1e-5));
    }
}
