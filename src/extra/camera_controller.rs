use super::{Key, KeyboardState};
use crate::{Camera, Vector3, PITCH_LIMIT};

/// Keyboard driven first person camera controller.
///
/// Arrow style keys rotate the camera, movement keys walk it on the ground plane, relative to
/// where it is facing. Looking up or down never changes the walking direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraController {
    /// World units moved per tick.
    pub move_speed: f32,
    /// Radians rotated per tick.
    pub rotation_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            rotation_speed: 0.05,
        }
    }
}

impl CameraController {
    /// Updates the camera with given keyboard state.
    ///
    /// This function is expected to be called once per tick.
    pub fn update(&self, camera: &mut Camera, keys: &KeyboardState) {
        let axis = |neg, pos| keys.is_pressed(pos) as i8 - keys.is_pressed(neg) as i8;

        // Opposite keys cancel out.
        camera.yaw += self.rotation_speed * axis(Key::RotateLeft, Key::RotateRight) as f32;
        camera.pitch += self.rotation_speed * axis(Key::LookDown, Key::LookUp) as f32;
        camera.pitch = camera.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let local = Vector3::new(
            axis(Key::StrafeLeft, Key::StrafeRight) as f32,
            0.0,
            axis(Key::MoveBack, Key::MoveForward) as f32,
        );

        if let Some(dir) = local.try_normalize(f32::EPSILON) {
            camera.position += camera.yaw_rotation() * dir * self.move_speed;
        }
    }
}
