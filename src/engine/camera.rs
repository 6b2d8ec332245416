// First-person camera riding on the walk mesh.
//
// Camera model:
//   - World is Z-up; the eye sits `eye_height` above the player's WalkPoint
//   - Yaw rotates about +Z, pitch tilts about the camera's local X
//   - Looks along local −Z, so the base orientation tips −Z onto the horizon
//   - WASD produces a yaw-relative displacement on the XY plane; the walk
//     mesh takes care of following slopes

use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Mat4, Quat, Vec3};

use super::input::{InputState, MoveKey};

/// Pitch limit in radians (just short of straight up/down).
pub const MAX_PITCH: f32 = 1.5;
/// Per-frame yaw change limit in radians (applied to the frame's summed motion).
pub const MAX_YAW_STEP: f32 = 50.0;

pub struct FirstPersonCamera {
    /// Horizontal rotation in radians (0 = looking along +Y).
    pub yaw: f32,
    /// Elevation in radians, clamped to [-MAX_PITCH, MAX_PITCH].
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    /// World-space eye position. Written by the player walk system.
    pub eye: Vec3,
}

impl FirstPersonCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fovy: 60.0_f32.to_radians(),
            near: 0.01,
            far: 100.0,
            eye: Vec3::ZERO,
        }
    }

    /// Apply this frame's mouse motion. Call once per frame before movement.
    pub fn update(&mut self, input: &InputState) {
        if !input.mouse_captured || input.window_height == 0 {
            return;
        }
        // Pixels → radians: one window height spans one field of view.
        let scale = self.fovy / input.window_height as f32;
        let (dx, dy) = input.mouse_delta;
        self.yaw -= (dx * scale).clamp(-MAX_YAW_STEP, MAX_YAW_STEP);
        self.pitch = (self.pitch - dy * scale).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Full camera orientation (yaw, then pitch, then the look-down-−Z base).
    pub fn rotation(&self) -> Quat {
        (Quat::from_rotation_z(self.yaw)
            * Quat::from_rotation_x(self.pitch)
            * Quat::from_rotation_x(FRAC_PI_2))
        .normalize()
    }

    /// Yaw-only orientation; its columns are right / up / back on the ground.
    fn heading(&self) -> Mat3 {
        Mat3::from_quat(Quat::from_rotation_z(self.yaw) * Quat::from_rotation_x(FRAC_PI_2))
    }

    /// Desired displacement for this frame from the held movement keys.
    ///
    /// Diagonals are clamped so the step never exceeds `speed * dt`.
    pub fn movement_step(&self, input: &InputState, speed: f32, dt: f32) -> Vec3 {
        let basis = self.heading();
        let right = basis.x_axis;
        let back = basis.z_axis;
        let amount = speed * dt;

        let mut step = Vec3::ZERO;
        if input.is_key_held(MoveKey::Right) { step += amount * right; }
        if input.is_key_held(MoveKey::Left) { step -= amount * right; }
        if input.is_key_held(MoveKey::Backward) { step += amount * back; }
        if input.is_key_held(MoveKey::Forward) { step -= amount * back; }

        step.clamp_length_max(amount)
    }

    /// View matrix: inverse of the camera's world transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.eye).inverse()
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new()
    }
}
