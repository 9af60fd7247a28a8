//! Camera controls and orbit navigation
//!
//! The camera position lives in the panel settings. Orbit input moves the
//! camera and writes the new position back; panel edits re-seed the orbit.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use vitrine_core::settings::CameraSettings;
use vitrine_core::{Effect, SettingPath, Settings, Value};

use crate::types::{GizmoState, MainCamera, OrbitLimits, PendingEffects, ViewerSettings};

/// Keeps the camera off the poles, where `look_at` degenerates
const POLAR_EPSILON: f32 = 1e-3;

/// Spherical camera state around a target, Y up
#[derive(Debug, Clone, Resource)]
pub struct OrbitCamera {
    pub distance: f32,
    pub target_distance: f32,
    /// Angle around +Y, measured from +Z
    pub azimuth: f32,
    /// Angle from +Y
    pub polar: f32,
    pub target: Vec3,
    pub smooth_factor: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(Vec3::new(0.0, 4.0, 17.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            distance,
            target_distance: distance,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            target,
            smooth_factor: 0.15,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        self.target
            + self.distance
                * Vec3::new(
                    sin_polar * self.azimuth.sin(),
                    cos_polar,
                    sin_polar * self.azimuth.cos(),
                )
    }

    /// Rotate by a pointer delta, keeping the polar angle inside `max_polar`
    pub fn rotate(&mut self, delta: Vec2, sensitivity: f32, max_polar: f32) {
        self.azimuth -= delta.x * sensitivity;
        let upper = (max_polar - POLAR_EPSILON).max(POLAR_EPSILON);
        self.polar = (self.polar - delta.y * sensitivity).clamp(POLAR_EPSILON, upper);
    }

    /// Scale the target distance, clamped to the orbit limits
    pub fn zoom(&mut self, factor: f32, min: f32, max: f32) {
        self.target_distance = (self.target_distance * factor).clamp(min, max.max(min));
    }
}

pub fn camera_position(camera: &CameraSettings) -> Vec3 {
    Vec3::new(camera.x, camera.y, camera.z)
}

/// Perspective projection for the camera settings; `far` is kept beyond `near`
pub fn perspective(camera: &CameraSettings) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: camera.fov.to_radians(),
        near: camera.near,
        far: camera.far.max(camera.near + 0.01),
        ..default()
    }
}

/// Write a moved camera position back into the settings
fn store_position(settings: &mut Settings, position: Vec3) {
    for (path, v) in [
        (SettingPath::CameraX, position.x),
        (SettingPath::CameraY, position.y),
        (SettingPath::CameraZ, position.z),
    ] {
        if let Err(e) = settings.set(path, Value::Number(v)) {
            tracing::warn!("Camera position not stored: {}", e);
        }
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>();
    }
}

/// Seed the orbit from the settings once the camera exists
pub fn init_orbit(settings: Res<ViewerSettings>, mut orbit: ResMut<OrbitCamera>) {
    *orbit = OrbitCamera::from_position(camera_position(&settings.camera), Vec3::ZERO);
}

/// Apply camera position and projection edits from the panel
pub fn apply_camera_effects(
    effects: Res<PendingEffects>,
    settings: Res<ViewerSettings>,
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    for effect in &effects.0 {
        match effect {
            Effect::CameraPosition => {
                let target = orbit.target;
                *orbit = OrbitCamera::from_position(camera_position(&settings.camera), target);
                transform.translation = orbit.position();
                transform.look_at(orbit.target, Vec3::Y);
            }
            Effect::CameraProjection => {
                *projection = Projection::Perspective(perspective(&settings.camera));
            }
            _ => {}
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mut settings: ResMut<ViewerSettings>,
    limits: Res<OrbitLimits>,
    gizmo: Res<GizmoState>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Neither the panel nor an active gizmo drag may move the camera
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    let enabled = !egui_wants_pointer && gizmo.orbit_enabled();

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    let mut moved = false;

    if enabled && mouse_button.pressed(MouseButton::Left) && total_motion != Vec2::ZERO {
        orbit.rotate(total_motion, limits.sensitivity, limits.max_polar_angle);
        moved = true;
    }

    // Pan in the camera plane
    if enabled && mouse_button.pressed(MouseButton::Right) && total_motion != Vec2::ZERO {
        if let Ok(transform) = camera_query.single() {
            let pan_speed = orbit.distance * 0.002;
            let right = transform.right();
            let up = transform.up();
            orbit.target += (-right * total_motion.x + up * total_motion.y) * pan_speed;
            moved = true;
        }
    }

    if enabled {
        for scroll in mouse_wheel.read() {
            let zoom_factor = 1.0 - scroll.y * limits.zoom_speed * 0.3;
            orbit.zoom(zoom_factor, limits.min_distance, limits.max_distance);
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    if enabled && touch_input.iter().count() == 1 {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                orbit.rotate(delta, limits.sensitivity, limits.max_polar_angle);
                moved = true;
            }
        }
    }

    // Pinch to zoom
    if enabled && touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            let zoom_factor = prev_dist / curr_dist.max(1.0);
            orbit.zoom(zoom_factor, limits.min_distance, limits.max_distance);
        }
    }

    // Smooth zoom
    if (orbit.target_distance - orbit.distance).abs() > 1e-4 {
        let dt = time.delta_secs();
        let lerp_factor = 1.0 - (-orbit.smooth_factor * 60.0 * dt).exp();
        orbit.distance += (orbit.target_distance - orbit.distance) * lerp_factor;
        moved = true;
    }

    if !moved {
        return;
    }

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = orbit.position();
        transform.look_at(orbit.target, Vec3::Y);
        store_position(&mut settings, transform.translation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_position_round_trip() {
        let start = Vec3::new(0.0, 4.0, 17.0);
        let orbit = OrbitCamera::from_position(start, Vec3::ZERO);
        assert!(orbit.position().distance(start) < 1e-4);
        assert!(orbit.azimuth.abs() < 1e-6);
    }

    #[test]
    fn test_polar_limit() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, -1.0e6), 0.005, PI);
        assert!(orbit.polar < PI);
        orbit.rotate(Vec2::new(0.0, 1.0e6), 0.005, PI);
        assert!(orbit.polar > 0.0);
        assert!(orbit.position().is_finite());
    }

    #[test]
    fn test_zoom_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom(100.0, 1.0, 10.0);
        assert_eq!(orbit.target_distance, 10.0);
        orbit.zoom(0.0, 1.0, 10.0);
        assert_eq!(orbit.target_distance, 1.0);
    }

    #[test]
    fn test_far_stays_beyond_near() {
        let camera = CameraSettings {
            near: 10.0,
            far: 0.1,
            ..CameraSettings::default()
        };
        let projection = perspective(&camera);
        assert!(projection.far > projection.near);
    }

    #[test]
    fn test_store_position_clamps() {
        let mut settings = Settings::default();
        store_position(&mut settings, Vec3::new(80.0, 1.0, -2.0));
        assert_eq!(settings.camera.x, 50.0);
        assert_eq!(settings.camera.z, -2.0);
    }
}
