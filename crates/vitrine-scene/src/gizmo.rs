//! Transform gizmo: drawing and pointer drags on the primary object
//!
//! Binding and drag state live in [`GizmoState`]; while a drag is active the
//! orbit camera ignores pointer input.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::math::Isometry3d;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;
use vitrine_core::GizmoMode;

use crate::types::{EulerRotation, GizmoState, MainCamera};

/// Pointer distance, in pixels, from the target's screen position that grabs it
const GRAB_RADIUS_PX: f32 = 80.0;

/// Length of the drawn handles in world units
const HANDLE_LENGTH: f32 = 2.5;

const ROTATE_SPEED: f32 = 0.01;
const SCALE_SPEED: f32 = 0.005;
const MIN_SCALE: f32 = 0.01;

/// Gizmo group drawn on top of the scene
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct TransformGizmoGroup;

/// Pointer position at the previous drag step
#[derive(Resource, Default)]
pub struct GizmoDrag {
    last_cursor: Option<Vec2>,
}

pub struct GizmoPlugin;

impl Plugin for GizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<TransformGizmoGroup>()
            .init_resource::<GizmoDrag>()
            .add_systems(Startup, configure_gizmos);
    }
}

fn configure_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<TransformGizmoGroup>();
    config.depth_bias = -1.0;
    config.line.width = 3.0;
}

fn cursor(windows: &Query<&Window>) -> Option<Vec2> {
    windows.single().ok().and_then(Window::cursor_position)
}

/// New position for a camera-plane translation from `from` to `to` (viewport
/// coordinates), keeping the target's depth
fn plane_drag(camera: &Camera, camera_transform: &GlobalTransform, origin: Vec3, from: Vec2, to: Vec2) -> Option<Vec3> {
    let plane = InfinitePlane3d::new(camera_transform.forward());
    let hit = |point: Vec2| {
        let ray = camera.viewport_to_world(camera_transform, point).ok()?;
        ray.intersect_plane(origin, plane).map(|t| ray.get_point(t))
    };
    Some(origin + (hit(to)? - hit(from)?))
}

/// Euler angles after a rotate drag by `delta` pixels
pub fn rotate_by(rotation: Vec3, delta: Vec2) -> Vec3 {
    Vec3::new(
        rotation.x + delta.y * ROTATE_SPEED,
        rotation.y + delta.x * ROTATE_SPEED,
        rotation.z,
    )
}

/// Uniform scale after a scale drag by `delta` pixels; right and up grow
pub fn scale_by(scale: Vec3, delta: Vec2) -> Vec3 {
    let factor = (1.0 + (delta.x - delta.y) * SCALE_SPEED).max(0.0);
    (scale * factor).max(Vec3::splat(MIN_SCALE))
}

#[allow(clippy::too_many_arguments)]
pub fn begin_drag(
    mut state: ResMut<GizmoState>,
    mut drag: ResMut<GizmoDrag>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    targets: Query<&GlobalTransform>,
    mut contexts: bevy_egui::EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || state.is_dragging() {
        return;
    }
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    if egui_wants_pointer {
        return;
    }

    let Some(target) = state.target() else {
        return;
    };
    let Ok(target_transform) = targets.get(target) else {
        // Target vanished without a replacement going through the scene state
        state.detach();
        return;
    };
    let (Some(pointer), Ok((camera, camera_transform))) = (cursor(&windows), camera_query.single()) else {
        return;
    };
    let Ok(screen) = camera.world_to_viewport(camera_transform, target_transform.translation()) else {
        return;
    };

    if screen.distance(pointer) <= GRAB_RADIUS_PX && state.begin_drag() {
        drag.last_cursor = Some(pointer);
        tracing::debug!(?target, mode = ?state.mode(), "Gizmo drag started");
    }
}

pub fn drag_gizmo(
    state: Res<GizmoState>,
    mut drag: ResMut<GizmoDrag>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut targets: Query<(&mut Transform, &mut EulerRotation)>,
) {
    if !state.is_dragging() {
        return;
    }
    let (Some(target), Some(mode)) = (state.target(), state.mode()) else {
        return;
    };
    let (Some(pointer), Some(last)) = (cursor(&windows), drag.last_cursor) else {
        return;
    };
    let delta = pointer - last;
    if delta == Vec2::ZERO {
        return;
    }
    let Ok((mut transform, mut rotation)) = targets.get_mut(target) else {
        return;
    };

    match mode {
        GizmoMode::Translate => {
            if let Ok((camera, camera_transform)) = camera_query.single() {
                if let Some(position) = plane_drag(camera, camera_transform, transform.translation, last, pointer) {
                    transform.translation = position;
                }
            }
        }
        GizmoMode::Rotate => rotation.0 = rotate_by(rotation.0, delta),
        GizmoMode::Scale => transform.scale = scale_by(transform.scale, delta),
    }
    drag.last_cursor = Some(pointer);
}

pub fn end_drag(mut state: ResMut<GizmoState>, mut drag: ResMut<GizmoDrag>, mouse_button: Res<ButtonInput<MouseButton>>) {
    if state.is_dragging() && !mouse_button.pressed(MouseButton::Left) {
        state.end_drag();
        drag.last_cursor = None;
        tracing::debug!("Gizmo drag ended");
    }
}

pub fn draw_gizmo(
    state: Res<GizmoState>,
    targets: Query<&GlobalTransform>,
    mut gizmos: Gizmos<TransformGizmoGroup>,
) {
    let (Some(target), Some(mode)) = (state.target(), state.mode()) else {
        return;
    };
    let Ok(transform) = targets.get(target) else {
        return;
    };
    let origin = transform.translation();

    let dim = if state.is_dragging() { 1.0 } else { 0.8 };
    let axes = [
        (Vec3::X, Color::srgb(dim, 0.2, 0.2), Quat::from_rotation_y(FRAC_PI_2)),
        (Vec3::Y, Color::srgb(0.2, dim, 0.2), Quat::from_rotation_x(FRAC_PI_2)),
        (Vec3::Z, Color::srgb(0.2, 0.2, dim), Quat::IDENTITY),
    ];

    for (axis, color, circle_rotation) in axes {
        match mode {
            GizmoMode::Translate => {
                gizmos.arrow(origin, origin + axis * HANDLE_LENGTH, color);
            }
            GizmoMode::Rotate => {
                gizmos.circle(Isometry3d::new(origin, circle_rotation), HANDLE_LENGTH * 0.8, color);
            }
            GizmoMode::Scale => {
                let end = origin + axis * HANDLE_LENGTH;
                gizmos.line(origin, end, color);
                gizmos.cuboid(Transform::from_translation(end).with_scale(Vec3::splat(0.2)), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_by() {
        let rotated = rotate_by(Vec3::new(0.1, 0.2, 0.3), Vec2::new(10.0, -5.0));
        assert!((rotated.x - 0.05).abs() < 1e-6);
        assert!((rotated.y - 0.3).abs() < 1e-6);
        assert_eq!(rotated.z, 0.3);
    }

    #[test]
    fn test_scale_by_stays_positive() {
        let grown = scale_by(Vec3::ONE, Vec2::new(20.0, 0.0));
        assert!((grown.x - 1.1).abs() < 1e-5);
        assert_eq!(grown.x, grown.z);

        let shrunk = scale_by(Vec3::ONE, Vec2::new(-10_000.0, 0.0));
        assert_eq!(shrunk, Vec3::splat(MIN_SCALE));
    }

    #[test]
    fn test_end_drag_releases_orbit() {
        let mut app = App::new();
        app.init_resource::<GizmoDrag>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_systems(Update, end_drag);

        let target = app.world_mut().spawn_empty().id();
        let mut state = GizmoState::default();
        state.set_mode(vitrine_core::settings::AffineMode::Translate, Some(target));
        assert!(state.begin_drag());
        app.insert_resource(state);

        app.update();
        let state = app.world().resource::<GizmoState>();
        assert!(!state.is_dragging());
        assert!(state.orbit_enabled());
    }
}
