//! Per-frame render loop: clock, auto-rotation, object animation and light orbit

use bevy::prelude::*;
use vitrine_core::animation::{animate, auto_rotate_step};

use crate::types::{AnimationState, EulerRotation, PrimaryObject, SceneLight, ViewerSettings, FLOOR_Y};

pub fn advance_clock(time: Res<Time>, mut state: ResMut<AnimationState>) {
    state.clock.advance(time.delta_secs_f64());
}

pub fn auto_rotate_object(settings: Res<ViewerSettings>, mut objects: Query<&mut EulerRotation, With<PrimaryObject>>) {
    if !settings.display.auto_rotate {
        return;
    }
    for mut rotation in objects.iter_mut() {
        let mut angles = rotation.to_array();
        auto_rotate_step(&mut angles);
        rotation.0 = Vec3::from_array(angles);
    }
}

pub fn animate_object(
    settings: Res<ViewerSettings>,
    state: Res<AnimationState>,
    mut objects: Query<(&mut Transform, &mut EulerRotation), With<PrimaryObject>>,
) {
    let update = animate(
        settings.animation.kind,
        state.clock.elapsed(),
        settings.animation.value,
        FLOOR_Y,
    );
    if update.is_empty() {
        return;
    }

    for (mut transform, mut rotation) in objects.iter_mut() {
        let mut position = transform.translation.to_array();
        let mut angles = rotation.to_array();
        update.apply(&mut position, &mut angles);
        transform.translation = Vec3::from_array(position);
        rotation.0 = Vec3::from_array(angles);
    }
}

/// Circle the light around the origin in the XZ plane, keeping its height
pub fn orbit_light(
    settings: Res<ViewerSettings>,
    mut state: ResMut<AnimationState>,
    mut lights: Query<&mut Transform, With<SceneLight>>,
) {
    if !settings.light.auto_rotate {
        return;
    }
    let (x, z) = state.light_orbit.step();
    for mut transform in lights.iter_mut() {
        transform.translation.x = x;
        transform.translation.z = z;
    }
}

pub fn sync_object_rotation(mut objects: Query<(&mut Transform, &EulerRotation), Changed<EulerRotation>>) {
    for (mut transform, rotation) in objects.iter_mut() {
        transform.rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::settings::{AnimationKind, SettingPath, Value};

    fn app_with_object(settings: ViewerSettings) -> (App, Entity) {
        let mut app = App::new();
        app.insert_resource(settings)
            .init_resource::<AnimationState>()
            .add_systems(Update, (auto_rotate_object, animate_object, sync_object_rotation).chain());
        let entity = app
            .world_mut()
            .spawn((PrimaryObject, EulerRotation::default(), Transform::from_xyz(1.0, 2.0, 3.0)))
            .id();
        (app, entity)
    }

    #[test]
    fn test_auto_rotate_accumulates() {
        let mut settings = ViewerSettings::default();
        settings.set(SettingPath::DisplayAutoRotate, Value::Bool(true)).unwrap();
        let (mut app, entity) = app_with_object(settings);

        for _ in 0..3 {
            app.update();
        }
        let rotation = app.world().get::<EulerRotation>(entity).unwrap();
        assert!((rotation.x - 0.06).abs() < 1e-5);
        assert!((rotation.y - 0.06).abs() < 1e-5);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_no_animation_keeps_pose() {
        let (mut app, entity) = app_with_object(ViewerSettings::default());
        app.update();
        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_circle_moves_in_xz() {
        let mut settings = ViewerSettings::default();
        settings.animation.kind = AnimationKind::Circle;
        let (mut app, entity) = app_with_object(settings);
        app.update();

        // Clock is still at zero: x = value, z = 0
        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::new(2.0, 2.0, 0.0));
    }
}
