//! Static scene setup and in-place updates of the light, floor and grid

use bevy::light::NotShadowCaster;
use bevy::prelude::*;
use vitrine_core::settings::LightSettings;
use vitrine_core::Effect;

use crate::camera::{camera_position, perspective};
use crate::types::{Floor, GridLine, LightHelper, MainCamera, PendingEffects, SceneLight, ViewerSettings, FLOOR_Y};

/// Lumens per unit of panel light power
pub const LUMENS_PER_POWER: f32 = 20_000.0;

/// Light range at unit decay
const LIGHT_DISTANCE: f32 = 200.0;

const GRID_SIZE: f32 = 100.0;
const GRID_DIVISIONS: i32 = 2;
const GRID_THICKNESS: f32 = 0.05;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

/// Point light for the light settings; decay shortens the range
pub fn point_light(light: &LightSettings) -> PointLight {
    let range = if light.decay > 0.0 {
        LIGHT_DISTANCE / light.decay
    } else {
        LIGHT_DISTANCE
    };
    PointLight {
        color: Color::srgb_u8(light.color.r, light.color.g, light.color.b),
        intensity: light.power * LUMENS_PER_POWER,
        range,
        shadows_enabled: light.shadow,
        ..default()
    }
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ViewerSettings>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(perspective(&settings.camera)),
        Transform::from_translation(camera_position(&settings.camera)).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 80.0,
        affects_lightmapped_meshes: true,
    });

    // Floor
    commands.spawn((
        Name::new("floor"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(32.0, 32.0).subdivisions(32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x22, 0x22, 0x22),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, FLOOR_Y, 0.0),
        Floor,
    ));

    // Point light with a helper sphere that follows its color and visibility
    let light = &settings.light;
    let helper_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(light.color.r, light.color.g, light.color.b),
        unlit: true,
        ..default()
    });
    commands
        .spawn((
            Name::new("light"),
            point_light(light),
            Transform::from_xyz(light.x, light.y, light.z),
            visibility(light.enable),
            SceneLight,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Sphere::new(0.25).mesh().uv(16, 8))),
                MeshMaterial3d(helper_material),
                Transform::default(),
                NotShadowCaster,
                LightHelper,
            ));
        });

    // Grid helper on the XZ plane
    let half = GRID_SIZE / 2.0;
    let step = GRID_SIZE / GRID_DIVISIONS as f32;
    let grid_visibility = visibility(settings.display.show_axes);
    let line_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x88, 0x88, 0x88),
        unlit: true,
        ..default()
    });
    let center_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x44, 0x44, 0x44),
        unlit: true,
        ..default()
    });
    let line_x = meshes.add(Cuboid::new(GRID_SIZE, GRID_THICKNESS, GRID_THICKNESS));
    let line_z = meshes.add(Cuboid::new(GRID_THICKNESS, GRID_THICKNESS, GRID_SIZE));

    for i in 0..=GRID_DIVISIONS {
        let offset = -half + i as f32 * step;
        let material = if offset == 0.0 { &center_material } else { &line_material };
        commands.spawn((
            Mesh3d(line_x.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(0.0, 0.0, offset),
            NotShadowCaster,
            GridLine,
            grid_visibility,
        ));
        commands.spawn((
            Mesh3d(line_z.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(offset, 0.0, 0.0),
            NotShadowCaster,
            GridLine,
            grid_visibility,
        ));
    }
}

/// Apply light and helper edits from the panel
pub fn apply_light_effects(
    effects: Res<PendingEffects>,
    settings: Res<ViewerSettings>,
    mut lights: Query<(&mut PointLight, &mut Transform, &mut Visibility), With<SceneLight>>,
    helpers: Query<&MeshMaterial3d<StandardMaterial>, With<LightHelper>>,
    mut grid: Query<&mut Visibility, (With<GridLine>, Without<SceneLight>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let light = &settings.light;

    for effect in &effects.0 {
        match effect {
            Effect::AxesVisibility => {
                for mut vis in grid.iter_mut() {
                    *vis = visibility(settings.display.show_axes);
                }
            }
            Effect::LightColor => {
                let color = Color::srgb_u8(light.color.r, light.color.g, light.color.b);
                for (mut point, _, _) in lights.iter_mut() {
                    point.color = color;
                }
                for handle in helpers.iter() {
                    if let Some(material) = materials.get_mut(&handle.0) {
                        material.base_color = color;
                    }
                }
            }
            Effect::LightVisibility => {
                for (_, _, mut vis) in lights.iter_mut() {
                    *vis = visibility(light.enable);
                }
            }
            Effect::LightFalloff | Effect::LightShadow => {
                let updated = point_light(light);
                for (mut point, _, _) in lights.iter_mut() {
                    point.intensity = updated.intensity;
                    point.range = updated.range;
                    point.shadows_enabled = updated.shadows_enabled;
                }
            }
            Effect::LightPosition => {
                for (_, mut transform, _) in lights.iter_mut() {
                    transform.translation = Vec3::new(light.x, light.y, light.z);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_mapping() {
        let light = LightSettings::default();
        let point = point_light(&light);
        assert_eq!(point.range, 100.0);
        assert!((point.intensity - light.power * LUMENS_PER_POWER).abs() < 1e-3);
        assert!(point.shadows_enabled);
    }

    #[test]
    fn test_zero_decay_keeps_full_range() {
        let light = LightSettings {
            decay: 0.0,
            shadow: false,
            ..LightSettings::default()
        };
        let point = point_light(&light);
        assert_eq!(point.range, LIGHT_DISTANCE);
        assert!(!point.shadows_enabled);
    }

    #[test]
    fn test_visibility_toggles_hide_light_and_grid() {
        let mut settings = ViewerSettings::default();
        settings.display.show_axes = false;
        settings.light.enable = false;

        let mut effects = PendingEffects::default();
        effects.push(Effect::AxesVisibility);
        effects.push(Effect::LightVisibility);

        let mut app = App::new();
        app.init_resource::<Assets<StandardMaterial>>()
            .insert_resource(settings.clone())
            .insert_resource(effects)
            .add_systems(Update, apply_light_effects);

        let start = Transform::from_xyz(15.0, 40.0, 35.0);
        let light = app
            .world_mut()
            .spawn((SceneLight, point_light(&settings.light), start, Visibility::Visible))
            .id();
        let grid = app.world_mut().spawn((GridLine, Visibility::Visible)).id();

        app.update();

        let world = app.world();
        assert_eq!(world.get::<Visibility>(light), Some(&Visibility::Hidden));
        assert_eq!(world.get::<Visibility>(grid), Some(&Visibility::Hidden));
        // Toggling visibility leaves the light's placement and power alone
        assert_eq!(world.get::<Transform>(light), Some(&start));
        let point = world.get::<PointLight>(light).expect("light kept");
        assert!((point.intensity - settings.light.power * LUMENS_PER_POWER).abs() < 1e-3);
    }
}
