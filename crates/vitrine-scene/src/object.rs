//! Primary object spawning and panel-driven rebuilds

use bevy::ecs::system::SystemParam;
use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;

use vitrine_core::factory::{build_geometry, build_material, build_texture_material};
use vitrine_core::settings::{AffineMode, Rgb, ShapeKind};
use vitrine_core::{AssetSlot, Effect, GeometrySpec, MaterialSpec, ObjectDescriptor, SceneBackend};

use crate::loader::{self, MeshSources, PendingLoads};
use crate::mesh;
use crate::types::{
    AssetRequests, EulerRotation, GizmoState, PendingEffects, PrimaryObject, PrimaryScene, ViewerAssets,
    ViewerSettings,
};

/// Scene access needed to realise an [`ObjectDescriptor`]
#[derive(SystemParam)]
pub struct ObjectBuilder<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
    pub asset_server: Res<'w, AssetServer>,
    pub sources: ResMut<'w, MeshSources>,
}

fn srgb(color: Rgb) -> Color {
    Color::srgb_u8(color.r, color.g, color.b)
}

impl ObjectBuilder<'_, '_> {
    fn base_mesh(&self, geometry: &GeometrySpec) -> Option<Mesh> {
        match geometry {
            GeometrySpec::Teapot { size, .. } => self
                .sources
                .teapot_mesh(&self.meshes)
                .map(|teapot| mesh::scaled(teapot, *size)),
            GeometrySpec::Text { text, params } => self.sources.text_mesh(text, params),
            procedural => mesh::primitive_mesh(procedural),
        }
    }

    fn object_mesh(&self, object: &ObjectDescriptor) -> Mesh {
        let base = self.base_mesh(&object.geometry).unwrap_or_else(|| {
            tracing::warn!(geometry = object.geometry.label(), "Geometry source not loaded, using a cube");
            Cuboid::from_length(2.0).mesh().build()
        });

        match &object.material {
            MaterialSpec::Points { .. } => mesh::to_point_cloud(&base),
            MaterialSpec::Normal { wireframe } => {
                let mut shaded = base;
                mesh::bake_normal_colors(&mut shaded);
                if *wireframe {
                    mesh::to_wireframe(&shaded)
                } else {
                    shaded
                }
            }
            MaterialSpec::Phong { .. } | MaterialSpec::Textured { .. } => base,
        }
    }

    fn object_material(&self, material: &MaterialSpec) -> StandardMaterial {
        match material {
            MaterialSpec::Phong { color } => StandardMaterial {
                base_color: srgb(*color),
                perceptual_roughness: 0.4,
                reflectance: 0.6,
                ..default()
            },
            MaterialSpec::Points { color, .. } => StandardMaterial {
                base_color: srgb(*color),
                unlit: true,
                ..default()
            },
            // Vertex colors carry the shading
            MaterialSpec::Normal { .. } => StandardMaterial {
                base_color: Color::WHITE,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            },
            MaterialSpec::Textured { url } => StandardMaterial {
                base_color_texture: Some(self.asset_server.load(url.clone())),
                unlit: true,
                ..default()
            },
        }
    }
}

impl SceneBackend for ObjectBuilder<'_, '_> {
    type Handle = Entity;

    fn insert_object(&mut self, object: &ObjectDescriptor) -> Entity {
        let object_mesh = self.object_mesh(object);
        let material = self.object_material(&object.material);
        let has_vertices = object_mesh.count_vertices() > 0;

        let material = self.materials.add(material);
        let mut entity = self.commands.spawn((
            Name::new(object.name),
            PrimaryObject,
            EulerRotation::default(),
            MeshMaterial3d(material),
            Transform::from_scale(Vec3::splat(object.scale)),
            Visibility::Visible,
        ));
        if has_vertices {
            entity.insert(Mesh3d(self.meshes.add(object_mesh)));
        }
        if !object.cast_shadow {
            entity.insert(NotShadowCaster);
        }
        if !object.receive_shadow {
            entity.insert(NotShadowReceiver);
        }
        entity.id()
    }

    fn remove_object(&mut self, handle: Entity) {
        if let Ok(mut entity) = self.commands.get_entity(handle) {
            entity.despawn();
        }
    }
}

pub struct ObjectPlugin;

impl Plugin for ObjectPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, spawn_initial_object);
    }
}

/// Spawn the configured object, starting loads for async geometry or textures
fn spawn_initial_object(
    mut builder: ObjectBuilder,
    mut scene: ResMut<PrimaryScene>,
    mut gizmo: ResMut<GizmoState>,
    mut settings: ResMut<ViewerSettings>,
    mut requests: ResMut<AssetRequests>,
    mut pending: ResMut<PendingLoads>,
    assets: Res<ViewerAssets>,
) {
    if settings.geometry.shape == ShapeKind::Teapot {
        loader::request_teapot(&mut requests, &mut pending, &mut builder, &assets);
    } else {
        let geometry = scene.geometry().clone();
        let material = scene.material().clone();
        scene.replace_object(&mut builder, &mut gizmo, &mut settings, geometry, material);
    }

    if let Some(MaterialSpec::Textured { url }) = build_texture_material(&settings.geometry.texture_url) {
        loader::request_texture(&mut requests, &mut pending, &builder.asset_server, &url);
    }
}

/// Effects that rebuild, rescale or re-bind the primary object
#[allow(clippy::too_many_arguments)]
pub fn apply_object_effects(
    effects: Res<PendingEffects>,
    mut builder: ObjectBuilder,
    mut scene: ResMut<PrimaryScene>,
    mut gizmo: ResMut<GizmoState>,
    mut settings: ResMut<ViewerSettings>,
    mut requests: ResMut<AssetRequests>,
    mut pending: ResMut<PendingLoads>,
    assets: Res<ViewerAssets>,
    mut objects: Query<&mut Transform, With<PrimaryObject>>,
) {
    for effect in &effects.0 {
        match effect {
            Effect::Scale => {
                if let Some(mut transform) = scene.object().and_then(|e| objects.get_mut(e).ok()) {
                    transform.scale = Vec3::splat(settings.display.scale);
                }
            }
            Effect::LightShadow => {
                if let Some(mut entity) = scene.object().and_then(|e| builder.commands.get_entity(e).ok()) {
                    if settings.light.shadow {
                        entity.remove::<NotShadowCaster>();
                    } else {
                        entity.insert(NotShadowCaster);
                    }
                }
            }
            Effect::RebuildGeometry => match settings.geometry.shape {
                ShapeKind::Teapot => {
                    loader::request_teapot(&mut requests, &mut pending, &mut builder, &assets);
                }
                shape => {
                    requests.issue(AssetSlot::Geometry);
                    scene.replace_geometry(&mut builder, &mut gizmo, &mut settings, build_geometry(shape));
                }
            },
            Effect::RebuildMaterial => {
                requests.issue(AssetSlot::Material);
                let material = build_material(settings.geometry.material);
                scene.replace_material(&mut builder, &mut gizmo, &mut settings, material);
            }
            Effect::LoadTexture => {
                if let Some(MaterialSpec::Textured { url }) = build_texture_material(&settings.geometry.texture_url) {
                    loader::request_texture(&mut requests, &mut pending, &builder.asset_server, &url);
                }
            }
            Effect::GenerateText => {
                let text = settings.bonus.text.clone();
                let params = settings.bonus.text_geometry;
                loader::request_text(&mut requests, &mut pending, &builder, &assets, &text, params);
            }
            Effect::TransformMode => {
                gizmo.set_mode(settings.affine.mode, scene.object());
                // Nothing to bind yet; keep the panel in step with the gizmo
                if gizmo.target().is_none() {
                    settings.affine.mode = AffineMode::None;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_app;
    use vitrine_core::Settings;

    fn push_effect(app: &mut App, effect: Effect) {
        let mut effects = app.world_mut().resource_mut::<PendingEffects>();
        effects.0.clear();
        effects.push(effect);
    }

    #[test]
    fn test_scale_effect_resizes_object() {
        let mut app = test_app(Settings::default());
        app.add_plugins(ObjectPlugin).add_systems(Update, apply_object_effects);
        app.update();

        let object = app.world().resource::<PrimaryScene>().object().expect("initial object");
        assert_eq!(app.world().get::<Transform>(object).map(|t| t.scale), Some(Vec3::splat(2.0)));

        app.world_mut().resource_mut::<ViewerSettings>().display.scale = 3.5;
        push_effect(&mut app, Effect::Scale);
        app.update();

        assert_eq!(app.world().get::<Transform>(object).map(|t| t.scale), Some(Vec3::splat(3.5)));
    }

    #[test]
    fn test_rebuild_material_replaces_object() {
        let mut app = test_app(Settings::default());
        app.add_plugins(ObjectPlugin).add_systems(Update, apply_object_effects);
        app.update();
        let before = app.world().resource::<PrimaryScene>().object().expect("initial object");

        push_effect(&mut app, Effect::RebuildMaterial);
        app.update();

        let after = app.world().resource::<PrimaryScene>().object().expect("rebuilt object");
        assert_ne!(before, after);
        assert!(app.world().get_entity(before).is_err());
        let primaries = app
            .world_mut()
            .query_filtered::<Entity, With<PrimaryObject>>()
            .iter(app.world())
            .count();
        assert_eq!(primaries, 1);
    }

    #[test]
    fn test_transform_mode_binds_existing_object() {
        let mut app = test_app(Settings::default());
        app.add_plugins(ObjectPlugin).add_systems(Update, apply_object_effects);
        app.update();

        app.world_mut().resource_mut::<ViewerSettings>().affine.mode = AffineMode::Rotate;
        push_effect(&mut app, Effect::TransformMode);
        app.update();

        let object = app.world().resource::<PrimaryScene>().object();
        assert_eq!(app.world().resource::<GizmoState>().target(), object);
        assert_eq!(app.world().resource::<ViewerSettings>().affine.mode, AffineMode::Rotate);
    }

    #[test]
    fn test_transform_mode_without_object_resets_panel() {
        let mut app = test_app(Settings::default());
        app.add_systems(Update, apply_object_effects);

        app.world_mut().resource_mut::<ViewerSettings>().affine.mode = AffineMode::Translate;
        push_effect(&mut app, Effect::TransformMode);
        app.update();

        assert!(app.world().resource::<GizmoState>().target().is_none());
        assert_eq!(app.world().resource::<ViewerSettings>().affine.mode, AffineMode::None);
    }
}
