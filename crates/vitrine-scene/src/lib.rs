//! Vitrine Scene - bevy rendering, input and UI for the scene viewer
//!
//! This crate realises the engine-independent state in `vitrine-core` as a
//! bevy app: the static scene, the primary object, orbit camera, transform
//! gizmo, per-frame animation, asynchronous asset loads and the egui panel.

pub mod animation;
pub mod camera;
pub mod gizmo;
pub mod loader;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use vitrine_core::{SceneState, ViewerConfig};

/// Plugin that sets up the whole viewer from a configuration
pub struct VitrineScenePlugin {
    pub config: ViewerConfig,
}

impl Plugin for VitrineScenePlugin {
    fn build(&self, app: &mut App) {
        let mut settings = self.config.settings.clone();
        settings.sanitize();

        app.insert_resource(PrimaryScene(SceneState::from_settings(&settings)))
            .insert_resource(ViewerSettings(settings))
            .insert_resource(ViewerAssets(self.config.assets.clone()))
            .insert_resource(OrbitLimits(self.config.orbit.clone()))
            .init_resource::<GizmoState>()
            .init_resource::<AssetRequests>()
            .init_resource::<PendingEffects>()
            .init_resource::<Notifications>()
            .init_resource::<AnimationState>()
            .init_resource::<UiLayout>();

        app.add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(object::ObjectPlugin)
            .add_plugins(loader::LoaderPlugin)
            .add_plugins(gizmo::GizmoPlugin)
            .add_plugins(ui::UiPlugin);

        app.add_systems(Startup, camera::init_orbit)
            // Panel edits from the previous frame
            .add_systems(
                Update,
                (
                    object::apply_object_effects,
                    scene::apply_light_effects,
                    camera::apply_camera_effects,
                    clear_effects,
                )
                    .chain()
                    .in_set(ViewerSet::Effects),
            )
            // Gizmo drags take the pointer before the orbit camera sees it
            .add_systems(
                Update,
                (gizmo::begin_drag, gizmo::drag_gizmo, gizmo::end_drag, camera::update_camera)
                    .chain()
                    .in_set(ViewerSet::Input),
            )
            .add_systems(
                Update,
                (
                    animation::advance_clock,
                    animation::auto_rotate_object,
                    animation::animate_object,
                    animation::orbit_light,
                    animation::sync_object_rotation,
                    gizmo::draw_gizmo,
                )
                    .chain()
                    .in_set(ViewerSet::Frame),
            )
            .configure_sets(Update, (ViewerSet::Effects, ViewerSet::Input, ViewerSet::Frame).chain());
    }
}

/// Ordering of the per-frame viewer systems
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// Apply committed panel edits
    Effects,
    /// Gizmo drags and orbit navigation
    Input,
    /// Animation and transform sync
    Frame,
}

fn clear_effects(mut effects: ResMut<PendingEffects>) {
    effects.0.clear();
}

/// Headless app with the viewer resources and asset storage, but no
/// rendering, window or panel
#[cfg(test)]
pub(crate) fn test_app(settings: vitrine_core::Settings) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<Image>()
        .insert_resource(PrimaryScene(SceneState::from_settings(&settings)))
        .insert_resource(ViewerSettings(settings))
        .init_resource::<ViewerAssets>()
        .init_resource::<GizmoState>()
        .init_resource::<AssetRequests>()
        .init_resource::<PendingEffects>()
        .init_resource::<Notifications>()
        .init_resource::<MeshSources>()
        .init_resource::<PendingLoads>();
    app
}

// Re-export commonly used types
pub use camera::OrbitCamera;
pub use loader::{MeshSources, PendingLoads};
pub use types::*;
