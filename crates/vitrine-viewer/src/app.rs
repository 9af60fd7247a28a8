//! Bevy application setup

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{DefaultPickingPlugins, prelude::MeshPickingPlugin};
use std::time::Duration;

use vitrine_core::ViewerConfig;
use vitrine_scene::{UiLayout, VitrineScenePlugin};

pub fn run(config: ViewerConfig) {
    tracing::info!("{} v{}", config.window.title, env!("CARGO_PKG_VERSION"));

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        // Start with default continuous rendering - mobile will switch to power-saving mode
        .insert_resource(WinitSettings::default())
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: config.window.title.clone(),
                    canvas: Some(config.window.canvas.clone()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Fonts, models and textures resolve against the page (or working directory)
                file_path: "".to_string(),
                // Don't look for .meta files - static hosts don't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // These must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(VitrineScenePlugin { config })
        .add_systems(Update, adjust_power_settings_for_mobile)
        .run();
}

/// Adjust power settings based on mobile detection
/// On mobile, use power saving mode. On desktop, use continuous rendering for smooth 3D.
fn adjust_power_settings_for_mobile(
    layout: Res<UiLayout>,
    mut winit_settings: ResMut<WinitSettings>,
) {
    // Only update if mobile status changed
    if !layout.is_changed() {
        return;
    }

    if layout.is_mobile {
        use bevy::winit::UpdateMode;
        // Animation still needs regular frames, so idle at ~30 FPS rather than 10
        winit_settings.focused_mode = UpdateMode::reactive_low_power(Duration::from_millis(33));
        winit_settings.unfocused_mode = UpdateMode::reactive_low_power(Duration::from_millis(500));
    } else {
        *winit_settings = WinitSettings::default();
    }
}
