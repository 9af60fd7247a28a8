//! Shared resources and marker components

use bevy::prelude::*;
use vitrine_core::{
    AnimationClock, AssetConfig, AssetLoadError, Effect, LightOrbit, OrbitConfig, RequestTracker, SceneState,
    Settings, TransformController,
};

/// Height of the floor plane; the bounce animation is measured from it
pub const FLOOR_Y: f32 = -5.0;

/// Most recent asset errors kept for the panel
const MAX_NOTIFICATIONS: usize = 5;

/// Panel settings, the single source of truth for scene state
#[derive(Debug, Clone, Default, Resource, Deref, DerefMut)]
pub struct ViewerSettings(pub Settings);

/// Font and teapot locations
#[derive(Debug, Clone, Default, Resource, Deref)]
pub struct ViewerAssets(pub AssetConfig);

/// Orbit camera limits from the configuration
#[derive(Debug, Clone, Default, Resource, Deref)]
pub struct OrbitLimits(pub OrbitConfig);

/// Owner of the primary object entity
#[derive(Debug, Clone, Resource, Deref, DerefMut)]
pub struct PrimaryScene(pub SceneState<Entity>);

/// Transform gizmo binding and drag state
#[derive(Debug, Clone, Default, Resource, Deref, DerefMut)]
pub struct GizmoState(pub TransformController<Entity>);

/// Request ids for geometry and material loads
#[derive(Debug, Clone, Default, Resource, Deref, DerefMut)]
pub struct AssetRequests(pub RequestTracker);

/// Effects committed by the panel, drained once per frame
#[derive(Debug, Clone, Default, Resource)]
pub struct PendingEffects(pub Vec<Effect>);

impl PendingEffects {
    pub fn push(&mut self, effect: Effect) {
        if effect != Effect::None && !self.0.contains(&effect) {
            self.0.push(effect);
        }
    }
}

/// Non-fatal asset failures shown in the panel
#[derive(Debug, Clone, Default, Resource)]
pub struct Notifications {
    pub entries: Vec<AssetLoadError>,
}

impl Notifications {
    pub fn push(&mut self, error: AssetLoadError) {
        tracing::warn!(slot = %error.slot, url = %error.source_url, "{}", error.reason);
        self.entries.push(error);
        if self.entries.len() > MAX_NOTIFICATIONS {
            let excess = self.entries.len() - MAX_NOTIFICATIONS;
            self.entries.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Frame clock and light orbit angle
#[derive(Debug, Clone, Default, Resource)]
pub struct AnimationState {
    pub clock: AnimationClock,
    pub light_orbit: LightOrbit,
}

/// UI layout settings for responsive design
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    pub show_panel: bool,
    pub show_stats: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    pub is_mobile: bool,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            show_panel: true,
            show_stats: true,
            screen_width: 1920.0,
            screen_height: 1080.0,
            is_mobile: false,
        }
    }
}

impl UiLayout {
    pub fn update_for_screen(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;

        let was_mobile = self.is_mobile;
        self.is_mobile = width < 800.0 || (width < height && width < 600.0);

        // Collapse the panel the first time a small screen is seen
        if self.is_mobile && !was_mobile {
            self.show_panel = false;
        }
    }

    pub fn panel_width(&self) -> f32 {
        if self.is_mobile {
            (self.screen_width * 0.6).min(260.0)
        } else {
            280.0
        }
    }
}

/// Marker for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for the primary object
#[derive(Component)]
pub struct PrimaryObject;

/// Euler angles (XYZ order) of the primary object.
///
/// Auto-rotate accumulates into these without wrapping, so they are kept
/// beside the transform rather than recovered from its quaternion.
#[derive(Component, Debug, Clone, Copy, Default, Deref, DerefMut)]
pub struct EulerRotation(pub Vec3);

/// Marker for the floor plane
#[derive(Component)]
pub struct Floor;

/// Marker for the point light
#[derive(Component)]
pub struct SceneLight;

/// Marker for the light helper sphere
#[derive(Component)]
pub struct LightHelper;

/// Marker for grid helper lines
#[derive(Component)]
pub struct GridLine;

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::AssetSlot;

    #[test]
    fn test_pending_effects_dedup() {
        let mut pending = PendingEffects::default();
        pending.push(Effect::CameraPosition);
        pending.push(Effect::None);
        pending.push(Effect::CameraPosition);
        pending.push(Effect::LightColor);
        assert_eq!(pending.0, vec![Effect::CameraPosition, Effect::LightColor]);
    }

    #[test]
    fn test_notifications_are_capped() {
        let mut notifications = Notifications::default();
        for i in 0..8 {
            notifications.push(AssetLoadError::new(AssetSlot::Material, format!("img-{i}.png"), "HTTP 404"));
        }
        assert_eq!(notifications.entries.len(), MAX_NOTIFICATIONS);
        assert_eq!(notifications.entries[0].source_url, "img-3.png");
    }

    #[test]
    fn test_layout_collapses_panel_once() {
        let mut layout = UiLayout::default();
        layout.update_for_screen(500.0, 900.0);
        assert!(layout.is_mobile);
        assert!(!layout.show_panel);

        layout.show_panel = true;
        layout.update_for_screen(520.0, 900.0);
        assert!(layout.show_panel);
    }
}
