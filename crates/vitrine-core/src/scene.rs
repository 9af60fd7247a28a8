//! Scene state - ownership of the primary object
//!
//! The primary object is held by an explicit handle rather than looked up by
//! name. [`SceneState::replace_object`] is the only way to swap it, which keeps
//! at most one primary object alive and never leaves the gizmo bound to a
//! removed one.

use crate::factory::{self, GeometrySpec, MaterialSpec, ObjectDescriptor};
use crate::settings::{AffineMode, Settings};
use crate::transform::TransformController;

/// Scene graph operations needed to realise the primary object
pub trait SceneBackend {
    type Handle: Copy + PartialEq + std::fmt::Debug;

    fn insert_object(&mut self, object: &ObjectDescriptor) -> Self::Handle;

    fn remove_object(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone)]
pub struct SceneState<H> {
    object: Option<H>,
    geometry: GeometrySpec,
    material: MaterialSpec,
}

impl<H: Copy + PartialEq + std::fmt::Debug> SceneState<H> {
    /// State for the given initial geometry/material, with no object spawned yet
    pub fn new(geometry: GeometrySpec, material: MaterialSpec) -> Self {
        Self {
            object: None,
            geometry,
            material,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            factory::build_geometry(settings.geometry.shape),
            factory::build_material(settings.geometry.material),
        )
    }

    pub fn object(&self) -> Option<H> {
        self.object
    }

    pub fn geometry(&self) -> &GeometrySpec {
        &self.geometry
    }

    pub fn material(&self) -> &MaterialSpec {
        &self.material
    }

    /// Swap the primary object for one built from `geometry` and `material`.
    ///
    /// Detaches the gizmo (and resets the panel's affine mode) before the old
    /// object is removed, then inserts and records the replacement.
    pub fn replace_object<B>(
        &mut self,
        backend: &mut B,
        controller: &mut TransformController<H>,
        settings: &mut Settings,
        geometry: GeometrySpec,
        material: MaterialSpec,
    ) -> H
    where
        B: SceneBackend<Handle = H>,
    {
        controller.detach();
        settings.affine.mode = AffineMode::None;

        if let Some(old) = self.object.take() {
            backend.remove_object(old);
        }

        let descriptor = factory::describe(settings, geometry, material);
        let handle = backend.insert_object(&descriptor);
        tracing::debug!(
            ?handle,
            geometry = descriptor.geometry.label(),
            render = ?descriptor.render,
            "Replaced primary object"
        );

        self.geometry = descriptor.geometry;
        self.material = descriptor.material;
        self.object = Some(handle);
        handle
    }

    /// Rebuild with a new geometry, keeping the current material
    pub fn replace_geometry<B>(
        &mut self,
        backend: &mut B,
        controller: &mut TransformController<H>,
        settings: &mut Settings,
        geometry: GeometrySpec,
    ) -> H
    where
        B: SceneBackend<Handle = H>,
    {
        let material = self.material.clone();
        self.replace_object(backend, controller, settings, geometry, material)
    }

    /// Rebuild with a new material, keeping the current geometry
    pub fn replace_material<B>(
        &mut self,
        backend: &mut B,
        controller: &mut TransformController<H>,
        settings: &mut Settings,
        material: MaterialSpec,
    ) -> H
    where
        B: SceneBackend<Handle = H>,
    {
        let geometry = self.geometry.clone();
        self.replace_object(backend, controller, settings, geometry, material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{build_geometry, build_material, build_texture_material, OBJECT_NAME};
    use crate::requests::{AssetSlot, Completion, RequestTracker};
    use crate::settings::{Choice, MaterialKind, ShapeKind};
    use crate::transform::Binding;

    /// Scene graph stand-in: a flat child list of (id, name, descriptor)
    #[derive(Default)]
    struct MockScene {
        next_id: u32,
        pub children: Vec<(u32, &'static str, ObjectDescriptor)>,
    }

    impl MockScene {
        pub fn count_named(&self, name: &str) -> usize {
            self.children.iter().filter(|(_, n, _)| *n == name).count()
        }

        pub fn contains(&self, id: u32) -> bool {
            self.children.iter().any(|(i, _, _)| *i == id)
        }
    }

    impl SceneBackend for MockScene {
        type Handle = u32;

        fn insert_object(&mut self, object: &ObjectDescriptor) -> u32 {
            self.next_id += 1;
            self.children.push((self.next_id, object.name, object.clone()));
            self.next_id
        }

        fn remove_object(&mut self, handle: u32) {
            self.children.retain(|(id, _, _)| *id != handle);
        }
    }

    fn fixture() -> (MockScene, SceneState<u32>, TransformController<u32>, Settings) {
        let settings = Settings::default();
        (
            MockScene::default(),
            SceneState::from_settings(&settings),
            TransformController::new(),
            settings,
        )
    }

    #[test]
    fn test_single_object_for_every_shape() {
        let (mut scene, mut state, mut controller, mut settings) = fixture();
        for &shape in ShapeKind::ALL {
            state.replace_geometry(&mut scene, &mut controller, &mut settings, build_geometry(shape));
            assert_eq!(scene.count_named(OBJECT_NAME), 1, "after {}", shape.name());
        }
    }

    #[test]
    fn test_replacement_tolerates_missing_object() {
        let (mut scene, mut state, mut controller, mut settings) = fixture();
        let first = state.replace_material(
            &mut scene,
            &mut controller,
            &mut settings,
            build_material(MaterialKind::Solid),
        );
        // Removed behind the state's back
        scene.remove_object(first);

        state.replace_material(
            &mut scene,
            &mut controller,
            &mut settings,
            build_material(MaterialKind::Basic),
        );
        assert_eq!(scene.count_named(OBJECT_NAME), 1);
    }

    #[test]
    fn test_binding_never_targets_removed_object() {
        let (mut scene, mut state, mut controller, mut settings) = fixture();
        let materials = [MaterialKind::Point, MaterialKind::Lines, MaterialKind::Basic];

        for (i, &kind) in materials.iter().cycle().take(9).enumerate() {
            controller.set_mode(AffineMode::Translate, state.object());
            let handle = state.replace_material(
                &mut scene,
                &mut controller,
                &mut settings,
                build_material(kind),
            );
            assert_eq!(controller.binding(), Binding::Detached, "iteration {i}");
            assert_eq!(settings.affine.mode, AffineMode::None);

            controller.set_mode(AffineMode::Rotate, state.object());
            let target = controller.target().expect("attached");
            assert_eq!(target, handle);
            assert!(scene.contains(target));
        }
    }

    #[test]
    fn test_out_of_order_texture_loads_keep_latest() {
        let (mut scene, mut state, mut controller, mut settings) = fixture();
        let mut tracker = RequestTracker::new();

        let first = (
            tracker.issue(AssetSlot::Material),
            build_texture_material("https://example.com/first.png").unwrap(),
        );
        let second = (
            tracker.issue(AssetSlot::Material),
            build_texture_material("https://example.com/second.png").unwrap(),
        );
        let expected = second.1.clone();

        // Second resolves before the first
        for (id, material) in [second, first] {
            if tracker.check(id) == Completion::Current {
                state.replace_material(&mut scene, &mut controller, &mut settings, material);
            }
        }

        assert_eq!(state.material(), &expected);
        assert_eq!(scene.count_named(OBJECT_NAME), 1);
        assert_eq!(scene.children[0].2.material, expected);
    }

    #[test]
    fn test_late_text_does_not_clobber_newer_shape() {
        let (mut scene, mut state, mut controller, mut settings) = fixture();
        let mut tracker = RequestTracker::new();

        let text_request = tracker.issue(AssetSlot::Geometry);

        // Synchronous shape edit while the font is still loading
        tracker.issue(AssetSlot::Geometry);
        state.replace_geometry(&mut scene, &mut controller, &mut settings, build_geometry(ShapeKind::Sphere));

        assert_eq!(tracker.check(text_request), Completion::Stale);
        assert_eq!(state.geometry(), &build_geometry(ShapeKind::Sphere));
    }

    #[test]
    fn test_geometry_and_material_are_kept_independently() {
        let (mut scene, mut state, mut controller, mut settings) = fixture();
        state.replace_material(&mut scene, &mut controller, &mut settings, build_material(MaterialKind::Point));
        state.replace_geometry(&mut scene, &mut controller, &mut settings, build_geometry(ShapeKind::Cone));

        let (_, _, descriptor) = &scene.children[0];
        assert_eq!(descriptor.material, build_material(MaterialKind::Point));
        assert_eq!(descriptor.geometry, build_geometry(ShapeKind::Cone));
        assert_eq!(state.geometry(), &build_geometry(ShapeKind::Cone));
    }
}
