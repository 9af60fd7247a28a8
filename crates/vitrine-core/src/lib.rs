//! Vitrine Core - engine-independent logic for the Vitrine scene viewer
//!
//! This crate holds everything that does not need a renderer:
//! - Settings with declared ranges and a clamping write boundary
//! - Object factory descriptors for shapes, materials, textures and text
//! - Scene state owning the primary object, and the transform gizmo binding
//! - Per-frame animation functions and the asset request tracker
//! - The control panel binding table and viewer configuration

pub mod animation;
pub mod config;
pub mod error;
pub mod factory;
pub mod panel;
pub mod requests;
pub mod scene;
pub mod settings;
pub mod transform;

pub use animation::{animate, AnimationClock, AnimationUpdate, LightOrbit};
pub use config::{AssetConfig, OrbitConfig, ViewerConfig, WindowConfig};
pub use error::{AssetLoadError, ConfigError, SettingsError};
pub use factory::{GeometrySpec, MaterialSpec, ObjectDescriptor, RenderKind, OBJECT_NAME};
pub use panel::{Effect, FOLDERS};
pub use requests::{AssetSlot, Completion, RequestId, RequestTracker};
pub use scene::{SceneBackend, SceneState};
pub use settings::{Settings, SettingPath, Value};
pub use transform::{Binding, GizmoMode, TransformController};
