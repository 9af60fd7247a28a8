//! Control panel bindings
//!
//! One folder per settings group. Each binding ties a settings path to the
//! effect its change has on the scene; the widget kind and valid range come
//! from [`SettingPath::control`].

use crate::error::SettingsError;
use crate::settings::{SettingPath, Settings, Value};

/// What a committed change does to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Read every frame; nothing to do on change
    None,
    Scale,
    AxesVisibility,
    CameraPosition,
    CameraProjection,
    LightColor,
    LightVisibility,
    LightFalloff,
    LightPosition,
    LightShadow,
    RebuildGeometry,
    RebuildMaterial,
    LoadTexture,
    GenerateText,
    TransformMode,
}

impl Effect {
    /// Effect replaces the primary object
    pub fn rebuilds_object(self) -> bool {
        matches!(
            self,
            Effect::RebuildGeometry | Effect::RebuildMaterial | Effect::LoadTexture | Effect::GenerateText
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub path: SettingPath,
    pub label: &'static str,
    pub effect: Effect,
}

#[derive(Debug, Clone, Copy)]
pub struct Folder {
    pub title: &'static str,
    pub bindings: &'static [Binding],
}

const fn bind(path: SettingPath, label: &'static str, effect: Effect) -> Binding {
    Binding { path, label, effect }
}

pub const FOLDERS: &[Folder] = &[
    Folder {
        title: "Display",
        bindings: &[
            bind(SettingPath::DisplayScale, "scale", Effect::Scale),
            bind(SettingPath::DisplayShowAxes, "show axes", Effect::AxesVisibility),
            bind(SettingPath::DisplayAutoRotate, "auto rotate", Effect::None),
        ],
    },
    Folder {
        title: "Geometry",
        bindings: &[
            bind(SettingPath::GeometryShape, "shape", Effect::RebuildGeometry),
            bind(SettingPath::GeometryMaterial, "material", Effect::RebuildMaterial),
            bind(SettingPath::GeometryTextureUrl, "image URL", Effect::LoadTexture),
        ],
    },
    Folder {
        title: "Camera",
        bindings: &[
            bind(SettingPath::CameraX, "x", Effect::CameraPosition),
            bind(SettingPath::CameraY, "y", Effect::CameraPosition),
            bind(SettingPath::CameraZ, "z", Effect::CameraPosition),
            bind(SettingPath::CameraFov, "fov", Effect::CameraProjection),
            bind(SettingPath::CameraNear, "near", Effect::CameraProjection),
            bind(SettingPath::CameraFar, "far", Effect::CameraProjection),
        ],
    },
    Folder {
        title: "Affine Transform",
        bindings: &[bind(SettingPath::AffineMode, "mode", Effect::TransformMode)],
    },
    Folder {
        title: "Light Control",
        bindings: &[
            bind(SettingPath::LightColor, "color", Effect::LightColor),
            bind(SettingPath::LightEnable, "enable", Effect::LightVisibility),
            bind(SettingPath::LightAutoRotate, "auto rotate", Effect::None),
            bind(SettingPath::LightShadow, "shadow", Effect::LightShadow),
            bind(SettingPath::LightDecay, "decay", Effect::LightFalloff),
            bind(SettingPath::LightPower, "power", Effect::LightFalloff),
            bind(SettingPath::LightX, "x", Effect::LightPosition),
            bind(SettingPath::LightY, "y", Effect::LightPosition),
            bind(SettingPath::LightZ, "z", Effect::LightPosition),
        ],
    },
    Folder {
        title: "Animation",
        bindings: &[
            bind(SettingPath::AnimationKind, "type", Effect::None),
            bind(SettingPath::AnimationValue, "value", Effect::None),
        ],
    },
    Folder {
        title: "Bonus",
        bindings: &[
            bind(SettingPath::BonusText, "text", Effect::GenerateText),
            bind(SettingPath::BonusSize, "size", Effect::GenerateText),
            bind(SettingPath::BonusHeight, "height", Effect::GenerateText),
            bind(SettingPath::BonusCurveSegments, "curve segments", Effect::GenerateText),
        ],
    },
];

pub fn binding(path: SettingPath) -> Option<&'static Binding> {
    FOLDERS
        .iter()
        .flat_map(|folder| folder.bindings.iter())
        .find(|b| b.path == path)
}

/// Write a panel edit into the settings and return the effect to dispatch.
///
/// Paths without a panel binding are stored with [`Effect::None`].
pub fn commit(settings: &mut Settings, path: SettingPath, value: Value) -> Result<Effect, SettingsError> {
    let stored = settings.set(path, value)?;
    let effect = binding(path).map(|b| b.effect).unwrap_or(Effect::None);
    tracing::debug!(%path, value = ?stored, ?effect, "Setting committed");
    Ok(effect)
}
