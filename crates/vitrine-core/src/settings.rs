//! Viewer settings - the single source of truth for every adjustable parameter
//!
//! Each leaf is addressed by a [`SettingPath`]. The path declares its control kind
//! and valid range, and [`Settings::set`] enforces it: numbers are clamped into the
//! declared range, enum names and colors that do not parse are rejected.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

use crate::error::SettingsError;

/// Named enum exposed as a dropdown
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];
    const NAMES: &'static [&'static str];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Primary object shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Cube,
    Sphere,
    Cone,
    Cylinder,
    /// Torus
    Wheel,
    Teapot,
}

impl Choice for ShapeKind {
    const ALL: &'static [Self] = &[
        Self::Cube,
        Self::Sphere,
        Self::Cone,
        Self::Cylinder,
        Self::Wheel,
        Self::Teapot,
    ];
    const NAMES: &'static [&'static str] = &["cube", "sphere", "cone", "cylinder", "wheel", "teapot"];

    fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
            Self::Wheel => "wheel",
            Self::Teapot => "teapot",
        }
    }
}

impl ShapeKind {
    /// Unknown names fall back to a cube
    pub fn parse_lenient(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }
}

/// Primary object material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Basic,
    Point,
    Lines,
    Solid,
}

impl Choice for MaterialKind {
    const ALL: &'static [Self] = &[Self::Basic, Self::Point, Self::Lines, Self::Solid];
    const NAMES: &'static [&'static str] = &["basic", "point", "lines", "solid"];

    fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Point => "point",
            Self::Lines => "lines",
            Self::Solid => "solid",
        }
    }
}

/// Transform gizmo mode selected in the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffineMode {
    #[default]
    None,
    Translate,
    Rotate,
    Scale,
}

impl Choice for AffineMode {
    const ALL: &'static [Self] = &[Self::None, Self::Translate, Self::Rotate, Self::Scale];
    const NAMES: &'static [&'static str] = &["none", "translate", "rotate", "scale"];

    fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        }
    }
}

/// Procedural animation applied to the primary object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    None,
    Bounce,
    Circle,
}

impl Choice for AnimationKind {
    const ALL: &'static [Self] = &[Self::None, Self::Bounce, Self::Circle];
    const NAMES: &'static [&'static str] = &["none", "bounce", "circle"];

    fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bounce => "bounce",
            Self::Circle => "circle",
        }
    }
}

/// 8-bit RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::from_u32(0xffffff);

    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb`, `rrggbb` or `#rgb`
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_u32),
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok().map(Self::from_u32)
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("not a hex color: {value:?}"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hex-string view over a color, for widgets that edit colors as text
pub struct HexColor<'a>(pub &'a mut Rgb);

impl HexColor<'_> {
    pub fn value(&self) -> String {
        self.0.to_hex()
    }

    pub fn set_value(&mut self, hex: &str) -> Result<(), SettingsError> {
        *self.0 = Rgb::from_hex(hex)
            .ok_or_else(|| SettingsError::invalid(SettingPath::LightColor.key(), format!("not a hex color: {hex:?}")))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub scale: f32,
    pub auto_rotate: bool,
    pub show_axes: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            auto_rotate: false,
            show_axes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    pub shape: ShapeKind,
    pub material: MaterialKind,
    /// Image mapped onto the object when committed
    pub texture_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 4.0,
            z: 17.0,
            fov: 80.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub color: Rgb,
    pub enable: bool,
    pub auto_rotate: bool,
    pub shadow: bool,
    pub decay: f32,
    /// Luminous power; intensity is `power / 4π`
    pub power: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            enable: true,
            auto_rotate: false,
            shadow: true,
            decay: 2.0,
            power: 4.0 * 4.0 * PI,
            x: -4.0,
            y: 4.0,
            z: 3.4,
        }
    }
}

impl LightSettings {
    pub fn intensity(&self) -> f32 {
        self.power / (4.0 * PI)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffineSettings {
    pub mode: AffineMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub kind: AnimationKind,
    /// Bounce height offset or circle radius
    pub value: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            kind: AnimationKind::None,
            value: 2.0,
        }
    }
}

/// Extrusion parameters for generated text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParams {
    pub size: f32,
    pub height: f32,
    pub curve_segments: f32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            height: 0.1,
            curve_segments: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusSettings {
    pub text: String,
    pub text_geometry: TextParams,
}

impl Default for BonusSettings {
    fn default() -> Self {
        Self {
            text: "Hello World".to_string(),
            text_geometry: TextParams::default(),
        }
    }
}

/// All adjustable parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub geometry: GeometrySettings,
    pub camera: CameraSettings,
    pub light: LightSettings,
    pub affine: AffineSettings,
    pub animation: AnimationSettings,
    pub bonus: BonusSettings,
}

/// A scalar setting value as seen by the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Widget kind and valid domain for a setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Slider { min: f32, max: f32, step: f32 },
    Toggle,
    Choice(&'static [&'static str]),
    /// Free text, committed on finish-edit
    Text,
    Color,
}

/// Address of one settings leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingPath {
    DisplayScale,
    DisplayAutoRotate,
    DisplayShowAxes,
    GeometryShape,
    GeometryMaterial,
    GeometryTextureUrl,
    CameraX,
    CameraY,
    CameraZ,
    CameraFov,
    CameraNear,
    CameraFar,
    LightColor,
    LightEnable,
    LightAutoRotate,
    LightShadow,
    LightDecay,
    LightPower,
    LightX,
    LightY,
    LightZ,
    AffineMode,
    AnimationKind,
    AnimationValue,
    BonusText,
    BonusSize,
    BonusHeight,
    BonusCurveSegments,
}

const fn slider(min: f32, max: f32, step: f32) -> Control {
    Control::Slider { min, max, step }
}

impl SettingPath {
    pub const ALL: &'static [SettingPath] = &[
        Self::DisplayScale,
        Self::DisplayAutoRotate,
        Self::DisplayShowAxes,
        Self::GeometryShape,
        Self::GeometryMaterial,
        Self::GeometryTextureUrl,
        Self::CameraX,
        Self::CameraY,
        Self::CameraZ,
        Self::CameraFov,
        Self::CameraNear,
        Self::CameraFar,
        Self::LightColor,
        Self::LightEnable,
        Self::LightAutoRotate,
        Self::LightShadow,
        Self::LightDecay,
        Self::LightPower,
        Self::LightX,
        Self::LightY,
        Self::LightZ,
        Self::AffineMode,
        Self::AnimationKind,
        Self::AnimationValue,
        Self::BonusText,
        Self::BonusSize,
        Self::BonusHeight,
        Self::BonusCurveSegments,
    ];

    /// Dotted key, e.g. `camera.fov`
    pub fn key(self) -> &'static str {
        match self {
            Self::DisplayScale => "display.scale",
            Self::DisplayAutoRotate => "display.auto_rotate",
            Self::DisplayShowAxes => "display.show_axes",
            Self::GeometryShape => "geometry.shape",
            Self::GeometryMaterial => "geometry.material",
            Self::GeometryTextureUrl => "geometry.texture_url",
            Self::CameraX => "camera.x",
            Self::CameraY => "camera.y",
            Self::CameraZ => "camera.z",
            Self::CameraFov => "camera.fov",
            Self::CameraNear => "camera.near",
            Self::CameraFar => "camera.far",
            Self::LightColor => "light.color",
            Self::LightEnable => "light.enable",
            Self::LightAutoRotate => "light.auto_rotate",
            Self::LightShadow => "light.shadow",
            Self::LightDecay => "light.decay",
            Self::LightPower => "light.power",
            Self::LightX => "light.x",
            Self::LightY => "light.y",
            Self::LightZ => "light.z",
            Self::AffineMode => "affine.mode",
            Self::AnimationKind => "animation.kind",
            Self::AnimationValue => "animation.value",
            Self::BonusText => "bonus.text",
            Self::BonusSize => "bonus.text_geometry.size",
            Self::BonusHeight => "bonus.text_geometry.height",
            Self::BonusCurveSegments => "bonus.text_geometry.curve_segments",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }

    pub fn control(self) -> Control {
        match self {
            Self::DisplayScale => slider(0.1, 4.0, 0.05),
            Self::DisplayAutoRotate
            | Self::DisplayShowAxes
            | Self::LightEnable
            | Self::LightAutoRotate
            | Self::LightShadow => Control::Toggle,
            Self::GeometryShape => Control::Choice(ShapeKind::NAMES),
            Self::GeometryMaterial => Control::Choice(MaterialKind::NAMES),
            Self::GeometryTextureUrl | Self::BonusText => Control::Text,
            Self::CameraX | Self::CameraY | Self::CameraZ => slider(-50.0, 50.0, 0.05),
            Self::CameraFov => slider(1.0, 180.0, 0.1),
            Self::CameraNear => slider(0.1, 10.0, 0.1),
            Self::CameraFar => slider(0.1, 150.0, 0.1),
            Self::LightColor => Control::Color,
            Self::LightDecay => slider(0.0, 4.0, 0.01),
            Self::LightPower => slider(0.0, 150.0, 0.1),
            Self::LightX | Self::LightY | Self::LightZ => slider(-50.0, 50.0, 0.1),
            Self::AffineMode => Control::Choice(AffineMode::NAMES),
            Self::AnimationKind => Control::Choice(AnimationKind::NAMES),
            Self::AnimationValue => slider(-10.0, 10.0, 0.1),
            Self::BonusSize | Self::BonusHeight | Self::BonusCurveSegments => slider(-5.0, 5.0, 0.1),
        }
    }
}

impl fmt::Display for SettingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn parse_choice<C: Choice>(path: SettingPath, value: &Value) -> Result<C, SettingsError> {
    let name = value
        .as_text()
        .ok_or_else(|| SettingsError::invalid(path.key(), "expected an option name"))?;
    C::from_name(name).ok_or_else(|| {
        SettingsError::invalid(
            path.key(),
            format!("{name:?} is not one of {}", C::NAMES.join(", ")),
        )
    })
}

impl Settings {
    pub fn get(&self, path: SettingPath) -> Value {
        use SettingPath as P;
        match path {
            P::DisplayScale => Value::Number(self.display.scale),
            P::DisplayAutoRotate => Value::Bool(self.display.auto_rotate),
            P::DisplayShowAxes => Value::Bool(self.display.show_axes),
            P::GeometryShape => Value::Text(self.geometry.shape.name().to_string()),
            P::GeometryMaterial => Value::Text(self.geometry.material.name().to_string()),
            P::GeometryTextureUrl => Value::Text(self.geometry.texture_url.clone()),
            P::CameraX => Value::Number(self.camera.x),
            P::CameraY => Value::Number(self.camera.y),
            P::CameraZ => Value::Number(self.camera.z),
            P::CameraFov => Value::Number(self.camera.fov),
            P::CameraNear => Value::Number(self.camera.near),
            P::CameraFar => Value::Number(self.camera.far),
            P::LightColor => Value::Text(self.light.color.to_hex()),
            P::LightEnable => Value::Bool(self.light.enable),
            P::LightAutoRotate => Value::Bool(self.light.auto_rotate),
            P::LightShadow => Value::Bool(self.light.shadow),
            P::LightDecay => Value::Number(self.light.decay),
            P::LightPower => Value::Number(self.light.power),
            P::LightX => Value::Number(self.light.x),
            P::LightY => Value::Number(self.light.y),
            P::LightZ => Value::Number(self.light.z),
            P::AffineMode => Value::Text(self.affine.mode.name().to_string()),
            P::AnimationKind => Value::Text(self.animation.kind.name().to_string()),
            P::AnimationValue => Value::Number(self.animation.value),
            P::BonusText => Value::Text(self.bonus.text.clone()),
            P::BonusSize => Value::Number(self.bonus.text_geometry.size),
            P::BonusHeight => Value::Number(self.bonus.text_geometry.height),
            P::BonusCurveSegments => Value::Number(self.bonus.text_geometry.curve_segments),
        }
    }

    /// Write one leaf, returning the value actually stored.
    ///
    /// Numbers outside the declared range are clamped; non-finite numbers,
    /// unknown option names, malformed colors and mismatched value types are
    /// rejected and leave the settings unchanged. Unknown shape names are the
    /// exception: they fall back to a cube.
    pub fn set(&mut self, path: SettingPath, value: Value) -> Result<Value, SettingsError> {
        use SettingPath as P;

        match path.control() {
            Control::Slider { min, max, .. } => {
                let n = value
                    .as_number()
                    .ok_or_else(|| SettingsError::invalid(path.key(), "expected a number"))?;
                if !n.is_finite() {
                    return Err(SettingsError::invalid(path.key(), "value is not finite"));
                }
                let n = n.clamp(min, max);
                *self.number_mut(path) = n;
                Ok(Value::Number(n))
            }
            Control::Toggle => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| SettingsError::invalid(path.key(), "expected a boolean"))?;
                match path {
                    P::DisplayAutoRotate => self.display.auto_rotate = b,
                    P::DisplayShowAxes => self.display.show_axes = b,
                    P::LightEnable => self.light.enable = b,
                    P::LightAutoRotate => self.light.auto_rotate = b,
                    P::LightShadow => self.light.shadow = b,
                    _ => unreachable!("{path} is not a toggle"),
                }
                Ok(Value::Bool(b))
            }
            Control::Choice(_) => {
                match path {
                    P::GeometryShape => {
                        let name = value
                            .as_text()
                            .ok_or_else(|| SettingsError::invalid(path.key(), "expected an option name"))?;
                        self.geometry.shape = ShapeKind::parse_lenient(name);
                    }
                    P::GeometryMaterial => self.geometry.material = parse_choice(path, &value)?,
                    P::AffineMode => self.affine.mode = parse_choice(path, &value)?,
                    P::AnimationKind => self.animation.kind = parse_choice(path, &value)?,
                    _ => unreachable!("{path} is not a choice"),
                }
                Ok(self.get(path))
            }
            Control::Text => {
                let text = value
                    .as_text()
                    .ok_or_else(|| SettingsError::invalid(path.key(), "expected text"))?
                    .to_string();
                match path {
                    P::GeometryTextureUrl => self.geometry.texture_url = text.trim().to_string(),
                    P::BonusText => self.bonus.text = text,
                    _ => unreachable!("{path} is not a text field"),
                }
                Ok(self.get(path))
            }
            Control::Color => {
                let hex = value
                    .as_text()
                    .ok_or_else(|| SettingsError::invalid(path.key(), "expected a hex color"))?;
                HexColor(&mut self.light.color).set_value(hex)?;
                Ok(self.get(path))
            }
        }
    }

    fn number_mut(&mut self, path: SettingPath) -> &mut f32 {
        use SettingPath as P;
        match path {
            P::DisplayScale => &mut self.display.scale,
            P::CameraX => &mut self.camera.x,
            P::CameraY => &mut self.camera.y,
            P::CameraZ => &mut self.camera.z,
            P::CameraFov => &mut self.camera.fov,
            P::CameraNear => &mut self.camera.near,
            P::CameraFar => &mut self.camera.far,
            P::LightDecay => &mut self.light.decay,
            P::LightPower => &mut self.light.power,
            P::LightX => &mut self.light.x,
            P::LightY => &mut self.light.y,
            P::LightZ => &mut self.light.z,
            P::AnimationValue => &mut self.animation.value,
            P::BonusSize => &mut self.bonus.text_geometry.size,
            P::BonusHeight => &mut self.bonus.text_geometry.height,
            P::BonusCurveSegments => &mut self.bonus.text_geometry.curve_segments,
            _ => unreachable!("{path} is not numeric"),
        }
    }

    /// Clamp every numeric leaf into its declared range.
    ///
    /// Used after deserializing a config file, where values bypass [`Settings::set`].
    pub fn sanitize(&mut self) {
        for &path in SettingPath::ALL {
            if let Control::Slider { min, max, .. } = path.control() {
                let slot = self.number_mut(path);
                *slot = if slot.is_finite() { slot.clamp(min, max) } else { min.max(0.0).min(max) };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.display.scale, 2.0);
        assert!(s.display.show_axes);
        assert_eq!(s.geometry.shape, ShapeKind::Cube);
        assert_eq!(s.geometry.material, MaterialKind::Basic);
        assert_eq!((s.camera.x, s.camera.y, s.camera.z), (0.0, 4.0, 17.0));
        assert_eq!(s.camera.fov, 80.0);
        assert_eq!(s.camera.near, 0.1);
        assert_eq!(s.camera.far, 20.0);
        assert_eq!(s.affine.mode, AffineMode::None);
        assert_eq!(s.animation.kind, AnimationKind::None);
        assert_eq!(s.bonus.text, "Hello World");
        assert!((s.light.intensity() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_numbers_are_clamped() {
        let mut s = Settings::default();

        let stored = s.set(SettingPath::CameraFov, Value::Number(500.0)).unwrap();
        assert_eq!(stored, Value::Number(180.0));
        assert_eq!(s.camera.fov, 180.0);

        s.set(SettingPath::DisplayScale, Value::Number(-3.0)).unwrap();
        assert_eq!(s.display.scale, 0.1);

        s.set(SettingPath::LightX, Value::Number(12.5)).unwrap();
        assert_eq!(s.light.x, 12.5);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut s = Settings::default();
        let err = s.set(SettingPath::CameraNear, Value::Number(f32::NAN)).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidParameter { .. }));
        assert_eq!(s.camera.near, 0.1);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut s = Settings::default();
        assert!(s.set(SettingPath::DisplayShowAxes, Value::Number(1.0)).is_err());
        assert!(s.set(SettingPath::CameraX, Value::Bool(true)).is_err());
        assert!(s.display.show_axes);
    }

    #[test]
    fn test_choices() {
        let mut s = Settings::default();

        s.set(SettingPath::GeometryMaterial, Value::Text("lines".into())).unwrap();
        assert_eq!(s.geometry.material, MaterialKind::Lines);

        let err = s
            .set(SettingPath::GeometryMaterial, Value::Text("pink".into()))
            .unwrap_err();
        assert!(err.to_string().contains("geometry.material"));
        assert_eq!(s.geometry.material, MaterialKind::Lines);

        s.set(SettingPath::AnimationKind, Value::Text("Circle".into())).unwrap();
        assert_eq!(s.animation.kind, AnimationKind::Circle);
    }

    #[test]
    fn test_unknown_shape_falls_back_to_cube() {
        let mut s = Settings::default();
        s.set(SettingPath::GeometryShape, Value::Text("sphere".into())).unwrap();
        assert_eq!(s.geometry.shape, ShapeKind::Sphere);

        let stored = s.set(SettingPath::GeometryShape, Value::Text("dodecahedron".into())).unwrap();
        assert_eq!(stored, Value::Text("cube".into()));
        assert_eq!(s.geometry.shape, ShapeKind::Cube);
    }

    #[test]
    fn test_hex_color_adapter() {
        let mut color = Rgb::WHITE;
        let mut adapter = HexColor(&mut color);
        assert_eq!(adapter.value(), "#ffffff");

        adapter.set_value("#ff8000").unwrap();
        assert_eq!(adapter.value(), "#ff8000");
        adapter.set_value("0f0").unwrap();
        assert_eq!(adapter.value(), "#00ff00");

        assert!(adapter.set_value("#ggg000").is_err());
        assert!(adapter.set_value("#12345").is_err());
        assert_eq!(color, Rgb::from_u32(0x00ff00));
    }

    #[test]
    fn test_path_keys_round_trip() {
        for &path in SettingPath::ALL {
            assert_eq!(SettingPath::from_key(path.key()), Some(path));
        }
        assert_eq!(SettingPath::from_key("camera.zoom"), None);
    }

    #[test]
    fn test_every_path_readable_and_writable() {
        let mut s = Settings::default();
        for &path in SettingPath::ALL {
            let current = s.get(path);
            assert_eq!(s.set(path, current.clone()).unwrap(), current, "{path}");
        }
    }

    #[test]
    fn test_sanitize() {
        let mut s = Settings::default();
        s.camera.far = 1000.0;
        s.bonus.text_geometry.size = f32::INFINITY;
        s.sanitize();
        assert_eq!(s.camera.far, 150.0);
        assert_eq!(s.bonus.text_geometry.size, 0.0);
    }
}
