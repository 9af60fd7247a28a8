//! Object factory - maps shape/material selections to renderable descriptors
//!
//! Descriptors are plain data. The scene crate turns them into meshes and
//! materials; nothing here touches scene membership.

use serde::{Deserialize, Serialize};

use crate::settings::{MaterialKind, Rgb, Settings, ShapeKind, TextParams};

/// Reserved name of the primary object
pub const OBJECT_NAME: &str = "object";

/// Color shared by the basic and point materials
pub const OBJECT_COLOR: Rgb = Rgb::from_u32(0x00ffff);

/// Point size for the point-cloud material
pub const POINT_SIZE: f32 = 0.1;

/// Geometry with its literal dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometrySpec {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    /// Externally supplied parametric mesh; all surface patches enabled
    Teapot {
        size: f32,
        lid: bool,
        body: bool,
        bottom: bool,
        fit_lid: bool,
        blinn: bool,
    },
    /// Extruded text, centered on its bounding box
    Text { text: String, params: TextParams },
}

impl GeometrySpec {
    /// Needs an asynchronous load before it can be meshed
    pub fn is_async(&self) -> bool {
        matches!(self, GeometrySpec::Teapot { .. } | GeometrySpec::Text { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            GeometrySpec::Cuboid { .. } => "cube",
            GeometrySpec::Sphere { .. } => "sphere",
            GeometrySpec::Cone { .. } => "cone",
            GeometrySpec::Cylinder { .. } => "cylinder",
            GeometrySpec::Torus { .. } => "wheel",
            GeometrySpec::Teapot { .. } => "teapot",
            GeometrySpec::Text { .. } => "text",
        }
    }
}

/// Material description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialSpec {
    /// Lit, fixed color
    Phong { color: Rgb },
    /// Rendered as a point cloud
    Points { color: Rgb, size: f32 },
    /// Shaded by surface normal
    Normal { wireframe: bool },
    /// Unlit, image mapped
    Textured { url: String },
}

impl MaterialSpec {
    pub fn render_kind(&self) -> RenderKind {
        match self {
            MaterialSpec::Points { .. } => RenderKind::Points,
            _ => RenderKind::Mesh,
        }
    }
}

/// How the primary object is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderKind {
    #[default]
    Mesh,
    Points,
}

/// Everything needed to realise the primary object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    pub name: &'static str,
    pub geometry: GeometrySpec,
    pub material: MaterialSpec,
    pub render: RenderKind,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub scale: f32,
}

/// Bundled flower textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexturePreset {
    Pink,
    Yellow,
    Purple,
}

impl TexturePreset {
    pub const ALL: &'static [TexturePreset] = &[Self::Pink, Self::Yellow, Self::Purple];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pink => "pink",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Pink => "textures/pink-flower.jpg",
            Self::Yellow => "textures/yellow-flower.jpg",
            Self::Purple => "textures/purple-flower.jpg",
        }
    }

    /// Resolve a texture field entry: preset names map to bundled files,
    /// anything else is used verbatim as a URL.
    pub fn resolve(input: &str) -> String {
        let trimmed = input.trim();
        Self::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed))
            .map(|p| p.path().to_string())
            .unwrap_or_else(|| trimmed.to_string())
    }
}

pub fn build_geometry(shape: ShapeKind) -> GeometrySpec {
    match shape {
        ShapeKind::Cube => GeometrySpec::Cuboid {
            width: 2.0,
            height: 2.0,
            depth: 2.0,
        },
        ShapeKind::Sphere => GeometrySpec::Sphere {
            radius: 1.5,
            width_segments: 100,
            height_segments: 100,
        },
        ShapeKind::Cone => GeometrySpec::Cone {
            radius: 2.0,
            height: 2.0,
            radial_segments: 20,
            height_segments: 20,
        },
        ShapeKind::Cylinder => GeometrySpec::Cylinder {
            radius_top: 1.5,
            radius_bottom: 1.5,
            height: 2.0,
            radial_segments: 20,
            height_segments: 20,
        },
        ShapeKind::Wheel => GeometrySpec::Torus {
            radius: 1.0,
            tube: 0.5,
            radial_segments: 20,
            tubular_segments: 20,
        },
        ShapeKind::Teapot => GeometrySpec::Teapot {
            size: 1.0,
            lid: true,
            body: true,
            bottom: true,
            fit_lid: true,
            blinn: true,
        },
    }
}

pub fn build_material(kind: MaterialKind) -> MaterialSpec {
    match kind {
        MaterialKind::Basic => MaterialSpec::Phong { color: OBJECT_COLOR },
        MaterialKind::Point => MaterialSpec::Points {
            color: OBJECT_COLOR,
            size: POINT_SIZE,
        },
        MaterialKind::Lines => MaterialSpec::Normal { wireframe: true },
        MaterialKind::Solid => MaterialSpec::Normal { wireframe: false },
    }
}

/// Returns `None` for an empty URL
pub fn build_texture_material(url: &str) -> Option<MaterialSpec> {
    let url = TexturePreset::resolve(url);
    (!url.is_empty()).then_some(MaterialSpec::Textured { url })
}

pub fn build_text_geometry(text: &str, params: TextParams) -> GeometrySpec {
    GeometrySpec::Text {
        text: text.to_string(),
        params,
    }
}

/// Descriptor for a new primary object, copying shadow and scale state from settings
pub fn describe(settings: &Settings, geometry: GeometrySpec, material: MaterialSpec) -> ObjectDescriptor {
    ObjectDescriptor {
        name: OBJECT_NAME,
        render: material.render_kind(),
        geometry,
        material,
        cast_shadow: settings.light.shadow,
        receive_shadow: false,
        scale: settings.display.scale,
    }
}
