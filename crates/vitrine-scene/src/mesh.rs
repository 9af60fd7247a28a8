//! Mesh construction and render-mode conversions for the primary object

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, VertexAttributeValues};
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use std::collections::HashSet;

use vitrine_core::GeometrySpec;

/// Attributes carried over when a mesh changes topology
const CARRIED_ATTRIBUTES: [bevy::mesh::MeshVertexAttribute; 4] = [
    Mesh::ATTRIBUTE_POSITION,
    Mesh::ATTRIBUTE_NORMAL,
    Mesh::ATTRIBUTE_UV_0,
    Mesh::ATTRIBUTE_COLOR,
];

/// Build a triangle mesh for a procedural geometry.
///
/// Teapot and text geometry come from loaded assets and return `None` here.
pub fn primitive_mesh(geometry: &GeometrySpec) -> Option<Mesh> {
    let mesh = match *geometry {
        GeometrySpec::Cuboid { width, height, depth } => Cuboid::new(width, height, depth).mesh().build(),
        GeometrySpec::Sphere {
            radius,
            width_segments,
            height_segments,
        } => Sphere::new(radius)
            .mesh()
            .uv(width_segments.max(3), height_segments.max(2)),
        GeometrySpec::Cone {
            radius,
            height,
            radial_segments,
            ..
        } => Cone { radius, height }
            .mesh()
            .resolution(radial_segments.max(3))
            .build(),
        GeometrySpec::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments,
        } => {
            if radius_top == radius_bottom {
                Cylinder::new(radius_top, height)
                    .mesh()
                    .resolution(radial_segments.max(3))
                    .segments(height_segments.max(1))
                    .build()
            } else {
                ConicalFrustum {
                    radius_top,
                    radius_bottom,
                    height,
                }
                .mesh()
                .resolution(radial_segments.max(3))
                .segments(height_segments.max(1))
                .build()
            }
        }
        GeometrySpec::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => Torus {
            minor_radius: tube,
            major_radius: radius,
        }
        .mesh()
        .minor_resolution(radial_segments.max(3) as usize)
        .major_resolution(tubular_segments.max(3) as usize)
        .build(),
        GeometrySpec::Teapot { .. } | GeometrySpec::Text { .. } => return None,
    };
    Some(mesh)
}

fn positions(mesh: &Mesh) -> Option<&[[f32; 3]]> {
    mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(VertexAttributeValues::as_float3)
}

fn with_topology(mesh: &Mesh, topology: PrimitiveTopology) -> Mesh {
    let mut out = Mesh::new(topology, RenderAssetUsages::default());
    for attribute in CARRIED_ATTRIBUTES {
        if let Some(values) = mesh.attribute(attribute.clone()) {
            out.insert_attribute(attribute, values.clone());
        }
    }
    out
}

/// Triangle indices, synthesised for non-indexed meshes
fn triangle_indices(mesh: &Mesh) -> Vec<u32> {
    match mesh.indices() {
        Some(indices) => indices.iter().map(|i| i as u32).collect(),
        None => (0..mesh.count_vertices() as u32).collect(),
    }
}

/// One point per vertex
pub fn to_point_cloud(mesh: &Mesh) -> Mesh {
    with_topology(mesh, PrimitiveTopology::PointList)
}

/// Line list of the unique triangle edges
pub fn to_wireframe(mesh: &Mesh) -> Mesh {
    let triangles = triangle_indices(mesh);
    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(triangles.len() * 2);

    for tri in triangles.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let edge = (a.min(b), a.max(b));
            if a != b && seen.insert(edge) {
                lines.extend([edge.0, edge.1]);
            }
        }
    }

    with_topology(mesh, PrimitiveTopology::LineList).with_inserted_indices(Indices::U32(lines))
}

/// Write `normal * 0.5 + 0.5` into the vertex colors, computing normals first
/// if the mesh has none
pub fn bake_normal_colors(mesh: &mut Mesh) {
    if mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_none()
        && mesh.primitive_topology() == PrimitiveTopology::TriangleList
    {
        mesh.compute_normals();
    }

    let colors: Vec<[f32; 4]> = match mesh
        .attribute(Mesh::ATTRIBUTE_NORMAL)
        .and_then(VertexAttributeValues::as_float3)
    {
        Some(normals) => normals
            .iter()
            .map(|n| [n[0] * 0.5 + 0.5, n[1] * 0.5 + 0.5, n[2] * 0.5 + 0.5, 1.0])
            .collect(),
        None => vec![[0.5, 0.5, 1.0, 1.0]; mesh.count_vertices()],
    };
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
}

/// Center of the axis-aligned bounding box of `points`
pub fn bounding_center(points: &[[f32; 3]]) -> Vec3 {
    let Some(first) = points.first() else {
        return Vec3::ZERO;
    };
    let (min, max) = points.iter().fold(
        (Vec3::from_array(*first), Vec3::from_array(*first)),
        |(min, max), p| {
            let p = Vec3::from_array(*p);
            (min.min(p), max.max(p))
        },
    );
    (min + max) * 0.5
}

/// Triangle mesh from a flat `[x, y, z, x, y, z, ..]` vertex list, centered
/// on its bounding box
pub fn centered_triangle_mesh(vertices: &[f32]) -> Mesh {
    let mut points: Vec<[f32; 3]> = vertices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
    let center = bounding_center(&points);
    for p in &mut points {
        p[0] -= center.x;
        p[1] -= center.y;
        p[2] -= center.z;
    }

    let uvs = vec![[0.0f32, 0.0]; points.len()];
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, points)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    if mesh.count_vertices() >= 3 {
        mesh.compute_normals();
    }
    mesh
}

/// Copy of a loaded mesh uniformly scaled about the origin
pub fn scaled(mesh: &Mesh, factor: f32) -> Mesh {
    let mut out = mesh.clone();
    if factor != 1.0 {
        if let Some(points) = positions(mesh) {
            let scaled: Vec<[f32; 3]> = points
                .iter()
                .map(|p| [p[0] * factor, p[1] * factor, p[2] * factor])
                .collect();
            out.insert_attribute(Mesh::ATTRIBUTE_POSITION, scaled);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::factory::build_geometry;
    use vitrine_core::settings::{Choice, ShapeKind};

    fn quad() -> Mesh {
        // Two triangles sharing the 0-2 diagonal
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            )
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0f32, 0.0, 1.0]; 4])
            .with_inserted_indices(Indices::U32(vec![0, 1, 2, 0, 2, 3]))
    }

    #[test]
    fn test_procedural_shapes_build() {
        for &shape in ShapeKind::ALL {
            let mesh = primitive_mesh(&build_geometry(shape));
            if shape == ShapeKind::Teapot {
                assert!(mesh.is_none());
            } else {
                let mesh = mesh.unwrap_or_else(|| panic!("{} has no mesh", shape.name()));
                assert!(mesh.count_vertices() > 0);
            }
        }
    }

    #[test]
    fn test_wireframe_unique_edges() {
        let lines = to_wireframe(&quad());
        assert_eq!(lines.primitive_topology(), PrimitiveTopology::LineList);
        // 4 outer edges plus the shared diagonal
        assert_eq!(lines.indices().map(Indices::len), Some(10));
        assert_eq!(lines.count_vertices(), 4);
    }

    #[test]
    fn test_point_cloud_keeps_vertices() {
        let points = to_point_cloud(&quad());
        assert_eq!(points.primitive_topology(), PrimitiveTopology::PointList);
        assert_eq!(points.count_vertices(), 4);
        assert!(points.indices().is_none());
        assert!(points.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }

    #[test]
    fn test_normal_colors() {
        let mut mesh = quad();
        bake_normal_colors(&mut mesh);
        let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR) else {
            panic!("missing colors");
        };
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], [0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_text_mesh_is_centered() {
        let vertices = [
            2.0, 1.0, 0.0, 4.0, 1.0, 0.0, 4.0, 3.0, 0.0, //
            2.0, 1.0, 1.0, 4.0, 3.0, 1.0, 2.0, 3.0, 1.0,
        ];
        let mesh = centered_triangle_mesh(&vertices);
        let points = positions(&mesh).unwrap();
        assert_eq!(bounding_center(points), Vec3::ZERO);
        assert_eq!(points[0], [-1.0, -1.0, -0.5]);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }

    #[test]
    fn test_empty_text_mesh() {
        let mesh = centered_triangle_mesh(&[]);
        assert_eq!(mesh.count_vertices(), 0);
    }

    #[test]
    fn test_scaled() {
        let mesh = scaled(&quad(), 2.0);
        assert_eq!(positions(&mesh).unwrap()[2], [2.0, 2.0, 0.0]);
    }
}
