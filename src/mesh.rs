//! Procedural convex meshes.

use alloc::{vec, vec::Vec};
use core::f32::consts::TAU;

use rand::Rng;

use crate::{color::Color, Vector3};

/// Number of base ring segments [`Mesh::cone`] callers usually want.
pub const DEFAULT_CONE_SEGMENTS: usize = 8;

/// An ordered list of vertex indices describing one planar polygon.
pub type Face = Vec<usize>;

/// Immutable polygon mesh placed in the world.
///
/// World space vertices are local vertices offset by `position`. There is no rotation or scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    vertices: Vec<Vector3>,
    faces: Vec<Face>,
    position: Vector3,
    color: Color,
}

impl Mesh {
    /// Builds a mesh from raw parts.
    ///
    /// Faces are not validated. Faces with less than 3 indices, or indices pointing past the
    /// vertex list, are simply not drawn.
    pub fn new(vertices: Vec<Vector3>, faces: Vec<Face>, position: Vector3, color: Color) -> Self {
        Self {
            vertices,
            faces,
            position,
            color,
        }
    }

    /// Axis aligned box spanning `±half_size` on each axis.
    ///
    /// Vertices are laid out as the back (`-Z`) quad followed by the front (`+Z`) quad, both
    /// counter-clockwise when seen from the front. Every face lists its corners in order around
    /// its edge, so the outline never crosses itself.
    pub fn cuboid(position: Vector3, half_size: f32, rng: &mut impl Rng) -> Self {
        let s = half_size;

        let vertices = vec![
            Vector3::new(-s, -s, -s),
            Vector3::new(s, -s, -s),
            Vector3::new(s, s, -s),
            Vector3::new(-s, s, -s),
            Vector3::new(-s, -s, s),
            Vector3::new(s, -s, s),
            Vector3::new(s, s, s),
            Vector3::new(-s, s, s),
        ];

        let faces = vec![
            vec![0, 1, 2, 3], // back
            vec![4, 5, 6, 7], // front
            vec![0, 3, 7, 4], // left
            vec![1, 5, 6, 2], // right
            vec![0, 4, 5, 1], // bottom
            vec![3, 2, 6, 7], // top
        ];

        Self::new(vertices, faces, position, Color::random_bright(rng))
    }

    /// Cone standing on the `Y` axis, centered at `position`.
    ///
    /// The first `segments` vertices form the base ring at `y = -height / 2`, the last vertex is
    /// the apex at `y = height / 2`. Face 0 is the base, followed by one triangle per segment.
    pub fn cone(
        position: Vector3,
        radius: f32,
        height: f32,
        segments: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let half = height / 2.0;

        let mut vertices: Vec<Vector3> = (0..segments)
            .map(|i| {
                let angle = TAU * i as f32 / segments as f32;
                Vector3::new(
                    radius * libm::cosf(angle),
                    -half,
                    radius * libm::sinf(angle),
                )
            })
            .collect();

        let apex = vertices.len();
        vertices.push(Vector3::new(0.0, half, 0.0));

        let mut faces = Vec::with_capacity(segments + 1);
        faces.push((0..segments).collect());
        faces.extend((0..segments).map(|i| vec![i, (i + 1) % segments, apex]));

        Self::new(vertices, faces, position, Color::random_bright(rng))
    }

    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Vertices in world space, in the same order as [`Mesh::vertices`].
    pub fn world_vertices(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.vertices.iter().map(|v| v + self.position)
    }
}
