use glam::{Vec2, Vec3};

/// Errors from building a surface mesh.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndices(usize),
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// A triangle in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// `a + r1 * (b - a) + r2 * (c - a)`.
    pub fn point_at(&self, r1: f32, r2: f32) -> Vec3 {
        self.a + r1 * (self.b - self.a) + r2 * (self.c - self.a)
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.b - self.a).cross(self.c - self.a).length()
    }

    /// Coordinates `(r1, r2)` of `p` in the `point_at` parametrization.
    ///
    /// `p` is assumed to lie in the triangle's plane. Returns `None` for a
    /// degenerate triangle.
    pub fn barycentric(&self, p: Vec3) -> Option<Vec2> {
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let d = p - self.a;
        let d11 = e1.dot(e1);
        let d12 = e1.dot(e2);
        let d22 = e2.dot(e2);
        let denom = d11 * d22 - d12 * d12;
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let d1 = d.dot(e1);
        let d2 = d.dot(e2);
        Some(Vec2::new(
            (d22 * d1 - d12 * d2) / denom,
            (d11 * d2 - d12 * d1) / denom,
        ))
    }
}

/// Read-only vertex and triangle-index arrays of a surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Build a mesh, checking that indices form whole, in-range triangles.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Most cells per side [`SurfaceMesh::plane`] will build.
    pub const MAX_PLANE_SUBDIVISIONS: u32 = 1024;

    /// Flat grid on the XZ plane centred on the origin, `subdivisions` cells
    /// per side, two triangles per cell. `subdivisions` is clamped to
    /// `1..=MAX_PLANE_SUBDIVISIONS`.
    pub fn plane(width: f32, depth: f32, subdivisions: u32) -> Self {
        let n = plane_cells(subdivisions);
        let stride = n + 1;
        let mut vertices = Vec::with_capacity(stride as usize * stride as usize);
        for row in 0..=n {
            for col in 0..=n {
                vertices.push(Vec3::new(
                    (col as f32 / n as f32 - 0.5) * width,
                    0.0,
                    (row as f32 / n as f32 - 0.5) * depth,
                ));
            }
        }

        let mut indices = Vec::with_capacity(n as usize * n as usize * 6);
        for row in 0..n {
            for col in 0..n {
                let i = row * stride + col;
                indices.extend_from_slice(&[
                    i,
                    i + stride,
                    i + 1,
                    i + 1,
                    i + stride,
                    i + stride + 1,
                ]);
            }
        }
        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let tri = self.indices.get(index * 3..index * 3 + 3)?;
        Some(Triangle::new(
            self.vertices[tri[0] as usize],
            self.vertices[tri[1] as usize],
            self.vertices[tri[2] as usize],
        ))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).filter_map(|i| self.triangle(i))
    }
}

fn plane_cells(subdivisions: u32) -> u32 {
    if subdivisions > SurfaceMesh::MAX_PLANE_SUBDIVISIONS {
        tracing::warn!(
            requested = subdivisions,
            max = SurfaceMesh::MAX_PLANE_SUBDIVISIONS,
            "plane subdivisions clamped"
        );
    }
    subdivisions.clamp(1, SurfaceMesh::MAX_PLANE_SUBDIVISIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Z)
    }

    #[test]
    fn ragged_indices_are_rejected() {
        let err = SurfaceMesh::new(vec![Vec3::ZERO; 3], vec![0, 1]).unwrap_err();
        assert_eq!(err, MeshError::RaggedIndices(2));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = SurfaceMesh::new(vec![Vec3::ZERO; 3], vec![0, 1, 3]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                position: 2,
                index: 3,
                ..
            }
        ));
    }

    #[test]
    fn empty_mesh_has_no_triangles() {
        let mesh = SurfaceMesh::new(Vec::new(), Vec::new()).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle(0), None);
    }

    #[test]
    fn plane_covers_requested_area() {
        let mesh = SurfaceMesh::plane(10.0, 4.0, 3);
        assert_eq!(mesh.triangle_count(), 18);
        let area: f32 = mesh.triangles().map(|t| t.area()).sum();
        assert!((area - 40.0).abs() < 1e-3);
    }

    #[test]
    fn plane_cells_are_clamped() {
        assert_eq!(plane_cells(0), 1);
        assert_eq!(plane_cells(16), 16);
        assert_eq!(plane_cells(u32::MAX), SurfaceMesh::MAX_PLANE_SUBDIVISIONS);
    }

    #[test]
    fn oversized_plane_is_built_at_the_cap() {
        let mesh = SurfaceMesh::plane(1.0, 1.0, 70_000);
        let n = SurfaceMesh::MAX_PLANE_SUBDIVISIONS as usize;
        assert_eq!(mesh.vertices().len(), (n + 1) * (n + 1));
        assert_eq!(mesh.triangle_count(), n * n * 2);
        let last = *mesh.indices().iter().max().unwrap() as usize;
        assert_eq!(last, mesh.vertices().len() - 1);
    }

    #[test]
    fn barycentric_inverts_point_at() {
        let tri = Triangle::new(
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(4.0, 1.0, 1.0),
            Vec3::new(2.0, 0.0, 5.0),
        );
        let p = tri.point_at(0.2, 0.3);
        let rs = tri.barycentric(p).unwrap();
        assert!((rs.x - 0.2).abs() < 1e-5);
        assert!((rs.y - 0.3).abs() < 1e-5);
    }

    #[test]
    fn degenerate_triangle_has_no_barycentric() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(tri.barycentric(Vec3::X), None);
        assert_eq!(unit_triangle().area(), 0.5);
    }
}
