use glam::{Vec2, Vec3};

/// A single grass blade: an upright quad rooted at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BladeMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u16>,
}

impl BladeMesh {
    pub fn new(width: f32, height: f32) -> Self {
        let half = width * 0.5;
        let positions = vec![
            Vec3::new(-half, 0.0, 0.0),
            Vec3::new(half, 0.0, 0.0),
            Vec3::new(-half, height, 0.0),
            Vec3::new(half, height, 0.0),
        ];
        let indices = vec![0, 2, 1, 2, 3, 1];
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        let normals = vertex_normals(&positions, &indices);
        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    pub fn height(&self) -> f32 {
        self.positions.iter().map(|p| p.y).fold(0.0, f32::max)
    }
}

/// Area-weighted vertex normals from face winding.
fn vertex_normals(positions: &[Vec3], indices: &[u16]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(Vec3::normalize_or_zero).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blade_is_a_rooted_quad() {
        let blade = BladeMesh::new(0.1, 1.0);
        assert_eq!(blade.positions.len(), 4);
        assert_eq!(blade.indices, vec![0, 2, 1, 2, 3, 1]);
        assert_eq!(blade.height(), 1.0);
        assert!(blade.positions.iter().all(|p| p.y >= 0.0));
        assert!((blade.positions[1].x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn normals_are_shared_and_unit_length() {
        let blade = BladeMesh::new(0.2, 2.0);
        let first = blade.normals[0];
        assert!((first.length() - 1.0).abs() < 1e-6);
        assert!(blade.normals.iter().all(|n| (*n - first).length() < 1e-6));
        assert!(first.z.abs() > 0.99);
    }
}
