use glam::Vec3;
use rand::Rng;

use crate::mesh::SurfaceMesh;

/// A random point on a surface mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Index of the source triangle.
    pub triangle: usize,
    /// Folded parameters; both non-negative with `r1 + r2 <= 1`.
    pub r1: f32,
    pub r2: f32,
    /// Point in mesh-local space.
    pub point: Vec3,
}

/// Fold a point of the unit parallelogram back into the unit triangle.
pub fn fold_into_triangle(r1: f32, r2: f32) -> (f32, f32) {
    if r1 + r2 > 1.0 {
        (1.0 - r1, 1.0 - r2)
    } else {
        (r1, r2)
    }
}

/// Pick a random point on `mesh`, or `None` if it has no triangles.
///
/// The triangle is chosen uniformly by index, not by area, so small
/// triangles receive as many samples as large ones. Within the chosen
/// triangle the point is uniform.
pub fn sample_surface(mesh: &SurfaceMesh, rng: &mut impl Rng) -> Option<SurfaceSample> {
    let count = mesh.triangle_count();
    if count == 0 {
        return None;
    }
    let triangle = rng.random_range(0..count);
    let tri = mesh.triangle(triangle)?;

    let (r1, r2) = fold_into_triangle(rng.random::<f32>(), rng.random::<f32>());
    Some(SurfaceSample {
        triangle,
        r1,
        r2,
        point: tri.point_at(r1, r2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn folding_keeps_points_inside() {
        assert_eq!(fold_into_triangle(0.25, 0.5), (0.25, 0.5));
        assert_eq!(fold_into_triangle(0.75, 0.5), (0.25, 0.5));
        let (a, b) = fold_into_triangle(0.9, 0.8);
        assert!(a >= 0.0 && b >= 0.0 && a + b <= 1.0);
    }

    #[test]
    fn empty_mesh_yields_no_sample() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_surface(&SurfaceMesh::default(), &mut rng), None);
    }

    #[test]
    fn samples_lie_in_their_triangle() {
        let mesh = SurfaceMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(3.0, 1.0, 0.0),
                Vec3::new(0.0, 2.0, 4.0),
                Vec3::new(-2.0, 0.5, 1.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..2_000 {
            let s = sample_surface(&mesh, &mut rng).unwrap();
            assert!(s.r1 >= 0.0 && s.r2 >= 0.0 && s.r1 + s.r2 <= 1.0 + 1e-6);

            let tri = mesh.triangle(s.triangle).unwrap();
            let rs = tri.barycentric(s.point).unwrap();
            assert!(rs.x >= -1e-4 && rs.y >= -1e-4, "{rs:?}");
            assert!(rs.x + rs.y <= 1.0 + 1e-4, "{rs:?}");
        }
    }

    /// Triangle choice ignores area: a tiny and a huge triangle are picked
    /// about equally often.
    #[test]
    fn triangle_choice_is_uniform_by_index_not_area() {
        let mesh = SurfaceMesh::new(
            vec![
                Vec3::ZERO,
                Vec3::new(0.01, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.01),
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 100.0),
            ],
            vec![0, 2, 1, 0, 4, 3],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(99);

        let n = 10_000;
        let small = (0..n)
            .filter(|_| sample_surface(&mesh, &mut rng).unwrap().triangle == 0)
            .count();
        let share = small as f32 / n as f32;
        assert!((0.45..0.55).contains(&share), "small triangle share {share}");
    }

    #[test]
    fn same_seed_same_samples() {
        let mesh = SurfaceMesh::plane(4.0, 4.0, 2);
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            assert_eq!(
                sample_surface(&mesh, &mut a),
                sample_surface(&mesh, &mut b)
            );
        }
    }
}
