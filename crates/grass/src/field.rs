use diorama_common::{MaterialId, MeshHandle, Transform};
use diorama_render::RenderBackend;
use glam::Mat4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::blade::BladeMesh;
use crate::mesh::SurfaceMesh;
use crate::sampler::sample_surface;

/// Tunables for [`GrassField`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Number of blades to scatter.
    pub count: usize,
    pub blade_width: f32,
    pub blade_height: f32,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            blade_width: 0.1,
            blade_height: 1.0,
            seed: None,
        }
    }
}

/// A fixed set of blade instances scattered over a surface, drawn with one
/// instanced call per batch every frame.
#[derive(Debug, Clone)]
pub struct GrassField {
    blade: BladeMesh,
    mesh: MeshHandle,
    material: MaterialId,
    placements: Vec<Transform>,
    matrices: Vec<Mat4>,
}

impl GrassField {
    /// Largest instance batch submitted in one draw call.
    pub const MAX_INSTANCES_PER_DRAW: usize = 1023;

    /// Scatter `config.count` blades over `surface`.
    ///
    /// `mesh` is the handle the host uploaded [`GrassField::blade`] under.
    pub fn initialize(
        surface: &SurfaceMesh,
        local_to_world: Mat4,
        config: &GrassConfig,
        mesh: MeshHandle,
        material: MaterialId,
    ) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let placements = scatter(surface, local_to_world, config.count, &mut rng);
        let matrices = placements.iter().map(Transform::to_matrix).collect();
        Self {
            blade: BladeMesh::new(config.blade_width, config.blade_height),
            mesh,
            material,
            placements,
            matrices,
        }
    }

    pub fn blade(&self) -> &BladeMesh {
        &self.blade
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn placements(&self) -> &[Transform] {
        &self.placements
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Submit this frame's draws.
    pub fn draw(&self, backend: &mut dyn RenderBackend) {
        for batch in self.matrices.chunks(Self::MAX_INSTANCES_PER_DRAW) {
            backend.draw_instanced(self.mesh, self.material, batch);
        }
    }
}

/// Place `count` blades on `surface`: world-space position on the mesh,
/// random yaw in `[0, 360)`, unit scale.
///
/// A surface without triangles yields no placements.
pub fn scatter(
    surface: &SurfaceMesh,
    local_to_world: Mat4,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Transform> {
    if surface.is_empty() {
        tracing::warn!(count, "surface mesh has no triangles, grass disabled");
        return Vec::new();
    }

    let placements: Vec<Transform> = (0..count)
        .filter_map(|_| {
            let sample = sample_surface(surface, rng)?;
            let position = local_to_world.transform_point3(sample.point);
            let yaw = rng.random_range(0.0..360.0);
            Some(Transform::from_position_yaw(position, yaw))
        })
        .collect();

    tracing::debug!(
        requested = count,
        placed = placements.len(),
        triangles = surface.triangle_count(),
        "grass scattered"
    );
    placements
}
