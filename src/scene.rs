//! World objects and the camera looking at them.

use alloc::vec::Vec;

use rand::Rng;
use tracing::debug;

use crate::{config::Config, mesh::Mesh, Camera, Vector3};

/// Fixed set of world objects and the single camera.
///
/// Objects can not be added or removed once the scene is built, only the camera moves.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub camera: Camera,
    objects: Vec<Mesh>,
}

impl Scene {
    pub fn new(camera: Camera, objects: Vec<Mesh>) -> Self {
        Self { camera, objects }
    }

    /// Scatters boxes and cones over the spawn square and places the camera at eye height.
    ///
    /// Boxes come first in the object list, then cones. The same generator state always
    /// produces the same world.
    pub fn generate(config: &Config, rng: &mut impl Rng) -> Self {
        let mut objects = Vec::with_capacity(config.box_count + config.cone_count);

        for _ in 0..config.box_count {
            let position = spawn_point(config.spawn_extent, rng);
            objects.push(Mesh::cuboid(position, config.box_half_size, rng));
        }

        for _ in 0..config.cone_count {
            let position = spawn_point(config.spawn_extent, rng);
            objects.push(Mesh::cone(
                position,
                config.cone_radius,
                config.cone_height,
                config.cone_segments,
                rng,
            ));
        }

        debug!(
            boxes = config.box_count,
            cones = config.cone_count,
            extent = config.spawn_extent,
            "generated scene"
        );

        Self::new(
            Camera::new(Vector3::new(0.0, config.eye_height, 0.0)),
            objects,
        )
    }

    pub fn objects(&self) -> &[Mesh] {
        &self.objects
    }
}

fn spawn_point(extent: u32, rng: &mut impl Rng) -> Vector3 {
    let extent = i64::from(extent);
    let x = rng.gen_range(-extent..=extent);
    let z = rng.gen_range(-extent..=extent);
    Vector3::new(x as f32, 0.0, z as f32)
}
