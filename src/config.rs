//! Startup configuration.
//!
//! Everything here is read once when a [`Session`](crate::extra::session::Session) is built. There
//! is no runtime reconfiguration.

use thiserror::Error;

use crate::{extra::camera_controller::CameraController, mesh::DEFAULT_CONE_SEGMENTS, Viewport};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("viewport must not be empty, got {width}x{height}")]
    EmptyViewport { width: usize, height: usize },
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near {near} and far {far}")]
    ClipPlanes { near: f32, far: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("cones need at least 3 segments, got {0}")]
    ConeSegments(usize),
}

/// Renderer, controller and world generation constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// Field of view in degrees.
    pub fov: f32,
    /// Near and far planes. The projector only rejects points behind the camera, these merely
    /// describe the intended visible range.
    pub near: f32,
    pub far: f32,
    /// World units per tick.
    pub move_speed: f32,
    /// Radians per tick.
    pub rotation_speed: f32,
    pub box_count: usize,
    pub cone_count: usize,
    /// Objects spawn at integer `(x, z)` within `[-spawn_extent, spawn_extent]`.
    pub spawn_extent: u32,
    pub eye_height: f32,
    pub box_half_size: f32,
    pub cone_radius: f32,
    pub cone_height: f32,
    pub cone_segments: usize,
    /// World generation seed. Hosts pick one when unset.
    pub seed: Option<u64>,
    pub overlay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov: 90.0,
            near: 0.1,
            far: 100.0,
            move_speed: 0.2,
            rotation_speed: 0.05,
            box_count: 20,
            cone_count: 10,
            spawn_extent: 20,
            eye_height: 1.5,
            box_half_size: 1.0,
            cone_radius: 1.0,
            cone_height: 2.0,
            cone_segments: DEFAULT_CONE_SEGMENTS,
            seed: None,
            overlay: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }

        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov));
        }

        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }

        for (name, value) in [
            ("move_speed", self.move_speed),
            ("rotation_speed", self.rotation_speed),
            ("box_half_size", self.box_half_size),
            ("cone_radius", self.cone_radius),
            ("cone_height", self.cone_height),
        ] {
            // Negated so NaN is rejected too.
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if self.cone_segments < 3 {
            return Err(ConfigError::ConeSegments(self.cone_segments));
        }

        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.fov)
    }

    pub fn controller(&self) -> CameraController {
        CameraController {
            move_speed: self.move_speed,
            rotation_speed: self.rotation_speed,
        }
    }

    /// Distance from the world origin to the farthest spawn corner.
    pub fn spawn_radius(&self) -> f32 {
        libm::sqrtf(2.0) * self.spawn_extent as f32
    }
}
