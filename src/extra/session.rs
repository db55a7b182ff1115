//! A running world: scene, controller and renderer ticked together.
//!
//! Hosts own a [`Session`] and call [`Session::tick`] once per frame with the latest keyboard
//! snapshot, then present the returned buffer.

use rand::Rng;
use tracing::{debug, warn};

use super::{camera_controller::CameraController, KeyboardState};
use crate::{
    config::{Config, ConfigError},
    raster::FrameBuffer,
    scene::Scene,
    Renderer,
};

#[derive(Debug)]
pub struct Session {
    pub scene: Scene,
    pub controller: CameraController,
    renderer: Renderer,
    frames: usize,
}

impl Session {
    /// Validates the config and generates a world with given generator.
    pub fn new(config: &Config, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;

        if config.far < config.spawn_radius() {
            warn!(
                far = config.far,
                spawn_radius = config.spawn_radius(),
                "far plane is shorter than the spawn area"
            );
        }

        let mut renderer = Renderer::new(config.viewport());
        renderer.set_overlay(config.overlay);

        debug!(
            width = config.width,
            height = config.height,
            fov = config.fov,
            seed = ?config.seed,
            "starting session"
        );

        Ok(Self::from_parts(
            Scene::generate(config, rng),
            config.controller(),
            renderer,
        ))
    }

    pub fn from_parts(scene: Scene, controller: CameraController, renderer: Renderer) -> Self {
        Self {
            scene,
            controller,
            renderer,
            frames: 0,
        }
    }

    /// Runs one tick: moves the camera, then renders the world as seen from its new position.
    pub fn tick(&mut self, keys: &KeyboardState) -> &FrameBuffer {
        self.controller.update(&mut self.scene.camera, keys);
        self.frames += 1;
        self.renderer.render_frame(&self.scene)
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Number of ticks run so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}
