//! # paintrend
//!
//! ```text
//!            +------+
//!           /|     /|        .
//!          +------+ |       / \
//!          | +----|-+      /   \      ___
//!          |/     |/      /_____\    |   |
//!          +------+                __|   |
//!                                 |______|
//! ```
//!
//! ## Painter's algorithm software renderer
//!
//! `paintrend` is a `no_std` compatible 3D rendering core. It draws a small world of convex meshes
//! into an RGB pixel buffer, in several stages:
//!
//! - Projection of every world vertex through a pinhole camera.
//! - Culling of objects with no vertex in front of the camera.
//! - Sorting of objects back to front by distance to the camera.
//! - Filling and outlining of every face, in sorted order.
//! - Static foreground overlay pass.
//!
//! There is no depth buffer. Nearer objects simply overwrite farther ones, and faces of a single
//! object are drawn in declaration order, so concave views of one mesh may self-occlude
//! incorrectly.
//!
//! Entrypoint to rendering is the [`Renderer`] struct, while [`extra::session::Session`] ties the
//! renderer, [`scene::Scene`] and [`extra::camera_controller::CameraController`] into a single
//! per-tick call.
//!
//! ## Example
//!
//! Please see [`demos/walkabout.rs`](demos/walkabout.rs) for a terminal host.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use nalgebra as na;
use tracing::trace;

pub mod color;
use color::Color;
pub mod config;
pub mod extra;
pub mod mesh;
pub mod raster;
use raster::FrameBuffer;
pub mod scene;
use scene::Scene;

pub type Vector3 = na::Vector3<f32>;
pub type Rotation3 = na::Rotation3<f32>;
/// Integer pixel coordinate. `Y` grows downward.
pub type ScreenPoint = na::Point2<i32>;

/// Pitch is kept within `[-PITCH_LIMIT, PITCH_LIMIT]` radians.
pub const PITCH_LIMIT: f32 = 1.5;

/// Describes the projection target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    /// Field of view in degrees.
    pub fov: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize, fov: f32) -> Self {
        Self { width, height, fov }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    fn ndc_to_screen(&self, x: f32, y: f32) -> ScreenPoint {
        // `as` saturates, which keeps points far off screen representable.
        ScreenPoint::new(
            ((x + 1.0) * self.width as f32 / 2.0) as i32,
            ((y + 1.0) * self.height as f32 / 2.0) as i32,
        )
    }
}

/// First person camera.
///
/// Camera space has `X` pointing right, `Y` up and `Z` forward. Yaw turns the camera right when
/// increased, pitch tilts it up.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    pub position: Vector3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zeros())
    }
}

impl Camera {
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Rotation about the vertical axis.
    pub fn yaw_rotation(&self) -> Rotation3 {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
    }

    /// Full camera orientation, mapping camera space directions to world space.
    pub fn orientation(&self) -> Rotation3 {
        self.yaw_rotation() * Rotation3::from_axis_angle(&Vector3::x_axis(), -self.pitch)
    }

    /// World space direction the camera looks at.
    pub fn forward(&self) -> Vector3 {
        self.orientation() * Vector3::z()
    }

    /// Transforms a world space point into camera space.
    pub fn to_camera_space(&self, point: &Vector3) -> Vector3 {
        let rel = point - self.position;
        let unyawed = Rotation3::from_axis_angle(&Vector3::y_axis(), -self.yaw) * rel;
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch) * unyawed
    }

    /// Projects a world space point onto the viewport.
    ///
    /// Returns `None` for points on or behind the camera plane. Points in front of the camera but
    /// outside the field of view still yield (off screen) coordinates.
    pub fn project(&self, point: &Vector3, viewport: &Viewport) -> Option<ScreenPoint> {
        let cam = self.to_camera_space(point);

        if cam.z <= 0.0 {
            return None;
        }

        let scale = 1.0 / libm::tanf(viewport.fov.to_radians() / 2.0);
        let ndc_x = cam.x * scale / (cam.z * viewport.aspect_ratio());
        let ndc_y = -cam.y * scale / cam.z;

        Some(viewport.ndc_to_screen(ndc_x, ndc_y))
    }
}

/// What happened during a single [`Renderer::render`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Object indices, in the order they were painted.
    pub draw_order: Vec<usize>,
    /// Objects with no vertex in front of the camera.
    pub culled: usize,
    pub faces_drawn: usize,
    /// Degenerate faces, and faces touching a vertex behind the camera.
    pub faces_skipped: usize,
}

/// Background the frame is cleared with.
pub const BACKGROUND: Color = Color::BLACK;
/// Outline color of every face and overlay shape.
pub const OUTLINE: Color = Color::BLACK;

/// Screen space foreground shapes, drawn after the world.
///
/// Rectangles are given as fractions of the frame size, `(x, y, w, h, color)`, and together make
/// up a held tool silhouette in the bottom right corner.
const OVERLAY: [(f32, f32, f32, f32, Color); 2] = [
    // barrel
    (0.78, 0.62, 0.07, 0.38, Color::new(110, 110, 120)),
    // grip
    (0.85, 0.78, 0.1, 0.22, Color::new(80, 70, 60)),
];

/// Immediate mode painter's algorithm renderer.
///
/// The typical flow of each frame is calling [`Renderer::render_frame`] with the current scene,
/// and presenting the returned buffer. Internal buffers are reused across frames.
#[derive(Debug)]
pub struct Renderer {
    frame: FrameBuffer,
    fov: f32,
    overlay: bool,
    state: DrawState,
    stats: FrameStats,
}

#[derive(Default, Debug)]
struct DrawState {
    /// Projected points of every object, flattened. Each object's points start at the offset
    /// stored in `visible`, in mesh vertex order.
    projected: Vec<Option<ScreenPoint>>,
    /// (object index, start into `projected`, distance to camera)
    visible: Vec<(usize, usize, f32)>,
    polygon: Vec<ScreenPoint>,
    /// Scanline intersections
    crossings: Vec<f64>,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            frame: FrameBuffer::new(viewport.width, viewport.height),
            fov: viewport.fov,
            overlay: true,
            state: DrawState::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.frame.width(), self.frame.height(), self.fov)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.frame.resize(width, height);
    }

    pub fn set_overlay(&mut self, overlay: bool) {
        self.overlay = overlay;
    }

    /// Renders the scene into the renderer owned frame buffer.
    pub fn render_frame(&mut self, scene: &Scene) -> &FrameBuffer {
        self.stats = self.state.draw(scene, self.fov, self.overlay, &mut self.frame);
        &self.frame
    }

    /// Renders the scene into an external buffer. The buffer dimensions define the viewport.
    pub fn render(&mut self, scene: &Scene, buf: &mut FrameBuffer) -> FrameStats {
        self.state.draw(scene, self.fov, self.overlay, buf)
    }

    /// Last rendered frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Statistics of the last [`Renderer::render_frame`] call.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

impl DrawState {
    fn draw(
        &mut self,
        scene: &Scene,
        fov: f32,
        overlay: bool,
        buf: &mut FrameBuffer,
    ) -> FrameStats {
        let viewport = Viewport::new(buf.width(), buf.height(), fov);
        let camera = &scene.camera;
        let mut stats = FrameStats::default();

        buf.clear(BACKGROUND);

        self.projected.clear();
        self.visible.clear();

        // First, project every vertex and drop objects that are entirely behind the camera.
        for (i, obj) in scene.objects().iter().enumerate() {
            let start = self.projected.len();

            self.projected
                .extend(obj.world_vertices().map(|v| camera.project(&v, &viewport)));

            if self.projected[start..].iter().any(Option::is_some) {
                let dist = (obj.position() - camera.position).norm();
                self.visible.push((i, start, dist));
            } else {
                stats.culled += 1;
            }
        }

        // Farthest first. Stable, so equally distant objects keep scene order.
        self.visible.sort_by(|(_, _, a), (_, _, b)| b.total_cmp(a));

        for &(i, start, _) in &self.visible {
            let obj = &scene.objects()[i];
            let projected = &self.projected[start..start + obj.vertices().len()];

            for face in obj.faces() {
                self.polygon.clear();

                let complete = face.len() >= 3
                    && face.iter().all(|&idx| {
                        match projected.get(idx).copied().flatten() {
                            Some(p) => {
                                self.polygon.push(p);
                                true
                            }
                            None => false,
                        }
                    });

                if !complete {
                    stats.faces_skipped += 1;
                    continue;
                }

                buf.fill_polygon(&self.polygon, obj.color(), &mut self.crossings);
                buf.stroke_polygon(&self.polygon, OUTLINE);
                stats.faces_drawn += 1;
            }

            stats.draw_order.push(i);
        }

        if overlay {
            draw_overlay(buf);
        }

        trace!(
            drawn = stats.draw_order.len(),
            culled = stats.culled,
            faces_drawn = stats.faces_drawn,
            faces_skipped = stats.faces_skipped,
            "frame rendered"
        );

        stats
    }
}

fn draw_overlay(buf: &mut FrameBuffer) {
    let (w, h) = (buf.width() as f32, buf.height() as f32);

    for (x, y, rw, rh, color) in OVERLAY {
        // Round up so the shapes reach the bottom edge.
        let (x, y) = ((x * w) as i32, (y * h) as i32);
        let (rw, rh) = (libm::ceilf(rw * w) as i32, libm::ceilf(rh * h) as i32);
        buf.fill_rect(x, y, rw, rh, color);
        buf.stroke_rect(x, y, rw, rh, OUTLINE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use alloc::vec;
    use approx::assert_relative_eq;
    use core::f32::consts::FRAC_PI_2;

    fn viewport() -> Viewport {
        Viewport::new(800, 600, 90.0)
    }

    fn quad(position: Vector3, half: f32, color: Color) -> Mesh {
        Mesh::new(
            vec![
                Vector3::new(-half, -half, 0.0),
                Vector3::new(half, -half, 0.0),
                Vector3::new(half, half, 0.0),
                Vector3::new(-half, half, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
            position,
            color,
        )
    }

    fn renderer() -> Renderer {
        let mut r = Renderer::new(Viewport::new(200, 100, 90.0));
        r.set_overlay(false);
        r
    }

    const RED: Color = Color::new(200, 0, 0);
    const BLUE: Color = Color::new(0, 0, 200);

    #[test]
    fn forward_axis_hits_center() {
        let vp = viewport();
        let cam = Camera::new(Vector3::new(3.0, -2.0, 7.0));

        for d in [0.5, 1.0, 10.0, 1000.0] {
            let p = cam.position + Vector3::new(0.0, 0.0, d);
            assert_eq!(cam.project(&p, &vp), Some(ScreenPoint::new(400, 300)));
        }
    }

    #[test]
    fn on_or_behind_plane_is_invisible() {
        let vp = viewport();
        let cam = Camera::default();

        assert_eq!(cam.project(&Vector3::new(1.0, 1.0, 0.0), &vp), None);
        assert_eq!(cam.project(&Vector3::new(0.0, 0.0, -5.0), &vp), None);
        assert_eq!(cam.project(&Vector3::zeros(), &vp), None);
    }

    #[test]
    fn projection_is_deterministic() {
        let vp = viewport();
        let cam = Camera {
            position: Vector3::new(1.0, 2.0, 3.0),
            yaw: 0.3,
            pitch: -0.2,
        };
        let p = Vector3::new(4.0, 1.0, 12.0);

        let first = cam.project(&p, &vp);
        assert!(first.is_some());
        for _ in 0..10 {
            assert_eq!(cam.project(&p, &vp), first);
        }
    }

    fn assert_near(p: Option<ScreenPoint>, x: i32, y: i32) {
        let p = p.expect("point should be visible");
        assert!((p.x - x).abs() <= 1 && (p.y - y).abs() <= 1, "{p:?} != ({x}, {y})");
    }

    #[test]
    fn fov_edges_map_to_screen_edges() {
        let vp = viewport();
        let cam = Camera::default();

        // With 90 degrees, x = z * aspect and y = z land on the borders.
        let aspect = vp.aspect_ratio();
        assert_near(cam.project(&Vector3::new(10.0 * aspect, 0.0, 10.0), &vp), 800, 300);
        assert_near(cam.project(&Vector3::new(0.0, 10.0, 10.0), &vp), 400, 0);
        assert_near(cam.project(&Vector3::new(0.0, -10.0, 10.0), &vp), 400, 600);
    }

    #[test]
    fn yaw_turns_right() {
        let cam = Camera {
            yaw: FRAC_PI_2,
            ..Default::default()
        };
        assert_relative_eq!(cam.forward(), Vector3::x(), epsilon = 1e-6);

        // Straight ahead after turning lands within a pixel of the center.
        assert_near(cam.project(&Vector3::new(10.0, 0.0, 0.0), &viewport()), 400, 300);

        // What used to be ahead is now on the left.
        let p = cam.project(&Vector3::new(5.0, 0.0, 5.0), &viewport()).unwrap();
        assert!(p.x < 400);
    }

    #[test]
    fn pitch_looks_up() {
        let cam = Camera {
            pitch: 0.5,
            ..Default::default()
        };
        assert!(cam.forward().y > 0.0);

        // A point straight ahead now appears below the center.
        let p = cam.project(&Vector3::new(0.0, 0.0, 10.0), &viewport()).unwrap();
        assert!(p.y > 300);
    }

    #[test]
    fn camera_space_roundtrip() {
        let cam = Camera {
            position: Vector3::new(-1.0, 2.0, 0.5),
            yaw: 1.1,
            pitch: 0.4,
        };
        let local = Vector3::new(0.3, -0.7, 4.0);
        let world = cam.position + cam.orientation() * local;
        assert_relative_eq!(cam.to_camera_space(&world), local, epsilon = 1e-5);
    }

    #[test]
    fn paints_far_to_near() {
        let mut r = renderer();
        let scene = Scene::new(
            Camera::default(),
            vec![
                quad(Vector3::new(-3.0, 0.0, 5.0), 0.5, RED),
                quad(Vector3::new(3.0, 0.0, 20.0), 0.5, BLUE),
            ],
        );

        r.render_frame(&scene);
        assert_eq!(r.stats().draw_order, vec![1, 0]);
    }

    #[test]
    fn nearer_object_covers_farther() {
        let mut r = renderer();
        // Listed near first, to make sure ordering is not scene order.
        let scene = Scene::new(
            Camera::default(),
            vec![
                quad(Vector3::new(0.0, 0.0, 5.0), 2.0, RED),
                quad(Vector3::new(0.0, 0.0, 10.0), 2.0, BLUE),
            ],
        );

        let frame = r.render_frame(&scene);
        assert_eq!(frame.get(100, 50), Some(RED));
        assert!(!frame.pixels().contains(&BLUE));
    }

    #[test]
    fn objects_behind_are_culled() {
        let mut r = renderer();
        let scene = Scene::new(
            Camera::default(),
            vec![
                quad(Vector3::new(0.0, 0.0, -5.0), 1.0, RED),
                quad(Vector3::new(0.0, 0.0, 5.0), 1.0, BLUE),
            ],
        );

        let frame = r.render_frame(&scene);
        assert!(!frame.pixels().contains(&RED));
        assert!(frame.pixels().contains(&BLUE));
        assert_eq!(r.stats().culled, 1);
        assert_eq!(r.stats().draw_order, vec![1]);
    }

    #[test]
    fn partially_visible_face_is_skipped() {
        let mut r = renderer();
        // Straddles the camera plane.
        let straddling = Mesh::new(
            vec![
                Vector3::new(-1.0, -1.0, -1.0),
                Vector3::new(1.0, -1.0, 3.0),
                Vector3::new(1.0, 1.0, 3.0),
                Vector3::new(-1.0, 1.0, 3.0),
            ],
            vec![vec![0, 1, 2], vec![1, 2, 3]],
            Vector3::zeros(),
            RED,
        );
        let scene = Scene::new(Camera::default(), vec![straddling]);

        r.render_frame(&scene);
        assert_eq!(r.stats().faces_skipped, 1);
        assert_eq!(r.stats().faces_drawn, 1);
        assert_eq!(r.stats().draw_order, vec![0]);
    }

    #[test]
    fn malformed_meshes_do_not_abort_frame() {
        let mut r = renderer();
        let scene = Scene::new(
            Camera::default(),
            vec![
                Mesh::new(vec![], vec![vec![0, 1, 2]], Vector3::new(0.0, 0.0, 5.0), RED),
                Mesh::new(
                    vec![
                        Vector3::new(0.0, 0.0, 0.0),
                        Vector3::new(1.0, 0.0, 0.0),
                        Vector3::new(0.0, 1.0, 0.0),
                    ],
                    vec![vec![0, 1], vec![], vec![0, 1, 7], vec![0, 1, 2]],
                    Vector3::new(0.0, 0.0, 5.0),
                    BLUE,
                ),
            ],
        );

        r.render_frame(&scene);
        assert_eq!(r.stats().culled, 1);
        assert_eq!(r.stats().faces_skipped, 3);
        assert_eq!(r.stats().faces_drawn, 1);
    }

    #[test]
    fn faces_are_outlined() {
        let mut r = renderer();
        let scene = Scene::new(
            Camera::default(),
            vec![
                quad(Vector3::new(0.0, 0.0, 2.0), 0.5, RED),
                // Backdrop, so the black outline stands out.
                quad(Vector3::new(0.0, 0.0, 50.0), 200.0, BLUE),
            ],
        );

        let frame = r.render_frame(&scene);
        // 90 degrees at distance 2: the quad spans rows 37..=62 around the center column.
        assert_eq!(frame.get(100, 36), Some(BLUE));
        assert_eq!(frame.get(100, 37), Some(OUTLINE));
        assert_eq!(frame.get(100, 39), Some(RED));
        assert_eq!(frame.get(100, 62), Some(OUTLINE));
        assert_eq!(frame.get(100, 63), Some(BLUE));
    }

    #[test]
    fn overlay_is_drawn_in_bottom_right() {
        let mut r = Renderer::new(Viewport::new(200, 100, 90.0));
        let scene = Scene::new(Camera::default(), vec![]);

        let frame = r.render_frame(&scene);
        assert_eq!(frame.get(180, 90), Some(OVERLAY[1].4));
        assert_eq!(frame.get(160, 70), Some(OVERLAY[0].4));
        assert_eq!(frame.get(10, 10), Some(BACKGROUND));

        r.set_overlay(false);
        let frame = r.render_frame(&scene);
        assert!(frame.pixels().iter().all(|c| *c == BACKGROUND));
    }

    #[test]
    fn render_into_external_buffer() {
        let mut r = renderer();
        let scene = Scene::new(
            Camera::default(),
            vec![quad(Vector3::new(0.0, 0.0, 4.0), 1.0, BLUE)],
        );
        let mut buf = FrameBuffer::new(40, 30);

        let stats = r.render(&scene, &mut buf);
        assert_eq!(stats.faces_drawn, 1);
        assert_eq!(buf.get(20, 15), Some(BLUE));
    }
}
