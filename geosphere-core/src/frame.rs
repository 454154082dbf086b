/// Per-tick orchestration: input → redraw decision → sphere pipeline → canvas
use std::sync::Arc;

use crate::animate::Ripple;
use crate::config::SphereConfig;
use crate::error::GeometryError;
use crate::geometry::{lod_for_scale, MeshCache, SphereMesh};
use crate::projection::OrthoCamera;
use crate::raster::{Canvas, Palette, Rgba};
use crate::transform::Transform;
use crate::view::{FrameInput, ViewState, WindowMove};

/// The per-frame stages after mesh lookup: animate, rotate, project, rasterize
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pipeline {
    pub ripple: Ripple,
    pub palette: Palette,
}

impl Pipeline {
    /// Draw every face of `mesh` in generation order. No depth sorting.
    pub fn render(
        &self,
        canvas: &mut Canvas,
        mesh: &SphereMesh,
        view: &ViewState,
        time: f64,
    ) -> Result<(), GeometryError> {
        let animated = self.ripple.apply(&mesh.vertices, time);
        let rotation = Transform::spin_rotation(view.spin.angle, view.tilt_ratio);
        let camera = OrthoCamera::new(view.center, view.scale);

        let triangles = camera.project_faces(mesh, &animated, &rotation)?;
        for (i, points) in triangles.iter().enumerate() {
            let color = self.palette.face_color(i, time);
            canvas.fill_and_outline(points, color, self.palette.outline);
        }
        Ok(())
    }
}

/// Owns the view, the mesh cache and the offscreen canvas for one window
pub struct FrameDriver {
    view: ViewState,
    pipeline: Pipeline,
    cache: Arc<MeshCache>,
    canvas: Canvas,
    background: Rgba,
    scale_threshold: f64,
    angle_threshold: f64,
    needs_redraw: bool,
    last_scale: f64,
    last_angle: f64,
    lod: Option<u32>,
}

impl FrameDriver {
    pub fn new(config: &SphereConfig) -> Self {
        Self::with_cache(config, Arc::new(MeshCache::new()))
    }

    /// Share a mesh cache between drivers
    pub fn with_cache(config: &SphereConfig, cache: Arc<MeshCache>) -> Self {
        let view = ViewState::new(&config.view);
        let background = if config.canvas.transparent {
            Rgba::TRANSPARENT
        } else {
            Rgba::BLACK
        };

        Self {
            last_scale: view.scale,
            last_angle: view.spin.angle,
            view,
            pipeline: Pipeline {
                ripple: config.animation.ripple(),
                palette: config.palette.palette(),
            },
            cache,
            canvas: Canvas::new(config.canvas.width, config.canvas.height),
            background,
            scale_threshold: config.view.scale_threshold,
            angle_threshold: config.view.angle_threshold,
            needs_redraw: true,
            lod: None,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Force the next `draw` to re-render, e.g. after the host surface was lost
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Level of detail used by the most recent redraw
    pub fn lod(&self) -> Option<u32> {
        self.lod
    }

    /// Fold one tick of input into the view.
    ///
    /// Returns the window origin the host should move to, if a drag moved it.
    pub fn update(&mut self, input: &FrameInput) -> Option<WindowMove> {
        let update = self.view.apply_input(input);
        if update.redraw {
            self.needs_redraw = true;
        }

        let scale_moved = (self.last_scale - self.view.scale).abs() > self.scale_threshold;
        let angle_moved = (self.last_angle - self.view.spin.angle).abs() > self.angle_threshold;
        if scale_moved || angle_moved {
            self.needs_redraw = true;
            self.last_scale = self.view.scale;
            self.last_angle = self.view.spin.angle;
        }

        update.window_move
    }

    /// Re-render the canvas if anything changed; returns whether it did.
    ///
    /// `time` is the animation clock in seconds.
    pub fn draw(&mut self, time: f64) -> Result<bool, GeometryError> {
        if !self.needs_redraw {
            return Ok(false);
        }

        let level = lod_for_scale(self.view.scale);
        let mesh = self.cache.get(level)?;
        if self.lod != Some(level) {
            tracing::debug!(scale = self.view.scale, lod = level, "level of detail changed");
            self.lod = Some(level);
        }

        self.canvas.clear(self.background);
        self.pipeline.render(&mut self.canvas, &mesh, &self.view, time)?;
        self.needs_redraw = false;
        Ok(true)
    }
}
