/// Geosphere Web - WASM host for the software sphere renderer
///
/// The sphere is rasterized on the CPU by geosphere-core and blitted into a
/// 2D canvas each frame. JavaScript forwards pointer, wheel and key events
/// and calls `tick` from `requestAnimationFrame`.

use geosphere_core::{FrameDriver, SphereConfig};
use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

mod events;

use events::PendingInput;

/// Route panics and `tracing` output to the browser console
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("geosphere wasm module loaded");
}

struct Surface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

#[wasm_bindgen]
pub struct WebRenderer {
    driver: FrameDriver,
    input: PendingInput,
    window_origin: Point2<i32>,
    surface: Option<Surface>,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebRenderer {
        let config = SphereConfig::default();
        WebRenderer {
            driver: FrameDriver::new(&config),
            input: PendingInput::default(),
            window_origin: Point2::origin(),
            surface: None,
        }
    }

    /// Attach to a `<canvas>` element and size it to the offscreen buffer
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let buffer = self.driver.canvas();
        canvas.set_width(buffer.width() as u32);
        canvas.set_height(buffer.height() as u32);
        tracing::info!(canvas_id, "attached to canvas");

        self.surface = Some(Surface { canvas, context });
        self.driver.request_redraw();
        Ok(())
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) {
        self.input.pointer_move(x, y);
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.input.pointer_down(x, y);
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) {
        self.input.pointer_up(x, y);
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.input.wheel(delta_y);
    }

    /// Report a key held during this frame (`KeyboardEvent.key`)
    pub fn key(&mut self, key: &str) {
        self.input.key(key);
    }

    /// Advance one frame; `time` is seconds since the page started animating
    pub fn tick(&mut self, time: f64) -> Result<(), JsValue> {
        let input = self.input.take(self.window_origin);
        if let Some(window_move) = self.driver.update(&input) {
            self.window_origin = window_move.origin;
            self.move_surface()?;
        }

        let redrawn = self
            .driver
            .draw(time)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if redrawn {
            self.present()?;
        }
        Ok(())
    }

    /// Current sphere zoom, for UI display
    pub fn scale(&self) -> f64 {
        self.driver.view().scale
    }

    /// Raw RGBA bytes of the last rendered frame
    pub fn pixels(&self) -> Vec<u8> {
        self.driver.canvas().to_rgba8()
    }
}

impl WebRenderer {
    fn present(&self) -> Result<(), JsValue> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        let buffer = self.driver.canvas();
        let data = buffer.to_rgba8();
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&data[..]),
            buffer.width() as u32,
            buffer.height() as u32,
        )?;
        surface.context.put_image_data(&image, 0.0, 0.0)
    }

    /// A page has no OS window to drag, so the canvas element moves instead
    fn move_surface(&self) -> Result<(), JsValue> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        surface.canvas.style().set_property(
            "transform",
            &format!(
                "translate({}px, {}px)",
                self.window_origin.x, self.window_origin.y
            ),
        )
    }
}

impl Default for WebRenderer {
    fn default() -> Self {
        Self::new()
    }
}
