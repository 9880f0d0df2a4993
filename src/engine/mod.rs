use crate::browser::{self, LoopClosure};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

pub mod input;

pub use input::InputState;

/// TABLE
/// ┌──────────────────── Two Decoupled Loops ─────────────────────┐
/// │                                                              │
/// │  setInterval (60 Hz)            requestAnimationFrame        │
/// │  ┌──────────────────┐           ┌──────────────────────┐     │
/// │  │ drain InputState │           │ clear buffer         │     │
/// │  │ game.update()    ├── Rc ────►│ game.draw(renderer)  │     │
/// │  └──────────────────┘  RefCell  │ renderer.present()   │     │
/// │                                 └──────────────────────┘     │
/// │                                                              │
/// │  Ticks advance logical state; frames only read it.           │
/// └──────────────────────────────────────────────────────────────┘
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, input: &InputState);
    fn draw(&self, renderer: &Renderer);
}

// ticks per second, independent of the display refresh rate
pub const TICK_RATE: i32 = 60;
const TICK_INTERVAL_MS: i32 = 1000 / TICK_RATE;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub struct GameLoop;

type SharedLoopClosure = Rc<RefCell<Option<LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        // capture before initialize so no early events are dropped
        let mut events = input::capture_input()?;
        let game = game.initialize().await?;
        let game = Rc::new(RefCell::new(game));
        let renderer = Rc::new(Renderer::new()?);
        renderer.fit_to_container()?;

        // keep both surfaces in lockstep with the container's layout size
        {
            let renderer = renderer.clone();
            let on_resize = browser::closure_wrap(Box::new(move |_event: web_sys::Event| {
                if let Err(err) = renderer.fit_to_container() {
                    log!("GameLoop: resize failed : {:#?}", err);
                }
            }) as Box<dyn FnMut(_)>);
            browser::window()?
                .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
                .map_err(|err| anyhow!("GameLoop: cannot listen for resize : {:#?}", err))?;
            on_resize.forget();
        }

        // fixed-rate update; runs for the lifetime of the page
        {
            let game = game.clone();
            let mut input_state = InputState::new();
            let tick = browser::closure_wrap(Box::new(move || {
                input::process_input(&mut input_state, &mut events);
                game.borrow_mut().update(&input_state);
            }) as Box<dyn FnMut()>);
            browser::set_interval(&tick, TICK_INTERVAL_MS)?;
            tick.forget();
        }

        // display-synced render, self-rescheduling each invocation
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |_perf: f64| {
            game.borrow().draw(&renderer);
            renderer.present();
            let _ = browser::request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

#[derive(Serialize)]
struct Context2dOptions {
    #[serde(rename = "willReadFrequently")]
    will_read_frequently: bool,
}

/// Double-buffered drawing surface: every primitive lands on an
/// off-screen buffer, [`Renderer::present`] copies the finished frame
/// onto the visible canvas pixel for pixel.
pub struct Renderer {
    container: Element,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    buffer: HtmlCanvasElement,
    buffer_context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let container = browser::container()?;
        let canvas = browser::canvas()?;
        let context = browser::context_2d(&canvas)?;
        let buffer = browser::create_canvas()?;
        // the buffer is read back every frame, tell the browser upfront
        let options = serde_wasm_bindgen::to_value(&Context2dOptions {
            will_read_frequently: true,
        })
        .map_err(|err| anyhow!("Error building context options : {:#?}", err))?;
        let buffer_context = browser::context_2d_with_options(&buffer, &options)?;
        Ok(Renderer {
            container,
            canvas,
            context,
            buffer,
            buffer_context,
        })
    }

    /// Surface pixel size = container layout size × device pixel ratio,
    /// visible canvas and buffer in lockstep.
    pub fn fit_to_container(&self) -> Result<()> {
        let scale = browser::device_pixel_ratio()?;
        let (width, height) = scaled_size(
            self.container.client_width(),
            self.container.client_height(),
            scale,
        );
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.buffer.set_width(width);
        self.buffer.set_height(height);
        Ok(())
    }

    pub fn clear(&self) {
        self.buffer_context.clear_rect(
            0.0,
            0.0,
            self.buffer.width() as f64,
            self.buffer.height() as f64,
        );
    }

    /// Copy the completed buffer onto the visible canvas.
    pub fn present(&self) {
        let width = self.buffer.width();
        let height = self.buffer.height();
        // a zero-area surface has no pixel block to read
        if width == 0 || height == 0 {
            return;
        }
        let pixels = self
            .buffer_context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .expect("Reading the buffer is throwing exceptions! Unrecoverable error");
        self.context
            .put_image_data(&pixels, 0.0, 0.0)
            .expect("Presenting is throwing exceptions! Unrecoverable error");
    }

    /// Filled circle centered at (x, y). `size` is diameter-like: the
    /// drawn radius is half the passed value. `None` keeps the
    /// context's active fill style.
    pub fn draw_circle(&self, x: f64, y: f64, size: f64, color: Option<&str>) {
        // fillStyle is part of the saved context state
        self.buffer_context.save();
        if let Some(color) = color {
            self.buffer_context.set_fill_style_str(color);
        }
        self.buffer_context.begin_path();
        self.buffer_context
            .arc(x, y, size / 2.0, 0.0, std::f64::consts::TAU)
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        self.buffer_context.fill();
        self.buffer_context.restore();
    }

    /// Filled square centered at (x, y) with the given side length.
    pub fn draw_square(&self, x: f64, y: f64, size: f64, color: Option<&str>) {
        self.buffer_context.save();
        if let Some(color) = color {
            self.buffer_context.set_fill_style_str(color);
        }
        self.buffer_context
            .fill_rect(x - size / 2.0, y - size / 2.0, size, size);
        self.buffer_context.restore();
    }

    /// Run `draw` with the origin moved to `origin` and the axes rotated
    /// by `angle` radians; the transform is restored afterwards.
    pub fn with_transform(&self, origin: Point, angle: f64, draw: impl FnOnce(&Renderer)) {
        self.buffer_context.save();
        self.buffer_context
            .translate(origin.x, origin.y)
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        self.buffer_context
            .rotate(angle)
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        draw(self);
        self.buffer_context.restore();
    }
}

pub fn scaled_size(width: i32, height: i32, scale: f64) -> (u32, u32) {
    ((width as f64 * scale) as u32, (height as f64 * scale) as u32)
}

#[cfg(test)]
mod tests {
    use super::scaled_size;

    #[test]
    fn surface_size_is_layout_size_times_pixel_ratio() {
        assert_eq!(scaled_size(800, 600, 1.0), (800, 600));
        assert_eq!(scaled_size(800, 600, 2.0), (1600, 1200));
        // high-density laptop panel
        assert_eq!(scaled_size(1280, 720, 1.5), (1920, 1080));
    }

    #[test]
    fn surface_size_of_empty_container_is_zero() {
        assert_eq!(scaled_size(0, 0, 2.0), (0, 0));
    }
}
