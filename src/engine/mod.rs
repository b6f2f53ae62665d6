pub mod animation;
pub mod body;
pub mod input;

use crate::browser;
use anyhow::{anyhow, Error, Result};
// wasm is single threaded, so Rc<RefCell> instead of Arc<Mutex>
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref cast from Javascript type to Rust type
    // - we create the closures ourselves and know their signature
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use self::input::KeyState;

#[async_trait(?Send)]
pub trait Game {
    /// one-time setup, resolves into the playable game
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// fixed step, `keystate` is None when no keyboard could be wired
    fn update(&mut self, delta_ms: f32, keystate: Option<&KeyState>);
    fn draw(&mut self, renderer: &Renderer);
}

// length of a frame in milliseconds
pub const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// a backgrounded tab stops requesting frames, don't replay all of them
const MAX_ACCUMULATED_DELTA: f32 = 250.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut keyevent_receiver = match input::prepare_input() {
            Ok(receiver) => Some(receiver),
            Err(err) => {
                log::warn!("Keyboard unavailable, continuing without it : {:#}", err);
                None
            }
        };
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer::new(browser::context()?);
        let mut keystate = KeyState::new();

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            if let Some(receiver) = keyevent_receiver.as_mut() {
                input::process_input(&mut keystate, receiver);
            }
            let keys = if keyevent_receiver.is_some() {
                Some(&keystate)
            } else {
                None
            };

            game_loop.accumulated_delta = (game_loop.accumulated_delta
                + (perf - game_loop.last_frame) as f32)
                .min(MAX_ACCUMULATED_DELTA);
            while game_loop.accumulated_delta > FRAME_SIZE {
                game.update(FRAME_SIZE, keys);
                game_loop.accumulated_delta -= FRAME_SIZE;
            }
            game_loop.last_frame = perf;
            game.draw(&renderer);

            if let Some(callback) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(callback) {
                    log::error!("GameLoop stopped : {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn new_from_x_y(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect::new(Point { x, y }, Size { width, height })
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// strictly overlapping on the x axis, touching edges don't count
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x() < other.right() && other.x() < self.right()
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        // pixel art, no smoothing when scaling up
        context.set_image_smoothing_enabled(false);
        Renderer { context }
    }

    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    /// Draws everything in `draw` shifted by `-offset_x`, i.e. from the point
    /// of view of a camera sitting at `offset_x` in world space.
    pub fn with_camera(&self, offset_x: f32, draw: impl FnOnce(&Renderer)) {
        self.context.save();
        if let Err(err) = self.context.translate((-offset_x).into(), 0.0) {
            log::error!("Could not translate camera : {:#?}", err);
        }
        draw(self);
        self.context.restore();
    }

    /// Draws the `frame` cut of `image` into `destination`, mirrored around
    /// its vertical axis when `flip_x` is set.
    pub fn draw_frame(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect, flip_x: bool) {
        if !flip_x {
            self.draw_image(image, frame, destination);
            return;
        }
        self.context.save();
        let mirrored = self
            .context
            .translate(destination.right().into(), destination.y().into())
            .and_then(|_| self.context.scale(-1.0, 1.0));
        match mirrored {
            Ok(()) => self.draw_image(
                image,
                frame,
                &Rect::new(Point::default(), destination.size),
            ),
            Err(err) => log::error!("Could not mirror sprite : {:#?}", err),
        }
        self.context.restore();
    }

    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.x().into(),
                frame.y().into(),
                frame.size.width.into(),
                frame.size.height.into(),
                destination.x().into(),
                destination.y().into(),
                destination.size.width.into(),
                destination.size.height.into(),
            )
        {
            log::error!("Could not draw image : {:#?}", err);
        }
    }

    /// Stretches the whole image over `destination`
    pub fn draw_image_scaled(&self, image: &HtmlImageElement, destination: &Rect) {
        if let Err(err) = self.context.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            destination.x().into(),
            destination.y().into(),
            destination.size.width.into(),
            destination.size.height.into(),
        ) {
            log::error!("Could not draw image : {:#?}", err);
        }
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let source_name = source.to_string();
    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "Error loading image '{}' : {:#?}",
                source_name,
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callbacks alive until the image loads or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first  ? : channel result
    // - second ? : image load result
    rx.await??;

    Ok(image)
}
