pub mod character;
pub mod config;
pub mod scene;
pub mod toggle;

use self::character::Facing;
use self::config::GameConfig;
use self::scene::PlayScene;
use crate::engine;
use crate::engine::input::{KeyState, KeyboardSource};
use crate::engine::{Game, Point, Rect, Renderer};
use crate::input::controls::{self, TouchTracker};
use crate::input::{channel, InputEvent};
use crate::sprite::AnimationKey;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedReceiver;
use futures::future::try_join_all;
use futures::join;
use std::collections::HashMap;
use web_sys::HtmlImageElement;

/// TABLE
/// ┌──────────────────────── Frame flow ─────────────────────────────────┐
/// │                                                                     │
/// │  GameLoop (engine)        Platformer (game)       PlayScene         │
/// │  ┌────────────────┐ update ┌──────────────┐ on_update ┌──────────┐  │
/// │  │ KeyState drain ├───────►│  Loaded(..)  ├──────────►│ input    │  │
/// │  │ fixed step     │        │              │           │ character│  │
/// │  └───────┬────────┘        └──────┬───────┘           │ body     │  │
/// │          │ draw                   │ draw              │ animator │  │
/// │          └───────────────────────►│ camera, sprites   └──────────┘  │
/// └─────────────────────────────────────────────────────────────────────┘
pub enum Platformer {
    /// assets still loading
    Loading,
    Loaded(Play),
}

pub struct Play {
    scene: PlayScene,
    sprites: HashMap<AnimationKey, HtmlImageElement>,
    ground: HtmlImageElement,
}

const BACKGROUND_COLOR: &str = "#0d0d0d";
const BACKDROP_COLOR: &str = "#101820";

impl Platformer {
    const GROUND_PATH: &'static str = "assets/tiles.png";

    pub fn new() -> Self {
        Platformer::Loading
    }

    async fn load_sprites() -> Result<HashMap<AnimationKey, HtmlImageElement>> {
        let sheets = try_join_all(AnimationKey::all().map(|key| async move {
            let path = key.metadata().sheet_path;
            let image = engine::load_image(path)
                .await
                .with_context(|| format!("Failed to load {} sheet from : {}", key.name(), path))?;
            Ok::<_, anyhow::Error>((key, image))
        }))
        .await?;
        Ok(sheets.into_iter().collect())
    }

    async fn load_ground() -> Result<HtmlImageElement> {
        engine::load_image(Self::GROUND_PATH)
            .await
            .with_context(|| format!("Failed to load ground tile from : {}", Self::GROUND_PATH))
    }

    /// Listeners for the custom channel and the on-screen controls. None of
    /// them is required, the keyboard alone can play.
    fn wire_input() -> Option<UnboundedReceiver<InputEvent>> {
        let events = channel::listen()
            .map_err(|err| log::warn!("Custom input channel unavailable : {:#}", err))
            .ok();
        let tracker = TouchTracker::shared();
        if let Err(err) = controls::wire_touch_zones(&tracker) {
            log::warn!("Touch zones unavailable : {:#}", err);
        }
        if let Err(err) = controls::wire_buttons(&tracker) {
            log::warn!("On-screen buttons unavailable : {:#}", err);
        }
        events
    }
}

impl Default for Platformer {
    fn default() -> Self {
        Platformer::new()
    }
}

#[async_trait(?Send)]
impl Game for Platformer {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            Platformer::Loading => {
                // independent resources load in parallel
                let (config, sprites, ground) =
                    join!(GameConfig::load(), Self::load_sprites(), Self::load_ground());
                let sprites = sprites?;
                let ground = ground?;
                log::info!("Loaded {} sprite sheets", sprites.len());

                let scene = PlayScene::on_create(config, Self::wire_input());
                Ok(Box::new(Platformer::Loaded(Play {
                    scene,
                    sprites,
                    ground,
                })))
            }
            Platformer::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, delta_ms: f32, keystate: Option<&KeyState>) {
        if let Platformer::Loaded(play) = self {
            let keyboard = keystate.map(|keys| keys as &dyn KeyboardSource);
            play.scene.on_update(delta_ms, keyboard);
        }
    }

    fn draw(&mut self, renderer: &Renderer) {
        if let Platformer::Loaded(play) = self {
            play.draw(renderer);
        }
    }
}

impl Play {
    fn draw(&self, renderer: &Renderer) {
        let config = self.scene.config();
        let view = Rect::new(Point::default(), config.view());
        renderer.clear(&view);
        renderer.fill_rect(&view, BACKGROUND_COLOR);

        // draw order matters : backdrop -> ground -> player
        renderer.with_camera(self.scene.camera_x(), |renderer| {
            renderer.fill_rect(&Rect::new(Point::default(), config.world()), BACKDROP_COLOR);
            renderer.draw_image_scaled(&self.ground, &config.ground());
            self.draw_player(renderer);
        });
    }

    fn draw_player(&self, renderer: &Renderer) {
        let player = self.scene.player();
        let Some(key) = player.animator.current() else {
            return;
        };
        let Some(sheet) = self.sprites.get(&key) else {
            log::warn!("No sheet loaded for {}", key.name());
            return;
        };
        let frame = key.metadata().frame_rect(player.animator.frame());
        let mut destination = player.body.bounding_box();
        destination.position = Point {
            x: destination.x().round(),
            y: destination.y().round(),
        };
        let flip_x = player.character.facing() == Facing::Left;
        renderer.draw_frame(sheet, &frame, &destination, flip_x);
    }
}
