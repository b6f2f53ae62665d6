use crate::browser;
use crate::engine::{Point, Rect, Size};
use crate::input::KeyBindings;
use serde::Deserialize;

// physics consts, y grows downwards
pub const RUN_SPEED: f32 = 90.0;
pub const JUMP_IMPULSE: f32 = 220.0;
pub const GRAVITY: f32 = 800.0;

/// Tunables of the play scene. Every field has a compiled in default, an
/// optional `config.json` next to the page overrides any subset of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub view_width: f32,
    pub view_height: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub gravity: f32,
    pub ground_top: f32,
    pub ground_height: f32,
    /// center of the player sprite at spawn
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            view_width: 320.0,
            view_height: 180.0,
            world_width: 1000.0,
            world_height: 180.0,
            gravity: GRAVITY,
            ground_top: 162.0,
            ground_height: 16.0,
            spawn_x: 80.0,
            spawn_y: 120.0,
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
            keys: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    const PATH: &'static str = "config.json";

    /// Never fails, a missing or broken file falls back to the defaults.
    pub async fn load() -> GameConfig {
        match browser::fetch_json::<GameConfig>(Self::PATH).await {
            Ok(config) => {
                log::info!("Loaded {}", Self::PATH);
                config
            }
            Err(err) => {
                log::warn!("Using default config, {} unavailable : {:#}", Self::PATH, err);
                GameConfig::default()
            }
        }
    }

    pub fn view(&self) -> Size {
        Size {
            width: self.view_width,
            height: self.view_height,
        }
    }

    pub fn world(&self) -> Size {
        Size {
            width: self.world_width,
            height: self.world_height,
        }
    }

    /// single strip spanning the whole world
    pub fn ground(&self) -> Rect {
        Rect::new_from_x_y(0.0, self.ground_top, self.world_width, self.ground_height)
    }

    /// top left corner of a body of `size` centered on the spawn point
    pub fn spawn_position(&self, size: Size) -> Point {
        Point {
            x: self.spawn_x - size.width * 0.5,
            y: self.spawn_y - size.height * 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.view(), Size { width: 320.0, height: 180.0 });
        assert_eq!(config.world(), Size { width: 1000.0, height: 180.0 });
        assert_eq!(config.run_speed, 90.0);
        assert_eq!(config.jump_impulse, 220.0);
        assert_eq!(config.gravity, 800.0);
    }

    #[test]
    fn ground_spans_the_world() {
        let ground = GameConfig::default().ground();
        assert_eq!(ground.x(), 0.0);
        assert_eq!(ground.right(), 1000.0);
        assert_eq!(ground.y(), 162.0);
    }

    #[test]
    fn spawn_is_centered() {
        let position = GameConfig::default().spawn_position(Size {
            width: 32.0,
            height: 32.0,
        });
        assert_eq!(position, Point { x: 64.0, y: 104.0 });
    }
}
