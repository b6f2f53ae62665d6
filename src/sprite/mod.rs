// TABLE:
// ┌──────────────────────────────────────────────────────────────────────┐
// │                     Animation table (skin × motion)                  │
// ├──────────────┬───────────────────────────┬───────────────────────────┤
// │              │  Motion::Idle             │  Motion::Walk             │
// ├──────────────┼───────────────────────────┼───────────────────────────┤
// │ Skin::Owlet  │  "owlet_idle" 4 frames    │  "owlet_walk" 6 frames    │
// │ Skin::Dude   │  "dude_idle"  4 frames    │  "dude_walk"  6 frames    │
// └──────────────┴───────────────────────────┴───────────────────────────┘
// - every sheet is a single row of 32x32 cells
// - keys are looked up by (skin, motion), never built from strings, so a
//   missing animation is a compile error instead of a blank sprite
use crate::engine::{Point, Rect, Size};

pub const FRAME_SIZE: Size = Size {
    width: 32.0,
    height: 32.0,
};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Skin {
    #[default]
    Owlet,
    Dude,
}

impl Skin {
    pub const ALL: [Skin; 2] = [Skin::Owlet, Skin::Dude];

    /// the other skin
    pub fn toggled(self) -> Self {
        match self {
            Skin::Owlet => Skin::Dude,
            Skin::Dude => Skin::Owlet,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Skin::Owlet => "owlet",
            Skin::Dude => "dude",
        }
    }

    const fn index(self) -> usize {
        match self {
            Skin::Owlet => 0,
            Skin::Dude => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Motion {
    Idle,
    Walk,
}

impl Motion {
    pub const ALL: [Motion; 2] = [Motion::Idle, Motion::Walk];

    pub fn name(self) -> &'static str {
        match self {
            Motion::Idle => "idle",
            Motion::Walk => "walk",
        }
    }

    const fn index(self) -> usize {
        match self {
            Motion::Idle => 0,
            Motion::Walk => 1,
        }
    }
}

/// Everything needed to load and play one sheet
#[derive(Debug, PartialEq)]
pub struct SpriteMetadata {
    pub name: &'static str,
    pub sheet_path: &'static str,
    pub frame_count: u8,
    pub frames_per_second: f32,
}

impl SpriteMetadata {
    /// cut of the sheet holding `frame`, wraps past the last frame
    pub fn frame_rect(&self, frame: u8) -> Rect {
        let column = frame % self.frame_count;
        Rect::new(
            Point {
                x: column as f32 * FRAME_SIZE.width,
                y: 0.0,
            },
            FRAME_SIZE,
        )
    }

    /// how long one frame stays on screen
    pub fn frame_duration_ms(&self) -> f32 {
        1000.0 / self.frames_per_second
    }
}

const IDLE_FPS: f32 = 6.0;
const WALK_FPS: f32 = 10.0;

#[rustfmt::skip]
static ANIMATIONS: [[SpriteMetadata; 2]; 2] = [
    [
        SpriteMetadata { name: "owlet_idle", sheet_path: "assets/2 Owlet_Monster/Owlet_Monster_Idle_4.png", frame_count: 4, frames_per_second: IDLE_FPS },
        SpriteMetadata { name: "owlet_walk", sheet_path: "assets/2 Owlet_Monster/Owlet_Monster_Walk_6.png", frame_count: 6, frames_per_second: WALK_FPS },
    ],
    [
        SpriteMetadata { name: "dude_idle", sheet_path: "assets/3 Dude_Monster/Dude_Monster_Idle_4.png", frame_count: 4, frames_per_second: IDLE_FPS },
        SpriteMetadata { name: "dude_walk", sheet_path: "assets/3 Dude_Monster/Dude_Monster_Walk_6.png", frame_count: 6, frames_per_second: WALK_FPS },
    ],
];

/// Handle to one row/column of the animation table
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    pub skin: Skin,
    pub motion: Motion,
}

impl AnimationKey {
    pub const fn new(skin: Skin, motion: Motion) -> Self {
        AnimationKey { skin, motion }
    }

    pub fn idle(skin: Skin) -> Self {
        AnimationKey::new(skin, Motion::Idle)
    }

    pub fn walk(skin: Skin) -> Self {
        AnimationKey::new(skin, Motion::Walk)
    }

    pub fn metadata(&self) -> &'static SpriteMetadata {
        &ANIMATIONS[self.skin.index()][self.motion.index()]
    }

    /// `"<skin>_<motion>"`
    pub fn name(&self) -> &'static str {
        self.metadata().name
    }

    /// every key in the table, skins first
    pub fn all() -> impl Iterator<Item = AnimationKey> {
        Skin::ALL.into_iter().flat_map(|skin| {
            Motion::ALL
                .into_iter()
                .map(move |motion| AnimationKey::new(skin, motion))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn table_names_match_skin_and_motion() {
        for key in AnimationKey::all() {
            assert_eq!(
                key.name(),
                format!("{}_{}", key.skin.name(), key.motion.name())
            );
        }
        assert_eq!(AnimationKey::all().count(), 4);
    }

    #[test]
    fn skin_toggles_between_the_two_variants() {
        assert_eq!(Skin::default(), Skin::Owlet);
        assert_eq!(Skin::Owlet.toggled(), Skin::Dude);
        assert_eq!(Skin::Dude.toggled(), Skin::Owlet);
    }

    #[test]
    fn frame_rect_walks_the_sheet_row() {
        let walk = AnimationKey::walk(Skin::Dude).metadata();
        assert_eq!(walk.frame_rect(0), Rect::new_from_x_y(0.0, 0.0, 32.0, 32.0));
        assert_eq!(walk.frame_rect(5), Rect::new_from_x_y(160.0, 0.0, 32.0, 32.0));
        // wraps
        assert_eq!(walk.frame_rect(6), walk.frame_rect(0));
    }

    #[test]
    fn idle_plays_slower_than_walk() {
        let idle = AnimationKey::idle(Skin::Owlet).metadata();
        let walk = AnimationKey::walk(Skin::Owlet).metadata();
        assert!(idle.frame_duration_ms() > walk.frame_duration_ms());
        assert_relative_eq!(walk.frame_duration_ms(), 100.0);
    }
}
