//! Locomotion + skin state machine of the player character.
//!
//! ┌──────────────── one tick ──────────────────────────────────────┐
//! │ InputSnapshot + on floor                                       │
//! │   1. left xor right   → velocity x, facing                     │
//! │   2. moving?          → "<skin>_walk" : "<skin>_idle"          │
//! │   3. jump && floor    → velocity y = -impulse (every tick)     │
//! │   4. toggle edge      → other skin, "<new skin>_idle"          │
//! └────────────────────────────────────────────────────────────────┘
use super::config::{JUMP_IMPULSE, RUN_SPEED};
use super::toggle::EdgeTrigger;
use crate::engine::animation::AnimationPlayer;
use crate::engine::body::KinematicBody;
use crate::input::InputSnapshot;
use crate::sprite::{AnimationKey, Motion, Skin};

/// Only mirrors the sprite, never the hitbox
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Report of one tick: the velocity, facing, jump, skin swap and animation
/// it decided. `PlayScene::on_update` hands it back to its caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Step {
    pub velocity_x: f32,
    pub facing: Facing,
    pub jumped: bool,
    pub toggled: bool,
    /// last animation requested this tick
    pub animation: AnimationKey,
}

#[derive(Debug, Clone)]
pub struct Character {
    skin: Skin,
    facing: Facing,
    transform: EdgeTrigger,
    run_speed: f32,
    jump_impulse: f32,
}

impl Default for Character {
    fn default() -> Self {
        Character::new(RUN_SPEED, JUMP_IMPULSE)
    }
}

impl Character {
    pub fn new(run_speed: f32, jump_impulse: f32) -> Self {
        Character {
            skin: Skin::default(),
            facing: Facing::default(),
            transform: EdgeTrigger::new(),
            run_speed,
            jump_impulse,
        }
    }

    pub fn skin(&self) -> Skin {
        self.skin
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// animation to start with when the scene is created
    pub fn initial_animation(&self) -> AnimationKey {
        AnimationKey::idle(self.skin)
    }

    /// One simulation tick. A missing body reads as airborne and receives
    /// no commands, everything else still runs.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        body: Option<&mut dyn KinematicBody>,
        animations: &mut dyn AnimationPlayer,
    ) -> Step {
        let on_floor = body.as_deref().map_or(false, |body| body.on_floor());

        let velocity_x = match (input.left, input.right) {
            (true, false) => {
                self.facing = Facing::Left;
                -self.run_speed
            }
            (false, true) => {
                self.facing = Facing::Right;
                self.run_speed
            }
            // neither, or both cancelling out
            _ => 0.0,
        };

        let motion = if velocity_x != 0.0 {
            Motion::Walk
        } else {
            Motion::Idle
        };
        let mut animation = AnimationKey::new(self.skin, motion);
        animations.play(animation, false);

        // level triggered, holding jump bounces on every landing
        let jumped = input.jump && on_floor;
        if let Some(body) = body {
            body.set_velocity_x(velocity_x);
            if jumped {
                body.set_velocity_y(-self.jump_impulse);
            }
        }

        let toggled = self.transform.update(input.toggle_transform);
        if toggled {
            self.skin = self.skin.toggled();
            animation = AnimationKey::idle(self.skin);
            animations.play(animation, false);
            log::debug!("Transformed into {}", self.skin.name());
        }

        Step {
            velocity_x,
            facing: self.facing,
            jumped,
            toggled,
            animation,
        }
    }
}
