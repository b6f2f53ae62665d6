use super::character::{Character, Step};
use super::config::GameConfig;
use crate::engine::animation::{AnimationPlayer, Animator};
use crate::engine::body::ArcadeBody;
use crate::engine::input::KeyboardSource;
use crate::input::{InputAggregator, InputEvent};
use crate::sprite;
use futures::channel::mpsc::UnboundedReceiver;

pub struct Player {
    pub body: ArcadeBody,
    pub animator: Animator,
    pub character: Character,
}

/// The play scene without any browser resources, so the whole frame update
/// runs in plain unit tests.
pub struct PlayScene {
    config: GameConfig,
    input: InputAggregator,
    events: Option<UnboundedReceiver<InputEvent>>,
    player: Player,
    camera_x: f32,
}

impl PlayScene {
    /// Spawns the player and selects the initial skin. `events` is the
    /// custom input channel subscription, if one could be made.
    pub fn on_create(config: GameConfig, events: Option<UnboundedReceiver<InputEvent>>) -> Self {
        let body = ArcadeBody::new(config.spawn_position(sprite::FRAME_SIZE), sprite::FRAME_SIZE)
            .with_gravity(config.gravity)
            .with_world_bounds(config.world())
            .collide_with(config.ground());
        let character = Character::new(config.run_speed, config.jump_impulse);
        let mut animator = Animator::new();
        animator.play(character.initial_animation(), false);

        let mut scene = PlayScene {
            input: InputAggregator::new(&config.keys),
            events,
            player: Player {
                body,
                animator,
                character,
            },
            camera_x: 0.0,
            config,
        };
        scene.follow_player();
        scene
    }

    /// ::on_update per fixed step
    /// - drain the channel -> latched flags
    /// - snapshot -> character decision
    /// - physics + animation advance
    pub fn on_update(&mut self, delta_ms: f32, keyboard: Option<&dyn KeyboardSource>) -> Step {
        self.drain_events();
        let snapshot = self.input.snapshot(keyboard);
        let player = &mut self.player;
        let step = player
            .character
            .update(&snapshot, Some(&mut player.body), &mut player.animator);
        player.body.step(delta_ms);
        player.animator.tick(delta_ms);
        self.follow_player();
        step
    }

    /// Everything queued before this frame becomes visible to it.
    fn drain_events(&mut self) {
        let Some(events) = self.events.as_mut() else {
            return;
        };
        while let Ok(Some(event)) = events.try_next() {
            if let Err(err) = self.input.apply(&event) {
                log::debug!("Ignoring input event : {:#}", err);
            }
        }
    }

    fn follow_player(&mut self) {
        self.camera_x = camera_x(
            self.player.body.center().x,
            self.config.view_width,
            self.config.world_width,
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// programmatic driver, e.g. a test harness
    pub fn input_mut(&mut self) -> &mut InputAggregator {
        &mut self.input
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }
}

/// Left edge of a camera centered on `target_x`, kept inside the world and
/// rounded to whole pixels.
pub fn camera_x(target_x: f32, view_width: f32, world_width: f32) -> f32 {
    let max_x = (world_width - view_width).max(0.0);
    (target_x - view_width * 0.5).clamp(0.0, max_x).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::KeyState;
    use crate::engine::FRAME_SIZE;
    use crate::game::character::Facing;
    use crate::input::Action;
    use crate::sprite::{AnimationKey, Skin};
    use approx::assert_relative_eq;
    use futures::channel::mpsc::unbounded;

    fn settled_scene(events: Option<UnboundedReceiver<InputEvent>>) -> PlayScene {
        let mut scene = PlayScene::on_create(GameConfig::default(), events);
        for _ in 0..120 {
            scene.on_update(FRAME_SIZE, None);
        }
        scene
    }

    #[test]
    fn created_scene_idles_as_the_first_skin() {
        let scene = PlayScene::on_create(GameConfig::default(), None);
        let player = scene.player();
        assert_eq!(player.animator.current(), Some(AnimationKey::idle(Skin::Owlet)));
        assert_eq!(player.character.skin(), Skin::Owlet);
        assert_relative_eq!(player.body.center().x, 80.0);
        assert_relative_eq!(player.body.center().y, 120.0);
    }

    #[test]
    fn player_lands_on_the_ground() {
        let scene = settled_scene(None);
        assert_relative_eq!(scene.player().body.bounding_box().bottom(), 162.0);
    }

    #[test]
    fn keyboard_walks_left() {
        let mut scene = settled_scene(None);
        let mut keys = KeyState::new();
        keys.set_pressed("ArrowLeft");

        let step = scene.on_update(FRAME_SIZE, Some(&keys));
        assert_eq!(step.velocity_x, -90.0);
        assert_eq!(step.facing, Facing::Left);
        assert_eq!(step.animation.name(), "owlet_walk");
        assert!(scene.player().body.center().x < 80.0);

        let step = scene.on_update(FRAME_SIZE, Some(&KeyState::new()));
        assert_eq!(step.velocity_x, 0.0);
        assert_eq!(step.facing, Facing::Left);
        assert_eq!(step.animation.name(), "owlet_idle");
    }

    #[test]
    fn channel_events_are_seen_by_the_next_update() {
        let (sender, receiver) = unbounded();
        let mut scene = settled_scene(Some(receiver));

        sender.unbounded_send(InputEvent::new(Action::Right, true)).unwrap();
        let step = scene.on_update(FRAME_SIZE, None);
        assert_eq!(step.velocity_x, 90.0);

        sender.unbounded_send(InputEvent::new(Action::Right, false)).unwrap();
        let step = scene.on_update(FRAME_SIZE, None);
        assert_eq!(step.velocity_x, 0.0);
    }

    #[test]
    fn channel_jump_leaves_the_ground_and_lands_again() {
        let (sender, receiver) = unbounded();
        let mut scene = settled_scene(Some(receiver));

        sender.unbounded_send(InputEvent::new(Action::Up, true)).unwrap();
        assert!(scene.on_update(FRAME_SIZE, None).jumped);
        sender.unbounded_send(InputEvent::new(Action::Up, false)).unwrap();

        let mut airborne_frames = 0;
        for _ in 0..120 {
            let step = scene.on_update(FRAME_SIZE, None);
            assert!(!step.jumped);
            if scene.player().body.bounding_box().bottom() < 162.0 {
                airborne_frames += 1;
            }
        }
        assert!(airborne_frames > 10);
        assert_relative_eq!(scene.player().body.bounding_box().bottom(), 162.0);
    }

    #[test]
    fn unknown_channel_keys_are_ignored() {
        let (sender, receiver) = unbounded();
        let mut scene = settled_scene(Some(receiver));
        sender
            .unbounded_send(InputEvent {
                key: "dash".into(),
                pressed: true,
            })
            .unwrap();
        let step = scene.on_update(FRAME_SIZE, None);
        assert_eq!(step.velocity_x, 0.0);
    }

    #[test]
    fn toggle_through_the_channel() {
        let mut scene = settled_scene(None);
        scene.input_mut().record_press(Action::Transform);
        let step = scene.on_update(FRAME_SIZE, None);
        assert!(step.toggled);
        scene.input_mut().record_release(Action::Transform);
        scene.on_update(FRAME_SIZE, None);

        assert_eq!(scene.player().character.skin(), Skin::Dude);
        assert_eq!(
            scene.player().animator.current(),
            Some(AnimationKey::idle(Skin::Dude))
        );
    }

    #[test]
    fn camera_follows_inside_the_world() {
        assert_eq!(camera_x(80.0, 320.0, 1000.0), 0.0);
        assert_eq!(camera_x(500.0, 320.0, 1000.0), 340.0);
        assert_eq!(camera_x(990.0, 320.0, 1000.0), 680.0);
        assert_eq!(camera_x(400.4, 320.0, 1000.0), 240.0);
        // world narrower than the view
        assert_eq!(camera_x(100.0, 320.0, 200.0), 0.0);
    }

    #[test]
    fn camera_tracks_a_walking_player() {
        let mut scene = settled_scene(None);
        scene.input_mut().record_press(Action::Right);
        for _ in 0..300 {
            scene.on_update(FRAME_SIZE, None);
        }
        let expected = camera_x(scene.player().body.center().x, 320.0, 1000.0);
        assert!(scene.camera_x() > 0.0);
        assert_eq!(scene.camera_x(), expected);
    }
}
