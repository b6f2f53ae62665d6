use crate::sprite::{AnimationKey, SpriteMetadata};

/// Frame playback as seen by game logic.
pub trait AnimationPlayer {
    /// Starts `key`. Asking for the animation that is already playing is a
    /// no-op unless `restart_if_same` is set.
    ///
    /// Returns whether playback (re)started from frame 0.
    fn play(&mut self, key: AnimationKey, restart_if_same: bool) -> bool;
}

/// Looping sheet animation driven by frame time.
#[derive(Debug, Default, Clone)]
pub struct Animator {
    current: Option<AnimationKey>,
    frame: u8,
    elapsed_ms: f32,
}

impl Animator {
    pub fn new() -> Self {
        Animator::default()
    }

    pub fn current(&self) -> Option<AnimationKey> {
        self.current
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// sheet cut for the frame on screen
    fn current_metadata(&self) -> Option<&'static SpriteMetadata> {
        self.current.map(|key| key.metadata())
    }

    pub fn tick(&mut self, delta_ms: f32) {
        let Some(metadata) = self.current_metadata() else {
            return;
        };
        self.elapsed_ms += delta_ms;
        let frame_duration = metadata.frame_duration_ms();
        while self.elapsed_ms >= frame_duration {
            self.elapsed_ms -= frame_duration;
            self.frame = (self.frame + 1) % metadata.frame_count;
        }
    }
}

impl AnimationPlayer for Animator {
    fn play(&mut self, key: AnimationKey, restart_if_same: bool) -> bool {
        if self.current == Some(key) && !restart_if_same {
            return false;
        }
        // each sheet has its own frame count, never carry a frame over
        self.current = Some(key);
        self.frame = 0;
        self.elapsed_ms = 0.0;
        true
    }
}
