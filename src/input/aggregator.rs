//! Merges keyboard state and the custom input channel into one snapshot of
//! logical intents per frame.
//!
//! TABLE:
//! ┌──────────────────┬──────────────────────────┬────────────────────────┐
//! │ Intent           │ Keyboard (default keys)  │ Channel actions        │
//! ├──────────────────┼──────────────────────────┼────────────────────────┤
//! │ MoveLeft         │ ArrowLeft                │ left                   │
//! │ MoveRight        │ ArrowRight               │ right                  │
//! │ Jump             │ Space, ArrowUp           │ jump, up               │
//! │ ToggleTransform  │ KeyT                     │ transform              │
//! └──────────────────┴──────────────────────────┴────────────────────────┘
//! Every intent is the OR of its sources. On-screen buttons that synthesize
//! key events already show up in the keyboard column.
use super::channel::{Action, InputChannel, InputEvent};
use crate::engine::input::KeyboardSource;
use anyhow::Result;
use serde::Deserialize;

/// Keyboard codes (`KeyboardEvent.code`) bound to each intent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub transform: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let codes = |codes: &[&str]| -> Vec<String> {
            codes.iter().map(|code| code.to_string()).collect()
        };
        KeyBindings {
            left: codes(&["ArrowLeft"]),
            right: codes(&["ArrowRight"]),
            jump: codes(&["Space", "ArrowUp"]),
            transform: codes(&["KeyT"]),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    ToggleTransform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Key(String),
    Channel(Action),
}

#[derive(Debug, Clone)]
struct Binding {
    intent: Intent,
    sources: Vec<Source>,
}

impl Binding {
    fn new(intent: Intent, keys: &[String], actions: &[Action]) -> Self {
        let sources = keys
            .iter()
            .cloned()
            .map(Source::Key)
            .chain(actions.iter().copied().map(Source::Channel))
            .collect();
        Binding { intent, sources }
    }
}

/// Logical intents for one frame. Carries no history.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub toggle_transform: bool,
}

impl InputSnapshot {
    fn merge(&mut self, intent: Intent, active: bool) {
        let flag = match intent {
            Intent::MoveLeft => &mut self.left,
            Intent::MoveRight => &mut self.right,
            Intent::Jump => &mut self.jump,
            Intent::ToggleTransform => &mut self.toggle_transform,
        };
        *flag |= active;
    }
}

/// Owned once per play session. Writers record channel transitions, the
/// frame update reads [`InputAggregator::snapshot`].
#[derive(Debug, Clone)]
pub struct InputAggregator {
    bindings: Vec<Binding>,
    channel: InputChannel,
}

impl Default for InputAggregator {
    fn default() -> Self {
        InputAggregator::new(&KeyBindings::default())
    }
}

impl InputAggregator {
    pub fn new(keys: &KeyBindings) -> Self {
        let bindings = vec![
            Binding::new(Intent::MoveLeft, &keys.left, &[Action::Left]),
            Binding::new(Intent::MoveRight, &keys.right, &[Action::Right]),
            // moving up doubles as jump, like ArrowUp on the keyboard
            Binding::new(Intent::Jump, &keys.jump, &[Action::Jump, Action::Up]),
            Binding::new(
                Intent::ToggleTransform,
                &keys.transform,
                &[Action::Transform],
            ),
        ];
        InputAggregator {
            bindings,
            channel: InputChannel::new(),
        }
    }

    pub fn record_press(&mut self, action: Action) {
        self.channel.press(action);
    }

    pub fn record_release(&mut self, action: Action) {
        self.channel.release(action);
    }

    /// Latches one channel transition, unknown keys are an error and change
    /// nothing.
    pub fn apply(&mut self, event: &InputEvent) -> Result<Action> {
        let action = event.action()?;
        if event.pressed {
            self.record_press(action);
        } else {
            self.record_release(action);
        }
        Ok(action)
    }

    pub fn channel(&self) -> &InputChannel {
        &self.channel
    }

    /// `keyboard` is None on devices without one, its keys then read as up.
    pub fn snapshot(&self, keyboard: Option<&dyn KeyboardSource>) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for binding in &self.bindings {
            let active = binding
                .sources
                .iter()
                .any(|source| self.is_active(source, keyboard));
            snapshot.merge(binding.intent, active);
        }
        snapshot
    }

    fn is_active(&self, source: &Source, keyboard: Option<&dyn KeyboardSource>) -> bool {
        match source {
            Source::Key(code) => keyboard.map_or(false, |keyboard| keyboard.is_pressed(code)),
            Source::Channel(action) => self.channel.is_pressed(*action),
        }
    }
}
