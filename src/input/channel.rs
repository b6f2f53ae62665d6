//! Custom input channel: `{ key, pressed }` events broadcast on the window by
//! on-screen controls (or any script driving the game), latched per action.
use crate::browser;
use anyhow::Result;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, Event};

/// Name of the window `CustomEvent` carrying an [`InputEvent`] as `detail`
pub const INPUT_EVENT: &str = "platformer-input";

/// Logical actions understood by the channel
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Transform,
}

const ACTION_COUNT: usize = 6;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Transform,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Jump => "jump",
            Action::Transform => "transform",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(key: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == key)
            .ok_or_else(|| anyhow::anyhow!("Unknown input action '{}'", key))
    }
}

/// One press / release transition. Extra fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub key: String,
    pub pressed: bool,
}

impl InputEvent {
    pub fn new(action: Action, pressed: bool) -> Self {
        InputEvent {
            key: action.name().to_string(),
            pressed,
        }
    }

    pub fn action(&self) -> Result<Action> {
        self.key.parse()
    }
}

/// Latched "currently pressed" flag per action
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputChannel {
    latched: [bool; ACTION_COUNT],
}

impl InputChannel {
    pub fn new() -> Self {
        InputChannel::default()
    }

    pub fn press(&mut self, action: Action) {
        self.latched[action.index()] = true;
    }

    /// release, pointer leave and pointer cancel all end up here
    pub fn release(&mut self, action: Action) {
        self.latched[action.index()] = false;
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.latched[action.index()]
    }
}

/// Subscribes once to [`INPUT_EVENT`] on the window. Malformed payloads are
/// logged and dropped.
pub fn listen() -> Result<UnboundedReceiver<InputEvent>> {
    let (sender, receiver) = unbounded();
    let window = browser::window()?;
    browser::add_listener(&window, INPUT_EVENT, move |event: Event| {
        let Some(event) = event.dyn_ref::<CustomEvent>() else {
            log::warn!("{} without a CustomEvent payload", INPUT_EVENT);
            return;
        };
        match serde_wasm_bindgen::from_value::<InputEvent>(event.detail()) {
            Ok(input) => {
                let _ = sender.unbounded_send(input);
            }
            Err(err) => log::warn!("Malformed {} detail : {}", INPUT_EVENT, err),
        }
    })?;
    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        assert!("sideways".parse::<Action>().is_err());
        assert!("Left".parse::<Action>().is_err());
    }

    #[test]
    fn latched_flags_are_independent() {
        let mut channel = InputChannel::new();
        channel.press(Action::Left);
        channel.press(Action::Jump);
        channel.release(Action::Left);

        assert!(!channel.is_pressed(Action::Left));
        assert!(channel.is_pressed(Action::Jump));
        assert!(!channel.is_pressed(Action::Right));
    }

    #[test]
    fn flag_stays_latched_until_released() {
        let mut channel = InputChannel::new();
        channel.press(Action::Transform);
        channel.press(Action::Transform);
        assert!(channel.is_pressed(Action::Transform));
        channel.release(Action::Transform);
        assert!(!channel.is_pressed(Action::Transform));
    }

    #[test]
    fn event_names_its_action() {
        let event = InputEvent::new(Action::Up, true);
        assert_eq!(event.key, "up");
        assert_eq!(event.action().unwrap(), Action::Up);

        let unknown = InputEvent {
            key: "fire".into(),
            pressed: true,
        };
        assert!(unknown.action().is_err());
    }
}
