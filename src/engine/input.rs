//! Physical keyboard state, polled once per frame.
//!
//! ┌──────────── keyboard path ───────────────────────────────────┐
//! │  window keydown/keyup/blur                                   │
//! │        │ (browser callback, writes only)                     │
//! │        ▼                                                     │
//! │  UnboundedSender<KeyPress> ──► UnboundedReceiver<KeyPress>   │
//! │                                      │ process_input()       │
//! │                                      ▼ (start of the frame)  │
//! │                                  KeyState ──► Game::update   │
//! └──────────────────────────────────────────────────────────────┘
//! Synthetic key events from on-screen buttons travel the same path, so
//! they are indistinguishable from real presses.
use crate::browser;
use anyhow::Result;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use std::collections::HashSet;
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent};

/// Anything that can answer "is this key down right now".
pub trait KeyboardSource {
    /// `code` is a `KeyboardEvent.code` value such as `"ArrowLeft"`
    fn is_pressed(&self, code: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    KeyDown(String),
    KeyUp(String),
    /// focus lost, no keyup will follow for held keys
    ReleaseAll,
}

#[derive(Debug, Default)]
pub struct KeyState {
    pressed_keys: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        KeyState::default()
    }

    pub fn set_pressed(&mut self, code: &str) {
        self.pressed_keys.insert(code.to_string());
    }

    pub fn set_released(&mut self, code: &str) {
        self.pressed_keys.remove(code);
    }

    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn apply(&mut self, press: &KeyPress) {
        match press {
            KeyPress::KeyDown(code) => self.set_pressed(code),
            KeyPress::KeyUp(code) => self.set_released(code),
            KeyPress::ReleaseAll => self.release_all(),
        }
    }
}

impl KeyboardSource for KeyState {
    fn is_pressed(&self, code: &str) -> bool {
        self.pressed_keys.contains(code)
    }
}

/// Subscribes to the window keyboard events; the receiver is drained by
/// [`process_input`] once per frame.
pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, keyevent_receiver) = unbounded();
    let keyup_sender = keydown_sender.clone();
    let blur_sender = keydown_sender.clone();
    let window = browser::window()?;

    browser::add_listener(&window, "keydown", move |event: Event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            let _ = keydown_sender.unbounded_send(KeyPress::KeyDown(event.code()));
        }
    })?;
    browser::add_listener(&window, "keyup", move |event: Event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            let _ = keyup_sender.unbounded_send(KeyPress::KeyUp(event.code()));
        }
    })?;
    browser::add_listener(&window, "blur", move |_: Event| {
        let _ = blur_sender.unbounded_send(KeyPress::ReleaseAll);
    })?;

    Ok(keyevent_receiver)
}

pub fn process_input(state: &mut KeyState, keyevent_receiver: &mut UnboundedReceiver<KeyPress>) {
    // Ok(None) : every sender dropped, Err : queue empty for now
    while let Ok(Some(press)) = keyevent_receiver.try_next() {
        state.apply(&press);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_then_up() {
        let mut state = KeyState::new();
        state.apply(&KeyPress::KeyDown("ArrowLeft".into()));
        assert!(state.is_pressed("ArrowLeft"));
        assert!(!state.is_pressed("ArrowRight"));

        state.apply(&KeyPress::KeyUp("ArrowLeft".into()));
        assert!(!state.is_pressed("ArrowLeft"));
    }

    #[test]
    fn blur_releases_every_key() {
        let mut state = KeyState::new();
        state.set_pressed("Space");
        state.set_pressed("ArrowRight");
        state.apply(&KeyPress::ReleaseAll);
        assert!(!state.is_pressed("Space"));
        assert!(!state.is_pressed("ArrowRight"));
    }

    #[test]
    fn process_input_drains_everything_queued_before_the_frame() {
        let (sender, mut receiver) = unbounded();
        sender.unbounded_send(KeyPress::KeyDown("Space".into())).unwrap();
        sender.unbounded_send(KeyPress::KeyDown("ArrowUp".into())).unwrap();
        sender.unbounded_send(KeyPress::KeyUp("Space".into())).unwrap();

        let mut state = KeyState::new();
        process_input(&mut state, &mut receiver);

        assert!(!state.is_pressed("Space"));
        assert!(state.is_pressed("ArrowUp"));
    }
}
