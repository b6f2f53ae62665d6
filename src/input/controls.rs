//! On-screen controls: touch zones over the canvas and `data-*` buttons in
//! the page. Both only ever emit transitions, the frame update never looks
//! at the DOM.
//!
//! ┌──────────────────────── canvas ────────────────────────┐
//! │                                                        │  40%
//! ├─┬────────────────┬─┬────────────────┬─┬──────────────┬─┤
//! │ │      left      │ │     right      │ │     jump     │ │  60%
//! │ │   1% .. 32%    │ │   34% .. 65%   │ │  67% .. 99%  │ │
//! └─┴────────────────┴─┴────────────────┴─┴──────────────┴─┘
//! gaps between zones keep one thumb from pressing two of them
use super::channel::{Action, InputEvent};
use crate::browser;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, PointerEvent};

/// Area of the canvas, in fractions of its size
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchZone {
    pub action: Action,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TouchZone {
    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[rustfmt::skip]
pub const TOUCH_ZONES: [TouchZone; 3] = [
    TouchZone { action: Action::Left,  x: 0.01, y: 0.4, width: 0.31, height: 0.6 },
    TouchZone { action: Action::Right, x: 0.34, y: 0.4, width: 0.31, height: 0.6 },
    TouchZone { action: Action::Jump,  x: 0.67, y: 0.4, width: 0.32, height: 0.6 },
];

/// Zone under a point given in fractions of the canvas size
pub fn zone_at(x: f32, y: f32) -> Option<Action> {
    TOUCH_ZONES
        .iter()
        .find(|zone| zone.contains(x, y))
        .map(|zone| zone.action)
}

/// Something on screen that can hold an action down.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Holder {
    /// a pointer (finger, mouse, pen) on a canvas touch zone
    Pointer(i32),
    /// the n-th `[data-action]` button of the page
    Button(usize),
}

/// Which action each on-screen holder keeps pressed. An action is pressed
/// on the channel while at least one holder keeps it, so releasing one of
/// two holders of the same action emits nothing.
#[derive(Debug, Default)]
pub struct TouchTracker {
    active: HashMap<Holder, Action>,
}

pub type SharedTracker = Rc<RefCell<TouchTracker>>;

impl TouchTracker {
    pub fn new() -> Self {
        TouchTracker::default()
    }

    pub fn shared() -> SharedTracker {
        Rc::new(RefCell::new(TouchTracker::new()))
    }

    /// Transitions in emit order. A holder moving to another action
    /// releases the old one first.
    pub fn press(&mut self, holder: Holder, action: Action) -> Vec<InputEvent> {
        let mut transitions = Vec::with_capacity(2);
        if let Some(previous) = self.active.get(&holder).copied() {
            if previous == action {
                return transitions;
            }
            transitions.extend(self.release(holder));
        }
        self.active.insert(holder, action);
        transitions.push(InputEvent::new(action, true));
        transitions
    }

    pub fn release(&mut self, holder: Holder) -> Option<InputEvent> {
        let action = self.active.remove(&holder)?;
        if self.is_held(action) {
            return None;
        }
        Some(InputEvent::new(action, false))
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.active.values().any(|held| *held == action)
    }

    pub fn pointer_down(&mut self, pointer_id: i32, x: f32, y: f32) -> Vec<InputEvent> {
        match zone_at(x, y) {
            Some(action) => self.press(Holder::Pointer(pointer_id), action),
            None => Vec::new(),
        }
    }

    /// pointer up, out and cancel
    pub fn pointer_up(&mut self, pointer_id: i32) -> Option<InputEvent> {
        self.release(Holder::Pointer(pointer_id))
    }

    /// A move with no button down, or one that slides out of the pressed
    /// zone, releases it.
    pub fn pointer_move(&mut self, pointer_id: i32, x: f32, y: f32, is_down: bool) -> Option<InputEvent> {
        let held = *self.active.get(&Holder::Pointer(pointer_id))?;
        if !is_down || zone_at(x, y) != Some(held) {
            return self.pointer_up(pointer_id);
        }
        None
    }

    /// Pressed / released transition of the `index`-th action button
    pub fn button(&mut self, index: usize, action: Action, pressed: bool) -> Vec<InputEvent> {
        let holder = Holder::Button(index);
        if pressed {
            self.press(holder, action)
        } else {
            self.release(holder).into_iter().collect()
        }
    }
}

/// Pointer event type of an on-screen button mapped to pressed / released.
/// Leave and cancel release exactly like up, otherwise a finger sliding off
/// the button would keep it latched forever.
pub fn button_transition(event_type: &str) -> Option<bool> {
    match event_type {
        "pointerdown" => Some(true),
        "pointerup" | "pointerleave" | "pointercancel" => Some(false),
        _ => None,
    }
}

const BUTTON_EVENTS: [&str; 4] = ["pointerdown", "pointerup", "pointerleave", "pointercancel"];
const ZONE_RELEASE_EVENTS: [&str; 3] = ["pointerup", "pointerout", "pointercancel"];

/// Wires every `[data-action]`, `[data-key]` and `[data-fullscreen]` element.
/// Action buttons share `tracker` with the touch zones.
pub fn wire_buttons(tracker: &SharedTracker) -> Result<()> {
    for (index, element) in browser::query_all("[data-action]")?.into_iter().enumerate() {
        let Some(key) = element.get_attribute("data-action") else {
            continue;
        };
        let action = match key.parse::<Action>() {
            Ok(action) => action,
            Err(err) => {
                log::warn!("Skipping on-screen button : {:#}", err);
                continue;
            }
        };
        let tracker = tracker.clone();
        wire_button(&element, move |pressed| {
            let transitions = tracker.borrow_mut().button(index, action, pressed);
            transitions.iter().try_for_each(browser::dispatch_input_event)
        })?;
    }

    for element in browser::query_all("[data-key]")? {
        let Some(code) = element.get_attribute("data-key") else {
            continue;
        };
        wire_button(&element, move |pressed| browser::dispatch_key_event(pressed, &code))?;
    }

    for element in browser::query_all("[data-fullscreen]")? {
        browser::add_listener(&element, "click", |_: Event| {
            if let Err(err) = browser::toggle_fullscreen() {
                log::warn!("{:#}", err);
            }
        })?;
    }
    Ok(())
}

fn wire_button<F>(element: &Element, emit: F) -> Result<()>
where
    F: Fn(bool) -> Result<()> + 'static,
{
    let emit = Rc::new(emit);
    for event_type in BUTTON_EVENTS {
        let emit = emit.clone();
        browser::add_listener(element, event_type, move |event: Event| {
            let Some(pressed) = button_transition(&event.type_()) else {
                return;
            };
            if pressed {
                // no text selection or synthetic mouse events on touch
                event.prevent_default();
            }
            if let Err(err) = (*emit)(pressed) {
                log::error!("On-screen button : {:#}", err);
            }
        })?;
    }
    Ok(())
}

/// Turns pointer events on the canvas into channel events through
/// [`TouchTracker`].
pub fn wire_touch_zones(tracker: &SharedTracker) -> Result<()> {
    let canvas = browser::canvas()?;

    let fraction = {
        let canvas = canvas.clone();
        move |event: &PointerEvent| {
            let width = canvas.client_width().max(1) as f32;
            let height = canvas.client_height().max(1) as f32;
            (event.offset_x() as f32 / width, event.offset_y() as f32 / height)
        }
    };

    {
        let tracker = tracker.clone();
        let fraction = fraction.clone();
        browser::add_listener(&canvas, "pointerdown", move |event: Event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                let (x, y) = fraction(event);
                let transitions = tracker.borrow_mut().pointer_down(event.pointer_id(), x, y);
                emit_touch(transitions);
            }
        })?;
    }

    for event_type in ZONE_RELEASE_EVENTS {
        let tracker = tracker.clone();
        browser::add_listener(&canvas, event_type, move |event: Event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                let transition = tracker.borrow_mut().pointer_up(event.pointer_id());
                emit_touch(transition);
            }
        })?;
    }

    let tracker = tracker.clone();
    browser::add_listener(&canvas, "pointermove", move |event: Event| {
        if let Some(event) = event.dyn_ref::<PointerEvent>() {
            let (x, y) = fraction(event);
            let is_down = event.buttons() != 0;
            let transition = tracker
                .borrow_mut()
                .pointer_move(event.pointer_id(), x, y, is_down);
            emit_touch(transition);
        }
    })?;

    Ok(())
}

fn emit_touch(transitions: impl IntoIterator<Item = InputEvent>) {
    for input in transitions {
        if let Err(err) = browser::dispatch_input_event(&input) {
            log::error!("Touch zone : {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::aggregator::InputAggregator;

    #[test]
    fn zones_cover_the_bottom_of_the_canvas() {
        assert_eq!(zone_at(0.1, 0.5), Some(Action::Left));
        assert_eq!(zone_at(0.5, 0.9), Some(Action::Right));
        assert_eq!(zone_at(0.8, 0.41), Some(Action::Jump));
    }

    #[test]
    fn top_and_gaps_are_dead() {
        assert_eq!(zone_at(0.1, 0.2), None);
        assert_eq!(zone_at(0.33, 0.5), None);
        assert_eq!(zone_at(0.66, 0.5), None);
        assert_eq!(zone_at(0.995, 0.5), None);
    }

    #[test]
    fn press_and_release_a_zone() {
        let mut tracker = TouchTracker::new();
        assert_eq!(
            tracker.pointer_down(1, 0.1, 0.5),
            vec![InputEvent::new(Action::Left, true)]
        );
        assert_eq!(
            tracker.pointer_up(1),
            Some(InputEvent::new(Action::Left, false))
        );
        // already released
        assert_eq!(tracker.pointer_up(1), None);
    }

    #[test]
    fn touches_on_different_zones_are_independent() {
        let mut tracker = TouchTracker::new();
        tracker.pointer_down(1, 0.5, 0.5);
        tracker.pointer_down(2, 0.8, 0.5);
        assert_eq!(
            tracker.pointer_up(2),
            Some(InputEvent::new(Action::Jump, false))
        );
        assert_eq!(
            tracker.pointer_up(1),
            Some(InputEvent::new(Action::Right, false))
        );
    }

    #[test]
    fn zone_held_by_two_fingers_releases_with_the_last() {
        let mut tracker = TouchTracker::new();
        tracker.pointer_down(1, 0.1, 0.5);
        assert_eq!(tracker.pointer_down(2, 0.2, 0.6), vec![InputEvent::new(Action::Left, true)]);
        assert_eq!(tracker.pointer_up(1), None);
        assert_eq!(tracker.pointer_up(2), Some(InputEvent::new(Action::Left, false)));
    }

    #[test]
    fn sliding_out_of_the_zone_releases_it() {
        let mut tracker = TouchTracker::new();
        tracker.pointer_down(7, 0.1, 0.5);
        assert_eq!(tracker.pointer_move(7, 0.2, 0.6, true), None);
        assert_eq!(
            tracker.pointer_move(7, 0.5, 0.6, true),
            Some(InputEvent::new(Action::Left, false))
        );
    }

    #[test]
    fn move_without_buttons_releases() {
        let mut tracker = TouchTracker::new();
        tracker.pointer_down(3, 0.8, 0.5);
        assert_eq!(
            tracker.pointer_move(3, 0.8, 0.5, false),
            Some(InputEvent::new(Action::Jump, false))
        );
    }

    #[test]
    fn dead_area_presses_nothing() {
        let mut tracker = TouchTracker::new();
        assert!(tracker.pointer_down(1, 0.5, 0.1).is_empty());
        assert_eq!(tracker.pointer_move(1, 0.5, 0.5, true), None);
        assert_eq!(tracker.pointer_up(1), None);
    }

    #[test]
    fn leave_and_cancel_release_like_up() {
        assert_eq!(button_transition("pointerdown"), Some(true));
        for event_type in ["pointerup", "pointerleave", "pointercancel"] {
            assert_eq!(button_transition(event_type), Some(false));
        }
        assert_eq!(button_transition("pointermove"), None);
    }

    #[test]
    fn leaving_an_active_button_clears_its_flag() {
        for release in ["pointerup", "pointerleave", "pointercancel"] {
            let mut input = InputAggregator::default();
            for event_type in ["pointerdown", release] {
                let pressed = button_transition(event_type).unwrap();
                input.apply(&InputEvent::new(Action::Right, pressed)).unwrap();
            }
            assert!(!input.snapshot(None).right, "{} should release", release);
        }
    }

    fn feed(input: &mut InputAggregator, transitions: impl IntoIterator<Item = InputEvent>) {
        for transition in transitions {
            input.apply(&transition).unwrap();
        }
    }

    #[test]
    fn pointer_pressing_another_zone_releases_the_first() {
        let mut tracker = TouchTracker::new();
        let mut input = InputAggregator::default();
        feed(&mut input, tracker.pointer_down(1, 0.1, 0.5));
        let transitions = tracker.pointer_down(1, 0.5, 0.5);
        assert_eq!(
            transitions,
            vec![
                InputEvent::new(Action::Left, false),
                InputEvent::new(Action::Right, true),
            ]
        );
        feed(&mut input, transitions);
        feed(&mut input, tracker.pointer_up(1));

        let snapshot = input.snapshot(None);
        assert!(!snapshot.left);
        assert!(!snapshot.right);
    }

    #[test]
    fn old_zone_stays_pressed_while_another_pointer_holds_it() {
        let mut tracker = TouchTracker::new();
        tracker.pointer_down(1, 0.1, 0.5);
        tracker.pointer_down(2, 0.2, 0.5);
        assert_eq!(
            tracker.pointer_down(1, 0.8, 0.5),
            vec![InputEvent::new(Action::Jump, true)]
        );
        assert!(tracker.is_held(Action::Left));
    }

    #[test]
    fn pressing_the_same_zone_again_emits_nothing() {
        let mut tracker = TouchTracker::new();
        tracker.pointer_down(4, 0.1, 0.5);
        assert!(tracker.pointer_down(4, 0.2, 0.7).is_empty());
    }

    #[test]
    fn button_and_zone_on_the_same_action_release_together() {
        let mut tracker = TouchTracker::new();
        let mut input = InputAggregator::default();
        feed(&mut input, tracker.pointer_down(1, 0.1, 0.5));
        feed(&mut input, tracker.button(0, Action::Left, true));

        // letting go of the button alone keeps the zone's press
        assert!(tracker.button(0, Action::Left, false).is_empty());
        assert!(input.snapshot(None).left);

        feed(&mut input, tracker.pointer_up(1));
        assert!(!input.snapshot(None).left);
    }

    #[test]
    fn button_release_without_press_is_silent() {
        let mut tracker = TouchTracker::new();
        assert!(tracker.button(2, Action::Transform, false).is_empty());
        assert_eq!(
            tracker.button(2, Action::Transform, true),
            vec![InputEvent::new(Action::Transform, true)]
        );
        assert_eq!(
            tracker.button(2, Action::Transform, false),
            vec![InputEvent::new(Action::Transform, false)]
        );
    }
}
