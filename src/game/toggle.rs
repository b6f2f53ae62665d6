/// Edge trigger for the skin swap: fires once per press, no matter how many
/// frames the press is held.
///
/// ┌──────────── State Transition Flow ────────────┐
/// │  From State  →  Event     →  To State         │
/// ├───────────────────────────────────────────────┤
/// │  Armed       →  Pressed   →  Fired   (fires)  │
/// │  Fired       →  Released  →  Armed            │
/// │  -----          --------                      │
/// │  Armed       →  Released  →  Armed            │
/// │  Fired       →  Pressed   →  Fired            │
/// └───────────────────────────────────────────────┘
///
/// States are types, so `fire()` only exists on an armed trigger and
/// `rearm()` only on a fired one.
#[derive(Debug, Copy, Clone)]
pub struct Armed;

#[derive(Debug, Copy, Clone)]
pub struct Fired;

#[derive(Debug, Copy, Clone)]
pub struct TriggerState<S> {
    // type-level tag only, never read
    _state: S,
}

impl TriggerState<Armed> {
    pub fn new() -> Self {
        TriggerState { _state: Armed }
    }

    pub fn fire(self) -> TriggerState<Fired> {
        TriggerState { _state: Fired }
    }
}

impl Default for TriggerState<Armed> {
    fn default() -> Self {
        TriggerState::new()
    }
}

impl TriggerState<Fired> {
    pub fn rearm(self) -> TriggerState<Armed> {
        TriggerState { _state: Armed }
    }
}

pub enum Event {
    Pressed,
    Released,
}

impl From<bool> for Event {
    fn from(pressed: bool) -> Self {
        if pressed {
            Event::Pressed
        } else {
            Event::Released
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum TriggerStateMachine {
    Armed(TriggerState<Armed>),
    Fired(TriggerState<Fired>),
}

impl From<TriggerState<Armed>> for TriggerStateMachine {
    fn from(state: TriggerState<Armed>) -> Self {
        TriggerStateMachine::Armed(state)
    }
}

impl From<TriggerState<Fired>> for TriggerStateMachine {
    fn from(state: TriggerState<Fired>) -> Self {
        TriggerStateMachine::Fired(state)
    }
}

impl TriggerStateMachine {
    // consumes self, the old state can't be observed after a transition
    fn transition(self, event: Event) -> Self {
        use TriggerStateMachine::*;
        match (self, event) {
            (Armed(state), Event::Pressed) => state.fire().into(),
            (Fired(state), Event::Released) => state.rearm().into(),
            // holding, or staying released
            _ => self,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct EdgeTrigger {
    state: TriggerStateMachine,
}

impl Default for EdgeTrigger {
    fn default() -> Self {
        EdgeTrigger::new()
    }
}

impl EdgeTrigger {
    pub fn new() -> Self {
        EdgeTrigger {
            state: TriggerState::<Armed>::new().into(),
        }
    }

    /// Feeds this frame's level, returns true only on the rising edge.
    pub fn update(&mut self, pressed: bool) -> bool {
        let was_armed = matches!(self.state, TriggerStateMachine::Armed(_));
        self.state = self.state.transition(pressed.into());
        was_armed && self.is_held()
    }

    /// last level seen was "pressed"
    pub fn is_held(&self) -> bool {
        matches!(self.state, TriggerStateMachine::Fired(_))
    }
}
