pub mod aggregator;
pub mod channel;
pub mod controls;

pub use self::aggregator::{InputAggregator, InputSnapshot, KeyBindings};
pub use self::channel::{Action, InputEvent};
