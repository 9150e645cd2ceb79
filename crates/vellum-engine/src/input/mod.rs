//! Input subsystem.
//!
//! Public API is platform-agnostic. The host translates its window events into
//! [`InputEvent`]s and pushes them through an [`InputHub`]; the game loop
//! commits one [`InputSnapshot`] per tick.

mod frame;
mod hub;
mod state;
mod types;

pub use frame::InputFrame;
pub use hub::{InputHub, InputSnapshot};
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PIXELS_PER_WHEEL_LINE,
};
