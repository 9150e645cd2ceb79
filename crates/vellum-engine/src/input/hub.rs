use std::sync::Arc;

use parking_lot::Mutex;

use super::frame::InputFrame;
use super::state::InputState;
use super::types::{InputEvent, Key, MouseButton};

/// Input as seen by one simulation tick.
///
/// Produced by [`InputHub::commit`]; immutable for the rest of the tick.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub state: InputState,
    pub frame: InputFrame,
}

impl InputSnapshot {
    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.frame.key_pressed(key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.state.button_down(button)
    }

    /// Vertical wheel movement since the previous tick, in lines.
    #[inline]
    pub fn wheel_delta(&self) -> f32 {
        self.frame.wheel_y
    }
}

#[derive(Debug, Default)]
struct Pending {
    state: InputState,
    frame: InputFrame,
}

/// Producer/consumer boundary between the host event thread and the loop.
///
/// The host pushes events from its own thread through any clone of the hub;
/// the loop thread calls [`commit`](Self::commit) exactly once per tick. Each
/// event is applied under the lock, so a commit never observes half of an event.
#[derive(Debug, Clone, Default)]
pub struct InputHub {
    pending: Arc<Mutex<Pending>>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one host event.
    pub fn push(&self, ev: InputEvent) {
        let mut guard = self.pending.lock();
        let Pending { state, frame } = &mut *guard;
        state.apply_event(frame, ev);
    }

    /// Records a batch of host events atomically with respect to `commit`.
    pub fn push_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let mut guard = self.pending.lock();
        let Pending { state, frame } = &mut *guard;
        for ev in events {
            state.apply_event(frame, ev);
        }
    }

    /// Copies the held state and takes the accumulated transitions.
    pub fn commit(&self) -> InputSnapshot {
        let mut guard = self.pending.lock();
        let frame = std::mem::take(&mut guard.frame);
        InputSnapshot { state: guard.state.clone(), frame }
    }
}
