//! Engine core: configuration, shared context, errors and the game loop.
//!
//! `LoopCore` owns the simulation state and performs single ticks and
//! frames; `GameLoop` drives it on a dedicated thread at a fixed tick rate.

mod config;
mod ctx;
mod error;
mod game_loop;
mod loop_core;

pub use config::{DebugFlags, EngineConfig};
pub use ctx::EngineContext;
pub use error::{EngineError, StackKind};
pub use game_loop::{GameLoop, LoopStats};
pub use loop_core::LoopCore;
