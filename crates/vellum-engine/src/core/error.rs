use std::fmt;

/// Which graphics state stack a push/pop targeted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StackKind {
    Transform,
    Clip,
    Composite,
    Stroke,
    Color,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackKind::Transform => "transform",
            StackKind::Clip => "clip",
            StackKind::Composite => "composite",
            StackKind::Stroke => "stroke",
            StackKind::Color => "color",
        };
        f.write_str(name)
    }
}

/// Engine-level failures.
///
/// Configuration variants are raised at setup time only. `StackUnderflow`
/// and `StackImbalance` are raised during rendering and end the loop like
/// any other render error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("game loop is already running")]
    AlreadyRunning,

    #[error("game loop is not running")]
    NotRunning,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} stack underflow: pop without a matching push")]
    StackUnderflow(StackKind),

    #[error("entity `{entity}` left the graphics stacks at depths {found:?}, expected {expected:?}")]
    StackImbalance { entity: String, expected: [usize; 5], found: [usize; 5] },

    #[error("invalid asset `{name}`: {reason}")]
    InvalidAsset { name: String, reason: String },

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("failed to spawn the game loop thread")]
    Spawn(#[source] std::io::Error),

    #[error("game loop thread panicked")]
    LoopPanicked,

    #[error("loop core was lost when its thread panicked")]
    CoreLost,
}

impl EngineError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }
}
