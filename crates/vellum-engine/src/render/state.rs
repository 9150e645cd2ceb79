use crate::coords::Rect;
use crate::core::{EngineError, StackKind};
use crate::paint::{Color, Composite, Stroke};

use super::Affine;

/// The five pieces of drawing state saved and restored around each entity.
///
/// `transform` and `clip` are in actual framebuffer pixels; `stroke.width` is
/// kept in reference pixels and scaled when a primitive is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub transform: Affine,
    pub clip: Option<Rect>,
    pub composite: Composite,
    pub stroke: Stroke,
    pub color: Color,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clip: None,
            composite: Composite::OPAQUE,
            stroke: Stroke::default(),
            color: Color::WHITE,
        }
    }
}

/// LIFO of saved values for one [`StackKind`].
///
/// Popping an empty stack is an error, never a silent no-op.
#[derive(Debug, Clone)]
pub struct StateStack<T> {
    kind: StackKind,
    saved: Vec<T>,
}

impl<T> StateStack<T> {
    pub fn new(kind: StackKind) -> Self {
        Self { kind, saved: Vec::new() }
    }

    #[inline]
    pub fn kind(&self) -> StackKind {
        self.kind
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.saved.push(value);
    }

    pub fn pop(&mut self) -> Result<T, EngineError> {
        self.saved.pop().ok_or(EngineError::StackUnderflow(self.kind))
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_empty_reports_kind() {
        let mut s: StateStack<u8> = StateStack::new(StackKind::Clip);
        let err = s.pop().unwrap_err();
        assert!(matches!(err, EngineError::StackUnderflow(StackKind::Clip)));
    }

    #[test]
    fn lifo_order() {
        let mut s = StateStack::new(StackKind::Color);
        s.push(1);
        s.push(2);
        assert_eq!(s.pop().unwrap(), 2);
        assert_eq!(s.pop().unwrap(), 1);
        assert_eq!(s.depth(), 0);
    }
}
