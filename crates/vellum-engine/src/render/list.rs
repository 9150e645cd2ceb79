use crate::coords::Rect;
use crate::paint::{Color, Composite, Stroke};

use super::{Affine, DrawCmd};

/// A single recorded draw: command plus the state resolved at record time.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    pub transform: Affine,
    /// Scissor rect in actual pixels. `None` = no clipping.
    pub clip: Option<Rect>,
    pub composite: Composite,
    /// Stroke with `width` already scaled to actual pixels.
    pub stroke: Stroke,
    pub color: Color,
    /// Whether scene lighting contributes to this draw.
    pub lit: bool,
}

/// Recorded draw stream for one frame, in paint order (back-to-front).
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps capacity, so no per-frame allocation once warmed
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items whose command is of `kind` (see [`DrawCmd::kind`]).
    pub fn count_kind(&self, kind: &str) -> usize {
        self.items.iter().filter(|i| i.cmd.kind() == kind).count()
    }

    /// Copies `other` into `self`, reusing capacity.
    pub fn clone_from_list(&mut self, other: &DrawList) {
        self.items.clear();
        self.items.extend_from_slice(&other.items);
    }
}
