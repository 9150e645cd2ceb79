use std::fmt;
use std::sync::Arc;

use crate::coords::Vec2;
use crate::scene::{EntityId, SceneCommands};

/// Collider geometry in pixels, relative to the body origin.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32, offset: Vec2 },
    /// Box centered on `offset`.
    Box { width: f32, height: f32, offset: Vec2 },
    /// Regular polygon with `sides` vertices on a circle of `radius`.
    Polygon { sides: u32, radius: f32, offset: Vec2 },
    /// Convex hull of the given points.
    ArbitraryPoints { points: Vec<Vec2> },
}

impl ColliderShape {
    pub fn circle(radius: f32) -> Self {
        ColliderShape::Circle { radius, offset: Vec2::ZERO }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        ColliderShape::Box { width, height, offset: Vec2::ZERO }
    }

    /// Outline in pixels relative to the body origin, used for debug drawing.
    ///
    /// Circles are approximated with 24 segments.
    pub fn outline(&self) -> Vec<Vec2> {
        match self {
            ColliderShape::Circle { radius, offset } => ring(24, *radius, *offset),
            ColliderShape::Box { width, height, offset } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                vec![
                    *offset + Vec2::new(-hw, -hh),
                    *offset + Vec2::new(hw, -hh),
                    *offset + Vec2::new(hw, hh),
                    *offset + Vec2::new(-hw, hh),
                ]
            }
            ColliderShape::Polygon { sides, radius, offset } => ring(*sides, *radius, *offset),
            ColliderShape::ArbitraryPoints { points } => points.clone(),
        }
    }
}

fn ring(sides: u32, radius: f32, offset: Vec2) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / sides.max(1) as f32;
    (0..sides).map(|i| offset + Vec2::new(radius, 0.0).rotated(step * i as f32)).collect()
}

/// Which fixture of which entity took part in a trigger contact.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ColliderRef {
    pub entity: EntityId,
    /// Index of the collider in its rigid body's collider list.
    pub index: usize,
}

/// Contact handed to a [`TriggerListener`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TriggerContact {
    /// The trigger collider that owns the listener.
    pub trigger: ColliderRef,
    /// The solid collider that entered or left it.
    pub other: ColliderRef,
}

/// Overlap callbacks for trigger colliders.
///
/// Called on the loop thread after the physics step. Listeners are shared
/// between clones of a collider, so they take `&self`.
pub trait TriggerListener: Send + Sync {
    fn on_trigger_enter(&self, _contact: &TriggerContact, _commands: &mut SceneCommands) {}
    fn on_trigger_exit(&self, _contact: &TriggerContact, _commands: &mut SceneCommands) {}
}

/// One fixture of a rigid body.
#[derive(Clone)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Detects overlap without a collision response.
    pub trigger: bool,
    /// `0` collides with everything. `g > 0` joins group `g`; `g < 0` joins
    /// group `-g` and never collides with other members of it. Valid groups
    /// are `1..=32`.
    pub group: i32,
    listener: Option<Arc<dyn TriggerListener>>,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        Self { shape, trigger: false, group: 0, listener: None }
    }

    /// Trigger collider reporting to `listener`.
    pub fn trigger(shape: ColliderShape, listener: Arc<dyn TriggerListener>) -> Self {
        Self { shape, trigger: true, group: 0, listener: Some(listener) }
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn TriggerListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn listener(&self) -> Option<&Arc<dyn TriggerListener>> {
        self.listener.as_ref()
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("shape", &self.shape)
            .field("trigger", &self.trigger)
            .field("group", &self.group)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_outline_is_centered_on_offset() {
        let shape = ColliderShape::Box { width: 4.0, height: 2.0, offset: Vec2::new(10.0, 0.0) };
        let pts = shape.outline();
        assert_eq!(pts[0], Vec2::new(8.0, -1.0));
        assert_eq!(pts[2], Vec2::new(12.0, 1.0));
    }

    #[test]
    fn polygon_outline_has_one_point_per_side() {
        let shape = ColliderShape::Polygon { sides: 6, radius: 5.0, offset: Vec2::ZERO };
        let pts = shape.outline();
        assert_eq!(pts.len(), 6);
        assert!(pts.iter().all(|p| (p.length() - 5.0).abs() < 1e-4));
    }
}
