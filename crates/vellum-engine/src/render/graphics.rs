use crate::coords::{Rect, ResolutionMapper, Vec2, Viewport};
use crate::core::{EngineError, StackKind};
use crate::paint::{Color, Composite, Stroke};

use super::{Affine, DrawCmd, DrawItem, DrawList, GraphicsState, StateStack};

/// Resolution-independent drawing context.
///
/// Callers draw in reference pixels; every coordinate passed to a primitive
/// or to `translate`/`clip` is mapped per axis onto the actual framebuffer
/// before it is recorded. Rotation and scale factors are unitless and pass
/// through unchanged.
///
/// Five independent LIFO stacks save and restore the drawing state. Every
/// `push_*` must be matched by a `pop_*`; an unmatched pop returns
/// [`EngineError::StackUnderflow`].
#[derive(Debug)]
pub struct Graphics {
    mapper: ResolutionMapper,
    state: GraphicsState,

    transforms: StateStack<Affine>,
    clips: StateStack<Option<Rect>>,
    composites: StateStack<Composite>,
    strokes: StateStack<Stroke>,
    colors: StateStack<Color>,

    lighting: bool,
    list: DrawList,
}

impl Graphics {
    pub fn new(reference: Viewport) -> Self {
        Self {
            mapper: ResolutionMapper::identity(reference),
            state: GraphicsState::default(),
            transforms: StateStack::new(StackKind::Transform),
            clips: StateStack::new(StackKind::Clip),
            composites: StateStack::new(StackKind::Composite),
            strokes: StateStack::new(StackKind::Stroke),
            colors: StateStack::new(StackKind::Color),
            lighting: true,
            list: DrawList::new(),
        }
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    /// Binds the reference and actual resolutions for subsequent draws.
    pub fn bind(&mut self, reference: Viewport, actual: Viewport) {
        let mapper = ResolutionMapper::new(reference, actual);
        if mapper != self.mapper {
            log::debug!(
                "graphics bound {}x{} -> {}x{}",
                reference.width,
                reference.height,
                actual.width,
                actual.height
            );
        }
        self.mapper = mapper;
    }

    /// Starts a new frame: drops last frame's items, resets all state and
    /// records a full-surface clear.
    pub fn begin_frame(&mut self, background: Color) {
        self.list.clear();
        self.reset_all();
        self.lighting = true;
        self.record(DrawCmd::Clear(background));
    }

    #[inline]
    pub fn mapper(&self) -> &ResolutionMapper {
        &self.mapper
    }

    #[inline]
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    /// Depths of the transform, clip, composite, stroke and color stacks.
    pub fn depths(&self) -> [usize; 5] {
        [
            self.transforms.depth(),
            self.clips.depth(),
            self.composites.depth(),
            self.strokes.depth(),
            self.colors.depth(),
        ]
    }

    // ── stacks ────────────────────────────────────────────────────────────

    pub fn push_transform(&mut self) {
        self.transforms.push(self.state.transform);
    }

    pub fn pop_transform(&mut self) -> Result<(), EngineError> {
        self.state.transform = self.transforms.pop()?;
        Ok(())
    }

    pub fn push_clip(&mut self) {
        self.clips.push(self.state.clip);
    }

    pub fn pop_clip(&mut self) -> Result<(), EngineError> {
        self.state.clip = self.clips.pop()?;
        Ok(())
    }

    pub fn push_composite(&mut self) {
        self.composites.push(self.state.composite);
    }

    pub fn pop_composite(&mut self) -> Result<(), EngineError> {
        self.state.composite = self.composites.pop()?;
        Ok(())
    }

    pub fn push_stroke(&mut self) {
        self.strokes.push(self.state.stroke);
    }

    pub fn pop_stroke(&mut self) -> Result<(), EngineError> {
        self.state.stroke = self.strokes.pop()?;
        Ok(())
    }

    pub fn push_color(&mut self) {
        self.colors.push(self.state.color);
    }

    pub fn pop_color(&mut self) -> Result<(), EngineError> {
        self.state.color = self.colors.pop()?;
        Ok(())
    }

    /// Saves all five pieces of state as one operation.
    pub fn push_all(&mut self) {
        self.push_transform();
        self.push_clip();
        self.push_composite();
        self.push_stroke();
        self.push_color();
    }

    /// Restores all five pieces of state saved by the matching [`push_all`].
    ///
    /// Checks every stack before popping any, so an underflow leaves the
    /// current state untouched.
    ///
    /// [`push_all`]: Self::push_all
    pub fn pop_all(&mut self) -> Result<(), EngineError> {
        let kinds = [
            (self.transforms.depth(), StackKind::Transform),
            (self.clips.depth(), StackKind::Clip),
            (self.composites.depth(), StackKind::Composite),
            (self.strokes.depth(), StackKind::Stroke),
            (self.colors.depth(), StackKind::Color),
        ];
        if let Some((_, kind)) = kinds.iter().find(|(depth, _)| *depth == 0) {
            return Err(EngineError::StackUnderflow(*kind));
        }

        self.pop_color()?;
        self.pop_stroke()?;
        self.pop_composite()?;
        self.pop_clip()?;
        self.pop_transform()
    }

    /// Pops each stack down to `depths`, restoring the state saved at that
    /// level. Stacks already at or below their target are left alone.
    pub fn unwind_to(&mut self, depths: [usize; 5]) {
        unwind(&mut self.transforms, &mut self.state.transform, depths[0]);
        unwind(&mut self.clips, &mut self.state.clip, depths[1]);
        unwind(&mut self.composites, &mut self.state.composite, depths[2]);
        unwind(&mut self.strokes, &mut self.state.stroke, depths[3]);
        unwind(&mut self.colors, &mut self.state.color, depths[4]);
    }

    /// Empties every stack and restores the default state.
    pub fn reset_all(&mut self) {
        self.transforms.clear();
        self.clips.clear();
        self.composites.clear();
        self.strokes.clear();
        self.colors.clear();
        self.state = GraphicsState::default();
    }

    // ── transform ─────────────────────────────────────────────────────────

    /// Translates by reference-pixel offsets.
    pub fn translate(&mut self, x: f32, y: f32) {
        let (tx, ty) = (self.mapper.map_x(x), self.mapper.map_y(y));
        self.state.transform = self.state.transform.translate(tx, ty);
    }

    pub fn rotate(&mut self, radians: f32) {
        if radians != 0.0 {
            self.state.transform = self.state.transform.rotate(radians);
        }
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.scale(sx, sy);
    }

    // ── clip / paint state ────────────────────────────────────────────────

    /// Intersects the current clip with `rect` (reference pixels, local space).
    pub fn clip(&mut self, rect: Rect) {
        let device = self.state.transform.apply_rect_bounds(self.mapper.map_rect(rect.normalized()));
        self.state.clip = Some(match self.state.clip {
            None => device,
            // No overlap produces a zero-area clip so everything is culled.
            Some(parent) => parent.intersect(device).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        });
    }

    pub fn clear_clip(&mut self) {
        self.state.clip = None;
    }

    pub fn set_color(&mut self, color: Color) {
        self.state.color = color;
    }

    pub fn set_composite(&mut self, composite: Composite) {
        self.state.composite = composite;
    }

    pub fn set_stroke(&mut self, stroke: Stroke) {
        self.state.stroke = stroke;
    }

    /// Toggles scene lighting contribution for subsequent draws.
    pub fn set_lighting(&mut self, enabled: bool) {
        self.lighting = enabled;
    }

    #[inline]
    pub fn lighting(&self) -> bool {
        self.lighting
    }

    // ── recording ─────────────────────────────────────────────────────────

    #[inline]
    pub(crate) fn map_point(&self, p: Vec2) -> Vec2 {
        self.mapper.map_point(p)
    }

    #[inline]
    pub(crate) fn map_rect(&self, r: Rect) -> Rect {
        self.mapper.map_rect(r)
    }

    pub(crate) fn record(&mut self, cmd: DrawCmd) {
        let mut stroke = self.state.stroke;
        stroke.width = self.mapper.map_len(stroke.width);

        log::trace!("record {}", cmd.kind());
        self.list.push(DrawItem {
            cmd,
            transform: self.state.transform,
            clip: self.state.clip,
            composite: self.state.composite,
            stroke,
            color: self.state.color,
            lit: self.lighting,
        });
    }
}

fn unwind<T>(stack: &mut StateStack<T>, current: &mut T, depth: usize) {
    while stack.depth() > depth {
        match stack.pop() {
            Ok(saved) => *current = saved,
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::BlendMode;

    fn hd_to_720() -> Graphics {
        let mut g = Graphics::new(Viewport::new(1920.0, 1080.0));
        g.bind(Viewport::new(1920.0, 1080.0), Viewport::new(1280.0, 720.0));
        g
    }

    fn scribble(g: &mut Graphics) {
        g.translate(40.0, 25.0);
        g.rotate(0.7);
        g.clip(Rect::new(0.0, 0.0, 300.0, 200.0));
        g.set_color(Color::from_srgb_u8(10, 200, 30, 128));
        g.set_stroke(Stroke::new(6.0));
        g.set_composite(Composite::new(BlendMode::Additive, 0.3));
    }

    // ── push_all / pop_all ────────────────────────────────────────────────

    #[test]
    fn pop_all_restores_state_before_push_all() {
        let mut g = hd_to_720();
        scribble(&mut g);
        let before = g.state().clone();

        g.push_all();
        scribble(&mut g);
        g.push_all();
        scribble(&mut g);
        g.pop_all().unwrap();
        g.pop_all().unwrap();

        assert_eq!(g.state(), &before);
        assert_eq!(g.depths(), [0; 5]);
    }

    #[test]
    fn unmatched_pop_all_fails_loudly_and_keeps_state() {
        let mut g = hd_to_720();
        scribble(&mut g);
        let before = g.state().clone();

        let err = g.pop_all().unwrap_err();
        assert!(matches!(err, EngineError::StackUnderflow(StackKind::Transform)));
        assert_eq!(g.state(), &before);
    }

    #[test]
    fn single_stack_underflow() {
        let mut g = hd_to_720();
        g.push_color();
        g.pop_color().unwrap();
        assert!(matches!(g.pop_color(), Err(EngineError::StackUnderflow(StackKind::Color))));
    }

    #[test]
    fn stacks_are_independent() {
        let mut g = hd_to_720();
        g.push_color();
        g.set_color(Color::BLACK);
        g.push_transform();
        g.translate(10.0, 10.0);

        g.pop_color().unwrap();
        assert_eq!(g.state().color, Color::WHITE);
        assert!(!g.state().transform.is_identity());
        g.pop_transform().unwrap();
        assert!(g.state().transform.is_identity());
    }

    #[test]
    fn unwind_restores_the_state_saved_at_the_target_depth() {
        let mut g = hd_to_720();
        g.push_color();
        g.set_color(Color::BLACK);
        g.push_color();
        g.set_color(Color::TRANSPARENT);
        g.push_transform();

        g.unwind_to([0; 5]);
        assert_eq!(g.depths(), [0; 5]);
        assert_eq!(g.state().color, Color::WHITE);
    }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn translate_is_mapped_to_actual_pixels() {
        let mut g = hd_to_720();
        g.translate(960.0, 540.0);
        assert_eq!(g.state().transform.apply(Vec2::ZERO), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn nested_clips_intersect() {
        let mut g = Graphics::new(Viewport::new(100.0, 100.0));
        g.clip(Rect::new(0.0, 0.0, 50.0, 50.0));
        g.clip(Rect::new(25.0, 25.0, 50.0, 50.0));
        assert_eq!(g.state().clip, Some(Rect::new(25.0, 25.0, 25.0, 25.0)));

        g.clip(Rect::new(90.0, 90.0, 5.0, 5.0));
        assert!(g.state().clip.unwrap().is_empty());
    }

    #[test]
    fn begin_frame_resets_and_clears() {
        let mut g = hd_to_720();
        g.push_all();
        scribble(&mut g);
        g.begin_frame(Color::BLACK);
        assert_eq!(g.depths(), [0; 5]);
        assert_eq!(g.state(), &GraphicsState::default());
        assert_eq!(g.draw_list().len(), 1);
        assert_eq!(g.draw_list().count_kind("clear"), 1);
    }
}
