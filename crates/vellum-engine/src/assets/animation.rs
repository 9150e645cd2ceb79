use super::ImageHandle;

/// Ordered frame sequence played at a fixed number of ticks per frame.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<ImageHandle>,
    ticks_per_frame: u32,
    looping: bool,
}

impl Animation {
    pub fn new(frames: Vec<ImageHandle>, ticks_per_frame: u32) -> Self {
        Self { frames, ticks_per_frame: ticks_per_frame.max(1), looping: true }
    }

    /// Stops on the last frame instead of wrapping.
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[ImageHandle] {
        &self.frames
    }

    /// Frame shown `elapsed_ticks` after the animation started.
    pub fn frame_at(&self, elapsed_ticks: u64) -> Option<&ImageHandle> {
        if self.frames.is_empty() {
            return None;
        }
        let step = (elapsed_ticks / u64::from(self.ticks_per_frame)) as usize;
        let idx = if self.looping { step % self.frames.len() } else { step.min(self.frames.len() - 1) };
        self.frames.get(idx)
    }
}
