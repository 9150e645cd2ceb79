use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use anyhow::{Result, bail};
use parking_lot::Mutex;

use crate::coords::Viewport;
use crate::core::EngineError;

use super::DrawList;

/// Presentation target for recorded frames.
///
/// Implemented by the host's display layer. Called from the loop thread only.
pub trait Surface: Send {
    /// Ensures the backing buffers exist for the current output size and
    /// returns that size (the actual resolution for this frame).
    fn prepare(&mut self) -> Result<Viewport>;

    /// Hands over a finished frame.
    fn present(&mut self, frame: &DrawList) -> Result<()>;
}

#[derive(Debug)]
struct Shared {
    size: Mutex<Viewport>,
    presented: AtomicU64,
    last_len: AtomicUsize,
}

/// Cross-thread view of a [`HeadlessSurface`].
///
/// The host resizes the output and reads presentation counters through it
/// while the loop owns the surface itself.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    shared: Arc<Shared>,
}

impl SurfaceHandle {
    /// Requests a new output size; applied on the next `prepare`.
    pub fn resize(&self, width: f32, height: f32) {
        *self.shared.size.lock() = Viewport::new(width, height);
    }

    pub fn size(&self) -> Viewport {
        *self.shared.size.lock()
    }

    /// Frames presented so far.
    pub fn presented_frames(&self) -> u64 {
        self.shared.presented.load(Ordering::Relaxed)
    }

    /// Item count of the most recently presented frame.
    pub fn last_frame_len(&self) -> usize {
        self.shared.last_len.load(Ordering::Relaxed)
    }
}

/// Offscreen multi-buffered surface.
///
/// Keeps a ring of `buffers` draw lists and presents into them in turn.
/// Buffers are recreated whenever the requested size changes.
#[derive(Debug)]
pub struct HeadlessSurface {
    shared: Arc<Shared>,
    bound: Option<Viewport>,
    buffers: Vec<DrawList>,
    buffer_count: usize,
    current: usize,
}

impl HeadlessSurface {
    /// Creates a surface. At least two buffers are required.
    pub fn new(size: Viewport, buffers: usize) -> Result<Self, EngineError> {
        if buffers < 2 {
            return Err(EngineError::config(format!("surface needs at least 2 buffers, got {buffers}")));
        }
        if !size.is_valid() {
            return Err(EngineError::config(format!(
                "surface size {}x{} is not drawable",
                size.width, size.height
            )));
        }
        Ok(Self {
            shared: Arc::new(Shared {
                size: Mutex::new(size),
                presented: AtomicU64::new(0),
                last_len: AtomicUsize::new(0),
            }),
            bound: None,
            buffers: Vec::new(),
            buffer_count: buffers,
            current: 0,
        })
    }

    pub fn handle(&self) -> SurfaceHandle {
        SurfaceHandle { shared: Arc::clone(&self.shared) }
    }

    /// Buffer that received the most recent frame.
    pub fn front(&self) -> Option<&DrawList> {
        if self.buffers.is_empty() {
            return None;
        }
        let idx = (self.current + self.buffer_count - 1) % self.buffer_count;
        self.buffers.get(idx)
    }

    fn recreate(&mut self, size: Viewport) {
        log::debug!(
            "headless surface: recreating {} buffers at {}x{}",
            self.buffer_count,
            size.width,
            size.height
        );
        self.buffers = (0..self.buffer_count).map(|_| DrawList::new()).collect();
        self.current = 0;
        self.bound = Some(size);
    }
}

impl Surface for HeadlessSurface {
    fn prepare(&mut self) -> Result<Viewport> {
        let size = self.handle().size();
        if !size.is_valid() {
            bail!("surface size {}x{} is not drawable", size.width, size.height);
        }
        if self.bound != Some(size) {
            self.recreate(size);
        }
        Ok(size)
    }

    fn present(&mut self, frame: &DrawList) -> Result<()> {
        let Some(buffer) = self.buffers.get_mut(self.current) else {
            bail!("present called before prepare");
        };
        buffer.clone_from_list(frame);
        self.current = (self.current + 1) % self.buffer_count;

        self.shared.last_len.store(frame.len(), Ordering::Relaxed);
        self.shared.presented.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::render::Graphics;

    #[test]
    fn rejects_single_buffer() {
        assert!(HeadlessSurface::new(Viewport::new(640.0, 480.0), 1).is_err());
    }

    #[test]
    fn present_rotates_buffers_and_counts() {
        let mut surface = HeadlessSurface::new(Viewport::new(640.0, 480.0), 2).unwrap();
        let handle = surface.handle();
        let mut g = Graphics::new(Viewport::new(640.0, 480.0));

        for _ in 0..3 {
            let actual = surface.prepare().unwrap();
            g.bind(Viewport::new(640.0, 480.0), actual);
            g.begin_frame(Color::BLACK);
            g.fill_rect(0.0, 0.0, 10.0, 10.0);
            surface.present(g.draw_list()).unwrap();
        }

        assert_eq!(handle.presented_frames(), 3);
        assert_eq!(handle.last_frame_len(), 2);
        assert_eq!(surface.front().map(DrawList::len), Some(2));
    }

    #[test]
    fn resize_is_picked_up_by_prepare() {
        let mut surface = HeadlessSurface::new(Viewport::new(640.0, 480.0), 3).unwrap();
        surface.handle().resize(1280.0, 720.0);
        assert_eq!(surface.prepare().unwrap(), Viewport::new(1280.0, 720.0));

        surface.handle().resize(0.0, 720.0);
        assert!(surface.prepare().is_err());
    }
}
