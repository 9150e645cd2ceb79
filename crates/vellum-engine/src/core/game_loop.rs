use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::input::InputHub;
use crate::time::{FixedStep, RateCounter, RateSample};

use super::{EngineError, LoopCore};

/// Counters published by the loop thread, readable from any thread.
#[derive(Debug, Default)]
pub struct LoopStats {
    fps: AtomicU32,
    tps: AtomicU32,
    frames: AtomicU64,
    ticks: AtomicU64,
}

impl LoopStats {
    /// Frames rendered during the last full second.
    pub fn fps(&self) -> u32 {
        self.fps.load(Ordering::Relaxed)
    }

    /// Ticks run during the last full second.
    pub fn tps(&self) -> u32 {
        self.tps.load(Ordering::Relaxed)
    }

    pub fn total_frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn total_ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    fn publish(&self, sample: RateSample) {
        self.fps.store(sample.frames_per_second, Ordering::Relaxed);
        self.tps.store(sample.ticks_per_second, Ordering::Relaxed);
    }
}

type LoopOutcome = (Box<LoopCore>, anyhow::Result<()>);

enum State {
    Idle(Box<LoopCore>),
    Running(JoinHandle<LoopOutcome>),
    /// The loop thread panicked and took the core with it.
    Lost,
}

/// Fixed-timestep game loop on a dedicated thread.
///
/// Each iteration converts elapsed wall time into tick debt, runs one tick
/// per whole tick owed and then renders exactly once. There is no cap on
/// the debt: after a stall the loop catches up with consecutive ticks.
///
/// A tick or render error ends the thread; [`stop`](Self::stop) returns it
/// and hands the core back so the loop can be inspected or restarted.
pub struct GameLoop {
    state: State,
    running: Arc<AtomicBool>,
    stats: Arc<LoopStats>,
    hub: InputHub,
}

impl GameLoop {
    pub fn new(core: LoopCore) -> Self {
        let hub = core.input();
        Self {
            state: State::Idle(Box::new(core)),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(LoopStats::default()),
            hub,
        }
    }

    /// Spawns the loop thread.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let mut core = match std::mem::replace(&mut self.state, State::Lost) {
            State::Idle(core) => core,
            State::Running(handle) => {
                self.state = State::Running(handle);
                return Err(EngineError::AlreadyRunning);
            }
            State::Lost => return Err(EngineError::CoreLost),
        };
        core.ctx_mut().clear_stop();

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let stats = Arc::clone(&self.stats);
        let handle = thread::Builder::new()
            .name("vellum-loop".into())
            .spawn(move || run(core, running, stats))
            .map_err(|e| {
                self.running.store(false, Ordering::Release);
                EngineError::Spawn(e)
            })?;

        self.state = State::Running(handle);
        log::info!("game loop started");
        Ok(())
    }

    /// Stops the loop and waits for its thread.
    ///
    /// Returns the error that ended the loop early, if any.
    pub fn stop(&mut self) -> anyhow::Result<()> {
        if !matches!(self.state, State::Running(_)) {
            return Err(EngineError::NotRunning.into());
        }
        self.running.store(false, Ordering::Release);
        self.join()
    }

    /// Waits for the loop to end on its own (error or stop request).
    pub fn wait(&mut self) -> anyhow::Result<()> {
        if !matches!(self.state, State::Running(_)) {
            return Err(EngineError::NotRunning.into());
        }
        self.join()
    }

    fn join(&mut self) -> anyhow::Result<()> {
        let State::Running(handle) = std::mem::replace(&mut self.state, State::Lost) else {
            return Err(EngineError::NotRunning.into());
        };
        match handle.join() {
            Ok((core, result)) => {
                self.state = State::Idle(core);
                log::info!("game loop stopped");
                result
            }
            Err(_) => {
                log::error!("game loop thread panicked");
                Err(EngineError::LoopPanicked.into())
            }
        }
    }

    /// Whether the loop thread is (still) running.
    pub fn is_running(&self) -> bool {
        matches!(&self.state, State::Running(h) if !h.is_finished())
    }

    pub fn stats(&self) -> Arc<LoopStats> {
        Arc::clone(&self.stats)
    }

    /// Producer handle for host input events.
    pub fn input(&self) -> InputHub {
        self.hub.clone()
    }

    /// The core while the loop is not running.
    pub fn core(&self) -> Option<&LoopCore> {
        match &self.state {
            State::Idle(core) => Some(core),
            _ => None,
        }
    }

    pub fn core_mut(&mut self) -> Option<&mut LoopCore> {
        match &mut self.state {
            State::Idle(core) => Some(core),
            _ => None,
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        if matches!(self.state, State::Running(_)) {
            if let Err(e) = self.stop() {
                log::error!("game loop ended with error: {e:#}");
            }
        }
    }
}

fn run(mut core: Box<LoopCore>, running: Arc<AtomicBool>, stats: Arc<LoopStats>) -> LoopOutcome {
    let result = drive(&mut core, &running, &stats);
    if let Err(e) = &result {
        log::error!("game loop failed: {e:#}");
    }
    running.store(false, Ordering::Release);
    (core, result)
}

fn drive(core: &mut LoopCore, running: &AtomicBool, stats: &LoopStats) -> anyhow::Result<()> {
    let mut step = FixedStep::new(core.config().ticks_per_second);
    let mut rate = RateCounter::new(Instant::now());
    let frame_budget = core.config().max_fps.map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));

    while running.load(Ordering::Acquire) {
        let frame_start = Instant::now();
        step.advance(frame_start);

        while step.consume_tick() {
            core.tick()?;
            rate.record_tick();
            stats.ticks.fetch_add(1, Ordering::Relaxed);
            if core.ctx().stop_requested() {
                log::info!("game loop stop requested at tick {}", core.ctx().tick());
                running.store(false, Ordering::Release);
                break;
            }
        }

        core.render()?;
        rate.record_frame();
        stats.frames.fetch_add(1, Ordering::Relaxed);

        if let Some(sample) = rate.sample(Instant::now()) {
            stats.publish(sample);
            log::debug!("fps {} tps {}", sample.frames_per_second, sample.ticks_per_second);
        }

        match frame_budget {
            Some(budget) => {
                let spent = frame_start.elapsed();
                if spent < budget {
                    thread::sleep(budget - spent);
                }
            }
            None => thread::yield_now(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::core::EngineConfig;
    use crate::render::HeadlessSurface;
    use crate::scene::{Entity, Script, ScriptCtx};

    fn game_loop(max_fps: Option<u32>) -> GameLoop {
        let surface = HeadlessSurface::new(Viewport::new(320.0, 180.0), 2).unwrap();
        let config = EngineConfig { ticks_per_second: 100, max_fps, ..Default::default() };
        GameLoop::new(LoopCore::new(config, Box::new(surface)).unwrap())
    }

    struct StopAfter(u64);

    impl Script for StopAfter {
        fn tick(&mut self, ctx: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
            if ctx.engine.tick() >= self.0 {
                ctx.engine.request_stop();
            }
            Ok(())
        }
    }

    struct Fail;

    impl Script for Fail {
        fn tick(&mut self, _: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
            anyhow::bail!("script exploded")
        }
    }

    #[test]
    fn start_twice_fails_fast() {
        let mut gl = game_loop(Some(240));
        gl.start().unwrap();
        assert!(matches!(gl.start(), Err(EngineError::AlreadyRunning)));
        gl.stop().unwrap();
        assert!(gl.core().is_some());
    }

    #[test]
    fn stop_without_start_is_an_error() {
        let mut gl = game_loop(None);
        assert!(gl.stop().is_err());
    }

    #[test]
    fn runs_ticks_and_frames_until_stopped() {
        let mut gl = game_loop(Some(240));
        gl.start().unwrap();
        thread::sleep(Duration::from_millis(300));
        gl.stop().unwrap();

        let stats = gl.stats();
        assert!(stats.total_ticks() >= 10, "ticks = {}", stats.total_ticks());
        assert!(stats.total_frames() >= 1);
        assert_eq!(gl.core().map(|c| c.ctx().tick()), Some(stats.total_ticks()));
    }

    #[test]
    fn script_can_request_stop() {
        let mut gl = game_loop(Some(500));
        if let Some(core) = gl.core_mut() {
            core.scene_mut().add(Entity::new("timer").with_script(StopAfter(5)));
        }
        gl.start().unwrap();
        gl.wait().unwrap();
        assert_eq!(gl.core().map(|c| c.ctx().tick()), Some(5));
    }

    #[test]
    fn tick_error_ends_loop_and_is_reported() {
        let mut gl = game_loop(None);
        if let Some(core) = gl.core_mut() {
            core.scene_mut().add(Entity::new("bomb").with_script(Fail));
        }
        gl.start().unwrap();
        let err = gl.wait().unwrap_err();
        assert!(err.to_string().contains("script exploded"));
        assert!(!gl.is_running());
        gl.start().unwrap();
        assert!(gl.stop().is_err());
    }
}
