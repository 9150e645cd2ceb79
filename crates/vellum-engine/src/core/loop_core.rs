use crate::coords::Vec2;
use crate::input::InputHub;
use crate::paint::{Color, Stroke};
use crate::render::{Graphics, Surface};
use crate::scene::Scene;

use super::{EngineConfig, EngineContext, EngineError};

const AXIS_X: Color = Color::from_premul(1.0, 0.0, 0.0, 1.0);
const AXIS_Y: Color = Color::from_premul(0.0, 1.0, 0.0, 1.0);

/// Everything the loop thread owns: scene, engine context, graphics and
/// the presentation surface.
///
/// [`tick`](Self::tick) and [`render`](Self::render) can be called directly
/// for deterministic single-threaded stepping; [`GameLoop`](super::GameLoop)
/// calls them on its own thread.
pub struct LoopCore {
    config: EngineConfig,
    scene: Scene,
    ctx: EngineContext,
    graphics: Graphics,
    surface: Box<dyn Surface>,
    hub: InputHub,
}

impl LoopCore {
    pub fn new(config: EngineConfig, surface: Box<dyn Surface>) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            scene: Scene::new("main", config.physics)?,
            ctx: EngineContext::new(&config),
            graphics: Graphics::new(config.reference),
            surface,
            hub: InputHub::new(),
            config,
        })
    }

    /// Replaces the current scene and returns the previous one.
    pub fn load_scene(&mut self, scene: Scene) -> Scene {
        log::info!("loading scene {}", scene.name());
        std::mem::replace(&mut self.scene, scene)
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    #[inline]
    pub fn ctx_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    #[inline]
    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    /// Producer handle for host input events.
    pub fn input(&self) -> InputHub {
        self.hub.clone()
    }

    /// One simulation tick: commit input, tick the scene, move the camera.
    pub fn tick(&mut self) -> anyhow::Result<()> {
        self.ctx.begin_tick(self.hub.commit());
        self.scene.tick(self.config.ticks_per_second, &mut self.ctx)?;

        let target = self
            .ctx
            .camera
            .target()
            .and_then(|id| self.scene.entity(id))
            .map(|e| e.transform.position);
        let wheel = self.ctx.input.wheel_delta();
        self.ctx.camera.tick(self.config.reference, target, wheel);
        Ok(())
    }

    /// One frame: prepare the surface, draw the scene snapshot, present.
    pub fn render(&mut self) -> anyhow::Result<()> {
        let actual = self.surface.prepare()?;
        self.graphics.bind(self.config.reference, actual);
        self.graphics.begin_frame(self.config.background);

        self.scene.render(&mut self.graphics, &self.ctx)?;
        if self.ctx.debug.axes {
            self.draw_axes()?;
        }

        self.surface.present(self.graphics.draw_list())
    }

    /// World axes through the origin, clipped to the visible area.
    fn draw_axes(&mut self) -> Result<(), EngineError> {
        let cam = &self.ctx.camera;
        let (offset, zoom) = (cam.position(), cam.zoom());
        let visible = self.config.reference.size() / zoom;
        let g = &mut self.graphics;

        g.push_all();
        g.set_lighting(false);
        g.scale(zoom, zoom);
        g.translate(-offset.x, -offset.y);
        g.set_stroke(Stroke::new(1.0 / zoom));
        g.set_color(AXIS_X);
        g.draw_line(Vec2::new(offset.x, 0.0), Vec2::new(offset.x + visible.x, 0.0));
        g.set_color(AXIS_Y);
        g.draw_line(Vec2::new(0.0, offset.y), Vec2::new(0.0, offset.y + visible.y));
        g.pop_all()
    }
}

impl std::fmt::Debug for LoopCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopCore")
            .field("config", &self.config)
            .field("scene", &self.scene)
            .field("tick", &self.ctx.tick())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::core::DebugFlags;
    use crate::input::{InputEvent, Key, KeyState};
    use crate::physics::{Collider, ColliderShape, RigidBody};
    use crate::render::HeadlessSurface;
    use crate::scene::{Entity, ScriptCtx, Script};

    fn core(config: EngineConfig) -> (LoopCore, crate::render::SurfaceHandle) {
        let surface = HeadlessSurface::new(Viewport::new(1280.0, 720.0), 2).unwrap();
        let handle = surface.handle();
        (LoopCore::new(config, Box::new(surface)).unwrap(), handle)
    }

    struct Jump;

    impl Script for Jump {
        fn tick(&mut self, ctx: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
            if ctx.input().key_pressed(Key::Space) {
                ctx.transform.position.y -= 100.0;
            }
            Ok(())
        }
    }

    #[test]
    fn invalid_config_fails_at_setup() {
        let surface = HeadlessSurface::new(Viewport::new(64.0, 64.0), 2).unwrap();
        let cfg = EngineConfig { ticks_per_second: 0, ..Default::default() };
        assert!(matches!(LoopCore::new(cfg, Box::new(surface)), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn tick_commits_input_once() {
        let (mut core, _) = core(EngineConfig::default());
        let id = core.scene_mut().add(Entity::new("hero").at(0.0, 500.0).with_script(Jump));
        core.input().push(InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false });

        core.tick().unwrap();
        core.tick().unwrap();
        assert_eq!(core.scene().entity(id).map(|e| e.transform.position.y), Some(400.0));
        assert_eq!(core.ctx().tick(), 2);
    }

    #[test]
    fn camera_follows_target_after_scene_tick() {
        let (mut core, _) = core(EngineConfig::default());
        let body = RigidBody::kinematic()
            .with_collider(Collider::new(ColliderShape::circle(4.0)))
            .with_velocity(Vec2::new(600.0, 0.0));
        let id = core.scene_mut().add(Entity::new("runner").at(960.0, 540.0).with_component(body));
        core.ctx_mut().camera.follow(Some(id));

        for _ in 0..30 {
            core.tick().unwrap();
        }
        assert!(core.ctx().camera.position().x > 0.0);
        assert_eq!(core.ctx().camera.position().y, 0.0);
    }

    #[test]
    fn render_presents_mapped_frame_with_axes() {
        let config = EngineConfig { debug: DebugFlags { axes: true, ..Default::default() }, ..Default::default() };
        let (mut core, handle) = core(config);
        core.tick().unwrap();
        core.render().unwrap();

        assert_eq!(handle.presented_frames(), 1);
        assert_eq!(core.graphics().draw_list().count_kind("line"), 2);
        assert_eq!(core.graphics().mapper().actual(), Viewport::new(1280.0, 720.0));
        assert_eq!(core.graphics().depths(), [0; 5]);
    }
}
