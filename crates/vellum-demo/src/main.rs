use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use vellum_engine::assets::{FontHandle, Image, ImageHandle};
use vellum_engine::coords::{Vec2, Viewport};
use vellum_engine::core::{DebugFlags, EngineConfig, GameLoop, LoopCore};
use vellum_engine::input::{InputEvent, Key, KeyState, MouseWheelDelta};
use vellum_engine::logging::{LoggingConfig, init_logging};
use vellum_engine::paint::Color;
use vellum_engine::physics::{Collider, ColliderShape, RigidBody, TriggerContact, TriggerListener};
use vellum_engine::render::HeadlessSurface;
use vellum_engine::render::renderers::{ShapeKind, ShapeRenderer, SpriteRenderer, TextRenderer};
use vellum_engine::scene::{Entity, SceneCommands, Script, ScriptCtx};

const RUN_SPEED: f32 = 240.0;
const WORLD_WIDTH: f32 = 4000.0;

/// Arrow keys steer the player horizontally; space jumps.
struct PlayerControl;

impl Script for PlayerControl {
    fn tick(&mut self, ctx: &mut ScriptCtx<'_>) -> anyhow::Result<()> {
        let Some(v) = ctx.velocity() else {
            return Ok(());
        };
        let input = ctx.input();
        let dir = match (input.key_down(Key::ArrowLeft), input.key_down(Key::ArrowRight)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let jump = input.key_pressed(Key::Space);

        ctx.set_velocity(Vec2::new(dir * RUN_SPEED, v.y));
        if jump {
            ctx.apply_impulse(Vec2::new(0.0, -300.0));
        }
        Ok(())
    }
}

struct Checkpoint;

impl TriggerListener for Checkpoint {
    fn on_trigger_enter(&self, contact: &TriggerContact, _: &mut SceneCommands) {
        log::info!("entity {} reached the checkpoint", contact.other.entity);
    }

    fn on_trigger_exit(&self, contact: &TriggerContact, _: &mut SceneCommands) {
        log::info!("entity {} left the checkpoint", contact.other.entity);
    }
}

fn build(core: &mut LoopCore) -> anyhow::Result<()> {
    let hero = ImageHandle::new(Image::solid("hero", 32, 32, [220, 180, 90, 255]));
    core.ctx_mut()
        .ambient
        .recompute(std::slice::from_ref(&hero), Color::from_straight(0.8, 0.8, 1.0, 1.0))
        .context("ambient light")?;

    let scene = core.scene_mut();

    let ground = RigidBody::fixed().with_collider(Collider::new(ColliderShape::rect(WORLD_WIDTH, 40.0)));
    scene.add(
        Entity::new("ground")
            .at(WORLD_WIDTH / 2.0, 1000.0)
            .with_component(ground)
            .with_renderer(ShapeRenderer::filled(
                ShapeKind::Rect { width: WORLD_WIDTH, height: 40.0 },
                Color::from_srgb_u8(60, 70, 60, 255),
            )),
    );

    let body = RigidBody::dynamic()
        .with_mass(2.0)
        .with_fixed_rotation()
        .with_collider(Collider::new(ColliderShape::rect(32.0, 32.0)));
    let player = scene.add(
        Entity::new("player")
            .at(300.0, 600.0)
            .with_z(10)
            .with_component(body)
            .with_script(PlayerControl)
            .with_renderer(SpriteRenderer::new(hero)),
    );

    let zone = RigidBody::fixed()
        .with_collider(Collider::trigger(ColliderShape::rect(120.0, 200.0), Arc::new(Checkpoint)));
    scene.add(Entity::new("checkpoint").at(700.0, 880.0).with_component(zone));

    scene.add(
        Entity::new("hud")
            .at(24.0, 48.0)
            .with_z(100)
            .fixed()
            .with_renderer(TextRenderer::new("vellum demo", FontHandle::new(0, "sans"), 32.0)),
    );

    let camera = &mut core.ctx_mut().camera;
    camera.adjust_camera(Some(player), 0.0, 0.0, WORLD_WIDTH, 1080.0);
    camera.enable_zoom_follow(true);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig {
        max_fps: Some(120),
        debug: DebugFlags { colliders: true, ..Default::default() },
        ..Default::default()
    };
    let surface = HeadlessSurface::new(Viewport::new(1280.0, 720.0), 3)?;
    let display = surface.handle();

    let mut core = LoopCore::new(config, Box::new(surface))?;
    build(&mut core)?;

    let mut game = GameLoop::new(core);
    let input = game.input();
    game.start()?;

    input.push(InputEvent::Key { key: Key::ArrowRight, state: KeyState::Pressed, repeat: false });
    thread::sleep(Duration::from_millis(1500));
    input.push_all([
        InputEvent::Key { key: Key::ArrowRight, state: KeyState::Released, repeat: false },
        InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false },
        InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 3.0 }),
    ]);
    display.resize(1920.0, 1080.0);
    thread::sleep(Duration::from_millis(1500));

    game.stop()?;

    let stats = game.stats();
    log::info!(
        "ran {} ticks and {} frames ({} presented); last second: {} fps, {} tps",
        stats.total_ticks(),
        stats.total_frames(),
        display.presented_frames(),
        stats.fps(),
        stats.tps()
    );
    if let Some(core) = game.core() {
        if let Some(player) = core.scene().find_by_name("player").and_then(|id| core.scene().entity(id)) {
            log::info!("player ended at {:?}", player.transform.position);
        }
        log::info!("camera at {:?} zoom {:.2}", core.ctx().camera.position(), core.ctx().camera.zoom());
    }
    Ok(())
}
