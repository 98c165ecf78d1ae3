//! Bricker headless demo
//!
//! Plays a scripted session without a window. The binary acts as the host:
//! it resolves assets against a path-registering store, builds the brick
//! grid through the strategy factory, runs coarse contact detection and a
//! follow-the-ball paddle, and feeds every contact back into the engine.
//! The engine's event stream goes to the logger.

use glam::Vec2;

use bricker::consts::*;
use bricker::sim::{
    GameEvent, GamePhase, GameState, StrategyFactory, TickInput, handle_collision, should_collide,
    tick,
};
use bricker::{AssetError, AssetStore, AudioId, EffectContext, VisualId};

/// An id the engine never issues; stands in for the boundary walls
const WALL_ID: u32 = u32::MAX;

/// Registers every requested path and hands out sequential handles
#[derive(Default)]
struct PathStore {
    visuals: Vec<String>,
    audios: Vec<String>,
}

impl AssetStore for PathStore {
    fn load_visual(&mut self, path: &str) -> Result<VisualId, AssetError> {
        let id = VisualId(self.visuals.len() as u32);
        self.visuals.push(path.to_string());
        Ok(id)
    }

    fn load_audio(&mut self, path: &str) -> Result<AudioId, AssetError> {
        let id = AudioId(self.audios.len() as u32);
        self.audios.push(path.to_string());
        Ok(id)
    }
}

const ROWS: u32 = 7;
const COLS: u32 = 8;
const SPACING: f32 = 5.0;
const BRICK_H: f32 = 15.0;

fn build_grid(state: &mut GameState, factory: &StrategyFactory, ctx: &EffectContext) {
    let brick_w = (WINDOW_W - (COLS as f32 - 1.0) * SPACING) / COLS as f32;
    for row in 0..ROWS {
        for col in 0..COLS {
            let pos = Vec2::new(
                col as f32 * (brick_w + SPACING) + brick_w / 2.0,
                30.0 + row as f32 * (BRICK_H + SPACING) + BRICK_H / 2.0,
            );
            let strategy = factory.get_strategy(&mut state.rng);
            state.spawn_brick(pos, Vec2::new(brick_w, BRICK_H), ctx.brick_visual, strategy);
        }
    }
    log::info!("Grid built: {} bricks", state.bricks_left.get());
}

/// Coarse circle-vs-rect overlap, good enough for a demo host
fn overlaps(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> bool {
    let half = rect_size / 2.0;
    let nearest = center.clamp(rect_pos - half, rect_pos + half);
    (center - nearest).length_squared() <= radius * radius
}

/// Host collision pass: walls, paddles, bricks, pickups. Each detected
/// contact is reported once per engine-owned entity involved.
fn detect_contacts(state: &mut GameState, ctx: &EffectContext) {
    // Ball-class vs walls, paddles and bricks
    let snapshots: Vec<(u32, Vec2, Vec2, f32)> = state
        .balls
        .iter()
        .map(|b| (b.id, b.pos, b.vel, b.size / 2.0))
        .collect();
    for (id, pos, vel, r) in snapshots {
        if pos.x - r < 0.0 && vel.x < 0.0 {
            handle_collision(state, ctx, id, WALL_ID, Vec2::new(1.0, 0.0));
        } else if pos.x + r > WINDOW_W && vel.x > 0.0 {
            handle_collision(state, ctx, id, WALL_ID, Vec2::new(-1.0, 0.0));
        } else if pos.y - r < 0.0 && vel.y < 0.0 {
            handle_collision(state, ctx, id, WALL_ID, Vec2::new(0.0, 1.0));
        }

        let mut paddles = vec![(state.paddle.id, state.paddle.pos, state.paddle.size)];
        if let Some(dup) = &state.duplicate_paddle {
            paddles.push((dup.paddle.id, dup.paddle.pos, dup.paddle.size));
        }
        for (paddle_id, paddle_pos, paddle_size) in paddles {
            if vel.y > 0.0 && overlaps(pos, r, paddle_pos, paddle_size) {
                handle_collision(state, ctx, id, paddle_id, Vec2::new(0.0, -1.0));
                if should_collide(state, paddle_id, id) {
                    handle_collision(state, ctx, paddle_id, id, Vec2::new(0.0, 1.0));
                }
            }
        }

        if let Some(brick_id) = state
            .bricks
            .iter()
            .find(|b| overlaps(pos, r, b.pos, b.size))
            .map(|b| b.id)
        {
            handle_collision(state, ctx, id, brick_id, Vec2::new(0.0, 1.0));
            handle_collision(state, ctx, brick_id, id, Vec2::new(0.0, -1.0));
        }
    }

    // Pickups vs the main paddle
    let paddle_id = state.paddle.id;
    let paddle_pos = state.paddle.pos;
    let paddle_size = state.paddle.size;
    let caught: Vec<u32> = state
        .pickups
        .iter()
        .filter(|p| overlaps(p.pos, p.size / 2.0, paddle_pos, paddle_size))
        .map(|p| p.id)
        .collect();
    for id in caught {
        if should_collide(state, id, paddle_id) {
            handle_collision(state, ctx, id, paddle_id, Vec2::new(0.0, -1.0));
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Bricker demo starting...");

    let mut store = PathStore::default();
    let ctx = match EffectContext::load(&mut store) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Asset resolution failed: {e}");
            return;
        }
    };

    let seed = 2024;
    let mut state = GameState::new(seed, &ctx);
    let factory = StrategyFactory::default();
    build_grid(&mut state, &factory, &ctx);

    let mut destroyed = 0u32;
    // Up to two minutes of play at 120 Hz
    for _ in 0..(120 * 120) {
        // Follow-the-ball paddle
        let input = match state.main_ball() {
            Some(ball) => TickInput {
                left: ball.pos.x < state.paddle.pos.x - 5.0,
                right: ball.pos.x > state.paddle.pos.x + 5.0,
            },
            None => TickInput::default(),
        };

        tick(&mut state, &input, &ctx, SIM_DT);
        detect_contacts(&mut state, &ctx);

        for event in state.take_events() {
            match event {
                GameEvent::PlayAudio(_) => {}
                GameEvent::BrickDestroyed { .. } => {
                    destroyed += 1;
                    log::debug!("{event:?}");
                }
                _ => log::info!("{event:?}"),
            }
        }

        if state.phase != GamePhase::Playing {
            break;
        }
    }

    log::info!(
        "Demo done after {} ticks: {destroyed} bricks destroyed, {} remaining, {} lives, {:?}",
        state.time_ticks,
        state.bricks_left.get(),
        state.lives.current_lives(),
        state.phase
    );
}
