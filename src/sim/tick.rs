//! Fixed timestep simulation tick
//!
//! Advances everything the engine owns by one step: paddle steering,
//! ball-class integration and culling, pickup descent, life loss and the
//! turbo revert observer. Contact detection happens host-side between
//! ticks and arrives through `handle_collision`.

use super::state::{BallKind, GameEvent, GamePhase, GameState, TurboState};
use crate::assets::EffectContext;
use crate::consts::*;

/// Pressed-key state for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Steer the paddles left
    pub left: bool,
    /// Steer the paddles right
    pub right: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, ctx: &EffectContext, dt: f32) {
    match state.phase {
        GamePhase::Cleared | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Both paddles steer from the same pressed-key state
    state.paddle.steer(input.left, input.right, dt);
    if let Some(dup) = state.duplicate_paddle.as_mut() {
        dup.paddle.steer(input.left, input.right, dt);
    }

    // Integrate ball-class entities
    for ball in &mut state.balls {
        ball.pos += ball.vel * dt;
    }

    // Pucks that exit the bottom are discarded without penalty
    state
        .balls
        .retain(|b| b.kind == BallKind::Main || b.pos.y <= WINDOW_H);

    // Main ball below the bottom edge: lose a life, respawn or end the run
    let main_lost = state.main_ball().is_some_and(|b| b.pos.y > WINDOW_H);
    if main_lost {
        let remaining = state.lives.revoke_life();
        state.events.push(GameEvent::LifeLost { remaining });
        if remaining == 0 {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
            log::info!("Game over at tick {}", state.time_ticks);
            return;
        }
        state.reset_main_ball(ctx);
    }

    // Pickups descend at constant speed; off-screen ones are lost
    let mut lost = 0;
    state.pickups.retain_mut(|p| {
        p.pos.y += PICKUP_FALL_SPEED * dt;
        if p.pos.y - p.size / 2.0 > WINDOW_H {
            lost += 1;
            false
        } else {
            true
        }
    });
    for _ in 0..lost {
        state.events.push(GameEvent::PickupLost);
    }

    // Turbo revert observer: once the main ball has taken the full impact
    // window, undo exactly what activation did
    if state.turbo.active {
        let mark = state.turbo.activation_mark;
        let over = state
            .main_ball()
            .is_some_and(|b| b.impacts.saturating_sub(mark) >= TURBO_COLLISION_LIMIT);
        if over {
            let ball_visual = ctx.ball_visual;
            if let Some(ball) = state.main_ball_mut() {
                ball.vel /= TURBO_FACTOR;
                ball.visual = ball_visual;
            }
            state.turbo = TurboState::default();
            state.events.push(GameEvent::TurboEnded);
            log::debug!("Turbo reverted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::handle_collision;
    use crate::sim::state::test_ctx;
    use crate::sim::strategy::{CollisionStrategy, StrategyFactory};
    use glam::Vec2;

    const WALL_ID: u32 = 9999;

    fn add_brick(state: &mut GameState, strategy: CollisionStrategy) -> u32 {
        let ctx = test_ctx();
        state.spawn_brick(
            Vec2::new(120.0, 60.0),
            Vec2::new(80.0, 15.0),
            ctx.brick_visual,
            strategy,
        )
    }

    #[test]
    fn test_puck_exit_costs_no_life() {
        let ctx = test_ctx();
        let mut state = GameState::new(31, &ctx);
        // Keep a brick around so the phase stays Playing
        add_brick(&mut state, CollisionStrategy::Basic);
        state.main_ball_mut().unwrap().vel = Vec2::ZERO;
        state.spawn_puck(
            Vec2::new(350.0, WINDOW_H - 1.0),
            Vec2::new(0.0, PUCK_SPEED),
            &ctx,
        );

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &ctx, SIM_DT);
        }

        assert_eq!(state.balls.len(), 1, "puck discarded, main ball kept");
        assert_eq!(state.lives.current_lives(), START_LIVES);
        assert!(!state.events.contains(&GameEvent::LifeLost {
            remaining: START_LIVES - 1
        }));
    }

    #[test]
    fn test_main_ball_exit_revokes_life_and_respawns() {
        let ctx = test_ctx();
        let mut state = GameState::new(32, &ctx);
        add_brick(&mut state, CollisionStrategy::Basic);
        {
            let ball = state.main_ball_mut().unwrap();
            ball.pos = Vec2::new(350.0, WINDOW_H + 5.0);
            ball.vel = Vec2::ZERO;
        }

        tick(&mut state, &TickInput::default(), &ctx, SIM_DT);

        assert_eq!(state.lives.current_lives(), START_LIVES - 1);
        assert!(state.events.contains(&GameEvent::LifeLost {
            remaining: START_LIVES - 1
        }));
        let ball = state.main_ball().unwrap();
        assert_eq!(ball.pos, Vec2::new(WINDOW_W / 2.0, WINDOW_H / 2.0));
        assert!(ball.vel.length() > 0.0);
    }

    #[test]
    fn test_game_over_at_zero_lives() {
        let ctx = test_ctx();
        let mut state = GameState::new(33, &ctx);
        add_brick(&mut state, CollisionStrategy::Basic);

        for _ in 0..START_LIVES {
            let ball = state.main_ball_mut().unwrap();
            ball.pos = Vec2::new(350.0, WINDOW_H + 5.0);
            ball.vel = Vec2::ZERO;
            tick(&mut state, &TickInput::default(), &ctx, SIM_DT);
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives.current_lives(), 0);
        assert!(state.events.contains(&GameEvent::GameOver));

        // Terminal phase: further ticks are inert
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), &ctx, SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_pickup_descends_and_is_lost_offscreen() {
        let ctx = test_ctx();
        let mut state = GameState::new(34, &ctx);
        add_brick(&mut state, CollisionStrategy::Basic);
        state.main_ball_mut().unwrap().vel = Vec2::ZERO;
        state.spawn_pickup(Vec2::new(350.0, WINDOW_H - 10.0), &ctx);

        let mut ticks = 0;
        while !state.pickups.is_empty() && ticks < 1000 {
            tick(&mut state, &TickInput::default(), &ctx, SIM_DT);
            ticks += 1;
        }

        assert!(state.pickups.is_empty());
        assert!(state.events.contains(&GameEvent::PickupLost));
        assert_eq!(state.lives.current_lives(), START_LIVES);
    }

    #[test]
    fn test_turbo_reverts_after_exact_impact_window() {
        let ctx = test_ctx();
        let mut state = GameState::new(35, &ctx);
        add_brick(&mut state, CollisionStrategy::Basic);
        state.main_ball_mut().unwrap().vel = Vec2::new(BALL_SPEED, -BALL_SPEED);
        let base_speed = state.main_ball().unwrap().vel.length();
        let ball_id = state.main_ball().unwrap().id;

        let turbo_brick = add_brick(&mut state, CollisionStrategy::Turbo);
        handle_collision(
            &mut state,
            &ctx,
            turbo_brick,
            ball_id,
            Vec2::new(0.0, 1.0),
        );
        assert!(state.turbo.active);

        // One impact short of the window: still boosted
        for _ in 0..TURBO_COLLISION_LIMIT - 1 {
            handle_collision(&mut state, &ctx, ball_id, WALL_ID, Vec2::new(0.0, 1.0));
        }
        tick(&mut state, &TickInput::default(), &ctx, SIM_DT);
        assert!(state.turbo.active);
        assert_eq!(state.main_ball().unwrap().visual, ctx.turbo_visual);

        // The final impact of the window triggers the revert
        handle_collision(&mut state, &ctx, ball_id, WALL_ID, Vec2::new(0.0, 1.0));
        tick(&mut state, &TickInput::default(), &ctx, SIM_DT);

        assert!(!state.turbo.active);
        let ball = state.main_ball().unwrap();
        assert!((ball.vel.length() - base_speed).abs() < 0.1);
        assert_eq!(ball.visual, ctx.ball_visual);
        assert!(state.events.contains(&GameEvent::TurboEnded));
    }

    #[test]
    fn test_determinism() {
        let ctx = test_ctx();
        let factory = StrategyFactory::default();

        let run = |seed: u64| {
            let mut state = GameState::new(seed, &ctx);
            for col in 0..8 {
                let strategy = factory.get_strategy(&mut state.rng);
                state.spawn_brick(
                    Vec2::new(50.0 + col as f32 * 85.0, 40.0),
                    Vec2::new(80.0, 15.0),
                    ctx.brick_visual,
                    strategy,
                );
            }
            let input = TickInput {
                left: true,
                right: false,
            };
            for i in 0..240 {
                tick(&mut state, &input, &ctx, SIM_DT);
                if i % 60 == 0 {
                    if let Some(brick_id) = state.bricks.first().map(|b| b.id) {
                        let ball_id = state.main_ball().unwrap().id;
                        handle_collision(
                            &mut state,
                            &ctx,
                            brick_id,
                            ball_id,
                            Vec2::new(0.0, 1.0),
                        );
                    }
                }
            }
            serde_json::to_string(&state).unwrap()
        };

        assert_eq!(run(99_999), run(99_999));
        assert_ne!(run(99_999), run(7));
    }
}
