//! Collision response dispatch
//!
//! The host detects contacts and computes surface normals; the engine
//! decides what each contact means. `should_collide` is the capability
//! predicate the host consults before reporting a pair, and
//! `handle_collision` is the per-entity response, invoked once per detected
//! impact for each engine-owned entity involved.

use glam::Vec2;

use super::state::{GameEvent, GameState};
use super::strategy::BrickHit;
use crate::assets::EffectContext;
use crate::consts::*;

/// Reflect velocity off a surface: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Capability predicate: may `entity` collide with `other`?
///
/// Pickups accept only the main paddle; duplicate paddles accept only
/// ball-class entities. Host-owned entities (boundary walls, background)
/// carry ids the registry does not know, so those two rules reject them -
/// a wall bump can never be counted as a duplicate-paddle hit.
pub fn should_collide(state: &GameState, entity: u32, other: u32) -> bool {
    if state.pickups.iter().any(|p| p.id == entity) {
        return other == state.paddle.id;
    }
    if state
        .duplicate_paddle
        .as_ref()
        .is_some_and(|d| d.paddle.id == entity)
    {
        return state.ball(other).is_some();
    }
    true
}

/// Respond to one host-detected impact on `entity`. `normal` is the contact
/// normal at the impact point, oriented toward `entity`.
pub fn handle_collision(
    state: &mut GameState,
    ctx: &EffectContext,
    entity: u32,
    other: u32,
    normal: Vec2,
) {
    // Brick: delegate to the strategy it was built with
    if let Some(brick) = state.brick(entity) {
        let hit = BrickHit {
            brick: entity,
            striker: other,
            center: brick.pos,
        };
        let strategy = brick.strategy.clone();
        strategy.on_collision(&hit, state, ctx);
        return;
    }

    // Ball-class: bounce off the surface, count the impact, cue audio
    if let Some(ball) = state.ball_mut(entity) {
        ball.vel = reflect(ball.vel, normal);
        ball.impacts += 1;
        let audio = ball.impact_audio;
        state.events.push(GameEvent::PlayAudio(audio));
        return;
    }

    // Duplicate paddle: count ball-class hits, expire at the threshold
    let other_is_ball = state.ball(other).is_some();
    if let Some(dup) = state.duplicate_paddle.as_mut() {
        if dup.paddle.id == entity {
            if !other_is_ball {
                return;
            }
            dup.hits += 1;
            if dup.hits >= DUPLICATE_PADDLE_MAX_HITS {
                state.duplicate_paddle = None;
                state.events.push(GameEvent::DuplicatePaddleExpired);
                log::debug!("Duplicate paddle expired");
            }
            return;
        }
    }

    // Pickup: collected on main-paddle contact. Below the life cap that
    // grants a life; at the cap the pickup is still consumed.
    if state.pickups.iter().any(|p| p.id == entity) {
        if other != state.paddle.id {
            return;
        }
        let life_granted = state.lives.grant_life();
        state.remove_pickup(entity);
        state.events.push(GameEvent::PickupCollected { life_granted });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{test_ctx, BallKind};
    use crate::sim::strategy::CollisionStrategy;

    /// An id the registry has never issued (boundary wall, background...)
    const WALL_ID: u32 = 9999;

    #[test]
    fn test_reflect() {
        // Ball moving right hits a vertical wall (normal pointing left)
        let reflected = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_ball_impact_bounces_counts_and_cues_audio() {
        let ctx = test_ctx();
        let mut state = GameState::new(21, &ctx);
        let id = state.main_ball().unwrap().id;
        state.main_ball_mut().unwrap().vel = Vec2::new(0.0, BALL_SPEED);

        handle_collision(&mut state, &ctx, id, WALL_ID, Vec2::new(0.0, -1.0));

        let ball = state.main_ball().unwrap();
        assert!(ball.vel.y < 0.0);
        assert_eq!(ball.impacts, 1);
        assert!(state
            .events
            .contains(&GameEvent::PlayAudio(ctx.impact_audio)));
    }

    #[test]
    fn test_brick_impact_runs_strategy() {
        let ctx = test_ctx();
        let mut state = GameState::new(22, &ctx);
        let brick = state.spawn_brick(
            Vec2::new(100.0, 50.0),
            Vec2::new(80.0, 15.0),
            ctx.brick_visual,
            CollisionStrategy::Basic,
        );
        let ball = state.main_ball().unwrap().id;

        handle_collision(&mut state, &ctx, brick, ball, Vec2::new(0.0, 1.0));

        assert!(state.brick(brick).is_none());
        assert_eq!(state.bricks_left.get(), 0);
    }

    #[test]
    fn test_duplicate_paddle_counts_only_ball_hits() {
        let ctx = test_ctx();
        let mut state = GameState::new(23, &ctx);
        let dup = state.spawn_duplicate_paddle(&ctx);
        let ball = state.main_ball().unwrap().id;

        assert!(!should_collide(&state, dup, WALL_ID));
        assert!(should_collide(&state, dup, ball));

        // A wall report slipping past the predicate still counts nothing
        handle_collision(&mut state, &ctx, dup, WALL_ID, Vec2::new(1.0, 0.0));
        assert_eq!(state.duplicate_paddle.as_ref().unwrap().hits, 0);

        handle_collision(&mut state, &ctx, dup, ball, Vec2::new(0.0, -1.0));
        assert_eq!(state.duplicate_paddle.as_ref().unwrap().hits, 1);
    }

    #[test]
    fn test_duplicate_paddle_expires_at_threshold() {
        let ctx = test_ctx();
        let mut state = GameState::new(24, &ctx);
        let dup = state.spawn_duplicate_paddle(&ctx);
        let ball = state.main_ball().unwrap().id;

        for _ in 0..DUPLICATE_PADDLE_MAX_HITS {
            handle_collision(&mut state, &ctx, dup, ball, Vec2::new(0.0, -1.0));
        }

        assert!(state.duplicate_paddle.is_none());
        assert!(state.events.contains(&GameEvent::DuplicatePaddleExpired));
    }

    #[test]
    fn test_pickup_collection_respects_life_cap() {
        let ctx = test_ctx();
        let mut state = GameState::new(25, &ctx);
        let paddle = state.paddle.id;

        // Below the cap: grants a life
        let pickup = state.spawn_pickup(Vec2::new(350.0, 400.0), &ctx);
        assert!(should_collide(&state, pickup, paddle));
        handle_collision(&mut state, &ctx, pickup, paddle, Vec2::new(0.0, -1.0));
        assert_eq!(state.lives.current_lives(), START_LIVES + 1);
        assert!(state.pickups.is_empty());
        assert!(state
            .events
            .contains(&GameEvent::PickupCollected { life_granted: true }));

        // At the cap: consumed with lives unchanged
        let pickup = state.spawn_pickup(Vec2::new(350.0, 400.0), &ctx);
        handle_collision(&mut state, &ctx, pickup, paddle, Vec2::new(0.0, -1.0));
        assert_eq!(state.lives.current_lives(), MAX_LIVES);
        assert!(state.pickups.is_empty());
        assert!(state
            .events
            .contains(&GameEvent::PickupCollected { life_granted: false }));
    }

    #[test]
    fn test_pickup_ignores_everything_but_the_main_paddle() {
        let ctx = test_ctx();
        let mut state = GameState::new(26, &ctx);
        let ball = state.main_ball().unwrap().id;
        let pickup = state.spawn_pickup(Vec2::new(350.0, 100.0), &ctx);

        assert!(!should_collide(&state, pickup, ball));
        assert!(!should_collide(&state, pickup, WALL_ID));

        handle_collision(&mut state, &ctx, pickup, ball, Vec2::new(0.0, -1.0));
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.lives.current_lives(), START_LIVES);
    }

    #[test]
    fn test_puck_impact_keeps_speed() {
        let ctx = test_ctx();
        let mut state = GameState::new(27, &ctx);
        let puck = state.spawn_puck(
            Vec2::new(200.0, 200.0),
            Vec2::new(60.0, -80.0),
            &ctx,
        );
        let speed = state.ball(puck).unwrap().vel.length();

        handle_collision(&mut state, &ctx, puck, WALL_ID, Vec2::new(0.0, 1.0));

        let after = state.ball(puck).unwrap();
        assert_eq!(after.kind, BallKind::Puck);
        assert!((after.vel.length() - speed).abs() < 0.01);
    }
}
