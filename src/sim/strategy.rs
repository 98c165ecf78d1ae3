//! Brick collision strategies
//!
//! Each brick carries one strategy chosen at grid-build time by the
//! weighted factory. A strategy runs when the host reports an impact on the
//! brick; every strategy starts with the same gated removal step, so running
//! one twice (or running the members of a compound over an already-removed
//! brick) is always safe.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{BallKind, GameEvent, GamePhase, GameState, TurboState};
use crate::assets::EffectContext;
use crate::consts::*;

/// A brick impact as reported by the host collision pass.
///
/// The brick center is captured before any effect removes the entity, so
/// compound members that run after the removal still know where to spawn.
#[derive(Debug, Clone, Copy)]
pub struct BrickHit {
    pub brick: u32,
    pub striker: u32,
    pub center: Vec2,
}

/// What happens when a brick is struck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Remove the brick; nothing else
    Basic,
    /// Remove the brick and spawn two upward pucks
    ExtraBalls,
    /// Remove the brick and deploy a hit-counting duplicate paddle
    PaddleDuplicate,
    /// Remove the brick and boost the main ball for a fixed impact window
    Turbo,
    /// Remove the brick and drop a falling life pickup
    LifeRestore,
    /// Two or three of the above, run in sequence. Members are never
    /// themselves compounds.
    Compound(Vec<CollisionStrategy>),
}

impl CollisionStrategy {
    /// Run this brick's effect for one impact. Invoked by the host exactly
    /// once per detected impact between the brick and another entity.
    pub fn on_collision(&self, hit: &BrickHit, state: &mut GameState, ctx: &EffectContext) {
        match self {
            CollisionStrategy::Basic => {
                remove_and_count(hit, state);
            }
            CollisionStrategy::ExtraBalls => extra_balls(hit, state, ctx),
            CollisionStrategy::PaddleDuplicate => paddle_duplicate(hit, state, ctx),
            CollisionStrategy::Turbo => turbo(hit, state, ctx),
            CollisionStrategy::LifeRestore => life_restore(hit, state, ctx),
            CollisionStrategy::Compound(members) => {
                // No short-circuiting: each member gates its own removal
                for member in members {
                    member.on_collision(hit, state, ctx);
                }
            }
        }
    }
}

/// Remove the brick and, only if it was still present, decrement the shared
/// counter. This is the single idempotence gate every effect goes through;
/// a second removal attempt is a silent no-op.
fn remove_and_count(hit: &BrickHit, state: &mut GameState) -> bool {
    if !state.remove_brick(hit.brick) {
        return false;
    }
    state.bricks_left.decrement();
    state.events.push(GameEvent::BrickDestroyed { brick: hit.brick });
    if state.bricks_left.get() == 0 {
        state.phase = GamePhase::Cleared;
        state.events.push(GameEvent::Cleared);
    }
    true
}

fn extra_balls(hit: &BrickHit, state: &mut GameState, ctx: &EffectContext) {
    remove_and_count(hit, state);
    for _ in 0..2 {
        let vel = upper_half_velocity(&mut state.rng);
        state.spawn_puck(hit.center, vel, ctx);
    }
}

/// Puck-speed velocity on a uniform random angle in the upper half-plane.
/// Screen y grows downward, so upward means negative y.
fn upper_half_velocity(rng: &mut Pcg32) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::PI;
    Vec2::new(angle.cos() * PUCK_SPEED, -(angle.sin() * PUCK_SPEED).abs())
}

fn paddle_duplicate(hit: &BrickHit, state: &mut GameState, ctx: &EffectContext) {
    remove_and_count(hit, state);
    // One duplicate per session at a time; the slot is the guard
    if state.duplicate_paddle.is_some() {
        return;
    }
    state.spawn_duplicate_paddle(ctx);
    state.events.push(GameEvent::PaddleDuplicated);
    log::debug!("Duplicate paddle deployed");
}

fn turbo(hit: &BrickHit, state: &mut GameState, ctx: &EffectContext) {
    remove_and_count(hit, state);
    // Reactivation while active is a no-op beyond the brick removal
    if state.turbo.active {
        return;
    }
    let turbo_visual = ctx.turbo_visual;
    let mark = match state.ball_mut(hit.striker) {
        // Only the main ball triggers turbo; pucks never do
        Some(ball) if ball.kind == BallKind::Main => {
            ball.vel *= TURBO_FACTOR;
            ball.visual = turbo_visual;
            ball.impacts
        }
        _ => return,
    };
    state.turbo = TurboState {
        active: true,
        activation_mark: mark,
    };
    state.events.push(GameEvent::TurboStarted);
    log::debug!("Turbo engaged at impact {mark}");
}

fn life_restore(hit: &BrickHit, state: &mut GameState, ctx: &EffectContext) {
    remove_and_count(hit, state);
    state.spawn_pickup(hit.center, ctx);
}

/// Selectable outcome kinds for the factory table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    ExtraBalls,
    PaddleDuplicate,
    Turbo,
    LifeRestore,
    Compound,
    Basic,
}

/// Effects a compound may contain. The pool holds no compound, which bounds
/// the nesting depth by construction.
const COMPOUND_POOL: [StrategyKind; 4] = [
    StrategyKind::ExtraBalls,
    StrategyKind::PaddleDuplicate,
    StrategyKind::Turbo,
    StrategyKind::LifeRestore,
];

/// Compound members sit one level below the top-level compound, no further
const MAX_COMPOUND_DEPTH: usize = 1;

/// Weighted-random selector producing one strategy per brick at grid-build
/// time. The outcome table is explicit configuration; the default gives
/// plain removal half the total weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyFactory {
    table: Vec<(StrategyKind, u32)>,
}

impl Default for StrategyFactory {
    fn default() -> Self {
        Self {
            table: vec![
                (StrategyKind::ExtraBalls, 1),
                (StrategyKind::PaddleDuplicate, 1),
                (StrategyKind::Turbo, 1),
                (StrategyKind::LifeRestore, 1),
                (StrategyKind::Compound, 1),
                (StrategyKind::Basic, BASIC_REMOVAL_WEIGHT),
            ],
        }
    }
}

impl StrategyFactory {
    /// Build a factory over a custom outcome table
    pub fn with_table(table: Vec<(StrategyKind, u32)>) -> Self {
        assert!(
            table.iter().map(|&(_, w)| u64::from(w)).sum::<u64>() > 0,
            "outcome table has no weight"
        );
        Self { table }
    }

    pub fn total_weight(&self) -> u32 {
        self.table.iter().map(|&(_, w)| w).sum()
    }

    /// Draw one strategy. Always returns a usable strategy; the only side
    /// effect is RNG consumption.
    pub fn get_strategy(&self, rng: &mut Pcg32) -> CollisionStrategy {
        let mut roll = rng.random_range(0..self.total_weight());
        for &(kind, weight) in &self.table {
            if roll < weight {
                return build(kind, rng, 0);
            }
            roll -= weight;
        }
        // Unreachable with a validated table; fall back to plain removal
        CollisionStrategy::Basic
    }
}

/// Materialize one outcome. `depth` counts compound nesting levels and is
/// capped; members come from `COMPOUND_POOL`, which contains no compound.
fn build(kind: StrategyKind, rng: &mut Pcg32, depth: usize) -> CollisionStrategy {
    match kind {
        StrategyKind::ExtraBalls => CollisionStrategy::ExtraBalls,
        StrategyKind::PaddleDuplicate => CollisionStrategy::PaddleDuplicate,
        StrategyKind::Turbo => CollisionStrategy::Turbo,
        StrategyKind::LifeRestore => CollisionStrategy::LifeRestore,
        StrategyKind::Basic => CollisionStrategy::Basic,
        StrategyKind::Compound => {
            debug_assert!(depth < MAX_COMPOUND_DEPTH, "nested compound");
            CollisionStrategy::Compound(compound_members(rng, depth + 1))
        }
    }
}

/// Draw compound members: one from the pool, then a second selector over a
/// range extended by one. Landing on the extension upgrades the compound to
/// three members; any other value names the second member directly.
fn compound_members(rng: &mut Pcg32, depth: usize) -> Vec<CollisionStrategy> {
    let mut members = vec![draw_member(rng, depth)];
    let second = rng.random_range(0..=COMPOUND_POOL.len());
    if second == COMPOUND_POOL.len() {
        members.push(draw_member(rng, depth));
        members.push(draw_member(rng, depth));
    } else {
        members.push(build(COMPOUND_POOL[second], rng, depth));
    }
    members
}

fn draw_member(rng: &mut Pcg32, depth: usize) -> CollisionStrategy {
    let idx = rng.random_range(0..COMPOUND_POOL.len());
    build(COMPOUND_POOL[idx], rng, depth)
}
