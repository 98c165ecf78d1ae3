//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The host detects contacts and renders; everything that happens in
//! response to input and impacts is decided here.

pub mod collision;
pub mod state;
pub mod strategy;
pub mod tick;

pub use collision::{handle_collision, reflect, should_collide};
pub use state::{
    Ball, BallKind, Brick, BrickCounter, DuplicatePaddle, FallingPickup, GameEvent, GamePhase,
    GameState, LifeColor, LivesPanel, Paddle, TurboState,
};
pub use strategy::{BrickHit, CollisionStrategy, StrategyFactory, StrategyKind};
pub use tick::{TickInput, tick};
