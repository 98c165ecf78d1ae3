//! Bricker - a brick-breaker arcade game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (game state, brick effects, collision response)
//! - `assets`: Host-facing asset handles and the shared effect context
//!
//! Rendering, windowing, keyboard polling and collision geometry belong to the
//! host application. The engine owns everything that happens in response: it
//! consumes per-tick pressed-key state and host-detected contact reports, and
//! mutates the game state deterministically from a seeded RNG.

pub mod assets;
pub mod sim;

pub use assets::{AssetError, AssetStore, AudioId, EffectContext, VisualId};
pub use sim::{CollisionStrategy, GameState, StrategyFactory, TickInput};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Play area dimensions in pixels
    pub const WINDOW_W: f32 = 700.0;
    pub const WINDOW_H: f32 = 500.0;

    /// Main ball diameter and speed
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_SPEED: f32 = 150.0;

    /// Pucks run at 2/3 of main ball speed, at 3/4 of its size
    pub const PUCK_SPEED: f32 = BALL_SPEED / 3.0 * 2.0;
    pub const PUCK_SCALE: f32 = 0.75;

    /// Paddle defaults - both the player paddle and its duplicate
    pub const PADDLE_W: f32 = 100.0;
    pub const PADDLE_H: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 2.0 * BALL_SPEED;
    /// Vertical offset of the player paddle from the bottom edge
    pub const PADDLE_OFFSET_Y: f32 = 30.0;

    /// Ball-class impacts a duplicate paddle absorbs before it is removed
    pub const DUPLICATE_PADDLE_MAX_HITS: u32 = 4;

    /// Lives
    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 4;

    /// Falling life pickup
    pub const PICKUP_SIZE: f32 = 20.0;
    pub const PICKUP_FALL_SPEED: f32 = 100.0;

    /// Turbo mode speed multiplier applied to the main ball
    pub const TURBO_FACTOR: f32 = 1.4;
    /// Main-ball impacts after activation before turbo reverts. The revert
    /// check is `impacts - mark >= TURBO_COLLISION_LIMIT`, so turbo lasts
    /// exactly this many further impacts.
    pub const TURBO_COLLISION_LIMIT: u32 = 6;

    /// Weight of plain removal in the default strategy outcome table.
    /// The four non-trivial effects and the compound each weigh 1, so plain
    /// removal wins 5 rolls out of 10. The bias is intended game balance.
    pub const BASIC_REMOVAL_WEIGHT: u32 = 5;

    /// Asset paths resolved through the host's `AssetStore`
    pub const BALL_VISUAL: &str = "assets/ball.png";
    pub const TURBO_BALL_VISUAL: &str = "assets/redball.png";
    pub const PUCK_VISUAL: &str = "assets/mockBall.png";
    pub const PADDLE_VISUAL: &str = "assets/paddle.png";
    pub const BRICK_VISUAL: &str = "assets/brick.png";
    pub const HEART_VISUAL: &str = "assets/heart.png";
    pub const IMPACT_AUDIO: &str = "assets/blop.wav";
}
