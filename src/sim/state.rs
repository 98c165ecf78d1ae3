//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here. `GameState`
//! is the object registry: every entity the engine owns sits in one of its
//! typed collections, and all spawn/remove operations go through it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::strategy::CollisionStrategy;
use crate::assets::{AudioId, EffectContext, VisualId};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every destructible brick is gone
    Cleared,
    /// Out of lives
    GameOver,
}

/// Ball class. Pucks bounce and play audio like the main ball but are
/// discarded without a life penalty when they exit the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Main,
    Puck,
}

/// A ball entity (the main ball or a spawned puck)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub kind: BallKind,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Diameter (square sprite)
    pub size: f32,
    pub visual: VisualId,
    pub impact_audio: AudioId,
    /// Cumulative impact count; drives the turbo revert threshold
    pub impacts: u32,
}

/// A horizontally steered paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub visual: VisualId,
}

impl Paddle {
    /// Steer horizontally from pressed-key state. Movement toward an edge is
    /// blocked once the paddle's extent reaches the play-area bound.
    pub fn steer(&mut self, left: bool, right: bool, dt: f32) {
        let half_w = self.size.x / 2.0;
        let mut dir = 0.0;
        if left && self.pos.x - half_w > 0.0 {
            dir -= 1.0;
        }
        if right && self.pos.x + half_w < WINDOW_W {
            dir += 1.0;
        }
        self.pos.x = (self.pos.x + dir * PADDLE_SPEED * dt).clamp(half_w, WINDOW_W - half_w);
    }
}

/// The short-lived second paddle spawned by the paddle-duplication effect.
/// Steered like the player paddle; counts ball-class impacts and is removed
/// once the count reaches `DUPLICATE_PADDLE_MAX_HITS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicatePaddle {
    pub paddle: Paddle,
    pub hits: u32,
}

/// A destructible brick carrying the effect that runs when it is struck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub visual: VisualId,
    pub strategy: CollisionStrategy,
}

/// A falling life pickup. Descends at a constant speed; collected by the
/// main paddle (one life, if below the cap) or lost off the bottom edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingPickup {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub visual: VisualId,
}

/// Count of bricks still present in the registry. Decremented exactly once
/// per confirmed removal; never goes negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickCounter(u32);

impl BrickCounter {
    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn increment(&mut self) {
        self.0 += 1;
    }

    pub(crate) fn decrement(&mut self) {
        debug_assert!(self.0 > 0, "brick counter underflow");
        self.0 = self.0.saturating_sub(1);
    }
}

/// Shared turbo activation state. One instance per session, observed by
/// every turbo brick; at most one turbo period is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurboState {
    pub active: bool,
    /// Main-ball impact count captured at activation
    pub activation_mark: u32,
}

/// Readout color for the host's life display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeColor {
    Green,
    Yellow,
    Red,
}

/// Life count behind the host's hearts display. Layout is the host's;
/// the count, the cap and the readout color live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivesPanel {
    lives: u32,
    max: u32,
}

impl LivesPanel {
    pub fn new(lives: u32, max: u32) -> Self {
        Self { lives, max }
    }

    pub fn current_lives(self) -> u32 {
        self.lives
    }

    /// Add one life unless at the cap. Returns whether a life was added.
    pub fn grant_life(&mut self) -> bool {
        if self.lives >= self.max {
            return false;
        }
        self.lives += 1;
        true
    }

    /// Remove one life, saturating at zero. Returns the remaining count.
    pub fn revoke_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Green at 3+, yellow at 2, red at 1 or below
    pub fn readout_color(self) -> LifeColor {
        match self.lives {
            n if n >= 3 => LifeColor::Green,
            2 => LifeColor::Yellow,
            _ => LifeColor::Red,
        }
    }
}

/// Presentation hints drained by the host once per frame. All gameplay
/// truth lives in `GameState`; losing an event loses nothing but polish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BrickDestroyed { brick: u32 },
    PlayAudio(AudioId),
    TurboStarted,
    TurboEnded,
    PaddleDuplicated,
    DuplicatePaddleExpired,
    PickupCollected { life_granted: bool },
    PickupLost,
    LifeLost { remaining: u32 },
    Cleared,
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG stream; serialized so a restored session continues identically
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Player paddle
    pub paddle: Paddle,
    /// Duplicate-paddle slot. `Some` doubles as the activation guard:
    /// at most one duplicate exists per session at any time.
    pub duplicate_paddle: Option<DuplicatePaddle>,
    /// Main ball plus any live pucks
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub pickups: Vec<FallingPickup>,
    /// Bricks remaining; kept in lockstep with `bricks` by the removal path
    pub bricks_left: BrickCounter,
    /// Shared turbo activation state
    pub turbo: TurboState,
    pub lives: LivesPanel,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session: player paddle bottom-center, main ball at the
    /// window center with a random diagonal velocity.
    pub fn new(seed: u64, ctx: &EffectContext) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            paddle: Paddle {
                id: 0,
                pos: Vec2::new(WINDOW_W / 2.0, WINDOW_H - PADDLE_OFFSET_Y),
                size: Vec2::new(PADDLE_W, PADDLE_H),
                visual: ctx.paddle_visual,
            },
            duplicate_paddle: None,
            balls: Vec::new(),
            bricks: Vec::new(),
            pickups: Vec::new(),
            bricks_left: BrickCounter::default(),
            turbo: TurboState::default(),
            lives: LivesPanel::new(START_LIVES, MAX_LIVES),
            events: Vec::new(),
            next_id: 1,
        };
        state.paddle.id = state.next_entity_id();

        let id = state.next_entity_id();
        state.balls.push(Ball {
            id,
            kind: BallKind::Main,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: BALL_SIZE,
            visual: ctx.ball_visual,
            impact_audio: ctx.impact_audio,
            impacts: 0,
        });
        state.reset_main_ball(ctx);

        log::info!("Game session created with seed {seed}");
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place the main ball at the window center with a fresh diagonal
    /// velocity. Clears turbo if it was active: the multiplier has nothing
    /// left to revert against a freshly set speed.
    pub fn reset_main_ball(&mut self, ctx: &EffectContext) {
        if self.turbo.active {
            self.turbo = TurboState::default();
            self.events.push(GameEvent::TurboEnded);
        }
        let vel = Vec2::new(
            if self.rng.random::<bool>() { BALL_SPEED } else { -BALL_SPEED },
            if self.rng.random::<bool>() { BALL_SPEED } else { -BALL_SPEED },
        );
        let ball_visual = ctx.ball_visual;
        if let Some(ball) = self.main_ball_mut() {
            ball.pos = Vec2::new(WINDOW_W / 2.0, WINDOW_H / 2.0);
            ball.vel = vel;
            ball.visual = ball_visual;
        }
    }

    /// The main ball, if still registered
    pub fn main_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.kind == BallKind::Main)
    }

    pub fn main_ball_mut(&mut self) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.kind == BallKind::Main)
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: u32) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn brick(&self, id: u32) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    /// Register a brick. The grid geometry is the host's; every brick comes
    /// through here so the counter stays in lockstep with the registry.
    pub fn spawn_brick(
        &mut self,
        pos: Vec2,
        size: Vec2,
        visual: VisualId,
        strategy: CollisionStrategy,
    ) -> u32 {
        let id = self.next_entity_id();
        self.bricks.push(Brick {
            id,
            pos,
            size,
            visual,
            strategy,
        });
        self.bricks_left.increment();
        id
    }

    /// Remove a brick from the registry. Returns false if it was already
    /// absent; callers gate counter updates on the returned flag.
    pub fn remove_brick(&mut self, id: u32) -> bool {
        let before = self.bricks.len();
        self.bricks.retain(|b| b.id != id);
        self.bricks.len() != before
    }

    /// Spawn a puck centered at `pos` with the given velocity
    pub fn spawn_puck(&mut self, pos: Vec2, vel: Vec2, ctx: &EffectContext) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball {
            id,
            kind: BallKind::Puck,
            pos,
            vel,
            size: BALL_SIZE * PUCK_SCALE,
            visual: ctx.puck_visual,
            impact_audio: ctx.impact_audio,
            impacts: 0,
        });
        id
    }

    /// Spawn a falling life pickup centered at `pos`
    pub fn spawn_pickup(&mut self, pos: Vec2, ctx: &EffectContext) -> u32 {
        let id = self.next_entity_id();
        self.pickups.push(FallingPickup {
            id,
            pos,
            size: PICKUP_SIZE,
            visual: ctx.heart_visual,
        });
        id
    }

    pub fn remove_pickup(&mut self, id: u32) -> bool {
        let before = self.pickups.len();
        self.pickups.retain(|p| p.id != id);
        self.pickups.len() != before
    }

    /// Spawn the duplicate paddle centered horizontally at mid-height.
    /// Callers must check the guard first; the slot holds at most one.
    pub fn spawn_duplicate_paddle(&mut self, ctx: &EffectContext) -> u32 {
        debug_assert!(self.duplicate_paddle.is_none(), "duplicate paddle already present");
        let id = self.next_entity_id();
        self.duplicate_paddle = Some(DuplicatePaddle {
            paddle: Paddle {
                id,
                pos: Vec2::new(WINDOW_W / 2.0, WINDOW_H / 2.0),
                size: Vec2::new(PADDLE_W, PADDLE_H),
                visual: ctx.paddle_visual,
            },
            hits: 0,
        });
        id
    }

    /// Hand the queued events to the host
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Fixed handle bundle for unit tests across the sim modules.
#[cfg(test)]
pub(crate) fn test_ctx() -> EffectContext {
    EffectContext {
        ball_visual: VisualId(0),
        turbo_visual: VisualId(1),
        puck_visual: VisualId(2),
        paddle_visual: VisualId(3),
        brick_visual: VisualId(4),
        heart_visual: VisualId(5),
        impact_audio: AudioId(0),
    }
}
