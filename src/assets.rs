//! Asset handles and the shared effect context
//!
//! The host owns asset decoding and playback; the engine only ever sees
//! opaque handles. All paths are resolved exactly once per session, so a
//! missing file fails the session up front instead of mid-collision.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Opaque handle to a host-loaded visual resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u32);

/// Opaque handle to a host-loaded audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioId(pub u32);

/// Asset resolution failure. Fatal - there is no in-engine recovery.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("visual asset not found: {0}")]
    MissingVisual(String),
    #[error("audio asset not found: {0}")]
    MissingAudio(String),
}

/// Host-side asset loader. Loading by path may fail; handles never do.
pub trait AssetStore {
    fn load_visual(&mut self, path: &str) -> Result<VisualId, AssetError>;
    fn load_audio(&mut self, path: &str) -> Result<AudioId, AssetError>;
}

/// Immutable bundle of resolved collaborator handles, built once per game
/// session and shared by reference across every strategy application.
///
/// Brick effects never load assets themselves and never carry private
/// copies of shared state; everything mutable they touch lives in
/// [`GameState`](crate::sim::GameState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectContext {
    pub ball_visual: VisualId,
    /// "Hot" ball variant shown while turbo is active
    pub turbo_visual: VisualId,
    pub puck_visual: VisualId,
    pub paddle_visual: VisualId,
    pub brick_visual: VisualId,
    pub heart_visual: VisualId,
    /// Played on every ball-class impact
    pub impact_audio: AudioId,
}

impl EffectContext {
    /// Resolve every engine asset path against the host store.
    pub fn load(store: &mut dyn AssetStore) -> Result<Self, AssetError> {
        let ctx = Self {
            ball_visual: store.load_visual(consts::BALL_VISUAL)?,
            turbo_visual: store.load_visual(consts::TURBO_BALL_VISUAL)?,
            puck_visual: store.load_visual(consts::PUCK_VISUAL)?,
            paddle_visual: store.load_visual(consts::PADDLE_VISUAL)?,
            brick_visual: store.load_visual(consts::BRICK_VISUAL)?,
            heart_visual: store.load_visual(consts::HEART_VISUAL)?,
            impact_audio: store.load_audio(consts::IMPACT_AUDIO)?,
        };
        log::info!("Effect context resolved");
        Ok(ctx)
    }
}
