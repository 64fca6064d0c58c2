//! Frame simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Time comes in as `now` seconds from the host clock
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entities)

pub mod collision;
pub mod level;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionReport, resolve_targets};
pub use level::{Badge, LEVEL_COUNT, LEVELS, LevelConfig, LevelOutcome, config_for, start_level};
pub use particles::{EffectKind, Particle, ParticleEffect, StarburstStyle, update_effects};
pub use state::{
    BackgroundCursor, GameEvent, GameOverReason, GamePhase, GameState, Projectile, Target, Vehicle,
};
pub use tick::{Command, FrameInput, FrameStatus, advance};
