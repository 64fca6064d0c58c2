//! Level configuration and progression rules

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particles::{ParticleEffect, StarburstStyle};
use super::state::{GamePhase, GameState, Target};
use crate::tuning::Tuning;

/// Badge sprite shown on a level's targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Go,
    Docker,
    Java,
}

/// Static per-level parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub ammo: u32,
    pub targets: u32,
    pub badge: Badge,
    pub title: &'static str,
}

impl LevelConfig {
    /// Headline shown when the level is cleared
    pub fn completion_banner(&self, level: u32) -> String {
        if self.title.is_empty() {
            format!("Level {level} Completed!")
        } else {
            format!("{} Achieved!", self.title)
        }
    }
}

pub const LEVEL_COUNT: u32 = 3;

pub const LEVELS: [LevelConfig; LEVEL_COUNT as usize] = [
    LevelConfig {
        ammo: 5,
        targets: 5,
        badge: Badge::Go,
        title: "GO Developer",
    },
    LevelConfig {
        ammo: 10,
        targets: 10,
        badge: Badge::Docker,
        title: "Docker Expert",
    },
    LevelConfig {
        ammo: 15,
        targets: 15,
        badge: Badge::Java,
        title: "Kubernetes Architect",
    },
];

/// Configuration for a 1-based level (out-of-range levels clamp)
pub fn config_for(level: u32) -> &'static LevelConfig {
    let index = level.clamp(1, LEVEL_COUNT) - 1;
    &LEVELS[index as usize]
}

/// Integer spawn range along one axis, keeping `margin` from both edges
fn spawn_range(extent: f32, margin: f32) -> (i32, i32) {
    let lo = margin.ceil() as i32;
    let hi = (extent - margin).floor() as i32;
    if hi < lo {
        let mid = (extent / 2.0) as i32;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

/// Scatter a level's targets at random integer positions with random headings
pub fn spawn_targets<R: Rng>(rng: &mut R, config: &LevelConfig, tuning: &Tuning) -> Vec<Target> {
    let (x_lo, x_hi) = spawn_range(tuning.arena_width, tuning.spawn_margin);
    let (y_lo, y_hi) = spawn_range(tuning.arena_height, tuning.spawn_margin);

    (0..config.targets)
        .map(|_| {
            let pos = Vec2::new(
                rng.random_range(x_lo..=x_hi) as f32,
                rng.random_range(y_lo..=y_hi) as f32,
            );
            let direction: f32 = rng.random_range(0.0..TAU);
            Target::new(pos, direction, tuning.target_speed, config.badge)
        })
        .collect()
}

/// Seed ammo and targets for the current level and enter `Playing`
pub fn start_level(state: &mut GameState, now: f64) {
    let config = config_for(state.level);
    state.ammo = config.ammo;
    state.targets = spawn_targets(&mut state.rng, config, &state.tuning);
    state.projectiles.clear();

    let banner = ParticleEffect::starburst(
        &mut state.rng,
        format!("Level {} Starting!", state.level),
        state.tuning.arena_center(),
        now,
        StarburstStyle::default(),
    );
    state.effects.clear();
    state.effects.push(banner);

    log::info!(
        "Level {} ({}) seeded: {} bullets, {} targets",
        state.level,
        config.title,
        config.ammo,
        config.targets
    );
    state.set_phase(GamePhase::Playing);
}

/// Win/lose verdict for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    InProgress,
    /// Every target destroyed
    Cleared,
    /// No bullets left or in flight while targets remain
    OutOfAmmo,
}

pub fn evaluate(state: &GameState) -> LevelOutcome {
    if state.targets.is_empty() {
        LevelOutcome::Cleared
    } else if state.ammo == 0 && state.projectiles.is_empty() {
        LevelOutcome::OutOfAmmo
    } else {
        LevelOutcome::InProgress
    }
}
