//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can override them from a
//! JSON file. Missing fields fall back to the values in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Host frame rate (frames per second)
    pub fps: f32,
    /// Background video frame rate
    pub video_fps: f32,

    /// Tank forward speed (pixels per frame)
    pub tank_speed: f32,
    /// Reverse speed multiplier
    pub reverse_factor: f32,
    /// Turn rate (degrees per frame)
    pub turn_rate: f32,
    /// Recoil displacement per shot
    pub recoil: f32,
    /// Trail ring buffer capacity
    pub trail_length: usize,

    /// Bullet speed (pixels per frame)
    pub bullet_speed: f32,
    /// Bullet lifetime (seconds)
    pub bullet_lifetime: f64,

    /// Target speed (pixels per frame)
    pub target_speed: f32,
    /// Spawn distance from the arena edge
    pub spawn_margin: f32,

    pub tank_body_size: f32,
    pub target_size: f32,
    pub bullet_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            fps: FPS,
            video_fps: VIDEO_FPS,
            tank_speed: TANK_SPEED,
            reverse_factor: REVERSE_FACTOR,
            turn_rate: TURN_RATE,
            recoil: RECOIL,
            trail_length: TRAIL_LENGTH,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME,
            target_speed: TARGET_SPEED,
            spawn_margin: SPAWN_MARGIN,
            tank_body_size: TANK_BODY_SIZE,
            target_size: TARGET_SIZE,
            bullet_size: BULLET_SIZE,
        }
    }
}

/// Keep `value` if it is finite and strictly positive, otherwise use `fallback`
fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Keep `value` if it is finite and not negative, otherwise use `fallback`
fn non_negative_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

impl Tuning {
    /// Parse tuning from JSON. Unknown fields are ignored, missing ones defaulted.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!(
                        "Invalid tuning file {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!(
                    "Could not read tuning file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Replace values that would break simulation invariants with defaults
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let arena_width = positive_or(self.arena_width, d.arena_width);
        let arena_height = positive_or(self.arena_height, d.arena_height);
        let max_margin = arena_width.min(arena_height) / 2.0;
        let spawn_margin = non_negative_or(self.spawn_margin, d.spawn_margin).min(max_margin);
        let bullet_lifetime = if self.bullet_lifetime.is_finite() && self.bullet_lifetime > 0.0 {
            self.bullet_lifetime
        } else {
            d.bullet_lifetime
        };

        Self {
            arena_width,
            arena_height,
            fps: positive_or(self.fps, d.fps),
            video_fps: positive_or(self.video_fps, d.video_fps),
            tank_speed: non_negative_or(self.tank_speed, d.tank_speed),
            reverse_factor: non_negative_or(self.reverse_factor, d.reverse_factor),
            turn_rate: non_negative_or(self.turn_rate, d.turn_rate),
            recoil: non_negative_or(self.recoil, d.recoil),
            trail_length: self.trail_length,
            bullet_speed: positive_or(self.bullet_speed, d.bullet_speed),
            bullet_lifetime,
            target_speed: non_negative_or(self.target_speed, d.target_speed),
            spawn_margin,
            tank_body_size: positive_or(self.tank_body_size, d.tank_body_size),
            target_size: positive_or(self.target_size, d.target_size),
            bullet_size: positive_or(self.bullet_size, d.bullet_size),
        }
    }

    /// Arena extent as a vector (width, height)
    #[inline]
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Arena centre
    #[inline]
    pub fn arena_center(&self) -> Vec2 {
        self.arena() * 0.5
    }

    /// Seconds per host frame
    #[inline]
    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps
    }
}
