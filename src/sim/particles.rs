//! Time-bounded particle bursts
//!
//! Two kinds share one expiry rule and differ only in construction and
//! per-particle decay:
//! - starbursts carry a banner label and shrink linearly with elapsed time
//! - impacts damp velocity and shrink geometrically every frame
//!
//! An effect lives until its duration elapses, even if every particle has
//! faded out.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// RGB color
pub type Rgb = [u8; 3];

pub mod palette {
    use super::Rgb;

    pub const RED: Rgb = [255, 0, 0];
    pub const GREEN: Rgb = [0, 255, 0];
    pub const YELLOW: Rgb = [255, 255, 0];
    pub const VIOLET: Rgb = [138, 43, 226];

    /// Colors of a festive starburst
    pub const FESTIVE: [Rgb; 4] = [RED, VIOLET, GREEN, YELLOW];
}

/// Time slice used to integrate impact particles, independent of frame rate
pub const IMPACT_TIME_SLICE: f32 = 1.0 / 60.0;

pub const IMPACT_PARTICLES: usize = 25;
pub const IMPACT_DURATION: f64 = 1.5;
/// Per-frame velocity damping of impact particles
pub const IMPACT_DAMPING: f32 = 0.92;
/// Per-frame size decay of impact particles
pub const IMPACT_SHRINK: f32 = 0.95;

/// Smallest renderable particle radius
pub const MIN_PARTICLE_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Banner burst for level start/end and game over
    Starburst,
    /// Collision burst
    Impact,
}

/// Construction parameters for a starburst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarburstStyle {
    pub duration: f64,
    pub particle_count: usize,
    /// Multi-color palette and a wider speed range
    pub festive: bool,
}

impl Default for StarburstStyle {
    fn default() -> Self {
        Self {
            duration: 2.0,
            particle_count: 60,
            festive: false,
        }
    }
}

impl StarburstStyle {
    /// Level-complete celebration
    pub fn festive() -> Self {
        Self {
            duration: 4.0,
            particle_count: 20,
            festive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub initial_size: f32,
    /// Current radius, never below [`MIN_PARTICLE_SIZE`]
    pub size: f32,
    pub alpha: u8,
    pub color: Rgb,
}

impl Particle {
    fn new(origin: Vec2, vel: Vec2, size: f32, color: Rgb) -> Self {
        Self {
            pos: origin,
            vel,
            initial_size: size,
            size,
            alpha: u8::MAX,
            color,
        }
    }
}

/// A burst of particles sharing an origin and expiry
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEffect {
    pub kind: EffectKind,
    pub origin: Vec2,
    /// Clock time of emission (seconds)
    pub started_at: f64,
    pub duration: f64,
    /// Banner text (starbursts only)
    pub label: Option<String>,
    pub particles: Vec<Particle>,
}

impl ParticleEffect {
    /// Radial starburst with a banner label
    pub fn starburst<R: Rng>(
        rng: &mut R,
        label: impl Into<String>,
        origin: Vec2,
        now: f64,
        style: StarburstStyle,
    ) -> Self {
        let max_speed: f32 = if style.festive { 300.0 } else { 200.0 };
        let particles = (0..style.particle_count)
            .map(|_| {
                let angle: f32 = rng.random_range(0.0..TAU);
                let speed = rng.random_range(100.0..max_speed);
                let size = rng.random_range(5..=10) as f32;
                let color = if style.festive {
                    palette::FESTIVE[rng.random_range(0..palette::FESTIVE.len())]
                } else {
                    palette::YELLOW
                };
                Particle::new(origin, polar_to_cartesian(speed, angle), size, color)
            })
            .collect();

        Self {
            kind: EffectKind::Starburst,
            origin,
            started_at: now,
            duration: style.duration,
            label: Some(label.into()),
            particles,
        }
    }

    /// Warm-colored collision burst
    pub fn impact<R: Rng>(rng: &mut R, origin: Vec2, now: f64) -> Self {
        let particles = (0..IMPACT_PARTICLES)
            .map(|_| {
                let angle: f32 = rng.random_range(0.0..TAU);
                let speed: f32 = rng.random_range(50.0..150.0);
                let size = rng.random_range(6..=12) as f32;
                let color = [255, rng.random_range(0..=100), 0];
                Particle::new(origin, polar_to_cartesian(speed, angle), size, color)
            })
            .collect();

        Self {
            kind: EffectKind::Impact,
            origin,
            started_at: now,
            duration: IMPACT_DURATION,
            label: None,
            particles,
        }
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.started_at
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.elapsed(now) > self.duration
    }

    /// Fraction of the lifetime used, clamped to [0, 1]
    pub fn progress(&self, now: f64) -> f32 {
        (self.elapsed(now) / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Advance one frame. Starbursts integrate over `frame_time` seconds.
    /// Returns false once the effect has expired.
    pub fn update(&mut self, now: f64, frame_time: f32) -> bool {
        if self.is_expired(now) {
            return false;
        }

        let progress = self.progress(now);
        let alpha = (255.0 * (1.0 - progress)).floor().clamp(0.0, 255.0) as u8;

        for particle in &mut self.particles {
            particle.alpha = particle.alpha.min(alpha);
            match self.kind {
                EffectKind::Starburst => {
                    particle.pos += particle.vel * frame_time;
                    let size = (particle.initial_size * (1.0 - progress)).max(MIN_PARTICLE_SIZE);
                    particle.size = particle.size.min(size);
                }
                EffectKind::Impact => {
                    particle.pos += particle.vel * IMPACT_TIME_SLICE;
                    particle.vel *= IMPACT_DAMPING;
                    particle.size = (particle.size * IMPACT_SHRINK).max(MIN_PARTICLE_SIZE);
                }
            }
        }
        true
    }
}

/// Update every effect and drop the expired ones
pub fn update_effects(effects: &mut Vec<ParticleEffect>, now: f64, frame_time: f32) {
    effects.retain_mut(|effect| effect.update(now, frame_time));
}
