//! Game state and core simulation types
//!
//! The session owns every live entity. Phase handlers in `tick` borrow it
//! mutably for one frame and keep nothing between frames.

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::{Badge, LEVEL_COUNT};
use super::particles::{EffectKind, ParticleEffect};
use crate::platform::KeyState;
use crate::settings::DEFAULT_VOLUME;
use crate::tuning::Tuning;
use crate::ui::Widgets;
use crate::{clamp_to_arena, polar_to_cartesian, wrap_degrees};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with start/quit buttons and the volume slider
    Menu,
    /// Intro starburst playing; advances to `Playing` once it expires
    Starting,
    /// Active gameplay
    Playing,
    /// All targets of the level destroyed
    LevelComplete,
    /// Tank hit a target or ran out of bullets
    GameOver,
}

impl GamePhase {
    /// Transition table. Self-transitions are never valid.
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        match self {
            Menu => matches!(next, Starting),
            Starting => matches!(next, Playing),
            Playing => matches!(next, LevelComplete | GameOver),
            // Next level seeds directly into Playing
            LevelComplete => matches!(next, Starting | Playing | Menu),
            GameOver => matches!(next, Starting | Menu),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Starting => "starting",
            GamePhase::Playing => "playing",
            GamePhase::LevelComplete => "end",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Tank drove into a target
    TankHit,
    /// No bullets left, none in flight, targets remain
    OutOfAmmo,
}

/// Side effects of a frame, drained by the host (audio, telemetry)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    /// A bullet left the turret
    Fired { pos: Vec2, angle: f32 },
    /// A collision produced an impact burst
    Impact { pos: Vec2 },
    LevelCleared { level: u32 },
    GameOver { reason: GameOverReason },
    /// Menu slider moved; applies to all cues and music
    VolumeChanged(f32),
}

/// The player's tank
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub pos: Vec2,
    /// Body heading in degrees, [0, 360)
    pub heading: f32,
    /// Linear speed (pixels per frame, negative when reversing)
    pub speed: f32,
    /// Turn rate (degrees per frame)
    pub angular_speed: f32,
    /// Recent positions, oldest first (rendering only)
    pub trail: VecDeque<Vec2>,
    /// Turret aim in radians, recomputed from the pointer every frame
    pub turret_angle: f32,
}

impl Vehicle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed: 0.0,
            angular_speed: 0.0,
            trail: VecDeque::new(),
            turret_angle: 0.0,
        }
    }

    /// Set speed and turn rate from held keys. No acceleration ramp.
    pub fn steer(&mut self, keys: &KeyState, tuning: &Tuning) {
        self.speed = if keys.forward {
            tuning.tank_speed
        } else if keys.back {
            -tuning.tank_speed * tuning.reverse_factor
        } else {
            0.0
        };

        self.angular_speed = if keys.left {
            tuning.turn_rate
        } else if keys.right {
            -tuning.turn_rate
        } else {
            0.0
        };
    }

    /// Integrate one frame of movement, record the trail and aim the turret
    pub fn update(&mut self, keys: &KeyState, pointer: Vec2, tuning: &Tuning) {
        self.steer(keys, tuning);

        self.heading = wrap_degrees(self.heading + self.angular_speed);
        let rad = self.heading.to_radians();
        // Screen space: y grows downward, so the sine term is subtracted
        self.pos.x += rad.cos() * self.speed;
        self.pos.y -= rad.sin() * self.speed;
        self.pos = clamp_to_arena(self.pos, tuning.arena());

        self.record_trail(tuning.trail_length);
        self.aim_at(pointer);
    }

    /// Append the current position, evicting the oldest beyond `capacity`
    pub fn record_trail(&mut self, capacity: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }

    /// Snap the turret toward the pointer
    pub fn aim_at(&mut self, pointer: Vec2) {
        let delta = pointer - self.pos;
        if delta.is_finite() {
            self.turret_angle = delta.y.atan2(delta.x);
        }
    }

    /// Push the tank back opposite the turret and re-clamp
    pub fn apply_recoil(&mut self, tuning: &Tuning) {
        self.pos += polar_to_cartesian(tuning.recoil, self.turret_angle + PI);
        self.pos = clamp_to_arena(self.pos, tuning.arena());
    }

    /// Bounding box of the rotated body sprite
    pub fn bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::rotated(self.pos, Vec2::splat(tuning.tank_body_size), self.heading)
    }
}

/// A bullet in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Per-frame displacement
    pub vel: Vec2,
    /// Clock time at firing (seconds)
    pub created_at: f64,
    /// Facing in degrees (rendering only)
    pub angle: f32,
}

impl Projectile {
    /// Fire from `origin` along `aim` (radians)
    pub fn fire(origin: Vec2, aim: f32, speed: f32, now: f64) -> Self {
        Self {
            pos: origin,
            vel: polar_to_cartesian(speed, aim),
            created_at: now,
            angle: aim.to_degrees(),
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    /// Inside the arena (edges included) and younger than the lifetime
    pub fn is_live(&self, now: f64, tuning: &Tuning) -> bool {
        let in_x = (0.0..=tuning.arena_width).contains(&self.pos.x);
        let in_y = (0.0..=tuning.arena_height).contains(&self.pos.y);
        in_x && in_y && self.age(now) < tuning.bullet_lifetime
    }

    pub fn bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(tuning.bullet_size))
    }
}

/// A roaming target
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub pos: Vec2,
    /// Per-frame displacement; components flip on edge contact
    pub vel: Vec2,
    pub badge: Badge,
}

impl Target {
    /// Target moving at `speed` along `direction` (radians)
    pub fn new(pos: Vec2, direction: f32, speed: f32, badge: Badge) -> Self {
        Self {
            pos,
            vel: polar_to_cartesian(speed, direction),
            badge,
        }
    }

    /// Move one frame, reflect off crossed edges, then clamp
    pub fn advance(&mut self, arena: Vec2) {
        self.pos += self.vel;

        if self.pos.x < 0.0 || self.pos.x > arena.x {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y > arena.y {
            self.vel.y = -self.vel.y;
        }

        self.pos = clamp_to_arena(self.pos, arena);
    }

    pub fn bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(tuning.target_size))
    }
}

/// Cursor into the host's background video frames
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundCursor {
    /// Number of frames the host loaded (0 = gradient fallback)
    pub frame_count: usize,
    pub index: usize,
    pub last_advance: f64,
}

impl BackgroundCursor {
    pub fn new(frame_count: usize, now: f64) -> Self {
        Self {
            frame_count,
            index: 0,
            last_advance: now,
        }
    }

    /// Step to the next frame once a video frame period has passed
    pub fn advance(&mut self, now: f64, video_fps: f32) -> bool {
        if self.frame_count == 0 {
            return false;
        }
        if now - self.last_advance >= 1.0 / f64::from(video_fps) {
            self.index = (self.index + 1) % self.frame_count;
            self.last_advance = now;
            return true;
        }
        false
    }

    pub fn reset(&mut self, now: f64) {
        self.index = 0;
        self.last_advance = now;
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    /// Bullets left to fire
    pub ammo: u32,
    pub vehicle: Vehicle,
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<Target>,
    /// Starbursts and impact bursts
    pub effects: Vec<ParticleEffect>,
    pub background: BackgroundCursor,
    pub widgets: Widgets,
    /// Events produced by the last frame (cleared at the start of each frame)
    pub events: Vec<GameEvent>,
    /// Seeded from the constructor; drives target placement and particle spread
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Fresh session in the menu
    pub fn new(tuning: Tuning, seed: u64, now: f64) -> Self {
        let tuning = tuning.sanitized();
        Self {
            phase: GamePhase::Menu,
            level: 1,
            ammo: 0,
            vehicle: Vehicle::new(tuning.arena_center()),
            projectiles: Vec::new(),
            targets: Vec::new(),
            effects: Vec::new(),
            background: BackgroundCursor::new(0, now),
            widgets: Widgets::layout(tuning.arena(), DEFAULT_VOLUME),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Attach the number of background frames the host loaded
    pub fn with_background_frames(mut self, frame_count: usize) -> Self {
        self.background.frame_count = frame_count;
        self
    }

    /// Move to `next` if the transition table allows it
    pub fn set_phase(&mut self, next: GamePhase) -> bool {
        let from = self.phase;
        if !from.can_transition_to(next) {
            log::warn!(
                "Ignoring invalid phase transition {} -> {}",
                from.as_str(),
                next.as_str()
            );
            return false;
        }
        log::info!(
            "Phase {} -> {} (level {})",
            from.as_str(),
            next.as_str(),
            self.level
        );
        self.phase = next;
        self.events.push(GameEvent::PhaseChanged { from, to: next });
        true
    }

    /// Replace any running starburst with `banner`, keeping impact bursts
    pub fn show_banner(&mut self, banner: ParticleEffect) {
        self.effects.retain(|e| e.kind != EffectKind::Starburst);
        self.effects.push(banner);
    }

    /// The starburst currently shown, if any
    pub fn banner(&self) -> Option<&ParticleEffect> {
        self.effects
            .iter()
            .find(|e| e.kind == EffectKind::Starburst)
    }

    pub fn has_starbursts(&self) -> bool {
        self.banner().is_some()
    }

    pub fn impact_count(&self) -> usize {
        self.effects
            .iter()
            .filter(|e| e.kind == EffectKind::Impact)
            .count()
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= LEVEL_COUNT
    }

    /// Spawn an impact burst at `pos` and publish it
    pub fn spawn_impact(&mut self, pos: Vec2, now: f64) {
        let effect = ParticleEffect::impact(&mut self.rng, pos, now);
        self.effects.push(effect);
        self.events.push(GameEvent::Impact { pos });
    }
}
