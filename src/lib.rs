//! Container Tanker - a single-screen tank arcade game
//!
//! Core modules:
//! - `sim`: Frame simulation (entities, collisions, particles, levels, phase machine)
//! - `tuning`: Data-driven game constants
//! - `settings`: Player preferences
//! - `ui`: Widget registry for menu/end screens and the volume slider
//! - `audio`: Audio cue routing to an optional sink
//! - `renderer`: Draw-call seam for the host renderer
//! - `platform`: Clock and input abstractions

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Arena dimensions (screen space, y grows downward)
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;

    /// Logical frame rate of the host pump
    pub const FPS: f32 = 120.0;
    /// Background video frame rate
    pub const VIDEO_FPS: f32 = 120.0;

    /// Tank forward speed (pixels per frame)
    pub const TANK_SPEED: f32 = 3.0;
    /// Reverse speed as a fraction of forward speed
    pub const REVERSE_FACTOR: f32 = 0.7;
    /// Tank turn rate (degrees per frame)
    pub const TURN_RATE: f32 = 2.0;
    /// Recoil displacement per shot (pixels)
    pub const RECOIL: f32 = 5.0;
    /// Number of trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 50;

    /// Bullet speed (pixels per frame)
    pub const BULLET_SPEED: f32 = 10.0;
    /// Bullet lifetime (seconds)
    pub const BULLET_LIFETIME: f64 = 2.0;

    /// Target speed (pixels per frame)
    pub const TARGET_SPEED: f32 = 2.0;
    /// Minimum distance of a freshly spawned target from the arena edge
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Sprite extents used for bounding boxes
    pub const TANK_BODY_SIZE: f32 = 40.0;
    pub const TARGET_SIZE: f32 = 48.0;
    pub const BULLET_SIZE: f32 = 16.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp a position into `[0, size.x] x [0, size.y]`
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(pos.x.clamp(0.0, size.x), pos.y.clamp(0.0, size.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(362.0), 2.0);
        assert_eq!(wrap_degrees(-2.0), 358.0);
        let tiny = wrap_degrees(-1e-6);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_clamp_to_arena() {
        let size = Vec2::new(100.0, 50.0);
        let inside = Vec2::new(40.0, 20.0);
        assert_eq!(
            clamp_to_arena(Vec2::new(-5.0, 60.0), size),
            Vec2::new(0.0, 50.0)
        );
        assert_eq!(clamp_to_arena(inside, size), inside);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }
}
