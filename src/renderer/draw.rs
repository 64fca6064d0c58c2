//! Per-phase draw calls
//!
//! [`draw_frame`] walks the session in paint order and issues calls on a
//! host-supplied [`Renderer`]. Nothing here touches a GPU or a window.

use glam::Vec2;

use super::vertex::{colors, rgba};
use crate::settings::Settings;
use crate::sim::{Badge, EffectKind, GamePhase, GameState, ParticleEffect};
use crate::ui::{Button, VolumeSlider};

pub const TITLE: &str = "Container Tanker";
/// Title sits this far above the arena centre
const TITLE_RISE: f32 = 100.0;
/// Peak title wobble (degrees)
const TITLE_WOBBLE: f32 = 5.0;
const HUD_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
const HUD_LINE_HEIGHT: f32 = 30.0;

/// Drawing backend
pub trait Renderer {
    /// Blit one decoded background video frame
    fn background_frame(&mut self, index: usize);

    /// Vertical gradient fallback when no video frames exist
    fn background_gradient(&mut self, top: [f32; 4], bottom: [f32; 4]);

    fn title(&mut self, text: &str, center: Vec2, tilt_degrees: f32);

    /// One segment of the tank's track
    fn trail(&mut self, from: Vec2, to: Vec2, color: [f32; 4]);

    /// Tank body (heading in degrees) and turret (radians)
    fn vehicle(&mut self, pos: Vec2, heading: f32, turret_angle: f32);

    fn projectile(&mut self, pos: Vec2, angle: f32);

    fn target(&mut self, pos: Vec2, badge: Badge);

    /// Filled circle
    fn particle(&mut self, pos: Vec2, radius: f32, color: [f32; 4]);

    fn banner(&mut self, text: &str, center: Vec2);

    fn hud(&mut self, text: &str, pos: Vec2);

    fn button(&mut self, button: &Button, hovered: bool);

    fn slider(&mut self, slider: &VolumeSlider);
}

/// Draw one frame of the session
pub fn draw_frame<R: Renderer + ?Sized>(
    state: &GameState,
    renderer: &mut R,
    pointer: Vec2,
    now: f64,
    settings: &Settings,
) {
    if state.background.frame_count > 0 {
        renderer.background_frame(state.background.index);
    } else {
        renderer.background_gradient(colors::GRADIENT_TOP, colors::GRADIENT_BOTTOM);
    }

    match state.phase {
        GamePhase::Menu => {
            let center = state.tuning.arena_center() - Vec2::new(0.0, TITLE_RISE);
            let tilt = now.sin() as f32 * TITLE_WOBBLE;
            renderer.title(TITLE, center, tilt);
            draw_buttons(state, renderer, pointer);
            renderer.slider(&state.widgets.volume);
        }
        GamePhase::Starting | GamePhase::LevelComplete | GamePhase::GameOver => {
            draw_effects(&state.effects, EffectKind::Starburst, renderer);
            draw_effects(&state.effects, EffectKind::Impact, renderer);
            draw_buttons(state, renderer, pointer);
        }
        GamePhase::Playing => {
            let tank = &state.vehicle;
            if settings.trails {
                for (from, to) in tank.trail.iter().zip(tank.trail.iter().skip(1)) {
                    renderer.trail(*from, *to, colors::TRAIL);
                }
            }
            renderer.vehicle(tank.pos, tank.heading, tank.turret_angle);

            for bullet in &state.projectiles {
                renderer.projectile(bullet.pos, bullet.angle);
            }
            for target in &state.targets {
                renderer.target(target.pos, target.badge);
            }

            draw_effects(&state.effects, EffectKind::Impact, renderer);
            draw_effects(&state.effects, EffectKind::Starburst, renderer);

            if settings.hud {
                renderer.hud(&format!("Bullets: {}", state.ammo), HUD_ORIGIN);
                renderer.hud(
                    &format!("Level: {}", state.level),
                    HUD_ORIGIN + Vec2::new(0.0, HUD_LINE_HEIGHT),
                );
            }
        }
    }
}

fn draw_buttons<R: Renderer + ?Sized>(state: &GameState, renderer: &mut R, pointer: Vec2) {
    for button in state.widgets.visible(state.phase, state.is_final_level()) {
        renderer.button(button, button.rect.contains(pointer));
    }
}

/// Banner text first, then its particles
fn draw_effects<R: Renderer + ?Sized>(
    effects: &[ParticleEffect],
    kind: EffectKind,
    renderer: &mut R,
) {
    for effect in effects.iter().filter(|e| e.kind == kind) {
        if let Some(label) = &effect.label {
            renderer.banner(label, effect.origin);
        }
        for p in effect.particles.iter().filter(|p| p.alpha > 0) {
            renderer.particle(p.pos, p.size, rgba(p.color, p.alpha));
        }
    }
}
