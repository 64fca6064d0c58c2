//! Container Tanker entry point
//!
//! Runs the simulation headless on a fixed-step clock with a simple
//! autopilot at the controls. Useful for smoke-testing tuning files:
//!
//! ```text
//! RUST_LOG=info container-tanker [tuning.json] [settings.json]
//! ```

use std::path::Path;

use glam::Vec2;

use container_tanker::audio::{AudioManager, LogSink};
use container_tanker::platform::{Clock, FixedStepClock, InputEvent, Key};
use container_tanker::renderer::{Renderer, draw_frame, particle_instances};
use container_tanker::sim::{Badge, FrameInput, FrameStatus, GamePhase, GameState, advance};
use container_tanker::ui::{Button, VolumeSlider};
use container_tanker::{Settings, Tuning};

/// Stop after this many simulated seconds
const MAX_SECONDS: f64 = 300.0;
/// Frames the autopilot waits between shots
const FIRE_COOLDOWN: u32 = 30;

/// Renderer that only counts calls
#[derive(Debug, Default)]
struct FrameStats {
    draw_calls: u64,
    particles: u64,
}

impl Renderer for FrameStats {
    fn background_frame(&mut self, _index: usize) {
        self.draw_calls += 1;
    }
    fn background_gradient(&mut self, _top: [f32; 4], _bottom: [f32; 4]) {
        self.draw_calls += 1;
    }
    fn title(&mut self, _text: &str, _center: Vec2, _tilt_degrees: f32) {
        self.draw_calls += 1;
    }
    fn trail(&mut self, _from: Vec2, _to: Vec2, _color: [f32; 4]) {
        self.draw_calls += 1;
    }
    fn vehicle(&mut self, _pos: Vec2, _heading: f32, _turret_angle: f32) {
        self.draw_calls += 1;
    }
    fn projectile(&mut self, _pos: Vec2, _angle: f32) {
        self.draw_calls += 1;
    }
    fn target(&mut self, _pos: Vec2, _badge: Badge) {
        self.draw_calls += 1;
    }
    fn particle(&mut self, _pos: Vec2, _radius: f32, _color: [f32; 4]) {
        self.draw_calls += 1;
        self.particles += 1;
    }
    fn banner(&mut self, text: &str, _center: Vec2) {
        self.draw_calls += 1;
        log::trace!("banner: {text}");
    }
    fn hud(&mut self, _text: &str, _pos: Vec2) {
        self.draw_calls += 1;
    }
    fn button(&mut self, _button: &Button, _hovered: bool) {
        self.draw_calls += 1;
    }
    fn slider(&mut self, _slider: &VolumeSlider) {
        self.draw_calls += 1;
    }
}

/// Scripted player: start, shoot at the nearest target, advance levels
#[derive(Debug, Default)]
struct Autopilot {
    cooldown: u32,
}

impl Autopilot {
    fn input(&mut self, state: &GameState, now: f64) -> FrameInput {
        let mut input = FrameInput::at(now);
        self.cooldown = self.cooldown.saturating_sub(1);

        match state.phase {
            GamePhase::Menu => input.events.push(InputEvent::KeyPressed(Key::S)),
            GamePhase::Playing => {
                if let Some(aim) = lead_nearest(state) {
                    input.pointer = aim;
                    if self.cooldown == 0 && state.ammo > 0 {
                        input.events.push(InputEvent::Click(aim));
                        self.cooldown = FIRE_COOLDOWN;
                    }
                }
            }
            GamePhase::LevelComplete if !state.is_final_level() && !state.has_starbursts() => {
                input.events.push(InputEvent::KeyPressed(Key::Space));
            }
            GamePhase::Starting | GamePhase::LevelComplete | GamePhase::GameOver => {}
        }
        input
    }
}

/// Where the nearest target will be when a bullet reaches it
fn lead_nearest(state: &GameState) -> Option<Vec2> {
    let origin = state.vehicle.pos;
    let target = state.targets.iter().min_by(|a, b| {
        let da = origin.distance_squared(a.pos);
        da.total_cmp(&origin.distance_squared(b.pos))
    })?;
    let flight = origin.distance(target.pos) / state.tuning.bullet_speed;
    Some(target.pos + target.vel * flight)
}

fn main() {
    env_logger::init();
    log::info!("Container Tanker (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = args
        .next()
        .map(|path| Tuning::load(Path::new(&path)))
        .unwrap_or_default();
    let settings = args
        .next()
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();

    let mut clock = FixedStepClock::at_fps(tuning.fps);
    let seed = rand::random::<u64>();
    log::info!("Seed {seed}");

    let mut state = GameState::new(tuning, seed, clock.peek());
    state.widgets.volume.set_value(settings.volume);

    let mut audio = AudioManager::new(settings.volume).with_sink(Box::new(LogSink));
    audio.start_music();

    let mut pilot = Autopilot::default();
    let mut stats = FrameStats::default();
    let mut frames: u64 = 0;
    let mut peak_instances = 0;

    loop {
        let now = clock.now();
        if now > MAX_SECONDS {
            log::warn!("Stopping after {MAX_SECONDS} simulated seconds");
            break;
        }

        let input = pilot.input(&state, now);
        if advance(&mut state, &input) == FrameStatus::Quit {
            break;
        }
        audio.handle_events(&state.events);
        draw_frame(&state, &mut stats, input.pointer, now, &settings);
        peak_instances = peak_instances.max(particle_instances(&state.effects).len());
        frames += 1;

        let finished = match state.phase {
            GamePhase::GameOver => true,
            GamePhase::LevelComplete => state.is_final_level(),
            _ => false,
        };
        if finished && !state.has_starbursts() {
            break;
        }
    }

    log::info!(
        "Finished in {} on level {} with {} bullets left ({} targets remaining)",
        state.phase.as_str(),
        state.level,
        state.ammo,
        state.targets.len()
    );
    log::info!(
        "{frames} frames, {} draw calls, {} particles drawn, peak {peak_instances} instances",
        stats.draw_calls,
        stats.particles
    );
}
