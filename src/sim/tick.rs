//! Per-frame simulation step
//!
//! The host calls [`advance`] once per frame. It first turns the frame's
//! input events into [`Command`]s, then runs the work of the current phase:
//! - `Menu`: volume slider only
//! - `Starting`, `LevelComplete`, `GameOver`: particle effects only
//! - `Playing`: tank, bullets, targets and collisions, effects, then win/lose

use glam::Vec2;

use super::collision::resolve_targets;
use super::level::{self, LevelOutcome};
use super::particles::{ParticleEffect, StarburstStyle, update_effects};
use super::state::{GameEvent, GameOverReason, GamePhase, GameState, Projectile, Vehicle};
use crate::platform::{InputEvent, Key, KeyState};
use crate::ui::WidgetId;

pub const INTRO_BANNER: &str = "Container Tanker Starting!";
pub const TANK_HIT_BANNER: &str = "Game Over! Tank Hit Target!";
pub const OUT_OF_AMMO_BANNER: &str = "Game Over! Bullets Depleted!";

/// Everything the host observed for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Clock time of this frame (seconds)
    pub now: f64,
    /// Held movement keys
    pub keys: KeyState,
    /// Pointer position in screen space (may lie outside the arena)
    pub pointer: Vec2,
    /// Primary button currently held
    pub primary_down: bool,
    /// Discrete events since the previous frame, in arrival order
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    /// Empty input at `now`
    pub fn at(now: f64) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Whether the host should keep pumping frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Quit,
}

/// Player intents, resolved from keys and widget clicks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Quit,
    /// Shoot toward the clicked position. The click point wins over the
    /// frame's pointer snapshot.
    Fire(Vec2),
    /// Replay, retry and restart all restart from level 1
    Replay,
    NextLevel,
    BackToMenu,
}

/// Advance the session by one frame
pub fn advance(state: &mut GameState, input: &FrameInput) -> FrameStatus {
    state.events.clear();
    let now = input.now;
    state.background.advance(now, state.tuning.video_fps);

    for event in &input.events {
        let Some(command) = command_for(state, event) else {
            continue;
        };
        if apply_command(state, command, now) == FrameStatus::Quit {
            log::info!("Quit requested");
            return FrameStatus::Quit;
        }
    }

    match state.phase {
        GamePhase::Menu => update_menu(state, input),
        GamePhase::Starting => update_starting(state, now),
        GamePhase::Playing => update_playing(state, input),
        GamePhase::LevelComplete | GamePhase::GameOver => {
            update_effects(&mut state.effects, now, state.tuning.frame_time())
        }
    }

    FrameStatus::Continue
}

/// Map an input event to a command for the current phase
pub fn command_for(state: &GameState, event: &InputEvent) -> Option<Command> {
    let final_level = state.is_final_level();
    match (*event, state.phase) {
        (InputEvent::Quit, _) => Some(Command::Quit),
        (InputEvent::Click(point), GamePhase::Playing) => Some(Command::Fire(point)),
        (InputEvent::Click(point), phase) => {
            let hit = state.widgets.hit_test(point, phase, final_level);
            hit.map(widget_command)
        }
        (InputEvent::KeyPressed(key), phase) => key_command(key, phase, final_level),
    }
}

fn widget_command(id: WidgetId) -> Command {
    match id {
        WidgetId::Start => Command::Start,
        WidgetId::Quit => Command::Quit,
        WidgetId::NextLevel => Command::NextLevel,
        WidgetId::Replay | WidgetId::Retry | WidgetId::Restart => Command::Replay,
        WidgetId::LevelMenu | WidgetId::GameOverMenu | WidgetId::FinalMenu => Command::BackToMenu,
    }
}

fn key_command(key: Key, phase: GamePhase, final_level: bool) -> Option<Command> {
    use GamePhase::*;
    match (key, phase) {
        (Key::S, Menu) => Some(Command::Start),
        (Key::Q, Menu) => Some(Command::Quit),
        (Key::Q, LevelComplete | GameOver) => Some(Command::BackToMenu),
        (Key::R, LevelComplete | GameOver) => Some(Command::Replay),
        (Key::Space, LevelComplete) if !final_level => Some(Command::NextLevel),
        _ => None,
    }
}

/// Execute a command. Commands that do not apply to the phase are ignored.
pub fn apply_command(state: &mut GameState, command: Command, now: f64) -> FrameStatus {
    use GamePhase::*;
    match command {
        Command::Quit => return FrameStatus::Quit,
        Command::Start if state.phase == Menu => begin_intro(state, now),
        Command::Fire(aim) if state.phase == Playing => {
            fire(state, aim, now);
        }
        Command::Replay if matches!(state.phase, LevelComplete | GameOver) => {
            begin_intro(state, now)
        }
        Command::NextLevel if state.phase == LevelComplete && !state.is_final_level() => {
            // Straight into play: the intro phase is skipped on this path
            state.level += 1;
            level::start_level(state, now);
        }
        Command::BackToMenu if matches!(state.phase, LevelComplete | GameOver) => {
            reset_to_menu(state, now)
        }
        _ => log::debug!("Ignoring {command:?} in {}", state.phase.as_str()),
    }
    FrameStatus::Continue
}

/// Restart from level 1 with the intro banner
fn begin_intro(state: &mut GameState, now: f64) {
    state.level = 1;
    let banner = ParticleEffect::starburst(
        &mut state.rng,
        INTRO_BANNER,
        state.tuning.arena_center(),
        now,
        StarburstStyle::default(),
    );
    state.show_banner(banner);
    state.set_phase(GamePhase::Starting);
}

/// Fire one bullet toward `aim`. Returns false when out of ammo.
pub fn fire(state: &mut GameState, aim: Vec2, now: f64) -> bool {
    if state.ammo == 0 {
        return false;
    }

    let tank = &mut state.vehicle;
    tank.aim_at(aim);
    let bullet = Projectile::fire(tank.pos, tank.turret_angle, state.tuning.bullet_speed, now);
    tank.apply_recoil(&state.tuning);

    state.ammo -= 1;
    log::debug!(
        "Fired from ({:.0}, {:.0}) at {:.1} deg, {} left",
        bullet.pos.x,
        bullet.pos.y,
        bullet.angle,
        state.ammo
    );
    state.events.push(GameEvent::Fired {
        pos: bullet.pos,
        angle: bullet.angle,
    });
    state.projectiles.push(bullet);
    true
}

/// Clear the session and return to the title screen
pub fn reset_to_menu(state: &mut GameState, now: f64) {
    state.level = 1;
    state.ammo = 0;
    state.projectiles.clear();
    state.targets.clear();
    state.effects.clear();
    state.vehicle = Vehicle::new(state.tuning.arena_center());
    state.background.reset(now);
    state.set_phase(GamePhase::Menu);
}

fn update_menu(state: &mut GameState, input: &FrameInput) {
    let slider = &mut state.widgets.volume;
    if let Some(volume) = slider.update(input.pointer, input.primary_down) {
        state.events.push(GameEvent::VolumeChanged(volume));
    }
}

fn update_starting(state: &mut GameState, now: f64) {
    update_effects(&mut state.effects, now, state.tuning.frame_time());
    if !state.has_starbursts() {
        level::start_level(state, now);
    }
}

fn update_playing(state: &mut GameState, input: &FrameInput) {
    let now = input.now;

    let tank = &mut state.vehicle;
    tank.update(&input.keys, input.pointer, &state.tuning);

    for bullet in &mut state.projectiles {
        bullet.advance();
    }
    state.projectiles.retain(|b| b.is_live(now, &state.tuning));

    let report = resolve_targets(
        &state.vehicle,
        &mut state.targets,
        &mut state.projectiles,
        &state.tuning,
    );
    for pos in report.destroyed_at {
        log::debug!("Target destroyed at ({:.0}, {:.0})", pos.x, pos.y);
        state.spawn_impact(pos, now);
    }
    if let Some(pos) = report.vehicle_hit {
        state.spawn_impact(pos, now);
        lose_level(state, GameOverReason::TankHit, now);
    }

    update_effects(&mut state.effects, now, state.tuning.frame_time());

    if state.phase != GamePhase::Playing {
        return;
    }
    match level::evaluate(state) {
        LevelOutcome::Cleared => complete_level(state, now),
        LevelOutcome::OutOfAmmo => lose_level(state, GameOverReason::OutOfAmmo, now),
        LevelOutcome::InProgress => {}
    }
}

fn complete_level(state: &mut GameState, now: f64) {
    let text = level::config_for(state.level).completion_banner(state.level);
    let banner = ParticleEffect::starburst(
        &mut state.rng,
        text,
        state.tuning.arena_center(),
        now,
        StarburstStyle::festive(),
    );
    state.show_banner(banner);
    let level = state.level;
    state.events.push(GameEvent::LevelCleared { level });
    state.set_phase(GamePhase::LevelComplete);
}

fn lose_level(state: &mut GameState, reason: GameOverReason, now: f64) {
    let text = match reason {
        GameOverReason::TankHit => TANK_HIT_BANNER,
        GameOverReason::OutOfAmmo => OUT_OF_AMMO_BANNER,
    };
    let banner = ParticleEffect::starburst(
        &mut state.rng,
        text,
        state.tuning.arena_center(),
        now,
        StarburstStyle::default(),
    );
    state.show_banner(banner);
    state.events.push(GameEvent::GameOver { reason });
    state.set_phase(GamePhase::GameOver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Badge;
    use crate::sim::state::Target;
    use crate::tuning::Tuning;

    const DT: f64 = 1.0 / 120.0;

    fn press(now: f64, key: Key) -> FrameInput {
        FrameInput::at(now).with_event(InputEvent::KeyPressed(key))
    }

    fn click(now: f64, at: Vec2) -> FrameInput {
        FrameInput {
            pointer: at,
            ..FrameInput::at(now)
        }
        .with_event(InputEvent::Click(at))
    }

    fn parked_target(x: f32, y: f32) -> Target {
        Target {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            badge: Badge::Go,
        }
    }

    /// Walk menu -> starting -> playing. Returns the state and current time.
    fn enter_playing(seed: u64) -> (GameState, f64) {
        let mut state = GameState::new(Tuning::default(), seed, 0.0);
        assert_eq!(
            advance(&mut state, &press(0.0, Key::S)),
            FrameStatus::Continue
        );
        assert_eq!(state.phase, GamePhase::Starting);
        assert_eq!(
            state.banner().and_then(|b| b.label.as_deref()),
            Some(INTRO_BANNER)
        );

        advance(&mut state, &FrameInput::at(1.0));
        assert_eq!(state.phase, GamePhase::Starting);

        advance(&mut state, &FrameInput::at(2.5));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ammo, 5);
        assert_eq!(state.targets.len(), 5);
        (state, 2.5)
    }

    #[test]
    fn test_menu_start_button() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        advance(&mut state, &click(0.0, Vec2::new(875.0, 565.0)));
        assert_eq!(state.phase, GamePhase::Starting);
        assert_eq!(state.level, 1);
        assert!(state.events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Starting,
        }));
    }

    #[test]
    fn test_quit_signals() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        assert_eq!(advance(&mut state, &press(0.0, Key::Q)), FrameStatus::Quit);

        let (mut state, now) = enter_playing(1);
        assert_eq!(
            advance(&mut state, &press(now + DT, Key::Q)),
            FrameStatus::Continue
        );
        assert_eq!(state.phase, GamePhase::Playing);
        let quit = FrameInput::at(now + 2.0 * DT).with_event(InputEvent::Quit);
        assert_eq!(advance(&mut state, &quit), FrameStatus::Quit);
    }

    #[test]
    fn test_menu_slider_publishes_volume() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        let input = FrameInput {
            pointer: Vec2::new(1790.0, 36.0),
            primary_down: true,
            ..FrameInput::at(0.1)
        };
        advance(&mut state, &input);
        assert_eq!(state.events, vec![GameEvent::VolumeChanged(0.2)]);

        advance(&mut state, &FrameInput::at(0.2));
        assert!(state.events.is_empty(), "events are per frame");
        assert_eq!(state.widgets.volume.value, 0.2);
    }

    #[test]
    fn test_fire_spends_ammo_and_recoils() {
        let (mut state, now) = enter_playing(2);
        state.targets = vec![parked_target(100.0, 1000.0)];
        let origin = state.vehicle.pos;

        advance(&mut state, &click(now + DT, Vec2::new(1900.0, origin.y)));

        assert_eq!(state.ammo, 4);
        assert_eq!(state.projectiles.len(), 1);
        let bullet = &state.projectiles[0];
        // Spawned at the tank, then moved one frame
        assert!((bullet.pos.x - (origin.x + 10.0)).abs() < 1e-3);
        assert!((bullet.pos.y - origin.y).abs() < 1e-3);
        assert!((state.vehicle.pos.x - (origin.x - 5.0)).abs() < 1e-3);
        let fired = |e: &GameEvent| matches!(e, GameEvent::Fired { .. });
        assert!(state.events.iter().any(fired));
    }

    #[test]
    fn test_fire_aims_at_click_not_pointer() {
        let (mut state, now) = enter_playing(10);
        state.targets = vec![parked_target(100.0, 1000.0)];
        let origin = state.vehicle.pos;
        let above = Vec2::new(origin.x, 0.0);
        assert_eq!(
            command_for(&state, &InputEvent::Click(above)),
            Some(Command::Fire(above))
        );

        // Pointer snapshot to the left, click straight above the tank
        let input = FrameInput {
            pointer: Vec2::new(0.0, origin.y),
            ..FrameInput::at(now + DT)
        }
        .with_event(InputEvent::Click(above));
        advance(&mut state, &input);

        assert_eq!(state.projectiles.len(), 1);
        let bullet = &state.projectiles[0];
        assert!((bullet.pos.x - origin.x).abs() < 1e-3);
        assert!((bullet.pos.y - (origin.y - 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_ammo_ends_level() {
        let (mut state, mut now) = enter_playing(3);
        state.targets = (1..=5)
            .map(|i| parked_target(i as f32 * 100.0, 1000.0))
            .collect();
        let pointer = Vec2::new(1900.0, 540.0);

        for _ in 0..5 {
            now += DT;
            advance(&mut state, &click(now, pointer));
        }
        assert_eq!(state.ammo, 0);
        assert_eq!(state.projectiles.len(), 5);
        assert_eq!(state.phase, GamePhase::Playing);

        // A sixth click does nothing
        now += DT;
        advance(&mut state, &click(now, pointer));
        assert_eq!(state.ammo, 0);
        assert_eq!(state.projectiles.len(), 5);

        let mut frames = 0;
        while state.phase == GamePhase::Playing && frames < 400 {
            now += DT;
            let input = FrameInput {
                pointer,
                ..FrameInput::at(now)
            };
            advance(&mut state, &input);
            frames += 1;
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.targets.len(), 5);
        assert!(state.events.contains(&GameEvent::GameOver {
            reason: GameOverReason::OutOfAmmo,
        }));
        assert_eq!(
            state.banner().and_then(|b| b.label.as_deref()),
            Some(OUT_OF_AMMO_BANNER)
        );
    }

    #[test]
    fn test_expired_projectile_is_removed() {
        let (mut state, now) = enter_playing(4);
        state.targets = vec![parked_target(100.0, 1000.0)];
        state.projectiles = vec![
            Projectile {
                pos: Vec2::new(960.0, 100.0),
                vel: Vec2::ZERO,
                created_at: now - 2.0,
                angle: 0.0,
            },
            Projectile {
                pos: Vec2::new(960.0, 200.0),
                vel: Vec2::ZERO,
                created_at: now,
                angle: 0.0,
            },
        ];

        advance(&mut state, &FrameInput::at(now + DT));

        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos.y, 200.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_hit_clears_level() {
        let (mut state, now) = enter_playing(5);
        state.targets = vec![parked_target(1400.0, 300.0)];
        state.projectiles = vec![Projectile {
            pos: Vec2::new(1380.0, 300.0),
            vel: Vec2::new(10.0, 0.0),
            created_at: now,
            angle: 0.0,
        }];

        advance(&mut state, &FrameInput::at(now + DT));

        assert!(state.targets.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.impact_count(), 1);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.events.contains(&GameEvent::Impact {
            pos: Vec2::new(1400.0, 300.0),
        }));
        assert!(state.events.contains(&GameEvent::LevelCleared { level: 1 }));
        let banner = state.banner().expect("celebration banner");
        assert_eq!(banner.label.as_deref(), Some("GO Developer Achieved!"));
        assert_eq!(banner.duration, 4.0);
        assert_eq!(banner.particles.len(), 20);
    }

    #[test]
    fn test_tank_hit_stops_target_processing() {
        let (mut state, now) = enter_playing(6);
        let tank = state.vehicle.pos;
        state.targets = vec![
            Target {
                pos: Vec2::new(200.0, 200.0),
                vel: Vec2::new(1.0, 0.0),
                badge: Badge::Go,
            },
            parked_target(tank.x + 10.0, tank.y),
            Target {
                pos: Vec2::new(1500.0, 800.0),
                vel: Vec2::new(1.0, 0.0),
                badge: Badge::Go,
            },
        ];

        advance(&mut state, &FrameInput::at(now + DT));

        assert_eq!(state.phase, GamePhase::GameOver);
        // The target the tank drove into stays in play
        assert_eq!(state.targets.len(), 3);
        assert_eq!(state.targets[1].pos, Vec2::new(tank.x + 10.0, tank.y));
        assert_eq!(state.targets[0].pos, Vec2::new(201.0, 200.0));
        assert_eq!(state.targets[2].pos, Vec2::new(1500.0, 800.0));
        assert_eq!(state.impact_count(), 1);
        assert!(state.events.contains(&GameEvent::GameOver {
            reason: GameOverReason::TankHit,
        }));
        assert_eq!(
            state.banner().and_then(|b| b.label.as_deref()),
            Some(TANK_HIT_BANNER)
        );
    }

    #[test]
    fn test_next_level_skips_intro() {
        let (mut state, mut now) = enter_playing(7);
        state.targets.clear();
        now += DT;
        advance(&mut state, &FrameInput::at(now));
        assert_eq!(state.phase, GamePhase::LevelComplete);

        // Park the tank where no fresh target can overlap it
        state.vehicle.pos = Vec2::ZERO;
        now += DT;
        advance(&mut state, &press(now, Key::Space));

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.ammo, 10);
        assert_eq!(state.targets.len(), 10);
        assert!(state.targets.iter().all(|t| t.badge == Badge::Docker));
        assert!(state.events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::LevelComplete,
            to: GamePhase::Playing,
        }));
        assert!(!state.events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::LevelComplete,
            to: GamePhase::Starting,
        }));
    }

    #[test]
    fn test_final_level_has_no_next() {
        let (mut state, mut now) = enter_playing(8);
        state.level = 3;
        state.targets.clear();
        now += DT;
        advance(&mut state, &FrameInput::at(now));
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.events.contains(&GameEvent::LevelCleared { level: 3 }));

        now += DT;
        advance(&mut state, &press(now, Key::Space));
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.level, 3);

        // Restart button lives where Retry does
        now += DT;
        advance(&mut state, &click(now, Vec2::new(810.0, 950.0)));
        assert_eq!(state.phase, GamePhase::Starting);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_retry_and_back_to_menu() {
        let (mut state, mut now) = enter_playing(9);
        let tank = state.vehicle.pos;
        state.targets = vec![parked_target(tank.x, tank.y)];
        now += DT;
        advance(&mut state, &FrameInput::at(now));
        assert_eq!(state.phase, GamePhase::GameOver);

        now += DT;
        advance(&mut state, &press(now, Key::R));
        assert_eq!(state.phase, GamePhase::Starting);
        assert_eq!(
            state.banner().and_then(|b| b.label.as_deref()),
            Some(INTRO_BANNER)
        );
        // The crash burst keeps playing under the new banner
        assert_eq!(state.impact_count(), 1);

        // Back to game over, then to the menu
        now += 2.5;
        advance(&mut state, &FrameInput::at(now));
        assert_eq!(state.phase, GamePhase::Playing);
        state.vehicle.pos = Vec2::new(300.0, 300.0);
        state.vehicle.trail.push_back(Vec2::ONE);
        state.targets = vec![parked_target(300.0, 300.0)];
        now += DT;
        advance(&mut state, &FrameInput::at(now));
        assert_eq!(state.phase, GamePhase::GameOver);

        now += DT;
        advance(&mut state, &press(now, Key::Q));
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level, 1);
        assert_eq!(state.ammo, 0);
        assert!(state.targets.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.effects.is_empty());
        assert_eq!(state.vehicle.pos, state.tuning.arena_center());
        assert!(state.vehicle.trail.is_empty());
    }

    #[test]
    fn test_clicks_ignored_while_starting() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        advance(&mut state, &press(0.0, Key::S));
        advance(&mut state, &click(0.1, Vec2::new(875.0, 565.0)));
        assert_eq!(state.phase, GamePhase::Starting);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_background_advances_every_phase() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0)
            .with_background_frames(2);
        advance(&mut state, &FrameInput::at(0.01));
        assert_eq!(state.background.index, 1);
        advance(&mut state, &FrameInput::at(0.015));
        assert_eq!(state.background.index, 1);
        advance(&mut state, &FrameInput::at(0.02));
        assert_eq!(state.background.index, 0);
    }
}
