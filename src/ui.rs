//! Widget registry for the menu and end screens
//!
//! Layout is resolved once from the arena size. Buttons are looked up by
//! [`WidgetId`]; which ones are live depends on the phase and on whether the
//! player is on the final level.

use glam::Vec2;

use crate::sim::GamePhase;

const BUTTON_WIDTH: f32 = 150.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_SPACING: f32 = 20.0;
const NEXT_BUTTON_WIDTH: f32 = 220.0;
/// Distance of the end-screen button row from the bottom edge
const END_ROW_OFFSET: f32 = 150.0;

/// Screen rectangle (top-left origin, half-open like most hit-testing)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetId {
    Start,
    Quit,
    NextLevel,
    Replay,
    LevelMenu,
    Retry,
    GameOverMenu,
    Restart,
    FinalMenu,
}

impl WidgetId {
    pub fn label(self) -> &'static str {
        match self {
            WidgetId::Start => "Start (S)",
            WidgetId::Quit => "Quit (Q)",
            WidgetId::NextLevel => "Next Level (Space)",
            WidgetId::Replay => "Replay (R)",
            WidgetId::Retry => "Retry Level (R)",
            WidgetId::Restart => "Restart Game (R)",
            WidgetId::LevelMenu | WidgetId::GameOverMenu | WidgetId::FinalMenu => {
                "Back to Menu (Q)"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: WidgetId,
    pub rect: Rect,
}

impl Button {
    pub fn label(&self) -> &'static str {
        self.id.label()
    }
}

/// Buttons shown for a phase
pub fn buttons_for(phase: GamePhase, final_level: bool) -> &'static [WidgetId] {
    match phase {
        GamePhase::Menu => &[WidgetId::Start, WidgetId::Quit],
        GamePhase::LevelComplete if final_level => &[WidgetId::Restart, WidgetId::FinalMenu],
        GamePhase::LevelComplete => &[WidgetId::NextLevel, WidgetId::Replay, WidgetId::LevelMenu],
        GamePhase::GameOver => &[WidgetId::Retry, WidgetId::GameOverMenu],
        GamePhase::Starting | GamePhase::Playing => &[],
    }
}

/// Horizontal volume slider
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeSlider {
    pub rect: Rect,
    /// 0.0 - 1.0
    pub value: f32,
    pub dragging: bool,
    pub knob_radius: f32,
}

impl VolumeSlider {
    pub fn new(rect: Rect, value: f32) -> Self {
        Self {
            rect,
            value: value.clamp(0.0, 1.0),
            dragging: false,
            knob_radius: 5.0,
        }
    }

    pub fn set_value(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value.clamp(0.0, 1.0);
        }
    }

    /// Track a drag gesture. Returns the new value when it changed.
    pub fn update(&mut self, pointer: Vec2, pressed: bool) -> Option<f32> {
        if pressed && self.rect.contains(pointer) {
            self.dragging = true;
        }
        if !pressed {
            self.dragging = false;
        }
        if !self.dragging || !pointer.x.is_finite() {
            return None;
        }

        let value = ((pointer.x - self.rect.x) / self.rect.w).clamp(0.0, 1.0);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(value)
    }

    /// Knob centre in screen space
    pub fn knob(&self) -> Vec2 {
        Vec2::new(self.rect.x + self.value * self.rect.w, self.rect.center().y)
    }

    /// Whole percent for display
    pub fn percent(&self) -> u32 {
        (self.value * 100.0) as u32
    }
}

/// All widgets, laid out for one arena size
#[derive(Debug, Clone, PartialEq)]
pub struct Widgets {
    buttons: Vec<Button>,
    pub volume: VolumeSlider,
}

impl Widgets {
    pub fn layout(arena: Vec2, volume: f32) -> Self {
        let (width, height) = (arena.x, arena.y);
        let row = |total: f32| ((width - total) / 2.0).floor();

        let menu_x = row(BUTTON_WIDTH * 2.0 + BUTTON_SPACING);
        let menu_y = (height / 2.0).floor();

        let end_x = row(NEXT_BUTTON_WIDTH + BUTTON_WIDTH * 2.0 + BUTTON_SPACING * 2.0);
        let end_y = height - END_ROW_OFFSET;
        let pair_x = row(BUTTON_WIDTH * 2.0 + BUTTON_SPACING);
        let second = BUTTON_WIDTH + BUTTON_SPACING;

        let button = |id, x, y, w| Button {
            id,
            rect: Rect::new(x, y, w, BUTTON_HEIGHT),
        };

        let buttons = vec![
            button(WidgetId::Start, menu_x, menu_y, BUTTON_WIDTH),
            button(WidgetId::Quit, menu_x + second, menu_y, BUTTON_WIDTH),
            button(WidgetId::NextLevel, end_x, end_y, NEXT_BUTTON_WIDTH),
            button(
                WidgetId::Replay,
                end_x + NEXT_BUTTON_WIDTH + BUTTON_SPACING,
                end_y,
                BUTTON_WIDTH,
            ),
            button(
                WidgetId::LevelMenu,
                end_x + NEXT_BUTTON_WIDTH + BUTTON_WIDTH + BUTTON_SPACING * 2.0,
                end_y,
                BUTTON_WIDTH,
            ),
            button(WidgetId::Retry, pair_x, end_y, BUTTON_WIDTH),
            button(WidgetId::GameOverMenu, pair_x + second, end_y, BUTTON_WIDTH),
            button(WidgetId::Restart, pair_x, end_y, BUTTON_WIDTH),
            button(WidgetId::FinalMenu, pair_x + second, end_y, BUTTON_WIDTH),
        ];

        let volume = VolumeSlider::new(Rect::new(width - 160.0, 30.0, 150.0, 14.0), volume);

        Self { buttons, volume }
    }

    pub fn button(&self, id: WidgetId) -> Option<&Button> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Buttons visible in a phase, in display order
    pub fn visible(&self, phase: GamePhase, final_level: bool) -> impl Iterator<Item = &Button> {
        buttons_for(phase, final_level)
            .iter()
            .filter_map(|&id| self.button(id))
    }

    /// Visible button under `point`
    pub fn hit_test(&self, point: Vec2, phase: GamePhase, final_level: bool) -> Option<WidgetId> {
        self.visible(phase, final_level)
            .find(|b| b.rect.contains(point))
            .map(|b| b.id)
    }
}
