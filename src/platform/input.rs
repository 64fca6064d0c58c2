//! Per-frame input snapshot types

use glam::Vec2;

/// Keys the game reacts to as discrete presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Start from the menu
    S,
    /// Quit from the menu, back to menu from end screens
    Q,
    /// Replay / retry
    R,
    /// Next level
    Space,
}

/// Held movement keys (WASD or arrows, already merged by the host)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Discrete input events consumed once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window close / quit request
    Quit,
    KeyPressed(Key),
    /// Primary mouse button pressed at a screen position
    Click(Vec2),
}
