use super::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

const ACTION_COUNT: usize = 4;

/// Held state per action, updated on press/release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

/// A single-pointer drag sample in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn start(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Start,
            position: Vec2 { x, y },
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            position: Vec2 { x, y },
        }
    }

    pub fn end(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::End,
            position: Vec2 { x, y },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TouchMode {
    /// Touch input follows the platform: enabled on Android and iOS.
    #[default]
    Auto,
    On,
    Off,
}

impl TouchMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(TouchMode::Auto),
            "on" | "1" | "true" => Some(TouchMode::On),
            "off" | "0" | "false" => Some(TouchMode::Off),
            _ => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        match self {
            TouchMode::Auto => platform_has_touch(),
            TouchMode::On => true,
            TouchMode::Off => false,
        }
    }
}

fn platform_has_touch() -> bool {
    cfg!(any(target_os = "android", target_os = "ios"))
}
