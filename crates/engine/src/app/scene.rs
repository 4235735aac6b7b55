use std::ops::{Add, Mul, Sub};

use super::assets::SpriteSet;
use super::input::{ActionStates, InputAction, PointerEvent};
use super::rendering::Canvas;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Input gathered since the previous frame.
///
/// Held keys are a level snapshot; pointer events are every drag sample in arrival order.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    pointer_events: Vec<PointerEvent>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates, pointer_events: Vec<PointerEvent>) -> Self {
        Self {
            actions,
            pointer_events,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn actions(&self) -> ActionStates {
        self.actions
    }

    pub fn pointer_events(&self) -> &[PointerEvent] {
        &self.pointer_events
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_pointer_event(mut self, event: PointerEvent) -> Self {
        self.pointer_events.push(event);
        self
    }
}

/// Display facts a scene needs when it becomes interactive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayInfo {
    pub width: u32,
    pub height: u32,
    pub touch_enabled: bool,
}

pub trait Scene {
    /// Called exactly once, after every required sprite has loaded and before the first
    /// `update`.
    fn load(&mut self, display: DisplayInfo);
    fn update(&mut self, input: &InputSnapshot);
    /// Called once per elapsed clock interval from process start, including while sprites
    /// are still loading and `load` has not run yet.
    fn clock_tick(&mut self);
    fn render(&self, canvas: &mut Canvas<'_>, sprites: &SpriteSet);
}
