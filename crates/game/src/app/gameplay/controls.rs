use skybound_engine::{InputAction, InputSnapshot, PointerPhase, Vec2};

pub(crate) const JOYSTICK_MAX_RADIUS: f32 = 25.0;

/// Virtual joystick driven by a single pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Joystick {
    active: bool,
    anchor: Vec2,
    displacement: Vec2,
    max_radius: f32,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            active: false,
            anchor: Vec2::ZERO,
            displacement: Vec2::ZERO,
            max_radius: JOYSTICK_MAX_RADIUS,
        }
    }
}

impl Joystick {
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub(crate) fn displacement(&self) -> Vec2 {
        self.displacement
    }

    pub(crate) fn start(&mut self, position: Vec2) {
        self.active = true;
        self.anchor = position;
        self.displacement = Vec2::ZERO;
    }

    pub(crate) fn move_to(&mut self, position: Vec2) {
        if !self.active {
            return;
        }
        let raw = position - self.anchor;
        let distance = raw.length();
        self.displacement = if distance > self.max_radius {
            raw * (self.max_radius / distance)
        } else {
            raw
        };
    }

    pub(crate) fn end(&mut self) {
        self.active = false;
        self.displacement = Vec2::ZERO;
    }

    /// Displacement scaled so the rim of the joystick is 1.0; zero while inactive.
    pub(crate) fn normalized(&self) -> Vec2 {
        if self.active {
            self.displacement * (1.0 / self.max_radius)
        } else {
            Vec2::ZERO
        }
    }
}

/// -1/0/+1 per axis from the arrow keys.
pub(crate) fn keyboard_axes(input: &InputSnapshot) -> Vec2 {
    let mut axes = Vec2::ZERO;
    if input.is_down(InputAction::MoveUp) {
        axes.y -= 1.0;
    }
    if input.is_down(InputAction::MoveDown) {
        axes.y += 1.0;
    }
    if input.is_down(InputAction::MoveLeft) {
        axes.x -= 1.0;
    }
    if input.is_down(InputAction::MoveRight) {
        axes.x += 1.0;
    }
    axes
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Controls {
    touch_enabled: bool,
    joystick: Joystick,
}

impl Controls {
    pub(crate) fn new(touch_enabled: bool) -> Self {
        Self {
            touch_enabled,
            joystick: Joystick::default(),
        }
    }

    pub(crate) fn touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    pub(crate) fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    /// Feeds this frame's pointer samples to the joystick and returns the merged
    /// movement vector. Keyboard and joystick contributions add up.
    pub(crate) fn movement(&mut self, input: &InputSnapshot) -> Vec2 {
        if self.touch_enabled {
            for event in input.pointer_events() {
                match event.phase {
                    PointerPhase::Start => self.joystick.start(event.position),
                    PointerPhase::Move => self.joystick.move_to(event.position),
                    PointerPhase::End => self.joystick.end(),
                }
            }
        }
        keyboard_axes(input) + self.joystick.normalized()
    }
}

#[cfg(test)]
mod tests {
    use skybound_engine::PointerEvent;

    use super::*;

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < 0.0001 && (actual.y - expected.y).abs() < 0.0001,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn drag_past_the_rim_is_clamped_to_max_radius() {
        let mut joystick = Joystick::default();
        joystick.start(Vec2::new(100.0, 100.0));
        joystick.move_to(Vec2::new(140.0, 100.0));

        assert_close(joystick.displacement(), Vec2::new(25.0, 0.0));
    }

    #[test]
    fn clamping_preserves_direction() {
        let mut joystick = Joystick::default();
        joystick.start(Vec2::new(0.0, 0.0));
        joystick.move_to(Vec2::new(30.0, 40.0));

        let displacement = joystick.displacement();
        assert!((displacement.length() - JOYSTICK_MAX_RADIUS).abs() < 0.0001);
        assert_close(displacement, Vec2::new(15.0, 20.0));
    }

    #[test]
    fn small_drag_is_kept_as_is() {
        let mut joystick = Joystick::default();
        joystick.start(Vec2::new(50.0, 50.0));
        joystick.move_to(Vec2::new(40.0, 60.0));

        assert_close(joystick.displacement(), Vec2::new(-10.0, 10.0));
        assert_close(joystick.normalized(), Vec2::new(-0.4, 0.4));
    }

    #[test]
    fn move_without_start_is_ignored() {
        let mut joystick = Joystick::default();
        joystick.move_to(Vec2::new(10.0, 0.0));

        assert!(!joystick.is_active());
        assert_eq!(joystick.displacement(), Vec2::ZERO);
    }

    #[test]
    fn end_resets_the_joystick() {
        let mut joystick = Joystick::default();
        joystick.start(Vec2::new(5.0, 5.0));
        joystick.move_to(Vec2::new(15.0, 5.0));
        joystick.end();

        assert!(!joystick.is_active());
        assert_eq!(joystick.displacement(), Vec2::ZERO);
        assert_eq!(joystick.normalized(), Vec2::ZERO);
    }

    #[test]
    fn opposite_arrow_keys_cancel_out() {
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveUp, true);

        assert_eq!(keyboard_axes(&input), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn keyboard_and_joystick_contributions_add_up() {
        let mut controls = Controls::new(true);
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_pointer_event(PointerEvent::start(100.0, 100.0))
            .with_pointer_event(PointerEvent::moved(100.0, 150.0));

        assert_close(controls.movement(&input), Vec2::new(1.0, 1.0));
        assert!(controls.joystick().is_active());

        // Still held next frame without new pointer samples.
        assert_close(controls.movement(&InputSnapshot::empty()), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn pointer_events_are_inert_without_touch() {
        let mut controls = Controls::new(false);
        let input = InputSnapshot::empty()
            .with_pointer_event(PointerEvent::start(0.0, 0.0))
            .with_pointer_event(PointerEvent::moved(25.0, 0.0));

        assert_eq!(controls.movement(&input), Vec2::ZERO);
        assert!(!controls.joystick().is_active());
    }

    #[test]
    fn drag_ending_within_a_frame_leaves_no_movement() {
        let mut controls = Controls::new(true);
        let input = InputSnapshot::empty()
            .with_pointer_event(PointerEvent::start(0.0, 0.0))
            .with_pointer_event(PointerEvent::moved(25.0, 0.0))
            .with_pointer_event(PointerEvent::end(25.0, 0.0));

        assert_eq!(controls.movement(&input), Vec2::ZERO);
    }
}
