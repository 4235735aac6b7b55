use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::AppPaths;

use super::assets::AssetBatch;
use super::driver::LoopDriver;
use super::metrics::MetricsAccumulator;
use super::rendering::{RenderError, Renderer};
use super::timer::IntervalTimer;
use super::{
    ActionStates, DisplayInfo, InputAction, InputSnapshot, PointerEvent, Rgba, Scene,
    SpriteSource, TouchMode, Vec2,
};

pub const TOUCH_ENV_VAR: &str = "SKYBOUND_TOUCH";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Used when the primary monitor size is unknown.
    pub fallback_window_width: u32,
    pub fallback_window_height: u32,
    pub clock_interval: Duration,
    pub metrics_log_interval: Duration,
    pub touch_mode: TouchMode,
    pub sprites: Vec<SpriteSource>,
    pub clear_color: Rgba,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Skybound".to_string(),
            fallback_window_width: 1280,
            fallback_window_height: 720,
            clock_interval: Duration::from_secs(5),
            metrics_log_interval: Duration::from_secs(1),
            touch_mode: TouchMode::Auto,
            sprites: Vec::new(),
            clear_color: Rgba::new(20, 22, 28, 255),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] RenderError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(
    config: LoopConfig,
    paths: &AppPaths,
    mut scene: Box<dyn Scene>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window_size = event_loop
        .primary_monitor()
        .map(|monitor| monitor.size())
        .filter(|size| size.width > 0 && size.height > 0)
        .unwrap_or_else(|| {
            PhysicalSize::new(config.fallback_window_width, config.fallback_window_height)
        });
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(window_size)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer =
        Renderer::new(Arc::clone(&window), config.clear_color).map_err(AppError::CreateRenderer)?;
    let (buffer_width, buffer_height) = renderer.buffer_size();

    let touch_enabled = resolve_touch_mode(config.touch_mode).is_enabled();
    let display = DisplayInfo {
        width: buffer_width,
        height: buffer_height,
        touch_enabled,
    };
    let mut driver = LoopDriver::new(AssetBatch::spawn(&paths.assets_dir, &config.sprites));
    let mut input_collector = InputCollector::new(touch_enabled);
    let mut clock = IntervalTimer::new(config.clock_interval);
    clock.arm(Instant::now());
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval, Instant::now());
    let mut last_frame_instant = Instant::now();

    info!(
        root = %paths.root.display(),
        assets_dir = %paths.assets_dir.display(),
        buffer_width,
        buffer_height,
        "startup"
    );
    info!(
        clock_interval_ms = config.clock_interval.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        touch_enabled,
        sprite_count = config.sprites.len(),
        "loop_config"
    );
    info!("clock_started");

    event_loop.set_control_flow(ControlFlow::Poll);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize_surface(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                }
                WindowEvent::Touch(touch) => {
                    input_collector.handle_touch(&touch);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.handle_cursor_moved(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let phase = driver.advance(&mut *scene, display);
                    let input = input_collector.snapshot_for_frame();
                    let drawn = match driver.sprites() {
                        Some(sprites) => {
                            scene.update(&input);
                            renderer.render_scene(&*scene, sprites)
                        }
                        None => renderer.render_loading(),
                    };
                    if let Err(error) = drawn {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }

                    metrics_accumulator.record_frame(frame_dt);
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            clock_ticks = snapshot.clock_ticks,
                            phase = ?phase,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let due = dispatch_clock_ticks(&mut clock, &mut *scene, Instant::now());
                metrics_accumulator.record_clock_ticks(due);
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerSource {
    Mouse,
    Touch(u64),
}

/// Translates window events into per-frame input.
///
/// Pointer input only exists when touch is enabled. One drag is tracked at a time: the
/// first finger down (or the left mouse button) owns it until it lifts.
#[derive(Debug, Default)]
struct InputCollector {
    touch_enabled: bool,
    action_states: ActionStates,
    cursor_position_px: Option<Vec2>,
    active_pointer: Option<PointerSource>,
    pointer_events: Vec<PointerEvent>,
}

impl InputCollector {
    fn new(touch_enabled: bool) -> Self {
        Self {
            touch_enabled,
            ..Self::default()
        }
    }

    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let action = match key {
            PhysicalKey::Code(KeyCode::ArrowUp) => InputAction::MoveUp,
            PhysicalKey::Code(KeyCode::ArrowDown) => InputAction::MoveDown,
            PhysicalKey::Code(KeyCode::ArrowLeft) => InputAction::MoveLeft,
            PhysicalKey::Code(KeyCode::ArrowRight) => InputAction::MoveRight,
            _ => return,
        };
        self.action_states.set(action, is_pressed);
    }

    fn handle_touch(&mut self, touch: &Touch) {
        self.handle_touch_phase(
            touch.id,
            touch.phase,
            touch.location.x as f32,
            touch.location.y as f32,
        );
    }

    fn handle_touch_phase(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) {
        let source = PointerSource::Touch(id);
        match phase {
            TouchPhase::Started => self.begin_pointer(source, x, y),
            TouchPhase::Moved => self.move_pointer(source, x, y),
            TouchPhase::Ended | TouchPhase::Cancelled => self.end_pointer(source, x, y),
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some(Vec2 { x, y });
        self.move_pointer(PointerSource::Mouse, x, y);
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        let Some(cursor) = self.cursor_position_px else {
            return;
        };
        match state {
            ElementState::Pressed => self.begin_pointer(PointerSource::Mouse, cursor.x, cursor.y),
            ElementState::Released => self.end_pointer(PointerSource::Mouse, cursor.x, cursor.y),
        }
    }

    fn begin_pointer(&mut self, source: PointerSource, x: f32, y: f32) {
        if !self.touch_enabled || self.active_pointer.is_some() {
            return;
        }
        self.active_pointer = Some(source);
        self.pointer_events.push(PointerEvent::start(x, y));
    }

    fn move_pointer(&mut self, source: PointerSource, x: f32, y: f32) {
        if self.active_pointer == Some(source) {
            self.pointer_events.push(PointerEvent::moved(x, y));
        }
    }

    fn end_pointer(&mut self, source: PointerSource, x: f32, y: f32) {
        if self.active_pointer == Some(source) {
            self.active_pointer = None;
            self.pointer_events.push(PointerEvent::end(x, y));
        }
    }

    /// Pointer events are drained; held keys carry over to the next frame.
    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        InputSnapshot::new(self.action_states, std::mem::take(&mut self.pointer_events))
    }
}

/// Delivers every elapsed clock interval to the scene, whatever phase the driver is in.
fn dispatch_clock_ticks(clock: &mut IntervalTimer, scene: &mut dyn Scene, now: Instant) -> u32 {
    let due = clock.poll(now);
    for _ in 0..due {
        scene.clock_tick();
    }
    due
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn resolve_touch_mode(config_mode: TouchMode) -> TouchMode {
    match env::var(TOUCH_ENV_VAR) {
        Ok(value) => touch_mode_override(&value, config_mode),
        Err(env::VarError::NotPresent) => config_mode,
        Err(err) => {
            warn!(
                env_var = TOUCH_ENV_VAR,
                error = %err,
                "unable to read touch env var; falling back to config"
            );
            config_mode
        }
    }
}

fn touch_mode_override(raw: &str, config_mode: TouchMode) -> TouchMode {
    match TouchMode::parse(raw) {
        Some(mode) => mode,
        None => {
            warn!(
                env_var = TOUCH_ENV_VAR,
                value = raw,
                "invalid touch env var value; falling back to config"
            );
            config_mode
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Canvas, PointerPhase, SpriteSet};

    #[derive(Default)]
    struct TickCounter {
        loaded: bool,
        ticks_before_load: u32,
        ticks: u32,
    }

    impl Scene for TickCounter {
        fn load(&mut self, _display: DisplayInfo) {
            self.loaded = true;
        }

        fn update(&mut self, _input: &InputSnapshot) {}

        fn clock_tick(&mut self) {
            if !self.loaded {
                self.ticks_before_load += 1;
            }
            self.ticks += 1;
        }

        fn render(&self, _canvas: &mut Canvas<'_>, _sprites: &SpriteSet) {}
    }

    fn phases(snapshot: &InputSnapshot) -> Vec<PointerPhase> {
        snapshot
            .pointer_events()
            .iter()
            .map(|event| event.phase)
            .collect()
    }

    #[test]
    fn arrow_keys_map_to_move_actions() {
        let mut input = InputCollector::new(false);

        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowUp), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowLeft), true);

        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveRight));
    }

    #[test]
    fn key_release_clears_action_state() {
        let mut input = InputCollector::new(false);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowRight), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowRight), false);

        assert!(!input.snapshot_for_frame().is_down(InputAction::MoveRight));
    }

    #[test]
    fn held_keys_persist_across_snapshots() {
        let mut input = InputCollector::new(false);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowDown), true);

        assert!(input.snapshot_for_frame().is_down(InputAction::MoveDown));
        assert!(input.snapshot_for_frame().is_down(InputAction::MoveDown));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = InputCollector::new(false);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyW), true);

        assert_eq!(input.snapshot_for_frame().actions(), ActionStates::default());
    }

    #[test]
    fn touch_events_are_dropped_without_touch_support() {
        let mut input = InputCollector::new(false);
        input.handle_touch_phase(1, TouchPhase::Started, 10.0, 10.0);
        input.handle_touch_phase(1, TouchPhase::Moved, 20.0, 10.0);
        input.handle_touch_phase(1, TouchPhase::Ended, 20.0, 10.0);

        assert!(input.snapshot_for_frame().pointer_events().is_empty());
    }

    #[test]
    fn touch_drag_produces_ordered_pointer_events() {
        let mut input = InputCollector::new(true);
        input.handle_touch_phase(7, TouchPhase::Started, 100.0, 100.0);
        input.handle_touch_phase(7, TouchPhase::Moved, 140.0, 100.0);

        let snapshot = input.snapshot_for_frame();
        assert_eq!(phases(&snapshot), vec![PointerPhase::Start, PointerPhase::Move]);
        assert_eq!(snapshot.pointer_events()[1].position, Vec2::new(140.0, 100.0));

        input.handle_touch_phase(7, TouchPhase::Ended, 140.0, 100.0);
        assert_eq!(phases(&input.snapshot_for_frame()), vec![PointerPhase::End]);
        assert!(input.snapshot_for_frame().pointer_events().is_empty());
    }

    #[test]
    fn second_finger_is_ignored_while_first_is_down() {
        let mut input = InputCollector::new(true);
        input.handle_touch_phase(1, TouchPhase::Started, 0.0, 0.0);
        input.handle_touch_phase(2, TouchPhase::Started, 50.0, 50.0);
        input.handle_touch_phase(2, TouchPhase::Moved, 60.0, 50.0);
        input.handle_touch_phase(2, TouchPhase::Ended, 60.0, 50.0);
        input.handle_touch_phase(1, TouchPhase::Moved, 5.0, 0.0);

        assert_eq!(
            phases(&input.snapshot_for_frame()),
            vec![PointerPhase::Start, PointerPhase::Move]
        );
    }

    #[test]
    fn cancelled_touch_ends_the_drag() {
        let mut input = InputCollector::new(true);
        input.handle_touch_phase(3, TouchPhase::Started, 0.0, 0.0);
        input.handle_touch_phase(3, TouchPhase::Cancelled, 0.0, 0.0);

        assert_eq!(
            phases(&input.snapshot_for_frame()),
            vec![PointerPhase::Start, PointerPhase::End]
        );
    }

    #[test]
    fn left_mouse_drag_emulates_touch() {
        let mut input = InputCollector::new(true);
        input.handle_cursor_moved(10.0, 10.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.handle_cursor_moved(30.0, 10.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        input.handle_cursor_moved(50.0, 10.0);

        let snapshot = input.snapshot_for_frame();
        assert_eq!(
            phases(&snapshot),
            vec![PointerPhase::Start, PointerPhase::Move, PointerPhase::End]
        );
        assert_eq!(snapshot.pointer_events()[0].position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn mouse_press_without_known_cursor_is_ignored() {
        let mut input = InputCollector::new(true);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);

        assert!(input.snapshot_for_frame().pointer_events().is_empty());
    }

    #[test]
    fn right_mouse_button_does_not_drag() {
        let mut input = InputCollector::new(true);
        input.handle_cursor_moved(10.0, 10.0);
        input.handle_mouse_input(MouseButton::Right, ElementState::Pressed);

        assert!(input.snapshot_for_frame().pointer_events().is_empty());
    }

    #[test]
    fn touch_override_parses_or_falls_back() {
        assert_eq!(touch_mode_override("on", TouchMode::Off), TouchMode::On);
        assert_eq!(touch_mode_override("bogus", TouchMode::Off), TouchMode::Off);
    }

    #[test]
    fn zero_metrics_interval_falls_back() {
        assert_eq!(
            normalize_non_zero_duration(Duration::ZERO, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(250), Duration::from_secs(1)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn clock_ticks_reach_the_scene_before_it_has_loaded() {
        let started = Instant::now();
        let mut clock = IntervalTimer::new(Duration::from_secs(5));
        clock.arm(started);
        let mut scene = TickCounter::default();

        let due = dispatch_clock_ticks(&mut clock, &mut scene, started + Duration::from_secs(11));
        assert_eq!(due, 2);
        assert_eq!(scene.ticks_before_load, 2);

        scene.load(DisplayInfo {
            width: 320,
            height: 240,
            touch_enabled: false,
        });
        dispatch_clock_ticks(&mut clock, &mut scene, started + Duration::from_secs(15));
        assert_eq!(scene.ticks, 3);
        assert_eq!(scene.ticks_before_load, 2);
    }
}
