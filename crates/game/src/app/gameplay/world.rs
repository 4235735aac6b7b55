use skybound_engine::Vec2;

pub(crate) const TILE_SIZE: f64 = 16.0;
pub(crate) const MAP_WIDTH_TILES: u32 = 60;
pub(crate) const MAP_HEIGHT_TILES: u32 = 40;
pub(crate) const ZOOM: f64 = 3.0;

const PLAYER_START_TILE: (u32, u32) = (10, 10);
const PLAYER_SPEED: f64 = 1.5;

/// World-space pair kept in double precision so saved coordinates round-trip unchanged.
/// Narrowed to [`Vec2`] only at the renderer boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct WorldPoint {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl WorldPoint {
    pub(crate) const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    pub(crate) const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

pub(crate) fn world_size_px() -> WorldPoint {
    WorldPoint::new(
        f64::from(MAP_WIDTH_TILES) * TILE_SIZE,
        f64::from(MAP_HEIGHT_TILES) * TILE_SIZE,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Player {
    /// Top-left corner in world pixels.
    pub(crate) position: WorldPoint,
    pub(crate) size: WorldPoint,
    pub(crate) speed: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: WorldPoint::new(
                f64::from(PLAYER_START_TILE.0) * TILE_SIZE,
                f64::from(PLAYER_START_TILE.1) * TILE_SIZE,
            ),
            size: WorldPoint::new(TILE_SIZE, TILE_SIZE),
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    /// Moves by `movement * speed`, then clamps the position to the world extent.
    ///
    /// The upper bound is the full world size, not world size minus player size, so the
    /// sprite can hang one tile past the right and bottom edges.
    pub(crate) fn advance(&mut self, movement: Vec2) {
        self.position.x += f64::from(movement.x) * self.speed;
        self.position.y += f64::from(movement.y) * self.speed;
        self.clamp_to_world();
    }

    pub(crate) fn clamp_to_world(&mut self) {
        let world = world_size_px();
        self.position.x = clamp_axis(self.position.x, world.x);
        self.position.y = clamp_axis(self.position.y, world.y);
    }
}

fn clamp_axis(value: f64, upper: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.min(upper).max(0.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Camera {
    pub(crate) position: WorldPoint,
    pub(crate) viewport: WorldPoint,
}

impl Camera {
    pub(crate) fn for_display(width: u32, height: u32) -> Self {
        Self {
            position: WorldPoint::ZERO,
            viewport: WorldPoint::new(f64::from(width) / ZOOM, f64::from(height) / ZOOM),
        }
    }

    /// Centers on the player's top-left corner, then clamps so the viewport stays inside
    /// the world. A viewport larger than the world on an axis pins that axis to 0.
    pub(crate) fn follow(&mut self, player: &Player) {
        let world = world_size_px();
        let centered_x = player.position.x - self.viewport.x * 0.5;
        let centered_y = player.position.y - self.viewport.y * 0.5;
        self.position = WorldPoint::new(
            clamp_axis(centered_x, world.x - self.viewport.x),
            clamp_axis(centered_y, world.y - self.viewport.y),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.0001,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn player_starts_at_tile_ten_ten() {
        let player = Player::default();
        assert_eq!(player.position, WorldPoint::new(160.0, 160.0));
        assert_eq!(player.size, WorldPoint::new(16.0, 16.0));
        assert_eq!(player.speed, 1.5);
    }

    #[test]
    fn moving_right_once_adds_speed_to_x() {
        let mut player = Player::default();
        player.advance(Vec2::new(1.0, 0.0));

        assert_eq!(player.position, WorldPoint::new(161.5, 160.0));
    }

    #[test]
    fn fractional_speed_accumulates_in_double_precision() {
        let mut player = Player::default();
        player.speed = 0.1;
        let mut expected = player.position.x;
        for _ in 0..7 {
            player.advance(Vec2::new(1.0, 0.0));
            expected += 0.1;
        }

        assert_eq!(player.position.x, expected);
    }

    #[test]
    fn player_is_clamped_to_full_world_extent() {
        let mut player = Player::default();
        for _ in 0..2_000 {
            player.advance(Vec2::new(1.0, 1.0));
            assert!(player.position.x >= 0.0 && player.position.x <= 960.0);
            assert!(player.position.y >= 0.0 && player.position.y <= 640.0);
        }
        assert_eq!(player.position, WorldPoint::new(960.0, 640.0));

        player.advance(Vec2::new(-5_000.0, -5_000.0));
        assert_eq!(player.position, WorldPoint::ZERO);
    }

    #[test]
    fn camera_centers_on_player_when_room_allows() {
        let mut camera = Camera::for_display(300, 150);
        camera.follow(&Player::default());

        assert_close(camera.position.x, 160.0 - 50.0);
        assert_close(camera.position.y, 160.0 - 25.0);
    }

    #[test]
    fn camera_never_shows_outside_the_world() {
        let mut camera = Camera::for_display(600, 300);
        let mut player = Player::default();

        player.position = WorldPoint::ZERO;
        camera.follow(&player);
        assert_eq!(camera.position, WorldPoint::ZERO);

        player.position = WorldPoint::new(960.0, 640.0);
        camera.follow(&player);
        assert_close(camera.position.x, 960.0 - 200.0);
        assert_close(camera.position.y, 640.0 - 100.0);
    }

    #[test]
    fn oversized_viewport_pins_camera_to_origin() {
        let mut camera = Camera::for_display(3_600, 600);
        let mut player = Player::default();
        player.position = WorldPoint::new(900.0, 600.0);
        camera.follow(&player);

        assert_close(camera.position.x, 0.0);
        assert_close(camera.position.y, 640.0 - 200.0);
    }
}
