use crate::app::Vec2;

/// World-to-screen mapping: translate by `-origin`, then scale.
///
/// Screen space has its origin at the top-left corner with y growing downwards, the same
/// orientation as world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub origin: Vec2,
    pub scale: f32,
}

impl WorldTransform {
    pub fn new(origin: Vec2, scale: f32) -> Self {
        Self {
            origin,
            scale: normalized_scale(scale),
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> (i32, i32) {
        let x = (world.x - self.origin.x) * self.scale;
        let y = (world.y - self.origin.y) * self.scale;
        (x.round() as i32, y.round() as i32)
    }

    pub fn scale_length(&self, world_length: f32) -> i32 {
        (world_length * self.scale).round() as i32
    }
}

fn normalized_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_screen_top_left() {
        let transform = WorldTransform::new(Vec2::new(40.0, 25.0), 3.0);
        assert_eq!(transform.world_to_screen(Vec2::new(40.0, 25.0)), (0, 0));
    }

    #[test]
    fn camera_offset_is_subtracted_before_scaling() {
        let transform = WorldTransform::new(Vec2::new(10.0, 5.0), 3.0);
        assert_eq!(transform.world_to_screen(Vec2::new(26.0, 21.0)), (48, 48));
        assert_eq!(transform.world_to_screen(Vec2::new(0.0, 0.0)), (-30, -15));
    }

    #[test]
    fn adjacent_tiles_share_edges_at_fractional_camera_offsets() {
        let transform = WorldTransform::new(Vec2::new(3.3, 0.0), 3.0);
        let (left, _) = transform.world_to_screen(Vec2::new(16.0, 0.0));
        let (next, _) = transform.world_to_screen(Vec2::new(32.0, 0.0));
        assert_eq!(next - left, transform.scale_length(16.0));
    }

    #[test]
    fn invalid_scale_falls_back_to_identity() {
        assert_eq!(WorldTransform::new(Vec2::ZERO, 0.0).scale, 1.0);
        assert_eq!(WorldTransform::new(Vec2::ZERO, f32::NAN).scale, 1.0);
    }
}
