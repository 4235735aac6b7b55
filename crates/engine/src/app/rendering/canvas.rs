//! Software raster target and the two scoped drawing passes.
//!
//! A [`WorldPass`] owns a [`WorldTransform`] for as long as it lives; a [`ScreenPass`]
//! draws in raw frame pixels. Passes only exist inside the closure handed to
//! [`Canvas::world_pass`] / [`Canvas::screen_pass`], so a transform can never leak into
//! screen-space drawing.

use crate::app::{SpriteImage, Vec2};

use super::text;
use super::WorldTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha set from an opacity in `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a: alpha, ..self }
    }

    fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Pixel rectangle inside a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn full(sprite: &SpriteImage) -> Self {
        Self::new(0, 0, sprite.width(), sprite.height())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

pub struct Canvas<'f> {
    frame: &'f mut [u8],
    width: u32,
    height: u32,
}

impl<'f> Canvas<'f> {
    /// `frame` is tightly packed RGBA8, `width * height * 4` bytes.
    pub fn new(frame: &'f mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        let bytes = [color.r, color.g, color.b, color.a];
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&bytes);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let offset = self.byte_offset(x as i32, y as i32)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(Rgba::from_bytes(bytes))
    }

    pub fn world_pass<R>(
        &mut self,
        transform: WorldTransform,
        draw: impl FnOnce(&mut WorldPass<'_, 'f>) -> R,
    ) -> R {
        let mut pass = WorldPass {
            canvas: self,
            transform,
        };
        draw(&mut pass)
    }

    pub fn screen_pass<R>(&mut self, draw: impl FnOnce(&mut ScreenPass<'_, 'f>) -> R) -> R {
        let mut pass = ScreenPass { canvas: self };
        draw(&mut pass)
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let byte_offset = pixel_offset.checked_mul(4)?;
        (byte_offset.checked_add(4)? <= self.frame.len()).then_some(byte_offset)
    }

    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        let dst = &mut self.frame[offset..offset + 4];
        if color.a == u8::MAX {
            dst.copy_from_slice(&[color.r, color.g, color.b, color.a]);
            return;
        }

        let alpha = color.a as u32;
        let inv_alpha = 255 - alpha;
        dst[0] = blend_channel(color.r, dst[0], alpha, inv_alpha);
        dst[1] = blend_channel(color.g, dst[1], alpha, inv_alpha);
        dst[2] = blend_channel(color.b, dst[2], alpha, inv_alpha);
        dst[3] = (alpha + (dst[3] as u32 * inv_alpha + 127) / 255).min(255) as u8;
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) {
        let start_x = rect.x.max(0);
        let start_y = rect.y.max(0);
        let end_x = rect.x.saturating_add(rect.width).min(self.width as i32);
        let end_y = rect.y.saturating_add(rect.height).min(self.height as i32);
        for y in start_y..end_y {
            for x in start_x..end_x {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let radius_sq = radius * radius;
        let min_x = ((center.x - radius).floor() as i32).max(0);
        let max_x = ((center.x + radius).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((center.y - radius).floor() as i32).max(0);
        let max_y = ((center.y + radius).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            let dy = y as f32 + 0.5 - center.y;
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Nearest-neighbour copy of `src` from `sprite` into `dest`.
    fn blit(&mut self, sprite: &SpriteImage, src: SourceRect, dest: ScreenRect) {
        if dest.width <= 0 || dest.height <= 0 || src.width == 0 || src.height == 0 {
            return;
        }
        let draw_left = dest.x.max(0);
        let draw_top = dest.y.max(0);
        let draw_right = dest.x.saturating_add(dest.width).min(self.width as i32);
        let draw_bottom = dest.y.saturating_add(dest.height).min(self.height as i32);
        if draw_left >= draw_right || draw_top >= draw_bottom {
            return;
        }

        for out_y in draw_top..draw_bottom {
            let dy = (out_y - dest.y) as u64;
            let src_y = src.y as u64 + dy * src.height as u64 / dest.height as u64;
            for out_x in draw_left..draw_right {
                let dx = (out_x - dest.x) as u64;
                let src_x = src.x as u64 + dx * src.width as u64 / dest.width as u64;
                let Some(texel) = sprite.pixel(src_x as u32, src_y as u32) else {
                    continue;
                };
                self.blend_pixel(out_x, out_y, Rgba::from_bytes(texel));
            }
        }
    }
}

fn blend_channel(src: u8, dst: u8, alpha: u32, inv_alpha: u32) -> u8 {
    ((src as u32 * alpha + dst as u32 * inv_alpha + 127) / 255) as u8
}

/// Drawing in world units through a camera transform.
pub struct WorldPass<'c, 'f> {
    canvas: &'c mut Canvas<'f>,
    transform: WorldTransform,
}

impl WorldPass<'_, '_> {
    /// Draws `src` of `sprite` with its top-left corner at `world_position`, stretched to
    /// `world_size`.
    pub fn draw_sprite(
        &mut self,
        sprite: &SpriteImage,
        src: SourceRect,
        world_position: Vec2,
        world_size: Vec2,
    ) {
        let (x, y) = self.transform.world_to_screen(world_position);
        let dest = ScreenRect {
            x,
            y,
            width: self.transform.scale_length(world_size.x),
            height: self.transform.scale_length(world_size.y),
        };
        self.canvas.blit(sprite, src, dest);
    }
}

/// Drawing in raw frame pixels.
pub struct ScreenPass<'c, 'f> {
    canvas: &'c mut Canvas<'f>,
}

impl ScreenPass<'_, '_> {
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba) {
        self.canvas.fill_rect(
            ScreenRect {
                x,
                y,
                width,
                height,
            },
            color,
        );
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.canvas.fill_circle(center, radius, color);
    }

    /// Draws `text` with its top-left corner at `(x, y)`; each font pixel becomes a
    /// `scale`×`scale` block.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgba) {
        text::draw_text(self.canvas, x, y, text, scale, color);
    }
}
