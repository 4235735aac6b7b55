use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture, TextureError};
use thiserror::Error;
use winit::window::Window;

use crate::app::{Scene, SpriteSet};

use super::{Canvas, Rgba};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel surface failed: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("surface resize failed: {0}")]
    Texture(#[from] TextureError),
}

/// Presents a fixed-size RGBA frame buffer through `pixels`.
///
/// The buffer keeps the size it was created with; window resizes only rescale the
/// surface it is stretched onto.
pub(crate) struct Renderer {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    clear_color: Rgba,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, clear_color: Rgba) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
        let surface = SurfaceTexture::new(width, height, window);
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            pixels,
            width,
            height,
            clear_color,
        })
    }

    pub(crate) fn buffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    pub(crate) fn render_loading(&mut self) -> Result<(), RenderError> {
        let mut canvas = Canvas::new(self.pixels.frame_mut(), self.width, self.height);
        canvas.clear(self.clear_color);
        self.pixels.render()?;
        Ok(())
    }

    pub(crate) fn render_scene(
        &mut self,
        scene: &dyn Scene,
        sprites: &SpriteSet,
    ) -> Result<(), RenderError> {
        let mut canvas = Canvas::new(self.pixels.frame_mut(), self.width, self.height);
        scene.render(&mut canvas, sprites);
        self.pixels.render()?;
        Ok(())
    }
}
