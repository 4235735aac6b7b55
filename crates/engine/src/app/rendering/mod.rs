mod canvas;
mod renderer;
mod text;
mod transform;

pub use canvas::{Canvas, Rgba, ScreenPass, SourceRect, WorldPass};
pub use renderer::RenderError;
pub(crate) use renderer::Renderer;
pub use transform::WorldTransform;
