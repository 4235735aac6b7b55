mod assets;
mod driver;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod timer;

pub use assets::{AssetError, SpriteImage, SpriteSet, SpriteSource};
pub use input::{ActionStates, InputAction, PointerEvent, PointerPhase, TouchMode};
pub use loop_runner::{run_app, AppError, LoopConfig, TOUCH_ENV_VAR};
pub use rendering::{Canvas, RenderError, Rgba, ScreenPass, SourceRect, WorldPass, WorldTransform};
pub use scene::{DisplayInfo, InputSnapshot, Scene, Vec2};
