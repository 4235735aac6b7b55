use tracing::{info, warn};

use super::assets::{AssetBatch, LoadStatus};
use super::{DisplayInfo, Scene, SpriteSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopPhase {
    Loading,
    Ready,
    Running,
}

enum DriverState {
    Loading(AssetBatch),
    Ready(SpriteSet),
    Running(SpriteSet),
}

/// Loading → Ready → Running.
///
/// Ready is entered exactly once, when every required sprite has arrived; leaving it
/// loads the scene. A failed sprite keeps the driver in Loading for good.
pub(crate) struct LoopDriver {
    state: DriverState,
    stall_reported: bool,
}

impl LoopDriver {
    pub(crate) fn new(assets: AssetBatch) -> Self {
        Self {
            state: DriverState::Loading(assets),
            stall_reported: false,
        }
    }

    pub(crate) fn phase(&self) -> LoopPhase {
        match self.state {
            DriverState::Loading(_) => LoopPhase::Loading,
            DriverState::Ready(_) => LoopPhase::Ready,
            DriverState::Running(_) => LoopPhase::Running,
        }
    }

    /// Takes every transition available this frame and returns the resulting phase.
    pub(crate) fn advance(&mut self, scene: &mut dyn Scene, display: DisplayInfo) -> LoopPhase {
        if let DriverState::Loading(assets) = &mut self.state {
            match assets.poll() {
                LoadStatus::Pending => {}
                LoadStatus::Ready => {
                    let sprites = assets.take_sprites();
                    info!(sprite_count = sprites.len(), "assets_ready");
                    self.state = DriverState::Ready(sprites);
                }
                LoadStatus::Failed => {
                    if !self.stall_reported {
                        self.stall_reported = true;
                        warn!("asset_loading_stalled");
                    }
                }
            }
        }

        if let DriverState::Ready(sprites) = &mut self.state {
            let sprites = std::mem::take(sprites);
            scene.load(display);
            // Bound outside the macro: tracing's `display` helper shadows the local inside it.
            let (width, height, touch_enabled) =
                (display.width, display.height, display.touch_enabled);
            info!(width, height, touch_enabled, "scene_loaded");
            self.state = DriverState::Running(sprites);
        }

        self.phase()
    }

    pub(crate) fn sprites(&self) -> Option<&SpriteSet> {
        match &self.state {
            DriverState::Running(sprites) => Some(sprites),
            _ => None,
        }
    }
}
