//! Sprite loading.
//!
//! Each required image is decoded on its own loader thread. The event-loop thread polls
//! the handles; a batch completes only once every image has arrived.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to open image '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("loader thread for '{path}' exited without a result")]
    LoaderLost { path: PathBuf },
}

/// Decoded RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl SpriteImage {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected_len).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(out)
    }
}

/// A sprite the loop must load before the scene becomes interactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSource {
    pub key: &'static str,
    pub relative_path: PathBuf,
}

impl SpriteSource {
    pub fn new(key: &'static str, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            key,
            relative_path: relative_path.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    sprites: HashMap<&'static str, SpriteImage>,
}

impl SpriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, sprite: SpriteImage) {
        self.sprites.insert(key, sprite);
    }

    pub fn get(&self, key: &str) -> Option<&SpriteImage> {
        self.sprites.get(key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadStatus {
    Pending,
    Ready,
    Failed,
}

enum ImageLoad {
    Pending {
        path: PathBuf,
        receiver: Receiver<Result<SpriteImage, AssetError>>,
    },
    Ready(SpriteImage),
    Failed,
}

impl ImageLoad {
    fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("sprite-loader".to_string())
            .spawn(move || {
                // The receiver may already be gone during shutdown.
                let _ = sender.send(load_sprite_rgba(&worker_path));
            });

        match spawned {
            Ok(_) => ImageLoad::Pending { path, receiver },
            Err(error) => {
                warn!(error = %error, path = %path.display(), "sprite_loader_spawn_failed_loading_inline");
                Self::from_outcome(load_sprite_rgba(&path))
            }
        }
    }

    fn poll(&mut self) -> LoadStatus {
        if let ImageLoad::Pending { path, receiver } = self {
            let outcome = match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return LoadStatus::Pending,
                Err(TryRecvError::Disconnected) => {
                    Err(AssetError::LoaderLost { path: path.clone() })
                }
            };
            *self = Self::from_outcome(outcome);
        }

        match self {
            ImageLoad::Pending { .. } => LoadStatus::Pending,
            ImageLoad::Ready(_) => LoadStatus::Ready,
            ImageLoad::Failed => LoadStatus::Failed,
        }
    }

    fn from_outcome(outcome: Result<SpriteImage, AssetError>) -> Self {
        match outcome {
            Ok(sprite) => ImageLoad::Ready(sprite),
            Err(error) => {
                warn!(error = %error, "asset_load_failed");
                ImageLoad::Failed
            }
        }
    }
}

/// The join of every required image load.
#[derive(Default)]
pub(crate) struct AssetBatch {
    loads: Vec<(&'static str, ImageLoad)>,
}

impl AssetBatch {
    pub(crate) fn spawn(asset_root: &Path, sources: &[SpriteSource]) -> Self {
        let loads = sources
            .iter()
            .map(|source| {
                let path = asset_root.join(&source.relative_path);
                debug!(sprite_key = source.key, path = %path.display(), "asset_load_started");
                (source.key, ImageLoad::spawn(path))
            })
            .collect();
        Self { loads }
    }

    /// Failed wins over pending: once any image fails the batch can never complete.
    pub(crate) fn poll(&mut self) -> LoadStatus {
        let mut status = LoadStatus::Ready;
        for (_, load) in &mut self.loads {
            match load.poll() {
                LoadStatus::Failed => status = LoadStatus::Failed,
                LoadStatus::Pending if status == LoadStatus::Ready => {
                    status = LoadStatus::Pending
                }
                _ => {}
            }
        }
        status
    }

    /// Moves every loaded image out of the batch.
    pub(crate) fn take_sprites(&mut self) -> SpriteSet {
        let mut set = SpriteSet::new();
        for (key, load) in self.loads.drain(..) {
            if let ImageLoad::Ready(sprite) = load {
                set.insert(key, sprite);
            }
        }
        set
    }
}

fn load_sprite_rgba(path: &Path) -> Result<SpriteImage, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(SpriteImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::time::{Duration, Instant};

    use image::{Rgba, RgbaImage};

    use super::{AssetBatch, LoadStatus};

    pub(crate) fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("png parent dir");
        }
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(path)
            .expect("write png fixture");
    }

    pub(crate) fn poll_until_settled(batch: &mut AssetBatch) -> LoadStatus {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let status = batch.poll();
            if status != LoadStatus::Pending || Instant::now() > deadline {
                return status;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
