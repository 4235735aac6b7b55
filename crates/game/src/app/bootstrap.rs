use skybound_engine::{
    resolve_app_paths, AppPaths, FileKeyValueStore, LoopConfig, Scene, StartupError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, SkyboundScene};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) paths: AppPaths,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Skybound Startup ===");

    let paths = resolve_app_paths()?;
    let store = FileKeyValueStore::new(paths.saves_dir.clone());
    info!(saves_dir = %store.dir().display(), "save_store_ready");

    let config = LoopConfig {
        sprites: gameplay::required_sprites(),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        paths,
        scene: Box::new(SkyboundScene::new(store)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
