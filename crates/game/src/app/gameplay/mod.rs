mod clock;
mod controls;
mod persistence;
mod render;
mod world;

use skybound_engine::{
    Canvas, DisplayInfo, InputSnapshot, KeyValueStore, Scene, SpriteSet, SpriteSource,
};
use tracing::{debug, info, warn};

use self::clock::DayClock;
use self::controls::Controls;
use self::persistence::PersistenceError;
use self::render::FrameView;
use self::world::{Camera, Player};

pub(crate) const TILESET_SPRITE_KEY: &str = "tileset";
pub(crate) const PLAYER_SPRITE_KEY: &str = "player";

/// Sprites that must load before the scene becomes interactive.
pub(crate) fn required_sprites() -> Vec<SpriteSource> {
    vec![
        SpriteSource::new(TILESET_SPRITE_KEY, "tilesets/tilesets.png"),
        SpriteSource::new(PLAYER_SPRITE_KEY, "characters/player.png"),
    ]
}

/// The whole game state. Owned by the event loop and only touched from its thread.
pub(crate) struct SkyboundScene<S> {
    store: S,
    player: Player,
    camera: Camera,
    clock: DayClock,
    controls: Controls,
    /// False until `load` has merged the saved record. Ticks before that still count days
    /// but must not overwrite the save with defaults.
    loaded: bool,
}

impl<S: KeyValueStore> SkyboundScene<S> {
    pub(crate) fn new(store: S) -> Self {
        Self {
            store,
            player: Player::default(),
            camera: Camera::default(),
            clock: DayClock::default(),
            controls: Controls::default(),
            loaded: false,
        }
    }

    fn restore_saved_state(&mut self) {
        match persistence::load(&self.store) {
            Ok(Some(record)) => {
                record.apply(&mut self.player, &mut self.clock);
                info!(
                    day = self.clock.day(),
                    x = self.player.position.x,
                    y = self.player.position.y,
                    "save_loaded"
                );
            }
            Ok(None) => info!("save_absent"),
            Err(error @ PersistenceError::Decode { .. }) => {
                warn!(error = %error, "save_parse_failed");
            }
            Err(error) => warn!(error = %error, "save_read_failed"),
        }
    }

    fn save(&mut self) {
        match persistence::save(&mut self.store, &self.player, &self.clock) {
            Ok(()) => debug!(day = self.clock.day(), "save_written"),
            Err(error) => warn!(day = self.clock.day(), error = %error, "save_failed"),
        }
    }
}

impl<S: KeyValueStore> Scene for SkyboundScene<S> {
    fn load(&mut self, display: DisplayInfo) {
        self.camera = Camera::for_display(display.width, display.height);
        self.controls = Controls::new(display.touch_enabled);
        self.restore_saved_state();
        self.camera.follow(&self.player);
        self.loaded = true;
    }

    fn update(&mut self, input: &InputSnapshot) {
        let movement = self.controls.movement(input);
        self.player.advance(movement);
        self.camera.follow(&self.player);
    }

    fn clock_tick(&mut self) {
        let day = self.clock.tick();
        info!(day, "day_advanced");
        if self.loaded {
            self.save();
        } else {
            debug!(day, "save_deferred");
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, sprites: &SpriteSet) {
        let view = FrameView {
            player: &self.player,
            camera: &self.camera,
            day: self.clock.day(),
            joystick: self
                .controls
                .touch_enabled()
                .then(|| self.controls.joystick()),
        };
        render::draw_frame(canvas, sprites, &view);
    }
}
