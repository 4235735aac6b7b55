use skybound_engine::{
    Canvas, Rgba, ScreenPass, SourceRect, SpriteSet, Vec2, WorldPass, WorldTransform,
};

use super::controls::Joystick;
use super::world::{Camera, Player, MAP_HEIGHT_TILES, MAP_WIDTH_TILES, TILE_SIZE, ZOOM};
use super::{PLAYER_SPRITE_KEY, TILESET_SPRITE_KEY};

const BACKGROUND: Rgba = Rgba::new(0, 0, 0, 255);
const TILE_SOURCE: SourceRect = SourceRect::new(0, 0, 16, 16);

const HUD_PANEL: (i32, i32, i32, i32) = (10, 10, 120, 30);
const HUD_PANEL_OPACITY: f32 = 0.5;
const HUD_TEXT_ORIGIN: (i32, i32) = (20, 20);
const HUD_TEXT_SCALE: u32 = 2;

const JOYSTICK_BASE_RADIUS: f32 = 30.0;
const JOYSTICK_BASE_OPACITY: f32 = 0.2;
const JOYSTICK_KNOB_RADIUS: f32 = 15.0;
const JOYSTICK_KNOB_OPACITY: f32 = 0.6;

/// Read-only view of the scene for one frame.
pub(crate) struct FrameView<'a> {
    pub(crate) player: &'a Player,
    pub(crate) camera: &'a Camera,
    pub(crate) day: u32,
    /// `None` unless touch is enabled.
    pub(crate) joystick: Option<&'a Joystick>,
}

pub(crate) fn draw_frame(canvas: &mut Canvas<'_>, sprites: &SpriteSet, view: &FrameView<'_>) {
    canvas.clear(BACKGROUND);

    let transform = WorldTransform::new(view.camera.position.to_vec2(), ZOOM as f32);
    canvas.world_pass(transform, |pass| {
        draw_map(pass, sprites);
        draw_player(pass, sprites, view.player);
    });

    canvas.screen_pass(|pass| {
        draw_hud(pass, view.day);
        if let Some(joystick) = view.joystick {
            draw_joystick(pass, joystick);
        }
    });
}

fn draw_map(pass: &mut WorldPass<'_, '_>, sprites: &SpriteSet) {
    let Some(tileset) = sprites.get(TILESET_SPRITE_KEY) else {
        return;
    };
    let tile_size = TILE_SIZE as f32;
    let tile = Vec2::new(tile_size, tile_size);
    for row in 0..MAP_HEIGHT_TILES {
        for col in 0..MAP_WIDTH_TILES {
            let position = Vec2::new(col as f32 * tile_size, row as f32 * tile_size);
            pass.draw_sprite(tileset, TILE_SOURCE, position, tile);
        }
    }
}

fn draw_player(pass: &mut WorldPass<'_, '_>, sprites: &SpriteSet, player: &Player) {
    let Some(sprite) = sprites.get(PLAYER_SPRITE_KEY) else {
        return;
    };
    // Drawn one tile large whatever size the save record carries.
    let tile = Vec2::new(TILE_SIZE as f32, TILE_SIZE as f32);
    pass.draw_sprite(sprite, SourceRect::full(sprite), player.position.to_vec2(), tile);
}

fn draw_hud(pass: &mut ScreenPass<'_, '_>, day: u32) {
    let (x, y, width, height) = HUD_PANEL;
    pass.fill_rect(x, y, width, height, BACKGROUND.with_opacity(HUD_PANEL_OPACITY));
    let (text_x, text_y) = HUD_TEXT_ORIGIN;
    pass.draw_text(
        text_x,
        text_y,
        &format!("Day: {day}"),
        HUD_TEXT_SCALE,
        Rgba::WHITE,
    );
}

fn draw_joystick(pass: &mut ScreenPass<'_, '_>, joystick: &Joystick) {
    if !joystick.is_active() {
        return;
    }
    let anchor = joystick.anchor();
    pass.fill_circle(
        anchor,
        JOYSTICK_BASE_RADIUS,
        Rgba::WHITE.with_opacity(JOYSTICK_BASE_OPACITY),
    );
    pass.fill_circle(
        anchor + joystick.displacement(),
        JOYSTICK_KNOB_RADIUS,
        Rgba::WHITE.with_opacity(JOYSTICK_KNOB_OPACITY),
    );
}
