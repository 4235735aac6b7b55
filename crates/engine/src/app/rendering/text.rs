//! 3x5 bitmap font covering letters in both cases, digits and basic punctuation.

use super::canvas::{Canvas, Rgba};

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
const GLYPH_SPACING: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    rows: [u8; GLYPH_HEIGHT as usize],
}

const fn glyph(rows: [u8; GLYPH_HEIGHT as usize]) -> Glyph {
    Glyph { rows }
}

const SPACE: Glyph = glyph([0, 0, 0, 0, 0]);
const UNKNOWN: Glyph = glyph([0b110, 0b001, 0b010, 0b000, 0b010]);

pub(crate) fn draw_text(
    canvas: &mut Canvas<'_>,
    x: i32,
    y: i32,
    text: &str,
    scale: u32,
    color: Rgba,
) {
    let scale = scale.max(1) as i32;
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i32 * scale;
    let mut pen_x = x;
    for ch in text.chars() {
        draw_glyph(canvas, pen_x, y, glyph_for(ch), scale, color);
        pen_x = pen_x.saturating_add(advance);
    }
}

fn draw_glyph(canvas: &mut Canvas<'_>, x: i32, y: i32, glyph: Glyph, scale: i32, color: Rgba) {
    for (row_index, row_bits) in glyph.rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let block_x = x + col as i32 * scale;
            let block_y = y + row_index as i32 * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    canvas.blend_pixel(block_x + sx, block_y + sy, color);
                }
            }
        }
    }
}

fn glyph_for(ch: char) -> Glyph {
    match ch {
        ' ' => SPACE,
        'A' => glyph([0b010, 0b101, 0b111, 0b101, 0b101]),
        'B' => glyph([0b110, 0b101, 0b110, 0b101, 0b110]),
        'C' => glyph([0b011, 0b100, 0b100, 0b100, 0b011]),
        'D' => glyph([0b110, 0b101, 0b101, 0b101, 0b110]),
        'E' => glyph([0b111, 0b100, 0b110, 0b100, 0b111]),
        'F' => glyph([0b111, 0b100, 0b110, 0b100, 0b100]),
        'G' => glyph([0b011, 0b100, 0b101, 0b101, 0b011]),
        'H' => glyph([0b101, 0b101, 0b111, 0b101, 0b101]),
        'I' => glyph([0b111, 0b010, 0b010, 0b010, 0b111]),
        'J' => glyph([0b001, 0b001, 0b001, 0b101, 0b010]),
        'K' => glyph([0b101, 0b101, 0b110, 0b101, 0b101]),
        'L' => glyph([0b100, 0b100, 0b100, 0b100, 0b111]),
        'M' => glyph([0b101, 0b111, 0b111, 0b101, 0b101]),
        'N' => glyph([0b110, 0b101, 0b101, 0b101, 0b101]),
        'O' => glyph([0b010, 0b101, 0b101, 0b101, 0b010]),
        'P' => glyph([0b110, 0b101, 0b110, 0b100, 0b100]),
        'Q' => glyph([0b010, 0b101, 0b101, 0b110, 0b011]),
        'R' => glyph([0b110, 0b101, 0b110, 0b101, 0b101]),
        'S' => glyph([0b011, 0b100, 0b010, 0b001, 0b110]),
        'T' => glyph([0b111, 0b010, 0b010, 0b010, 0b010]),
        'U' => glyph([0b101, 0b101, 0b101, 0b101, 0b111]),
        'V' => glyph([0b101, 0b101, 0b101, 0b101, 0b010]),
        'W' => glyph([0b101, 0b101, 0b111, 0b111, 0b101]),
        'X' => glyph([0b101, 0b101, 0b010, 0b101, 0b101]),
        'Y' => glyph([0b101, 0b101, 0b010, 0b010, 0b010]),
        'Z' => glyph([0b111, 0b001, 0b010, 0b100, 0b111]),
        'a' => glyph([0b000, 0b011, 0b101, 0b101, 0b011]),
        'b' => glyph([0b100, 0b110, 0b101, 0b101, 0b110]),
        'c' => glyph([0b000, 0b011, 0b100, 0b100, 0b011]),
        'd' => glyph([0b001, 0b011, 0b101, 0b101, 0b011]),
        'e' => glyph([0b000, 0b010, 0b111, 0b100, 0b011]),
        'f' => glyph([0b011, 0b100, 0b110, 0b100, 0b100]),
        'g' => glyph([0b011, 0b101, 0b011, 0b001, 0b110]),
        'h' => glyph([0b100, 0b110, 0b101, 0b101, 0b101]),
        'i' => glyph([0b010, 0b000, 0b010, 0b010, 0b010]),
        'j' => glyph([0b001, 0b000, 0b001, 0b101, 0b010]),
        'k' => glyph([0b100, 0b101, 0b110, 0b110, 0b101]),
        'l' => glyph([0b110, 0b010, 0b010, 0b010, 0b111]),
        'm' => glyph([0b000, 0b101, 0b111, 0b101, 0b101]),
        'n' => glyph([0b000, 0b110, 0b101, 0b101, 0b101]),
        'o' => glyph([0b000, 0b010, 0b101, 0b101, 0b010]),
        'p' => glyph([0b000, 0b110, 0b101, 0b110, 0b100]),
        'q' => glyph([0b000, 0b011, 0b101, 0b011, 0b001]),
        'r' => glyph([0b000, 0b011, 0b100, 0b100, 0b100]),
        's' => glyph([0b000, 0b011, 0b110, 0b001, 0b110]),
        't' => glyph([0b010, 0b111, 0b010, 0b010, 0b001]),
        'u' => glyph([0b000, 0b101, 0b101, 0b101, 0b011]),
        'v' => glyph([0b000, 0b101, 0b101, 0b101, 0b010]),
        'w' => glyph([0b000, 0b101, 0b101, 0b111, 0b101]),
        'x' => glyph([0b000, 0b101, 0b010, 0b010, 0b101]),
        'y' => glyph([0b101, 0b101, 0b011, 0b001, 0b110]),
        'z' => glyph([0b000, 0b111, 0b011, 0b100, 0b111]),
        '0' => glyph([0b111, 0b101, 0b101, 0b101, 0b111]),
        '1' => glyph([0b010, 0b110, 0b010, 0b010, 0b111]),
        '2' => glyph([0b110, 0b001, 0b010, 0b100, 0b111]),
        '3' => glyph([0b110, 0b001, 0b010, 0b001, 0b110]),
        '4' => glyph([0b101, 0b101, 0b111, 0b001, 0b001]),
        '5' => glyph([0b111, 0b100, 0b110, 0b001, 0b110]),
        '6' => glyph([0b011, 0b100, 0b111, 0b101, 0b111]),
        '7' => glyph([0b111, 0b001, 0b010, 0b010, 0b010]),
        '8' => glyph([0b111, 0b101, 0b111, 0b101, 0b111]),
        '9' => glyph([0b111, 0b101, 0b111, 0b001, 0b110]),
        ':' => glyph([0b000, 0b010, 0b000, 0b010, 0b000]),
        '.' => glyph([0b000, 0b000, 0b000, 0b000, 0b010]),
        ',' => glyph([0b000, 0b000, 0b000, 0b010, 0b100]),
        '-' => glyph([0b000, 0b000, 0b111, 0b000, 0b000]),
        '/' => glyph([0b001, 0b001, 0b010, 0b100, 0b100]),
        _ => UNKNOWN,
    }
}
