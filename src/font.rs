//! 3x5 pixel glyphs for the score, the record and the start prompt.

use crate::palette::Rgb;

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

/// Anything that can take a single pixel.
pub trait Plot {
    fn plot(&mut self, x: i32, y: i32, c: Rgb);
}

// Rows top to bottom, bit 2 is the left column.
#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 5]> {
    Some(match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => [0; 5],
        _ => return None,
    })
}

/// Width in pixels of `text` drawn at `scale`, one blank column between glyphs.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * (GLYPH_W + 1) - 1) * scale }
}

/// Draw `text` with its top-left corner at `(x, y)`. Characters without a
/// glyph leave a blank cell.
pub fn draw_text(
    target: &mut impl Plot,
    x: i32,
    y: i32,
    text: &str,
    scale: i32,
    fg: Rgb,
    shadow: Option<Rgb>,
) {
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else { continue };
        let gx = x + i as i32 * (GLYPH_W + 1) * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let px = gx + col * scale;
                let py = y + row as i32 * scale;
                if let Some(sc) = shadow {
                    block(target, px + scale.max(2) / 2, py + scale.max(2) / 2, scale, sc);
                }
                block(target, px, py, scale, fg);
            }
        }
    }
}

fn block(target: &mut impl Plot, x: i32, y: i32, scale: i32, c: Rgb) {
    for dy in 0..scale {
        for dx in 0..scale {
            target.plot(x + dx, y + dy, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Sheet(HashMap<(i32, i32), Rgb>);

    impl Plot for Sheet {
        fn plot(&mut self, x: i32, y: i32, c: Rgb) {
            self.0.insert((x, y), c);
        }
    }

    const FG: Rgb = Rgb(1, 2, 3);

    #[test]
    fn widths() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("7", 1), 3);
        assert_eq!(text_width("42", 1), 7);
        assert_eq!(text_width("42", 2), 14);
    }

    #[test]
    fn one_draws_its_shape() {
        let mut sheet = Sheet::default();
        draw_text(&mut sheet, 10, 20, "1", 1, FG, None);
        assert_eq!(sheet.0.len(), 8);
        assert_eq!(sheet.0.get(&(11, 20)), Some(&FG));
        assert_eq!(sheet.0.get(&(10, 20)), None);
        assert_eq!(sheet.0.get(&(12, 24)), Some(&FG));
    }

    #[test]
    fn scale_grows_each_pixel() {
        let mut sheet = Sheet::default();
        draw_text(&mut sheet, 0, 0, "8", 2, FG, None);
        assert_eq!(sheet.0.len(), 13 * 4);
    }

    #[test]
    fn unknown_characters_keep_their_cell() {
        let mut sheet = Sheet::default();
        draw_text(&mut sheet, 0, 0, "?1", 1, FG, None);
        assert!(sheet.0.keys().all(|&(x, _)| x >= 4));
        assert!(!sheet.0.is_empty());
    }

    #[test]
    fn shadow_sits_below_right() {
        let mut sheet = Sheet::default();
        draw_text(&mut sheet, 0, 0, ":", 1, FG, Some(Rgb(9, 9, 9)));
        assert_eq!(sheet.0.get(&(1, 1)), Some(&FG));
        assert_eq!(sheet.0.get(&(2, 2)), Some(&Rgb(9, 9, 9)));
    }
}
