//! Decoded bitmaps addressed by logical name, loaded fail-fast.

use std::f32::consts::TAU;

use crate::config::ANIM_FRAMES;
use crate::error::{Error, Result};
use crate::font::{self, Plot};
use crate::palette::*;

/// Logical asset names
pub mod name {
    pub const BACKGROUND: &str = "background";
    pub const FLOOR: &str = "floor";
    /// Sprite sheet, animation frames side by side
    pub const BIRD: &str = "bird";
    pub const TOP_PIPE: &str = "top_pipe";
    pub const BOTTOM_PIPE: &str = "bottom_pipe";
    pub const TAP_TO_START: &str = "tap_to_start";

    pub const ALL: [&str; 6] = [BACKGROUND, FLOOR, BIRD, TOP_PIPE, BOTTOM_PIPE, TAP_TO_START];
}

/// RGB image with a transparent color key (`None`).
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub w: u32,
    pub h: u32,
    px: Vec<Option<Rgb>>,
}

impl Bitmap {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![None; (w * h) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.w && y < self.h {
            self.px[(y * self.w + x) as usize]
        } else {
            None
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.plot(x + dx, y + dy, c);
            }
        }
    }

    /// Copy of the region starting at `(x, y)`, clipped to this bitmap.
    pub fn sub_image(&self, x: u32, y: u32, w: u32, h: u32) -> Bitmap {
        let mut out = Bitmap::new(w, h);
        for dy in 0..h {
            for dx in 0..w {
                out.px[(dy * w + dx) as usize] = self.get(x + dx, y + dy);
            }
        }
        out
    }
}

impl Plot for Bitmap {
    fn plot(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.w && (y as u32) < self.h {
            self.px[(y as u32 * self.w + x as u32) as usize] = Some(c);
        }
    }
}

/// Supplies a decoded bitmap per logical name.
pub trait AssetSource {
    fn load(&self, name: &str) -> Result<Bitmap>;
}

/// Everything the renderer draws, with the bird sheet already sliced.
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: Bitmap,
    pub floor: Bitmap,
    pub bird: [Bitmap; ANIM_FRAMES],
    pub top_pipe: Bitmap,
    pub bottom_pipe: Bitmap,
    pub tap_to_start: Bitmap,
}

impl Assets {
    /// Load every asset or fail on the first one that is missing or unusable.
    pub fn load(source: &dyn AssetSource) -> Result<Self> {
        let fetch = |asset: &str| -> Result<Bitmap> {
            let bitmap = source.load(asset)?;
            if bitmap.w == 0 || bitmap.h == 0 {
                return Err(Error::invalid(asset, "empty bitmap"));
            }
            Ok(bitmap)
        };

        let background = fetch(name::BACKGROUND)?;
        let floor = fetch(name::FLOOR)?;
        let sheet = fetch(name::BIRD)?;
        let top_pipe = fetch(name::TOP_PIPE)?;
        let bottom_pipe = fetch(name::BOTTOM_PIPE)?;
        let tap_to_start = fetch(name::TAP_TO_START)?;

        let frames = ANIM_FRAMES as u32;
        if sheet.w % frames != 0 {
            return Err(Error::invalid(
                name::BIRD,
                format!("sheet width {} does not split into {frames} frames", sheet.w),
            ));
        }
        let frame_w = sheet.w / frames;
        let bird = std::array::from_fn(|i| sheet.sub_image(i as u32 * frame_w, 0, frame_w, sheet.h));

        log::debug!(
            "assets loaded: background {}x{}, bird frame {frame_w}x{}",
            background.w,
            background.h,
            sheet.h
        );
        Ok(Self {
            background,
            floor,
            bird,
            top_pipe,
            bottom_pipe,
            tap_to_start,
        })
    }
}

/// Pixel art painted in code; every layer tiles horizontally.
pub struct BuiltinAssets;

impl AssetSource for BuiltinAssets {
    fn load(&self, asset: &str) -> Result<Bitmap> {
        Ok(match asset {
            name::BACKGROUND => builtin::background(),
            name::FLOOR => builtin::floor(),
            name::BIRD => builtin::bird_sheet(),
            name::TOP_PIPE => builtin::pipe(true),
            name::BOTTOM_PIPE => builtin::pipe(false),
            name::TAP_TO_START => builtin::tap_to_start(),
            _ => {
                return Err(Error::AssetMissing {
                    name: asset.to_string(),
                });
            }
        })
    }
}

pub mod builtin {
    use super::*;

    pub const BACKGROUND: (u32, u32) = (144, 256);
    pub const FLOOR: (u32, u32) = (168, 56);
    pub const BIRD_FRAME: (u32, u32) = (17, 12);
    pub const PIPE: (u32, u32) = (26, 160);
    pub const OVERLAY: (u32, u32) = (64, 40);

    const PIPE_CAP_H: i32 = 12;
    const PIPE_LIP: i32 = 2;

    // Row where the floor covers the background once scaled
    const HORIZON: f32 = 200.0;

    pub fn background() -> Bitmap {
        let (w, h) = BACKGROUND;
        let mut bmp = Bitmap::new(w, h);
        for y in 0..h {
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, (y * 256 / h) as u16);
            bmp.fill_rect(0, y as i32, w as i32, 1, c);
        }

        // Whole periods across the width so the strip tiles.
        let wave = |x: u32, k: f32| (x as f32 * TAU / w as f32 * k).sin();
        for x in 0..w {
            let clouds = HORIZON - 28.0 - (5.0 + 4.0 * wave(x, 4.0) + 3.0 * wave(x, 7.0)).abs();
            let far = HORIZON - 16.0 - 8.0 * wave(x, 2.0) - 4.0 * wave(x, 3.0);
            let near = HORIZON - 6.0 - 5.0 * wave(x, 3.0) - 2.0 * wave(x, 5.0);
            for (top, c) in [(clouds, CLOUD), (far, HILL_FAR), (near, HILL_NEAR)] {
                let top = top as i32;
                bmp.fill_rect(x as i32, top, 1, h as i32 - top, c);
            }
        }
        bmp
    }

    pub fn floor() -> Bitmap {
        let (w, h) = FLOOR;
        let (w, h) = (w as i32, h as i32);
        let mut bmp = Bitmap::new(w as u32, h as u32);
        for x in 0..w {
            let alt = (x / 3) % 2 == 0;
            bmp.plot(x, 0, CAP_DARK);
            bmp.plot(x, 1, if alt { GRASS } else { GRASS_LIGHT });
            bmp.plot(x, 2, if alt { GRASS } else { GRASS_LIGHT });
            bmp.plot(x, 3, GRASS);
        }
        for y in 4..h {
            for x in 0..w {
                let stripe = (x + y * 2) % 12 < 6;
                bmp.plot(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
        bmp
    }

    /// Three frames: wing up, level, down.
    pub fn bird_sheet() -> Bitmap {
        let (fw, fh) = BIRD_FRAME;
        let mut bmp = Bitmap::new(fw * ANIM_FRAMES as u32, fh);
        for frame in 0..ANIM_FRAMES as i32 {
            let ox = frame * fw as i32;
            for y in 0..fh as i32 {
                for x in 0..fw as i32 {
                    let dx = (x as f32 - 8.0) / 6.0;
                    let dy = (y as f32 - 6.0) / 5.0;
                    if dx * dx + dy * dy <= 1.0 {
                        bmp.plot(ox + x, y, if y < 4 { BIRD_HI } else { BIRD_Y });
                    }
                }
            }
            bmp.fill_rect(ox, 5, 2, 2, BIRD_WING);
            bmp.fill_rect(ox + 2, 3 + frame * 2, 5, 2, BIRD_WING);
            bmp.fill_rect(ox + 10, 2, 3, 3, BIRD_EYE);
            bmp.fill_rect(ox + 12, 3, 1, 2, BIRD_PUPIL);
            bmp.fill_rect(ox + 13, 6, 4, 2, BIRD_BEAK_HI);
            bmp.fill_rect(ox + 13, 8, 4, 1, BIRD_BEAK);
        }
        bmp
    }

    /// A top pipe has its cap at the bottom, a bottom pipe at the top.
    pub fn pipe(top: bool) -> Bitmap {
        let (w, h) = PIPE;
        let (w, h) = (w as i32, h as i32);
        let mut bmp = Bitmap::new(w as u32, h as u32);
        let body_w = w - PIPE_LIP * 2;
        for x in 0..body_w {
            bmp.fill_rect(PIPE_LIP + x, 0, 1, h, shade(x, body_w));
        }
        let cap_y = if top { h - PIPE_CAP_H } else { 0 };
        for x in 0..w {
            bmp.fill_rect(x, cap_y, 1, PIPE_CAP_H, shade(x, w));
        }
        bmp.fill_rect(0, cap_y, w, 1, CAP_DARK);
        bmp.fill_rect(0, cap_y + PIPE_CAP_H - 1, w, 1, CAP_DARK);
        bmp
    }

    pub fn tap_to_start() -> Bitmap {
        let (w, h) = OVERLAY;
        let (w, h) = (w as i32, h as i32);
        let mut bmp = Bitmap::new(w as u32, h as u32);
        bmp.fill_rect(0, 0, w, h, SHADOW);
        bmp.fill_rect(1, 1, w - 2, h - 2, DIRT);
        bmp.fill_rect(2, 2, w - 4, h - 4, PANEL);
        for (line, y) in [("TAP TO", 7), ("START", 22)] {
            let x = (w - font::text_width(line, 2)) / 2;
            font::draw_text(&mut bmp, x, y, line, 2, WHITE, Some(SHADOW));
        }
        bmp
    }

    // Cylinder shading across a pipe, as (position of 256, color) stops
    const PIPE_STOPS: [(i32, Rgb); 5] = [
        (0, PIPE_L),
        (64, PIPE_M),
        (100, PIPE_HI),
        (160, PIPE_R),
        (256, PIPE_L),
    ];

    fn shade(x: i32, total_w: i32) -> Rgb {
        if total_w <= 1 {
            return PIPE_M;
        }
        let t = x.clamp(0, total_w - 1) * 256 / (total_w - 1);
        PIPE_STOPS
            .windows(2)
            .find(|w| t < w[1].0)
            .map_or(PIPE_L, |w| {
                let ((a, from), (b, to)) = (w[0], w[1]);
                Rgb::lerp(from, to, ((t - a) * 256 / (b - a)) as u16)
            })
    }
}
