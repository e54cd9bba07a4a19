//! Tunables and the geometry derived from asset sizes.

use std::ops::Range;

use crate::assets::Assets;
use crate::error::{Error, Result};
use crate::geom::Rect;

// ── Canvas ──────────────────────────────────────────────────────────────────

pub const BASE_SIZE: u32 = 256;
pub const SCALE: u32 = 2;
pub const SIZE: u32 = BASE_SIZE * SCALE;

pub const FRAME_RATE: u64 = 60;

// ── Physics ─────────────────────────────────────────────────────────────────

// per frame while descending
pub const GRAVITY: f32 = 0.25;
pub const FLAP_VELOCITY: f32 = -4.5;

// ── Pipes ───────────────────────────────────────────────────────────────────

pub const PIPE_GAP: f32 = 105.0;
pub const PIPE_SPEED: f32 = 3.0;
pub const BACKGROUND_SPEED: f32 = 1.0;
pub const FLOOR_SPEED: f32 = 3.0;

pub const LIVE_PIPES: usize = 4;
pub const POOL_SIZE: usize = 10;
pub const PIPE_SPACING: f32 = 170.0;
/// Extra distance past the right edge where a recycled pipe reappears
pub const RECYCLE_MARGIN: f32 = 65.0;
/// How far the top pipe is pulled above the canvas (negated)
pub const PIPE_RISE: Range<i32> = 100..240;

// ── Animation ───────────────────────────────────────────────────────────────

pub const ANIM_FRAMES: usize = 3;
/// Ticks per animation frame, minus one
pub const ANIM_INTERVAL: u32 = 5;

// ── Geometry ────────────────────────────────────────────────────────────────

/// Sizes and resting positions of everything the simulation moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub size: f32,
    /// Asset pixels per canvas pixel
    pub distortion: u32,
    /// Bird box at its idle coordinates
    pub bird: Rect,
    pub pipe_w: f32,
    pub pipe_h: f32,
    pub background: Rect,
    pub floor: Rect,
    /// "Tap to start" overlay, centered
    pub overlay: Rect,
}

impl Geometry {
    /// Derive geometry from sprite sizes: every sprite is scaled by
    /// `size / background height`.
    pub fn from_assets(assets: &Assets, size: u32) -> Result<Self> {
        let bg = &assets.background;
        if bg.h == 0 {
            return Err(Error::invalid("background", "zero height"));
        }
        let distortion = size / bg.h;
        if distortion == 0 {
            return Err(Error::invalid(
                "background",
                format!("{} px tall, canvas is {size}", bg.h),
            ));
        }

        let frame = &assets.bird[0];
        Ok(Self::with_sprites(
            size,
            distortion,
            (frame.w, frame.h),
            (assets.top_pipe.w, assets.top_pipe.h),
            (bg.w, bg.h),
            (assets.floor.w, assets.floor.h),
            (assets.tap_to_start.w, assets.tap_to_start.h),
        ))
    }

    fn with_sprites(
        size: u32,
        distortion: u32,
        bird: (u32, u32),
        pipe: (u32, u32),
        background: (u32, u32),
        floor: (u32, u32),
        overlay: (u32, u32),
    ) -> Self {
        let d = distortion as f32;
        let s = size as f32;
        let scaled = |(w, h): (u32, u32)| (w as f32 * d, h as f32 * d);

        let (bird_w, bird_h) = scaled(bird);
        let (pipe_w, pipe_h) = scaled(pipe);
        let (bg_w, bg_h) = scaled(background);
        let (floor_w, floor_h) = scaled(floor);
        let (overlay_w, overlay_h) = scaled(overlay);

        Self {
            size: s,
            distortion,
            bird: Rect::new(
                (s / 2.0 - bird_w * 3.0).floor(),
                (s / 2.0 - bird_h / 2.0).floor(),
                bird_w,
                bird_h,
            ),
            pipe_w,
            pipe_h,
            background: Rect::new(0.0, 0.0, bg_w, bg_h),
            floor: Rect::new(0.0, s - floor_h, floor_w, floor_h),
            overlay: Rect::new(
                (s / 2.0 - overlay_w / 2.0).floor(),
                (s / 2.0 - overlay_h / 2.0).floor(),
                overlay_w,
                overlay_h,
            ),
        }
    }

    /// Top edge of the floor, where the bird crashes
    pub fn floor_top(&self) -> f32 {
        self.size - self.floor.h
    }
}

impl Default for Geometry {
    /// Geometry of the built-in assets on the standard canvas.
    fn default() -> Self {
        use crate::assets::builtin;
        Self::with_sprites(
            SIZE,
            SIZE / builtin::BACKGROUND.1,
            builtin::BIRD_FRAME,
            builtin::PIPE,
            builtin::BACKGROUND,
            builtin::FLOOR,
            builtin::OVERLAY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_standard_canvas() {
        let g = Geometry::default();
        assert_eq!(g.size, 512.0);
        assert_eq!(g.distortion, 2);
        assert_eq!(g.bird, Rect::new(154.0, 244.0, 34.0, 24.0));
        assert_eq!((g.pipe_w, g.pipe_h), (52.0, 320.0));
        assert_eq!(g.floor_top(), 400.0);
    }

    #[test]
    fn overlay_is_centered() {
        let g = Geometry::default();
        let cx = g.overlay.x + g.overlay.w / 2.0;
        let cy = g.overlay.y + g.overlay.h / 2.0;
        assert_eq!((cx, cy), (g.size / 2.0, g.size / 2.0));
    }
}
