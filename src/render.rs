//! Off-screen canvas, scene composition and the half-block terminal presenter.

use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use rand::Rng;

use crate::assets::{Assets, Bitmap};
use crate::audio::{Sfx, Sound};
use crate::driver::Frontend;
use crate::error::Result;
use crate::font::{self, Plot};
use crate::geom::Rect;
use crate::palette::{LETTERBOX, Rgb, SHADOW, SKY_TOP, YELLOW};
use crate::sim::{Game, State, Tick};

/// Top of the HUD text in canvas units
const HUD_TOP: f32 = 12.0;
const RECORD_X: f32 = 10.0;
/// Score column, measured from the right edge
const SCORE_INSET: f32 = 80.0;

// ── Canvas ──────────────────────────────────────────────────────────────────

/// Square off-screen buffer the scene is composed on.
pub struct Canvas {
    size: usize,
    px: Vec<Rgb>,
}

impl Canvas {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            px: vec![SKY_TOP; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.size + x]
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    /// Scale `bmp` into `dst` with nearest-neighbour sampling. Clipped to
    /// the canvas; transparent pixels leave what is underneath.
    pub fn draw_image(&mut self, bmp: &Bitmap, dst: Rect) {
        let (x0, y0) = (dst.x.floor() as i64, dst.y.floor() as i64);
        let (w, h) = (dst.w as i64, dst.h as i64);
        if w <= 0 || h <= 0 {
            return;
        }
        let size = self.size as i64;
        let xs = x0.max(0)..(x0 + w).min(size);
        for y in y0.max(0)..(y0 + h).min(size) {
            let sy = ((y - y0) * bmp.h as i64 / h) as u32;
            for x in xs.clone() {
                let sx = ((x - x0) * bmp.w as i64 / w) as u32;
                if let Some(c) = bmp.get(sx, sy) {
                    self.px[(y * size + x) as usize] = c;
                }
            }
        }
    }
}

/// Draw the world in back-to-front order. Scrolling layers are drawn twice,
/// side by side.
pub fn compose<R: Rng>(game: &Game<R>, assets: &Assets, canvas: &mut Canvas) {
    let g = &game.geometry;
    canvas.clear(SKY_TOP);

    let bg = Rect {
        x: game.background.x,
        ..g.background
    };
    canvas.draw_image(&assets.background, bg);
    canvas.draw_image(&assets.background, Rect { x: bg.right(), ..bg });

    for ob in game.obstacles() {
        canvas.draw_image(&assets.top_pipe, Rect::new(ob.x, ob.top.y, ob.width, ob.height));
        canvas.draw_image(&assets.bottom_pipe, Rect::new(ob.x, ob.bottom.y, ob.width, ob.height));
    }

    let floor = Rect {
        x: game.floor.x,
        ..g.floor
    };
    canvas.draw_image(&assets.floor, floor);
    canvas.draw_image(&assets.floor, Rect { x: floor.right(), ..floor });

    canvas.draw_image(&assets.bird[game.frame()], game.bird.rect);

    if game.state() == State::Ready {
        canvas.draw_image(&assets.tap_to_start, g.overlay);
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

/// Terminal-resolution pixels: `w` columns by `h` = rows * 2.
pub struct PixelBuf {
    pub w: usize,
    pub h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Write the buffer as rows of upper-half blocks, changing colors only
    /// when they differ from the previous cell.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut pen = Pen::default();
        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if top == bot {
                    pen.background(out, top)?;
                    queue!(out, style::Print(' '))?;
                } else {
                    pen.foreground(out, top)?;
                    pen.background(out, bot)?;
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                pen = Pen::default();
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

impl Plot for PixelBuf {
    fn plot(&mut self, x: i32, y: i32, c: Rgb) {
        self.set(x, y, c);
    }
}

/// Colors currently set on the terminal; `None` after a reset.
#[derive(Default)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl Pen {
    fn foreground(&mut self, out: &mut impl Write, c: Rgb) -> io::Result<()> {
        if self.fg != Some(c) {
            queue!(out, style::SetForegroundColor(term_color(c)))?;
            self.fg = Some(c);
        }
        Ok(())
    }

    fn background(&mut self, out: &mut impl Write, c: Rgb) -> io::Result<()> {
        if self.bg != Some(c) {
            queue!(out, style::SetBackgroundColor(term_color(c)))?;
            self.bg = Some(c);
        }
        Ok(())
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Presentation ────────────────────────────────────────────────────────────

/// Largest centred square of the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub side: i32,
}

impl Viewport {
    pub fn fit(w: usize, h: usize) -> Self {
        let side = w.min(h);
        Self {
            x: ((w - side) / 2) as i32,
            y: ((h - side) / 2) as i32,
            side: side as i32,
        }
    }

    /// Canvas distance to viewport pixels.
    pub fn scale(&self, v: f32, canvas_size: f32) -> i32 {
        (v * self.side as f32 / canvas_size) as i32
    }
}

/// Sample the canvas into the centred viewport, letterboxing the rest.
pub fn present(canvas: &Canvas, buf: &mut PixelBuf) -> Viewport {
    let vp = Viewport::fit(buf.w, buf.h);
    buf.px.fill(LETTERBOX);
    let side = vp.side as usize;
    for vy in 0..side {
        let cy = vy * canvas.size() / side;
        for vx in 0..side {
            let cx = vx * canvas.size() / side;
            buf.set(vp.x + vx as i32, vp.y + vy as i32, canvas.get(cx, cy));
        }
    }
    vp
}

/// Record while waiting, the running score while playing.
pub fn draw_hud<R: Rng>(game: &Game<R>, buf: &mut PixelBuf, vp: Viewport) {
    let size = game.geometry.size;
    let scale = (vp.side / 128).max(1);
    let y = vp.y + vp.scale(HUD_TOP, size);
    let (x, text) = match game.state() {
        State::Ready => (RECORD_X, format!("RECORD: {}", game.best())),
        State::Playing => (size - SCORE_INSET, game.score().to_string()),
    };
    font::draw_text(buf, vp.x + vp.scale(x, size), y, &text, scale, YELLOW, Some(SHADOW));
}

/// Compose, present and overlay the HUD in one go.
pub fn draw_frame<R: Rng>(game: &Game<R>, assets: &Assets, canvas: &mut Canvas, buf: &mut PixelBuf) {
    compose(game, assets, canvas);
    let vp = present(canvas, buf);
    draw_hud(game, buf, vp);
}

/// Draws into the terminal and plays sound effects for the frame's events.
pub struct TerminalFrontend<W: Write = Stdout> {
    out: W,
    assets: Assets,
    canvas: Canvas,
    buf: PixelBuf,
    sfx: Option<Sfx>,
}

impl TerminalFrontend<Stdout> {
    pub fn new(assets: Assets, canvas_size: usize, sfx: Option<Sfx>, cols: u16, rows: u16) -> Self {
        Self::with_writer(stdout(), assets, canvas_size, sfx, cols, rows)
    }
}

impl<W: Write> TerminalFrontend<W> {
    pub fn with_writer(
        out: W,
        assets: Assets,
        canvas_size: usize,
        sfx: Option<Sfx>,
        cols: u16,
        rows: u16,
    ) -> Self {
        Self {
            out,
            assets,
            canvas: Canvas::new(canvas_size),
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            sfx,
        }
    }

    pub fn pixels(&self) -> &PixelBuf {
        &self.buf
    }
}

impl<W: Write> Frontend for TerminalFrontend<W> {
    fn resize(&mut self, cols: u16, rows: u16) {
        self.buf.resize(cols as usize, rows as usize * 2);
    }

    fn present<R: Rng>(&mut self, game: &Game<R>, tick: Tick) -> Result<()> {
        if let Some(sfx) = &self.sfx {
            if tick.crashed {
                sfx.play(Sound::Death);
            } else if tick.scored > 0 {
                sfx.play(Sound::Point);
            }
        }
        draw_frame(game, &self.assets, &mut self.canvas, &mut self.buf);
        self.buf.render(&mut self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BuiltinAssets;
    use crate::config::{Geometry, SIZE};
    use crate::palette::{WHITE, Rgb};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RED: Rgb = Rgb(255, 0, 0);

    fn solid(w: u32, h: u32, c: Rgb) -> Bitmap {
        let mut bmp = Bitmap::new(w, h);
        bmp.fill_rect(0, 0, w as i32, h as i32, c);
        bmp
    }

    fn game() -> Game {
        Game::new(Geometry::default(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn draw_image_scales_up() {
        let mut canvas = Canvas::new(8);
        let mut bmp = solid(2, 2, RED);
        bmp.plot(1, 1, WHITE);
        canvas.draw_image(&bmp, Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(canvas.get(1, 1), RED);
        assert_eq!(canvas.get(2, 2), WHITE);
        assert_eq!(canvas.get(3, 3), WHITE);
        assert_eq!(canvas.get(4, 4), SKY_TOP);
    }

    #[test]
    fn draw_image_clips_at_edges() {
        let mut canvas = Canvas::new(4);
        canvas.draw_image(&solid(4, 4, RED), Rect::new(-2.0, 2.0, 4.0, 4.0));
        assert_eq!(canvas.get(0, 3), RED);
        assert_eq!(canvas.get(1, 2), RED);
        assert_eq!(canvas.get(2, 2), SKY_TOP);
        assert_eq!(canvas.get(0, 1), SKY_TOP);
    }

    #[test]
    fn transparent_pixels_keep_background() {
        let mut canvas = Canvas::new(4);
        canvas.clear(WHITE);
        let mut bmp = Bitmap::new(2, 1);
        bmp.plot(0, 0, RED);
        canvas.draw_image(&bmp, Rect::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(canvas.get(0, 0), RED);
        assert_eq!(canvas.get(1, 0), WHITE);
    }

    #[test]
    fn viewport_is_centred_square() {
        assert_eq!(Viewport::fit(100, 60), Viewport { x: 20, y: 0, side: 60 });
        assert_eq!(Viewport::fit(40, 80), Viewport { x: 0, y: 20, side: 40 });
        assert_eq!(Viewport::fit(0, 10).side, 0);
    }

    #[test]
    fn present_letterboxes_outside_viewport() {
        let mut canvas = Canvas::new(4);
        canvas.clear(RED);
        let mut buf = PixelBuf::new(8, 4);
        let vp = present(&canvas, &mut buf);
        assert_eq!(vp, Viewport { x: 2, y: 0, side: 4 });
        assert_eq!(buf.get(0, 0), LETTERBOX);
        assert_eq!(buf.get(2, 0), RED);
        assert_eq!(buf.get(5, 3), RED);
        assert_eq!(buf.get(6, 3), LETTERBOX);
    }

    #[test]
    fn idle_scene_shows_the_overlay() {
        let assets = Assets::load(&BuiltinAssets).unwrap();
        let mut game = game();
        let mut canvas = Canvas::new(SIZE as usize);
        compose(&game, &assets, &mut canvas);
        let o = game.geometry.overlay;
        // panel border is the shadow color
        assert_eq!(canvas.get(o.x as usize, o.y as usize), SHADOW);

        game.release();
        compose(&game, &assets, &mut canvas);
        assert_ne!(canvas.get(o.x as usize, o.y as usize), SHADOW);
    }

    #[test]
    fn bird_is_drawn_at_its_box() {
        let assets = Assets::load(&BuiltinAssets).unwrap();
        let game = game();
        let mut canvas = Canvas::new(SIZE as usize);
        compose(&game, &assets, &mut canvas);
        let b = game.bird.rect;
        // frame pixel (8, 6) is body yellow, scaled by 2
        let (x, y) = (b.x as usize + 16, b.y as usize + 12);
        assert_eq!(canvas.get(x, y), crate::palette::BIRD_Y);
    }

    #[test]
    fn hud_switches_with_state() {
        let assets = Assets::load(&BuiltinAssets).unwrap();
        let mut game = game();
        let mut canvas = Canvas::new(SIZE as usize);
        let mut buf = PixelBuf::new(128, 128);
        draw_frame(&game, &assets, &mut canvas, &mut buf);
        let yellow_left = (0..64).any(|x| (0..16).any(|y| buf.get(x, y) == YELLOW));
        assert!(yellow_left, "record text at top left");

        game.release();
        draw_frame(&game, &assets, &mut canvas, &mut buf);
        let yellow_left = (0..64).any(|x| (0..16).any(|y| buf.get(x, y) == YELLOW));
        let yellow_right = (96..128).any(|x| (0..16).any(|y| buf.get(x, y) == YELLOW));
        assert!(!yellow_left);
        assert!(yellow_right, "score text at top right");
    }

    #[test]
    fn render_uses_half_blocks_only_where_needed() {
        let mut buf = PixelBuf::new(2, 2);
        buf.set(0, 0, RED);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\u{2580}').count(), 1);
        assert!(text.contains("38;2;255;0;0"));
    }

    #[test]
    fn frontend_writes_frames_and_follows_resize() {
        let assets = Assets::load(&BuiltinAssets).unwrap();
        let game = game();
        let mut frontend =
            TerminalFrontend::with_writer(Vec::new(), assets, SIZE as usize, None, 40, 20);
        frontend.present(&game, Tick::default()).unwrap();
        assert!(!frontend.out.is_empty());
        assert_eq!((frontend.pixels().w, frontend.pixels().h), (40, 40));

        frontend.resize(60, 25);
        frontend.present(&game, Tick::default()).unwrap();
        assert_eq!((frontend.pixels().w, frontend.pixels().h), (60, 50));
    }
}
