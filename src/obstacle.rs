//! Pipe pairs and the fixed pool they are recycled from.

use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::config::{PIPE_GAP, PIPE_RISE};
use crate::geom::Rect;

/// A top and a bottom pipe scrolling together with a fixed gap between them.
///
/// `top` and `bottom` always share `x` with the pair, and after any
/// reposition `bottom.y == top.y + height + gap`.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub top: Rect,
    pub bottom: Rect,
    pub gap: f32,
    /// Already credited to the score this lap
    pub scored: bool,
}

impl Obstacle {
    fn empty() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            top: Rect::default(),
            bottom: Rect::new(0.0, PIPE_GAP, 0.0, 0.0),
            gap: PIPE_GAP,
            scored: false,
        }
    }

    /// Move to `new_x` with a freshly drawn gap height and clear `scored`.
    pub fn reset_to_new_position(&mut self, new_x: f32, rng: &mut impl Rng) {
        self.x = new_x;
        self.top.x = new_x;
        self.bottom.x = new_x;
        self.top.y = -rng.gen_range(PIPE_RISE) as f32;
        self.bottom.y = self.top.y + self.height + self.gap;
        self.scored = false;
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        other.intersects(&self.top) || other.intersects(&self.bottom)
    }

    /// The box's left edge has cleared the trailing edge and the pair has
    /// not been credited yet.
    pub fn passed_on(&self, other: &Rect) -> bool {
        other.x > self.x + self.width && !self.scored
    }

    pub fn move_x(&mut self, dx: f32) {
        self.x -= dx;
        self.top.x -= dx;
        self.bottom.x -= dx;
    }
}

// ── Pool ────────────────────────────────────────────────────────────────────

/// Handle to a pooled obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleId(usize);

impl ObstacleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed set of obstacles handed out round-robin.
///
/// The pool does not track which obstacles are in use; it only guarantees
/// at construction that it holds more than the caller's peak live count.
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
    cursor: usize,
}

impl ObstaclePool {
    /// # Panics
    /// If `size` does not exceed `peak_live`.
    pub fn new(size: usize, peak_live: usize) -> Self {
        assert!(
            size > peak_live,
            "obstacle pool of {size} cannot serve {peak_live} live obstacles"
        );
        Self {
            slots: vec![Obstacle::empty(); size],
            cursor: 0,
        }
    }

    /// Take the obstacle under the cursor, overwrite its geometry in place
    /// and advance the cursor.
    pub fn acquire(&mut self, x: f32, y: f32, width: f32, height: f32) -> ObstacleId {
        let id = ObstacleId(self.cursor);
        let ob = &mut self.slots[self.cursor];
        ob.x = x;
        ob.y = y;
        ob.width = width;
        ob.height = height;
        ob.top = Rect::new(x, y, width, height);
        ob.bottom = Rect::new(x, height + ob.gap, width, height);
        self.cursor = (self.cursor + 1) % self.slots.len();
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Index<ObstacleId> for ObstaclePool {
    type Output = Obstacle;

    fn index(&self, id: ObstacleId) -> &Obstacle {
        &self.slots[id.0]
    }
}

impl IndexMut<ObstacleId> for ObstaclePool {
    fn index_mut(&mut self, id: ObstacleId) -> &mut Obstacle {
        &mut self.slots[id.0]
    }
}
