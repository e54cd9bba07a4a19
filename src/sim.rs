//! Per-frame simulation: scrolling, pipes, collisions, scoring and the bird.

use rand::Rng;
use rand::rngs::StdRng;

use crate::config::{
    ANIM_FRAMES, ANIM_INTERVAL, BACKGROUND_SPEED, FLAP_VELOCITY, FLOOR_SPEED, GRAVITY, Geometry,
    LIVE_PIPES, PIPE_SPACING, PIPE_SPEED, POOL_SIZE, RECYCLE_MARGIN,
};
use crate::geom::Rect;
use crate::obstacle::{Obstacle, ObstacleId, ObstaclePool};

// ── Bird ────────────────────────────────────────────────────────────────────

// Latched until the next input or game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Idle,
    Ascend,
    Descend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ready,
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub rect: Rect,
    pub velocity: f32,
    pub direction: Direction,
}

// ── Scrolling ───────────────────────────────────────────────────────────────

/// A horizontally tiled layer drawn twice side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollLayer {
    pub x: f32, // (-width, 0] once scrolled
    pub width: f32,
    speed: f32,
}

impl ScrollLayer {
    pub fn new(width: f32, speed: f32) -> Self {
        Self {
            x: 0.0,
            width,
            speed,
        }
    }

    pub fn scroll(&mut self) {
        self.x -= self.speed;
        if self.x + self.width <= 0.0 {
            self.x += self.width;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    pub scored: u32,
    pub crashed: bool,
}

// ── Game ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Game<R: Rng = StdRng> {
    pub(crate) geometry: Geometry,
    pub(crate) bird: Bird,
    pub background: ScrollLayer,
    pub floor: ScrollLayer,
    pool: ObstaclePool,
    live: [ObstacleId; LIVE_PIPES],
    score: u32,
    best: u32,
    best_raised: bool,
    state: State,
    frame: usize,
    anim_tick: u32,
    // Nothing has moved since the last reset
    fresh: bool,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(geometry: Geometry, mut rng: R) -> Self {
        let mut pool = ObstaclePool::new(POOL_SIZE, LIVE_PIPES);
        let live = lay_out(&mut pool, &mut rng, &geometry);
        Self {
            geometry,
            bird: Bird {
                rect: geometry.bird,
                velocity: 0.0,
                direction: Direction::Idle,
            },
            background: ScrollLayer::new(geometry.background.w, BACKGROUND_SPEED),
            floor: ScrollLayer::new(geometry.floor.w, FLOOR_SPEED),
            pool,
            live,
            score: 0,
            best: 0,
            best_raised: false,
            state: State::Ready,
            frame: 0,
            anim_tick: ANIM_INTERVAL,
            fresh: true,
            rng,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Direct access to the bird; counts as movement for `game_over`.
    pub fn bird_mut(&mut self) -> &mut Bird {
        self.fresh = false;
        &mut self.bird
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.live.iter().map(|&id| &self.pool[id])
    }

    /// Live pipe pair in `slot` (`0..LIVE_PIPES`).
    pub fn obstacle_mut(&mut self, slot: usize) -> &mut Obstacle {
        self.fresh = false;
        &mut self.pool[self.live[slot]]
    }

    pub fn pool(&self) -> &ObstaclePool {
        &self.pool
    }

    /// Pointer down: the bird rises on every tick until released.
    pub fn press(&mut self) {
        self.bird.direction = Direction::Ascend;
        self.fresh = false;
    }

    /// Pointer up: the bird falls under gravity, and a waiting game starts.
    pub fn release(&mut self) {
        if self.state == State::Ready {
            log::debug!("run started, best {}", self.best);
        }
        self.state = State::Playing;
        self.bird.direction = Direction::Descend;
        self.fresh = false;
    }

    /// Advance one frame.
    pub fn update(&mut self) -> Tick {
        let mut tick = Tick::default();

        self.background.scroll();
        self.floor.scroll();
        self.animate();

        if self.state == State::Playing {
            self.fresh = false;
            let size = self.geometry.size;
            for &id in &self.live {
                let ob = &mut self.pool[id];
                ob.move_x(PIPE_SPEED);
                if ob.x + ob.width < 0.0 {
                    ob.reset_to_new_position(size + ob.width + RECYCLE_MARGIN, &mut self.rng);
                }

                if ob.intersects(&self.bird.rect) {
                    tick.crashed = true;
                    break;
                }

                if ob.passed_on(&self.bird.rect) {
                    ob.scored = true;
                    self.score += 1;
                    tick.scored += 1;
                    if self.score > self.best {
                        self.best = self.score;
                        self.best_raised = true;
                    }
                }
            }
            if tick.crashed {
                self.game_over();
                return tick;
            }
        }

        self.fly();

        let bird = &self.bird.rect;
        if bird.bottom() >= self.geometry.floor_top() || bird.y <= 0.0 {
            tick.crashed = true;
            self.game_over();
        }
        tick
    }

    /// End the run: zero the score, lay the pipes out again and park the
    /// bird. The record survives. Calling it again before anything moves
    /// changes nothing.
    pub fn game_over(&mut self) {
        if self.fresh {
            return;
        }
        log::debug!("game over with score {}", self.score);
        if self.best_raised {
            log::info!("new best score {}", self.best);
            self.best_raised = false;
        }

        self.score = 0;
        self.live = lay_out(&mut self.pool, &mut self.rng, &self.geometry);
        self.bird = Bird {
            rect: self.geometry.bird,
            velocity: 0.0,
            direction: Direction::Idle,
        };
        self.state = State::Ready;
        self.fresh = true;
    }

    fn animate(&mut self) {
        self.anim_tick += 1;
        if self.anim_tick > ANIM_INTERVAL {
            self.anim_tick = 0;
            self.frame = (self.frame + 1) % ANIM_FRAMES;
        }
    }

    fn fly(&mut self) {
        let bird = &mut self.bird;
        match bird.direction {
            Direction::Descend => bird.velocity += GRAVITY,
            // an impulse, not an acceleration
            Direction::Ascend => bird.velocity = FLAP_VELOCITY,
            Direction::Idle => return,
        }
        bird.rect.y += bird.velocity;
        self.fresh = false;
    }
}

// Pipes staggered off the right edge
fn lay_out<R: Rng>(
    pool: &mut ObstaclePool,
    rng: &mut R,
    geometry: &Geometry,
) -> [ObstacleId; LIVE_PIPES] {
    std::array::from_fn(|slot| {
        let id = pool.acquire(0.0, 0.0, geometry.pipe_w, geometry.pipe_h);
        let x = geometry.size + geometry.pipe_w + slot as f32 * PIPE_SPACING;
        pool[id].reset_to_new_position(x, &mut *rng);
        id
    })
}
