//! Fixed-cadence frame loop.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::config::FRAME_RATE;
use crate::error::Result;
use crate::input::{self, HostEvent, PointerEvent};
use crate::sim::{Game, Tick};

/// Where finished frames go.
pub trait Frontend {
    fn resize(&mut self, cols: u16, rows: u16);
    fn present<R: Rng>(&mut self, game: &Game<R>, tick: Tick) -> Result<()>;
}

/// Runs update and present back to back, then sleeps a fixed period.
/// Frame time is not measured.
pub struct FrameDriver {
    events: Receiver<HostEvent>,
    period: Duration,
    // A release held back so the press before it gets its own tick
    deferred: Option<HostEvent>,
}

impl FrameDriver {
    pub fn new(events: Receiver<HostEvent>) -> Self {
        Self {
            events,
            period: Duration::from_millis(1000 / FRAME_RATE),
            deferred: None,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Loop until a quit event arrives or the input side goes away.
    pub fn run<R: Rng>(&mut self, game: &mut Game<R>, frontend: &mut impl Frontend) -> Result<()> {
        while self.step(game, frontend)? {
            thread::sleep(self.period);
        }
        log::debug!("frame loop stopped");
        Ok(())
    }

    /// One frame: drain input, update, present. Returns false when the
    /// loop should stop; in that case nothing is updated.
    pub fn step<R: Rng>(&mut self, game: &mut Game<R>, frontend: &mut impl Frontend) -> Result<bool> {
        if !self.drain(game, frontend) {
            return Ok(false);
        }
        let tick = game.update();
        frontend.present(game, tick)?;
        Ok(true)
    }

    fn drain<R: Rng>(&mut self, game: &mut Game<R>, frontend: &mut impl Frontend) -> bool {
        let mut pressed = false;
        loop {
            let event = match self.deferred.take() {
                Some(event) => event,
                None => match self.events.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Empty) => return true,
                    Err(TryRecvError::Disconnected) => return false,
                },
            };
            match event {
                HostEvent::Pointer(PointerEvent::Up) if pressed => {
                    self.deferred = Some(event);
                    return true;
                }
                HostEvent::Pointer(pointer) => {
                    pressed |= pointer == PointerEvent::Down;
                    input::apply(game, pointer);
                }
                HostEvent::Resize(cols, rows) => frontend.resize(cols, rows),
                HostEvent::Quit => return false,
            }
        }
    }
}
