//! Flappy Term - tap to flap through an endless stream of pipes
//!
//! Core modules:
//! - `sim`: per-frame simulation (scrolling, pipes, collisions, scoring)
//! - `obstacle`: pipe pairs and the fixed pool they are recycled from
//! - `driver`: fixed-cadence frame loop fed by the input channel
//! - `input`: terminal events to pointer-down / pointer-up signals
//! - `render`: off-screen canvas and half-block terminal presenter
//! - `assets`: built-in pixel-art bitmaps, loaded fail-fast
//! - `audio`: synthesized sound effects
//! - `term`: raw-mode alternate screen, restored on drop

pub mod assets;
pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod font;
pub mod geom;
pub mod input;
pub mod obstacle;
pub mod palette;
pub mod render;
pub mod sim;
pub mod term;

pub use error::{Error, Result};
pub use geom::Rect;
pub use sim::{Direction, Game, State, Tick};
