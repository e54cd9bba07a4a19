//! Synthesized sound effects.

use fundsp::prelude32::{AudioUnit, lfo, saw, sine};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::error::Result;

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// A pipe was cleared
    Point,
    /// The run ended
    Death,
}

/// Render `sound` to mono samples.
pub fn synth(sound: Sound) -> Vec<f32> {
    match sound {
        Sound::Point => {
            // two rising notes
            let freq = lfo(|t: f32| if t < 0.06 { 880.0 } else { 1320.0 });
            let gain = lfo(|t: f32| 0.1 * (1.0 - (t / 0.15).min(1.0)));
            render(Box::new((freq >> sine()) * gain), 0.15)
        }
        Sound::Death => {
            // 400 Hz down to 80 Hz over 0.4 s, fading out over 0.5 s
            let freq = lfo(|t: f32| 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0));
            let gain = lfo(|t: f32| 0.15 * (1.0 - (t / 0.5).min(1.0)));
            render(Box::new((freq >> saw()) * gain), 0.5)
        }
    }
}

fn render(mut unit: Box<dyn AudioUnit>, secs: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    unit.reset();
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

/// Output device plus pre-rendered effects.
pub struct Sfx {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    point: Vec<f32>,
    death: Vec<f32>,
}

impl Sfx {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            point: synth(Sound::Point),
            death: synth(Sound::Death),
        })
    }

    /// Play in the background. Playback failures are logged and dropped.
    pub fn play(&self, sound: Sound) {
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("cannot play {sound:?}: {e}");
                return;
            }
        };
        let samples = match sound {
            Sound::Point => self.point.clone(),
            Sound::Death => self.death.clone(),
        };
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
        sink.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_lasts_half_a_second() {
        let samples = synth(Sound::Death);
        assert_eq!(samples.len(), 22_050);
        assert!(samples.iter().all(|s| s.abs() <= 0.2));
        assert!(samples.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn point_is_short_and_quiet() {
        let samples = synth(Sound::Point);
        assert_eq!(samples.len(), 6_615);
        assert!(samples.iter().all(|s| s.abs() <= 0.11));
    }
}
