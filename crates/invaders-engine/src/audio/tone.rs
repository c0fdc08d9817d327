//! Synthesized one-shot tones.

use std::time::Duration;

use rodio::Source;

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
}

/// Exponential sweep from `start` to `end` over the tone's duration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ramp {
    pub start: f32,
    pub end: f32,
}

impl Ramp {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Value at `t` in 0..=1. Both endpoints must be positive.
    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        self.start * (self.end / self.start).powf(t.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub frequency: Ramp,
    pub gain: Ramp,
    pub duration: Duration,
}

impl ToneSpec {
    /// Laser: square, 800 Hz down to 100 Hz over 0.1 s.
    pub const SHOOT: ToneSpec = ToneSpec {
        waveform: Waveform::Square,
        frequency: Ramp::new(800.0, 100.0),
        gain: Ramp::new(0.1, 0.01),
        duration: Duration::from_millis(100),
    };

    /// Explosion: sawtooth, 100 Hz down to 10 Hz over 0.3 s.
    pub const EXPLOSION: ToneSpec = ToneSpec {
        waveform: Waveform::Sawtooth,
        frequency: Ramp::new(100.0, 10.0),
        gain: Ramp::new(0.2, 0.01),
        duration: Duration::from_millis(300),
    };

    /// One bass beat of the march: square, `freq` sliding 20 Hz down over 0.1 s.
    pub fn beat(freq: f32) -> ToneSpec {
        ToneSpec {
            waveform: Waveform::Square,
            frequency: Ramp::new(freq, freq - 20.0),
            gain: Ramp::new(0.1, 0.001),
            duration: Duration::from_millis(100),
        }
    }
}

/// Mono sample stream for one [`ToneSpec`].
#[derive(Debug, Clone)]
pub struct Tone {
    spec: ToneSpec,
    index: u64,
    total: u64,
    phase: f32,
}

impl Tone {
    pub fn new(spec: ToneSpec) -> Self {
        let total = (spec.duration.as_secs_f64() * SAMPLE_RATE as f64).round() as u64;
        Self {
            spec,
            index: 0,
            total,
            phase: 0.0,
        }
    }

    /// Number of samples the tone produces.
    #[inline]
    pub fn len(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / self.total as f32;
        let freq = self.spec.frequency.at(t);
        let gain = self.spec.gain.at(t);

        let osc = match self.spec.waveform {
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
        };

        self.phase = (self.phase + freq / SAMPLE_RATE as f32).fract();
        self.index += 1;
        Some(osc * gain)
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total - self.index) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.spec.duration)
    }
}
