//! Synthesized audio: one-shot tones and the background march.

mod system;
mod tone;

pub use system::{
    AudioError, AudioSystem, BeatSequence, SoundEffects, Tempo, BEAT_FREQUENCIES,
    DEFAULT_TEMPO_MS, MASTER_GAIN, MIN_TEMPO_MS,
};
pub use tone::{Ramp, Tone, ToneSpec, Waveform, SAMPLE_RATE};
