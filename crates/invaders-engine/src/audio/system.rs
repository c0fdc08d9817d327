use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Source};

use super::tone::{Tone, ToneSpec};

/// Output gain applied to every sound.
pub const MASTER_GAIN: f32 = 0.1;

/// Bass notes of the march, cycled in order.
pub const BEAT_FREQUENCIES: [f32; 4] = [180.0, 170.0, 160.0, 150.0];

pub const DEFAULT_TEMPO_MS: f64 = 1000.0;
pub const MIN_TEMPO_MS: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to start music thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Sound sink used by gameplay.
pub trait SoundEffects {
    fn play_shoot(&mut self);
    fn play_explosion(&mut self);
    fn start_bgm(&mut self);
    fn stop_bgm(&mut self);
    /// Milliseconds between beats; values under 100 are raised to 100.
    fn set_tempo(&mut self, ms: f64);
}

/// Beat interval shared with the music thread.
#[derive(Debug, Clone)]
pub struct Tempo(Arc<AtomicU64>);

impl Default for Tempo {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPO_MS)
    }
}

impl Tempo {
    pub fn new(ms: f64) -> Self {
        let t = Self(Arc::new(AtomicU64::new(0)));
        t.set_ms(ms);
        t
    }

    pub fn set_ms(&self, ms: f64) {
        let ms = if ms.is_finite() { ms.max(MIN_TEMPO_MS) } else { DEFAULT_TEMPO_MS };
        self.0.store((ms * 1000.0).round() as u64, Ordering::Relaxed);
    }

    pub fn ms(&self) -> f64 {
        self.0.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn interval(&self) -> Duration {
        Duration::from_micros(self.0.load(Ordering::Relaxed))
    }
}

/// Cycles through [`BEAT_FREQUENCIES`].
#[derive(Debug, Default)]
pub struct BeatSequence {
    index: usize,
}

impl BeatSequence {
    pub fn next_frequency(&mut self) -> f32 {
        let f = BEAT_FREQUENCIES[self.index % BEAT_FREQUENCIES.len()];
        self.index += 1;
        f
    }
}

fn play(handle: &OutputStreamHandle, spec: ToneSpec) {
    if let Err(e) = handle.play_raw(Tone::new(spec).amplify(MASTER_GAIN)) {
        log::debug!("dropped sound: {e}");
    }
}

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

struct BgmLoop {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

impl BgmLoop {
    fn spawn(handle: OutputStreamHandle, tempo: Tempo) -> Result<Self, AudioError> {
        let (stop, rx) = mpsc::channel::<()>();
        let thread = thread::Builder::new().name("bgm".into()).spawn(move || {
            let mut seq = BeatSequence::default();
            loop {
                play(&handle, ToneSpec::beat(seq.next_frequency()));
                match rx.recv_timeout(tempo.interval()) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })?;
        Ok(Self { stop, thread })
    }

    fn stop(self) {
        let _ = self.stop.send(());
        if self.thread.join().is_err() {
            log::warn!("music thread panicked");
        }
    }
}

/// Synthesized sound effects and the background march.
///
/// If no output device can be opened the system is disabled and every
/// method is a no-op.
pub struct AudioSystem {
    output: Option<Output>,
    tempo: Tempo,
    bgm: Option<BgmLoop>,
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSystem {
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Self {
                output: Some(Output {
                    _stream: stream,
                    handle,
                }),
                tempo: Tempo::default(),
                bgm: None,
            },
            Err(e) => {
                log::warn!("{}; sound disabled", AudioError::from(e));
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            output: None,
            tempo: Tempo::default(),
            bgm: None,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    #[inline]
    pub fn is_bgm_running(&self) -> bool {
        self.bgm.is_some()
    }

    #[inline]
    pub fn tempo(&self) -> &Tempo {
        &self.tempo
    }
}

impl SoundEffects for AudioSystem {
    fn play_shoot(&mut self) {
        if let Some(out) = &self.output {
            play(&out.handle, ToneSpec::SHOOT);
        }
    }

    fn play_explosion(&mut self) {
        if let Some(out) = &self.output {
            play(&out.handle, ToneSpec::EXPLOSION);
        }
    }

    fn start_bgm(&mut self) {
        let Some(out) = &self.output else { return };
        if self.bgm.is_some() {
            return;
        }
        match BgmLoop::spawn(out.handle.clone(), self.tempo.clone()) {
            Ok(bgm) => self.bgm = Some(bgm),
            Err(e) => log::warn!("{e}"),
        }
    }

    fn stop_bgm(&mut self) {
        if let Some(bgm) = self.bgm.take() {
            bgm.stop();
        }
    }

    fn set_tempo(&mut self, ms: f64) {
        self.tempo.set_ms(ms);
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.stop_bgm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── tempo ─────────────────────────────────────────────────────────────

    #[test]
    fn tempo_defaults_to_one_second() {
        assert_eq!(Tempo::default().interval(), Duration::from_millis(1000));
    }

    #[test]
    fn tempo_is_clamped_to_minimum() {
        let t = Tempo::default();
        t.set_ms(40.0);
        assert_eq!(t.ms(), 100.0);
        t.set_ms(955.5);
        assert_eq!(t.ms(), 955.5);
    }

    #[test]
    fn tempo_clones_share_the_value() {
        let a = Tempo::default();
        let b = a.clone();
        a.set_ms(250.0);
        assert_eq!(b.interval(), Duration::from_millis(250));
    }

    // ── beats ─────────────────────────────────────────────────────────────

    #[test]
    fn beat_sequence_cycles_four_notes() {
        let mut seq = BeatSequence::default();
        let notes: Vec<f32> = (0..6).map(|_| seq.next_frequency()).collect();
        assert_eq!(notes, vec![180.0, 170.0, 160.0, 150.0, 180.0, 170.0]);
    }

    // ── disabled system ───────────────────────────────────────────────────

    #[test]
    fn disabled_system_is_a_no_op() {
        let mut audio = AudioSystem::disabled();
        audio.play_shoot();
        audio.play_explosion();
        audio.start_bgm();
        assert!(!audio.is_bgm_running());
        audio.stop_bgm();
        audio.set_tempo(10.0);
        assert_eq!(audio.tempo().ms(), 100.0);
    }
}
