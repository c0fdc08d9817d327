use invaders_engine::audio::{AudioSystem, SoundEffects};
use invaders_engine::coords::Viewport;
use invaders_engine::input::{InputHandler, Key};
use log::info;

use crate::session::{LogObserver, Session, SessionObserver};
use crate::states::{Attract, GameCtx, Play, RenderFrame, SpriteSink, StateMachine};
use crate::systems::ArcadeSystems;

const START_TEMPO_MS: f64 = 1000.0;

/// Frame-driven orchestrator: arcade timers, the active state and the run lifecycle.
///
/// Rendering backends stay outside; [`render`](Self::render) emits sprite draws into a
/// [`SpriteSink`].
pub struct Game<A: SoundEffects = AudioSystem> {
    session: Session,
    arcade: ArcadeSystems,
    machine: StateMachine,
    audio: A,
    field: Viewport,
    running: bool,
    skip_attract: bool,
}

impl Game<AudioSystem> {
    /// Game on the default audio output, logging HUD changes.
    pub fn with_default_audio(field: Viewport) -> Self {
        Self::new(AudioSystem::new(), field, Box::new(LogObserver))
    }
}

impl<A: SoundEffects> Game<A> {
    pub fn new(audio: A, field: Viewport, observer: Box<dyn SessionObserver>) -> Self {
        Self {
            session: Session::new(observer),
            arcade: ArcadeSystems::new(),
            machine: StateMachine::new(),
            audio,
            field,
            running: false,
            skip_attract: false,
        }
    }

    /// Start straight in Play instead of the attract screen.
    pub fn skip_attract(mut self, skip: bool) -> Self {
        self.skip_attract = skip;
        self
    }

    pub fn start(&mut self, input: &InputHandler) {
        self.running = true;
        self.audio.start_bgm();
        self.audio.set_tempo(START_TEMPO_MS);

        let Self { session, arcade, machine, audio, field, skip_attract, .. } = self;
        let mut ctx = GameCtx { session, input, arcade, audio, field: *field };
        if *skip_attract {
            machine.switch_state(Box::new(Play::new()), &mut ctx);
        } else {
            machine.switch_state(Box::new(Attract::new()), &mut ctx);
        }
    }

    /// One logic step. Arcade timers always tick; the state is frozen during hit-stop.
    pub fn update(&mut self, input: &InputHandler, dt: f32) {
        if !self.running {
            return;
        }

        self.arcade.update(dt);
        if !self.arcade.is_hit_stop_active() {
            let Self { session, arcade, machine, audio, field, .. } = self;
            let mut ctx = GameCtx { session, input, arcade, audio, field: *field };
            machine.update(&mut ctx, dt);
        }

        if let Some(outcome) = self.session.outcome() {
            info!("run ended: {outcome:?}");
            self.stop();
        }
    }

    pub fn on_key_down(&mut self, input: &InputHandler, key: Key) {
        if !self.running {
            return;
        }
        let Self { session, arcade, machine, audio, field, .. } = self;
        let mut ctx = GameCtx { session, input, arcade, audio, field: *field };
        machine.on_key_down(&mut ctx, key);
    }

    pub fn render(&self, sprites: &mut dyn SpriteSink) {
        self.machine.render(&mut RenderFrame {
            sprites,
            arcade: &self.arcade,
            field: self.field,
        });
    }

    /// Halts updates and stops the background music. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.audio.stop_bgm();
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state_name(&self) -> Option<&'static str> {
        self.machine.current_name()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn arcade(&self) -> &ArcadeSystems {
        &self.arcade
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn field(&self) -> Viewport {
        self.field
    }
}

impl<A: SoundEffects> Drop for Game<A> {
    fn drop(&mut self) {
        self.stop();
    }
}
