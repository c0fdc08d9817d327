//! Game states and the machine that runs exactly one of them.
//!
//! A state never switches itself; it returns a [`Transition`] and the
//! [`StateMachine`] performs exit-then-enter.

mod attract;
mod insert_coin;
mod levels;
mod play;

pub use attract::Attract;
pub use insert_coin::InsertCoin;
pub use levels::{formation, MAX_LEVELS};
pub use play::Play;

use invaders_engine::audio::SoundEffects;
use invaders_engine::coords::Viewport;
use invaders_engine::input::{InputHandler, Key};
use log::debug;

use crate::session::Session;
use crate::systems::ArcadeSystems;

/// Shared game data handed to the active state.
pub struct GameCtx<'a> {
    pub session: &'a mut Session,
    pub input: &'a InputHandler,
    pub arcade: &'a mut ArcadeSystems,
    pub audio: &'a mut dyn SoundEffects,
    pub field: Viewport,
}

/// Sprite art known to the game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sprite {
    Ship,
    Invader,
}

/// Receives sprite draws in play-field pixels.
pub trait SpriteSink {
    fn draw(&mut self, sprite: Sprite, x: f32, y: f32, w: f32, h: f32);
}

pub struct RenderFrame<'a> {
    pub sprites: &'a mut dyn SpriteSink,
    pub arcade: &'a ArcadeSystems,
    pub field: Viewport,
}

pub enum Transition {
    Stay,
    Switch(Box<dyn GameState>),
}

pub trait GameState {
    fn name(&self) -> &'static str;

    fn enter(&mut self, _ctx: &mut GameCtx<'_>) {}

    fn exit(&mut self, _ctx: &mut GameCtx<'_>) {}

    fn update(&mut self, ctx: &mut GameCtx<'_>, dt: f32) -> Transition;

    fn render(&self, frame: &mut RenderFrame<'_>);

    fn on_key_down(&mut self, _ctx: &mut GameCtx<'_>, _key: Key) -> Transition {
        Transition::Stay
    }
}

#[derive(Default)]
pub struct StateMachine {
    current: Option<Box<dyn GameState>>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exits the active state (if any), then enters `next`.
    pub fn switch_state(&mut self, mut next: Box<dyn GameState>, ctx: &mut GameCtx<'_>) {
        if let Some(mut old) = self.current.take() {
            debug!("exit state {}", old.name());
            old.exit(ctx);
        }
        debug!("enter state {}", next.name());
        next.enter(ctx);
        self.current = Some(next);
    }

    pub fn update(&mut self, ctx: &mut GameCtx<'_>, dt: f32) {
        let transition = match self.current.as_mut() {
            Some(state) => state.update(ctx, dt),
            None => Transition::Stay,
        };
        self.apply(transition, ctx);
    }

    pub fn on_key_down(&mut self, ctx: &mut GameCtx<'_>, key: Key) {
        let transition = match self.current.as_mut() {
            Some(state) => state.on_key_down(ctx, key),
            None => Transition::Stay,
        };
        self.apply(transition, ctx);
    }

    pub fn render(&self, frame: &mut RenderFrame<'_>) {
        if let Some(state) = &self.current {
            state.render(frame);
        }
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|s| s.name())
    }

    fn apply(&mut self, transition: Transition, ctx: &mut GameCtx<'_>) {
        if let Transition::Switch(next) = transition {
            self.switch_state(next, ctx);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records audio calls instead of playing them.
    #[derive(Debug, Default)]
    pub struct SilentAudio {
        pub shots: u32,
        pub explosions: u32,
        pub bgm_running: bool,
        pub tempo: Option<f64>,
    }

    impl SoundEffects for SilentAudio {
        fn play_shoot(&mut self) {
            self.shots += 1;
        }
        fn play_explosion(&mut self) {
            self.explosions += 1;
        }
        fn start_bgm(&mut self) {
            self.bgm_running = true;
        }
        fn stop_bgm(&mut self) {
            self.bgm_running = false;
        }
        fn set_tempo(&mut self, ms: f64) {
            self.tempo = Some(ms.max(100.0));
        }
    }

    /// Collects every draw in order.
    #[derive(Debug, Default)]
    pub struct DrawLog(pub Vec<(Sprite, f32, f32, f32, f32)>);

    impl SpriteSink for DrawLog {
        fn draw(&mut self, sprite: Sprite, x: f32, y: f32, w: f32, h: f32) {
            self.0.push((sprite, x, y, w, h));
        }
    }

    /// Owns everything a [`GameCtx`] borrows.
    pub struct Harness {
        pub session: Session,
        pub input: InputHandler,
        pub arcade: ArcadeSystems,
        pub audio: SilentAudio,
        pub field: Viewport,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                session: Session::default(),
                input: InputHandler::new(),
                arcade: ArcadeSystems::new(),
                audio: SilentAudio::default(),
                field: Viewport::new(800.0, 600.0),
            }
        }

        pub fn ctx(&mut self) -> GameCtx<'_> {
            GameCtx {
                session: &mut self.session,
                input: &self.input,
                arcade: &mut self.arcade,
                audio: &mut self.audio,
                field: self.field,
            }
        }

        pub fn press(&mut self, key: Key) {
            self.input.apply_event(&invaders_engine::input::InputEvent::Key {
                key,
                state: invaders_engine::input::KeyState::Pressed,
                repeat: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{DrawLog, Harness};
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        next: Option<&'static str>,
    }

    impl GameState for Probe {
        fn name(&self) -> &'static str {
            self.name
        }
        fn enter(&mut self, _ctx: &mut GameCtx<'_>) {
            self.log.borrow_mut().push(format!("enter {}", self.name));
        }
        fn exit(&mut self, _ctx: &mut GameCtx<'_>) {
            self.log.borrow_mut().push(format!("exit {}", self.name));
        }
        fn update(&mut self, _ctx: &mut GameCtx<'_>, _dt: f32) -> Transition {
            match self.next.take() {
                Some(name) => Transition::Switch(Box::new(Probe { name, log: self.log.clone(), next: None })),
                None => Transition::Stay,
            }
        }
        fn render(&self, _frame: &mut RenderFrame<'_>) {}
    }

    #[test]
    fn switch_exits_old_before_entering_new() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut h = Harness::new();
        let mut sm = StateMachine::new();
        sm.switch_state(Box::new(Probe { name: "a", log: log.clone(), next: Some("b") }), &mut h.ctx());
        sm.update(&mut h.ctx(), 0.016);
        assert_eq!(*log.borrow(), vec!["enter a", "exit a", "enter b"]);
        assert_eq!(sm.current_name(), Some("b"));
    }

    #[test]
    fn empty_machine_is_inert() {
        let mut h = Harness::new();
        let mut sm = StateMachine::new();
        sm.update(&mut h.ctx(), 0.016);
        let mut draws = DrawLog::default();
        let arcade = ArcadeSystems::new();
        sm.render(&mut RenderFrame { sprites: &mut draws, arcade: &arcade, field: h.field });
        assert!(draws.0.is_empty());
        assert_eq!(sm.current_name(), None);
    }
}
