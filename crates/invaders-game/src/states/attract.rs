use invaders_engine::input::Key;

use super::{GameCtx, GameState, Play, RenderFrame, Sprite, Transition};

const FLASH_PERIOD: f32 = 0.5;

/// Idle title screen; Space or Enter starts a run.
#[derive(Debug, Default)]
pub struct Attract {
    timer: f32,
    flash: bool,
}

impl Attract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flash_on(&self) -> bool {
        self.flash
    }
}

impl GameState for Attract {
    fn name(&self) -> &'static str {
        "attract"
    }

    fn update(&mut self, ctx: &mut GameCtx<'_>, dt: f32) -> Transition {
        self.timer += dt;
        if self.timer > FLASH_PERIOD {
            self.timer = 0.0;
            self.flash = !self.flash;
        }

        if ctx.input.is_pressed(Key::Space) || ctx.input.is_pressed(Key::Enter) {
            return Transition::Switch(Box::new(Play::new()));
        }
        Transition::Stay
    }

    fn render(&self, frame: &mut RenderFrame<'_>) {
        let cx = frame.field.width / 2.0;
        let cy = frame.field.height / 2.0;

        frame.sprites.draw(Sprite::Invader, cx - 50.0, cy - 50.0, 48.0, 48.0);
        frame.sprites.draw(Sprite::Ship, cx + 50.0, cy - 50.0, 48.0, 48.0);

        // Blinking "press start" marker.
        if self.flash {
            frame.sprites.draw(Sprite::Ship, cx - 8.0, cy + 40.0, 16.0, 16.0);
        }
    }
}
