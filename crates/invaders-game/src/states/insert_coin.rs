use invaders_engine::input::Key;

use super::{GameCtx, GameState, Play, RenderFrame, Sprite, Transition};

/// "Push start" confirmation screen. Not part of the default flow.
#[derive(Debug, Default)]
pub struct InsertCoin;

impl GameState for InsertCoin {
    fn name(&self) -> &'static str {
        "insert-coin"
    }

    fn update(&mut self, ctx: &mut GameCtx<'_>, _dt: f32) -> Transition {
        if ctx.input.is_pressed(Key::Space) {
            return Transition::Switch(Box::new(Play::new()));
        }
        Transition::Stay
    }

    fn render(&self, frame: &mut RenderFrame<'_>) {
        let cx = frame.field.width / 2.0;
        let cy = frame.field.height / 2.0;
        frame.sprites.draw(Sprite::Ship, cx, cy, 32.0, 32.0);
    }
}
