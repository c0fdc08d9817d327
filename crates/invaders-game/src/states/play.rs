use invaders_engine::input::Key;
use log::info;

use super::levels::{formation, MAX_LEVELS};
use super::{GameCtx, GameState, RenderFrame, Sprite, Transition};
use crate::entity::{Entity, Owner};
use crate::systems::{collides, integrate};

const PLAYER_SPEED: f32 = 300.0;
const SHOT_COOLDOWN: f32 = 0.5;
/// Player shots leave from this x offset inside the ship.
const MUZZLE_OFFSET: f32 = 12.0;
const PLAYER_SPAWN_FROM_BOTTOM: f32 = 100.0;

const EDGE_MARGIN: f32 = 10.0;
const DROP_STEP: f32 = 10.0;
const BASE_SPEED: f32 = 30.0;
const SPEED_PER_LEVEL: f32 = 20.0;
const SPEED_PER_POINT: f32 = 0.05;

const KILL_POINTS: u32 = 100;
const LEVEL_BONUS: u32 = 500;

const START_TEMPO_MS: f64 = 1000.0;
const TEMPO_FLOOR_MS: f64 = 200.0;
const TEMPO_RANGE_MS: f64 = 800.0;
/// Invader count the tempo curve is scaled against (the level-1 block).
const TEMPO_REFERENCE_COUNT: f64 = 18.0;

const KILL_SHAKE: (f32, f32) = (5.0, 0.2);
const PLAYER_HIT_SHAKE: (f32, f32) = (10.0, 0.5);
const HIT_STOP_ON_PLAYER_HIT: f32 = 0.1;

/// Active gameplay: player, invader formation, projectiles, levels.
#[derive(Debug, Clone)]
pub struct Play {
    level: u32,
    player: Entity,
    invaders: Vec<Entity>,
    projectiles: Vec<Entity>,
    /// +1 right, -1 left.
    direction: f32,
}

impl Default for Play {
    fn default() -> Self {
        Self::new()
    }
}

impl Play {
    pub fn new() -> Self {
        Self {
            level: 1,
            player: Entity::player(0.0, 0.0),
            invaders: Vec::new(),
            projectiles: Vec::new(),
            direction: 1.0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn invaders(&self) -> &[Entity] {
        &self.invaders
    }

    pub fn projectiles(&self) -> &[Entity] {
        &self.projectiles
    }

    /// Current shared formation speed in px/s.
    pub fn formation_speed(&self, score: u32) -> f32 {
        BASE_SPEED + (self.level - 1) as f32 * SPEED_PER_LEVEL + score as f32 * SPEED_PER_POINT
    }

    fn start_level(&mut self, ctx: &mut GameCtx<'_>, level: u32) {
        self.level = level;
        self.invaders = formation(level, ctx.field);
        self.projectiles.clear();
        self.player.pos.x = ctx.field.width / 2.0;
        self.direction = 1.0;
        ctx.session.set_level(level);
        info!("starting level {level}");
    }

    fn handle_input(&mut self, ctx: &mut GameCtx<'_>, dt: f32) {
        self.player.velocity.x = 0.0;
        if ctx.input.is_down(Key::ArrowLeft) || ctx.input.is_down(Key::A) {
            self.player.velocity.x = -PLAYER_SPEED;
        }
        if ctx.input.is_down(Key::ArrowRight) || ctx.input.is_down(Key::D) {
            self.player.velocity.x = PLAYER_SPEED;
        }

        let ready = self.player.cooldown().is_some_and(|c| c <= 0.0);
        if ctx.input.is_pressed(Key::Space) && ready {
            self.projectiles.push(Entity::projectile(
                self.player.pos.x + MUZZLE_OFFSET,
                self.player.pos.y,
                Owner::Player,
            ));
            if let Some(c) = self.player.cooldown_mut() {
                *c = SHOT_COOLDOWN;
            }
            ctx.audio.play_shoot();
        }

        if let Some(c) = self.player.cooldown_mut() {
            if *c > 0.0 {
                *c -= dt;
            }
        }
    }

    /// Steps the formation; a wall hit flips direction and drops every invader instead of moving.
    fn update_invaders(&mut self, ctx: &mut GameCtx<'_>, dt: f32) {
        let speed = self.formation_speed(ctx.session.score());
        let direction = self.direction;
        let field = ctx.field;

        let hit_edge = self.invaders.iter().filter(|i| i.active).any(|i| {
            if direction > 0.0 {
                i.pos.x + i.size.x >= field.width - EDGE_MARGIN
            } else {
                i.pos.x <= EDGE_MARGIN
            }
        });

        if hit_edge {
            self.direction = -self.direction;
            for inv in &mut self.invaders {
                inv.pos.y += DROP_STEP;
            }
        } else {
            for idx in 0..self.invaders.len() {
                let inv = &mut self.invaders[idx];
                inv.velocity.x = speed * direction;
                inv.velocity.y = 0.0;
                integrate(inv, dt, Some(field.bounds()));

                let inv = &self.invaders[idx];
                if !inv.active {
                    continue;
                }
                if inv.pos.y + inv.size.y >= field.height {
                    ctx.session.trigger_game_over();
                    return;
                }
                if collides(inv, &self.player) {
                    self.handle_player_hit(ctx);
                    return;
                }
            }
        }

        if !self.invaders.is_empty() {
            let ratio = self.invaders.len() as f64 / TEMPO_REFERENCE_COUNT;
            ctx.audio.set_tempo(TEMPO_FLOOR_MS + TEMPO_RANGE_MS * ratio);
        }
    }

    fn resolve_collisions(&mut self, ctx: &mut GameCtx<'_>) {
        let field_h = ctx.field.height;
        let mut player_hit = false;

        for p in self.projectiles.iter_mut().rev() {
            if !p.active {
                continue;
            }
            if p.pos.y + p.size.y < 0.0 || p.pos.y > field_h {
                p.active = false;
                continue;
            }

            match p.owner() {
                Some(Owner::Player) => {
                    if let Some(inv) = self.invaders.iter_mut().rev().find(|inv| collides(p, inv)) {
                        inv.active = false;
                        p.active = false;
                        ctx.session.add_score(KILL_POINTS);
                        ctx.audio.play_explosion();
                        ctx.arcade.trigger_shake(KILL_SHAKE.0, KILL_SHAKE.1);
                    }
                }
                Some(Owner::Enemy) => {
                    if !player_hit && collides(p, &self.player) {
                        p.active = false;
                        player_hit = true;
                    }
                }
                None => {}
            }
        }

        self.projectiles.retain(|p| p.active);
        self.invaders.retain(|i| i.active);

        if player_hit {
            self.handle_player_hit(ctx);
        }
    }

    fn handle_player_hit(&mut self, ctx: &mut GameCtx<'_>) {
        let lives = ctx.session.lose_life();
        ctx.audio.play_explosion();
        ctx.arcade.trigger_shake(PLAYER_HIT_SHAKE.0, PLAYER_HIT_SHAKE.1);
        ctx.arcade.trigger_hit_stop(HIT_STOP_ON_PLAYER_HIT);

        if lives == 0 {
            ctx.session.trigger_game_over();
        } else {
            self.projectiles.clear();
        }
    }

    fn check_level_clear(&mut self, ctx: &mut GameCtx<'_>) {
        if !self.invaders.is_empty() {
            return;
        }
        if self.level < MAX_LEVELS {
            let next = self.level + 1;
            self.start_level(ctx, next);
            ctx.session.add_score(LEVEL_BONUS * next);
        } else {
            ctx.session.trigger_win();
        }
    }
}

impl GameState for Play {
    fn name(&self) -> &'static str {
        "play"
    }

    fn enter(&mut self, ctx: &mut GameCtx<'_>) {
        self.player = Entity::player(ctx.field.width / 2.0, ctx.field.height - PLAYER_SPAWN_FROM_BOTTOM);
        ctx.session.reset_run();
        self.start_level(ctx, 1);
        ctx.audio.set_tempo(START_TEMPO_MS);
    }

    fn exit(&mut self, _ctx: &mut GameCtx<'_>) {
        self.projectiles.clear();
        self.invaders.clear();
    }

    fn update(&mut self, ctx: &mut GameCtx<'_>, dt: f32) -> Transition {
        self.handle_input(ctx, dt);

        integrate(&mut self.player, dt, Some(ctx.field.bounds()));
        for p in &mut self.projectiles {
            integrate(p, dt, None);
        }

        self.update_invaders(ctx, dt);
        if ctx.session.outcome().is_some() {
            return Transition::Stay;
        }

        self.resolve_collisions(ctx);
        if ctx.session.outcome().is_some() {
            return Transition::Stay;
        }

        self.check_level_clear(ctx);
        Transition::Stay
    }

    fn render(&self, frame: &mut RenderFrame<'_>) {
        let shake = frame.arcade.shake_offset();
        let mut draw = |sprite: Sprite, e: &Entity| {
            if e.active {
                frame.sprites.draw(sprite, e.pos.x + shake.x, e.pos.y + shake.y, e.size.x, e.size.y);
            }
        };

        draw(Sprite::Ship, &self.player);
        for inv in &self.invaders {
            draw(Sprite::Invader, inv);
        }
        for p in &self.projectiles {
            draw(Sprite::Ship, p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{DrawLog, Harness};
    use super::*;
    use crate::session::{Outcome, STARTING_LIVES};
    use crate::systems::ArcadeSystems;
    use invaders_engine::coords::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn entered(h: &mut Harness) -> Play {
        let mut play = Play::new();
        play.enter(&mut h.ctx());
        play
    }

    /// Parks the player in the bottom-left corner, away from the formation and any shots.
    fn park_player(play: &mut Play) {
        play.player.pos = Vec2::new(0.0, 560.0);
    }

    // ── setup ─────────────────────────────────────────────────────────────

    #[test]
    fn enter_resets_run_and_builds_level_one() {
        let mut h = Harness::new();
        h.session.add_score(999);
        let play = entered(&mut h);
        assert_eq!(play.level(), 1);
        assert_eq!(play.invaders().len(), 18);
        assert_eq!(play.player().pos, Vec2::new(400.0, 500.0));
        assert_eq!(h.session.score(), 0);
        assert_eq!(h.session.lives(), STARTING_LIVES);
        assert_eq!(h.audio.tempo, Some(1000.0));
    }

    #[test]
    fn formation_speed_tracks_level_and_score() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        assert_eq!(play.formation_speed(0), 30.0);
        play.level = 3;
        assert_eq!(play.formation_speed(200), 80.0);
    }

    // ── shooting ──────────────────────────────────────────────────────────

    #[test]
    fn fresh_space_press_fires_once_per_cooldown() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        h.press(Key::Space);
        play.update(&mut h.ctx(), DT);
        assert_eq!(play.projectiles().len(), 1);
        assert_eq!(h.audio.shots, 1);
        let shot = &play.projectiles()[0];
        assert_eq!(shot.owner(), Some(Owner::Player));

        // Still held on the next frame: not a fresh press.
        h.input.update();
        play.update(&mut h.ctx(), DT);
        assert_eq!(h.audio.shots, 1);

        // Fresh press inside the cooldown window is ignored.
        h.input.apply_event(&invaders_engine::input::InputEvent::Key {
            key: Key::Space,
            state: invaders_engine::input::KeyState::Released,
            repeat: false,
        });
        h.input.update();
        h.press(Key::Space);
        play.update(&mut h.ctx(), DT);
        assert_eq!(h.audio.shots, 1);
    }

    #[test]
    fn held_arrow_moves_player_and_clamps_to_field() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        h.press(Key::ArrowLeft);
        play.update(&mut h.ctx(), 0.1);
        assert_eq!(play.player().pos.x, 370.0);
        for _ in 0..20 {
            play.update(&mut h.ctx(), 0.1);
        }
        assert_eq!(play.player().pos.x, 0.0);
    }

    // ── formation ─────────────────────────────────────────────────────────

    #[test]
    fn formation_reverses_and_drops_at_the_right_wall() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        // Rightmost invader's right edge at field_w - 10.
        let shift = 790.0 - (50.0 + 5.0 * 39.0 + 24.0);
        for inv in &mut play.invaders {
            inv.pos.x += shift;
        }
        let before: Vec<Vec2> = play.invaders().iter().map(|i| i.pos).collect();

        play.update(&mut h.ctx(), DT);

        assert_eq!(play.direction, -1.0);
        for (inv, old) in play.invaders().iter().zip(before) {
            assert_eq!(inv.pos, Vec2::new(old.x, old.y + 10.0));
        }
    }

    #[test]
    fn formation_reverses_at_the_left_wall() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        play.direction = -1.0;
        play.invaders[0].pos.x = 10.0;
        play.update(&mut h.ctx(), DT);
        assert_eq!(play.direction, 1.0);
        assert_eq!(play.invaders()[0].pos, Vec2::new(10.0, 90.0));
    }

    #[test]
    fn formation_moves_horizontally_away_from_walls() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        play.update(&mut h.ctx(), 0.5);
        assert_eq!(play.invaders()[0].pos, Vec2::new(65.0, 80.0));
    }

    #[test]
    fn invader_reaching_the_bottom_ends_the_run() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        play.invaders[3].pos.y = 600.0 - 24.0;
        play.update(&mut h.ctx(), DT);
        assert_eq!(h.session.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn invader_touching_the_player_costs_a_life() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        let target = play.invaders[0].pos;
        play.player.pos = Vec2::new(target.x + 1.0, target.y + 1.0);
        play.update(&mut h.ctx(), DT);
        assert_eq!(h.session.lives(), 2);
        assert!(h.arcade.is_hit_stop_active());
        assert_eq!(h.audio.explosions, 1);
    }

    // ── collisions ────────────────────────────────────────────────────────

    #[test]
    fn hit_scores_once_even_with_overlapping_shots() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        // Isolate one invader so both shots can only ever hit it.
        play.invaders.truncate(1);
        let target = play.invaders[0].pos;
        for _ in 0..2 {
            play.projectiles.push(Entity::projectile(target.x + 5.0, target.y + 5.0, Owner::Player));
        }

        play.resolve_collisions(&mut h.ctx());

        assert_eq!(h.session.score(), 100);
        assert!(play.invaders().is_empty());
        assert_eq!(play.projectiles().len(), 1);
        assert_eq!(h.audio.explosions, 1);
        assert!(h.arcade.is_shaking());
    }

    #[test]
    fn shots_leaving_the_field_are_removed() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        play.projectiles.push(Entity::projectile(300.0, -11.0, Owner::Player));
        play.projectiles.push(Entity::projectile(300.0, 601.0, Owner::Enemy));
        play.projectiles.push(Entity::projectile(300.0, -5.0, Owner::Player));
        play.resolve_collisions(&mut h.ctx());
        assert_eq!(play.projectiles().len(), 1);
        assert_eq!(play.projectiles()[0].pos.y, -5.0);
    }

    #[test]
    fn enemy_shot_hits_the_player() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        let p = play.player().pos;
        play.projectiles.push(Entity::projectile(p.x + 10.0, p.y + 10.0, Owner::Enemy));
        play.projectiles.push(Entity::projectile(p.x + 12.0, p.y + 10.0, Owner::Enemy));
        play.resolve_collisions(&mut h.ctx());
        assert_eq!(h.session.lives(), 2);
        assert!(play.projectiles().is_empty());
    }

    // ── lives ─────────────────────────────────────────────────────────────

    #[test]
    fn three_hits_end_the_run_exactly_once() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        for _ in 0..3 {
            play.handle_player_hit(&mut h.ctx());
        }
        let result = h.session.result();
        assert_eq!(result.map(|r| (r.outcome, r.lives)), Some((Outcome::GameOver, 0)));

        play.handle_player_hit(&mut h.ctx());
        assert_eq!(h.session.result(), result);
    }

    #[test]
    fn surviving_a_hit_clears_projectiles() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        play.projectiles.push(Entity::projectile(300.0, 300.0, Owner::Player));
        play.handle_player_hit(&mut h.ctx());
        assert!(play.projectiles().is_empty());
        assert_eq!(h.session.outcome(), None);
    }

    // ── levels ────────────────────────────────────────────────────────────

    #[test]
    fn clearing_a_level_advances_with_bonus() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        play.invaders.clear();
        play.update(&mut h.ctx(), DT);
        assert_eq!(play.level(), 2);
        assert_eq!(h.session.level(), 2);
        assert_eq!(h.session.score(), 1000);
        assert!(!play.invaders().is_empty());
        assert_eq!(play.direction, 1.0);
        assert_eq!(play.player().pos.x, 400.0);
    }

    #[test]
    fn clearing_the_last_level_wins_without_regenerating() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        play.level = MAX_LEVELS;
        play.invaders.clear();
        play.update(&mut h.ctx(), DT);
        assert_eq!(h.session.outcome(), Some(Outcome::Win));
        assert!(play.invaders().is_empty());
        assert_eq!(h.session.score(), 0);
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn first_kill_speeds_up_the_music() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        assert_eq!(play.formation_speed(h.session.score()), 30.0);

        let target = play.invaders[17].pos;
        play.projectiles.push(Entity::projectile(target.x + 5.0, target.y + 20.0, Owner::Player));
        play.update(&mut h.ctx(), DT);
        assert_eq!(h.session.score(), 100);
        assert_eq!(play.invaders().len(), 17);

        play.update(&mut h.ctx(), DT);
        let tempo = h.audio.tempo.unwrap_or_default();
        assert!((tempo - (200.0 + 800.0 * 17.0 / 18.0)).abs() < 1e-6);
        assert!((tempo - 955.6).abs() < 0.1);
    }

    #[test]
    fn level_three_formation_slows_the_music_past_the_start_tempo() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        park_player(&mut play);
        play.level = 2;
        play.invaders.clear();
        play.update(&mut h.ctx(), DT);
        assert_eq!(play.level(), 3);
        assert_eq!(play.invaders().len(), 32);

        play.update(&mut h.ctx(), DT);
        let tempo = h.audio.tempo.unwrap_or_default();
        assert!((tempo - (200.0 + 800.0 * 32.0 / 18.0)).abs() < 1e-6);
        assert!(tempo > 1000.0);
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn renders_player_then_invaders_then_projectiles() {
        let mut h = Harness::new();
        let mut play = entered(&mut h);
        play.projectiles.push(Entity::projectile(1.0, 2.0, Owner::Player));
        let mut draws = DrawLog::default();
        let arcade = ArcadeSystems::new();
        play.render(&mut RenderFrame { sprites: &mut draws, arcade: &arcade, field: h.field });

        assert_eq!(draws.0.len(), 1 + 18 + 1);
        assert_eq!(draws.0[0], (Sprite::Ship, 400.0, 500.0, 32.0, 32.0));
        assert!(draws.0[1..19].iter().all(|d| d.0 == Sprite::Invader));
        assert_eq!(draws.0[19], (Sprite::Ship, 1.0, 2.0, 4.0, 10.0));
    }

    #[test]
    fn shake_offsets_every_sprite_by_the_same_vector() {
        let mut h = Harness::new();
        let play = entered(&mut h);
        let mut arcade = ArcadeSystems::new();
        arcade.trigger_shake(5.0, 1.0);
        let mut draws = DrawLog::default();
        play.render(&mut RenderFrame { sprites: &mut draws, arcade: &arcade, field: h.field });

        let dx = draws.0[0].1 - play.player().pos.x;
        let dy = draws.0[0].2 - play.player().pos.y;
        assert!(dx.abs() <= 5.0 && dy.abs() <= 5.0);
        for (d, inv) in draws.0[1..].iter().zip(play.invaders()) {
            assert!((d.1 - inv.pos.x - dx).abs() < 1e-4);
            assert!((d.2 - inv.pos.y - dy).abs() < 1e-4);
        }
    }
}
