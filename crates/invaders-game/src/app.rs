use std::sync::Arc;
use std::thread::{self, JoinHandle};

use invaders_engine::audio::AudioSystem;
use invaders_engine::coords::ColorRgba;
use invaders_engine::core::{App, AppControl, FrameCtx};
use invaders_engine::input::{InputEvent, InputHandler, Key};
use invaders_engine::render::{PostProcessor, RenderCtx, RenderTarget, SpriteRenderer, Texture};
use invaders_engine::RenderError;
use log::{error, info, warn};

use crate::config::GameConfig;
use crate::game::Game;
use crate::scores::{
    is_valid_email, HttpScoreClient, MemoryScoreBoard, ScoreService, DEFAULT_LEADERBOARD_LIMIT,
};
use crate::session::RunSummary;
use crate::states::{Sprite, SpriteSink};

/// GPU resources, created on the first frame once a device exists.
struct Graphics {
    sprites: SpriteRenderer,
    post: PostProcessor,
    ship: Texture,
    invader: Texture,
}

impl Graphics {
    fn new(rctx: &RenderCtx<'_>, config: &GameConfig) -> Result<Self, RenderError> {
        let post = PostProcessor::new(rctx, config.field())?;
        let sprites = SpriteRenderer::new(rctx, post.format())?;
        Ok(Self {
            sprites,
            post,
            ship: Texture::from_url(rctx, &config.ship_asset),
            invader: Texture::from_url(rctx, &config.invader_asset),
        })
    }

    fn poll(&mut self, rctx: &RenderCtx<'_>) {
        self.ship.poll(rctx);
        self.invader.poll(rctx);
    }
}

/// Routes game sprite draws to the sprite renderer.
struct TextureSink<'a> {
    renderer: &'a mut SpriteRenderer,
    ship: &'a Texture,
    invader: &'a Texture,
}

impl SpriteSink for TextureSink<'_> {
    fn draw(&mut self, sprite: Sprite, x: f32, y: f32, w: f32, h: f32) {
        let texture = match sprite {
            Sprite::Ship => self.ship,
            Sprite::Invader => self.invader,
        };
        self.renderer.draw_sprite(texture, x, y, w, h);
    }
}

/// Windowed Invaders: drives [`Game`] from the engine's frame loop.
pub struct InvadersApp {
    config: GameConfig,
    game: Game<AudioSystem>,
    graphics: Option<Graphics>,
    scores: Arc<dyn ScoreService>,
    started: bool,
    reporter: Option<JoinHandle<()>>,
}

impl InvadersApp {
    pub fn new(config: GameConfig) -> Self {
        let scores = score_service(&config);
        let game = Game::with_default_audio(config.field()).skip_attract(config.skip_attract);
        Self {
            config,
            game,
            graphics: None,
            scores,
            started: false,
            reporter: None,
        }
    }

    fn finish(&mut self) {
        let Some(summary) = self.game.session().result() else {
            return;
        };
        let scores = Arc::clone(&self.scores);
        let email = self.config.player_email.clone();

        let spawned = thread::Builder::new()
            .name("score-report".into())
            .spawn(move || report(scores.as_ref(), email.as_deref(), &summary));
        match spawned {
            Ok(handle) => self.reporter = Some(handle),
            Err(e) => warn!("could not start score reporter: {e}"),
        }
    }
}

fn score_service(config: &GameConfig) -> Arc<dyn ScoreService> {
    if let Some(url) = &config.score_endpoint {
        match HttpScoreClient::new(url.as_str()) {
            Ok(client) => return Arc::new(client),
            Err(e) => warn!("score client for {url} unavailable, keeping scores in memory: {e}"),
        }
    }
    Arc::new(MemoryScoreBoard::new())
}

fn report(scores: &dyn ScoreService, email: Option<&str>, summary: &RunSummary) {
    match email {
        Some(email) if is_valid_email(email) => {
            scores.submit_score(email, u64::from(summary.score));
        }
        Some(email) => warn!("not submitting score: invalid player id {email:?}"),
        None => warn!("not submitting score: no player configured"),
    }

    let board = scores.leaderboard(DEFAULT_LEADERBOARD_LIMIT);
    info!("leaderboard ({} entries)", board.len());
    for (rank, entry) in board.iter().enumerate() {
        info!("{:>3}. {:06}  {}  {}", rank + 1, entry.score, entry.email, entry.date);
    }
}

impl App for InvadersApp {
    fn on_input(&mut self, event: &InputEvent, input: &InputHandler) -> AppControl {
        match event.key_down() {
            Some(Key::Escape) => {
                info!("quit requested");
                self.game.stop();
                AppControl::Exit
            }
            Some(key) => {
                self.game.on_key_down(input, key);
                AppControl::Continue
            }
            None => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // ── Setup ─────────────────────────────────────────────────────────
        if self.graphics.is_none() {
            match Graphics::new(&ctx.graphics.render_ctx(), &self.config) {
                Ok(g) => self.graphics = Some(g),
                Err(e) => {
                    error!("renderer setup failed: {e}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(gfx) = self.graphics.as_mut() else {
            return AppControl::Exit;
        };
        gfx.poll(&ctx.graphics.render_ctx());

        if !self.started {
            self.game.start(ctx.input);
            self.started = true;
        }

        // ── Update ────────────────────────────────────────────────────────
        self.game.update(ctx.input, ctx.time.dt);

        // ── Render ────────────────────────────────────────────────────────
        let time = ctx.time.elapsed;
        let game = &self.game;
        let control = ctx.render(ColorRgba::black(), |rctx, target| {
            let Graphics { sprites, post, ship, invader } = gfx;
            let scene = post.bind_for_writing(target.encoder);

            sprites.begin(post.field());
            game.render(&mut TextureSink { renderer: &mut *sprites, ship: &*ship, invader: &*invader });
            sprites.end(rctx, &mut RenderTarget::new(&mut *target.encoder, scene));

            post.render_to_screen(rctx, target.encoder, target.color_view, time);
        });

        ctx.input.update();

        if !self.game.is_running() {
            self.finish();
            return AppControl::Exit;
        }
        control
    }
}

impl Drop for InvadersApp {
    fn drop(&mut self) {
        if let Some(handle) = self.reporter.take() {
            if handle.join().is_err() {
                warn!("score reporter panicked");
            }
        }
    }
}
