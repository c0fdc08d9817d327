use invaders_engine::coords::Viewport;

pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

/// Game configuration.
///
/// Every field has a default; `from_env` overrides them from `INVADERS_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub field_width: f32,
    pub field_height: f32,
    /// Path or http(s) URL of the ship sprite.
    pub ship_asset: String,
    /// Path or http(s) URL of the invader sprite.
    pub invader_asset: String,
    /// Identifier the score is submitted under; `None` skips submission.
    pub player_email: Option<String>,
    /// Base URL of the score service; `None` keeps scores in memory.
    pub score_endpoint: Option<String>,
    /// Start directly in Play instead of the attract screen.
    pub skip_attract: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            ship_asset: "assets/ship.png".to_string(),
            invader_asset: "assets/invader.png".to_string(),
            player_email: None,
            score_endpoint: None,
            skip_attract: false,
        }
    }
}

impl GameConfig {
    /// Reads `INVADERS_SHIP_ASSET`, `INVADERS_INVADER_ASSET`, `INVADERS_PLAYER`,
    /// `INVADERS_SCORE_URL` and `INVADERS_SKIP_ATTRACT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut cfg = Self::default();
        if let Some(v) = non_empty("INVADERS_SHIP_ASSET") {
            cfg.ship_asset = v;
        }
        if let Some(v) = non_empty("INVADERS_INVADER_ASSET") {
            cfg.invader_asset = v;
        }
        cfg.player_email = non_empty("INVADERS_PLAYER");
        cfg.score_endpoint = non_empty("INVADERS_SCORE_URL").map(|v| v.trim_end_matches('/').to_string());
        cfg.skip_attract = non_empty("INVADERS_SKIP_ATTRACT")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        cfg
    }

    #[inline]
    pub fn field(&self) -> Viewport {
        Viewport::new(self.field_width, self.field_height)
    }
}
