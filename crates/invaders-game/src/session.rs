use log::info;

pub const STARTING_LIVES: u32 = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    GameOver,
    Win,
}

/// Final numbers of a finished run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RunSummary {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub outcome: Outcome,
}

/// Receives every change made through [`Session`]'s mutators.
pub trait SessionObserver {
    fn on_score(&mut self, _score: u32) {}
    fn on_lives(&mut self, _lives: u32) {}
    fn on_level(&mut self, _level: u32) {}
    fn on_game_over(&mut self, _summary: &RunSummary) {}
    fn on_win(&mut self, _summary: &RunSummary) {}
}

/// Logs HUD changes.
#[derive(Debug, Default)]
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_score(&mut self, score: u32) {
        log::debug!("SCORE {score:06}");
    }

    fn on_lives(&mut self, lives: u32) {
        log::debug!("LIVES {lives}");
    }

    fn on_game_over(&mut self, summary: &RunSummary) {
        info!("game over: score {:06}, level {}", summary.score, summary.level);
    }

    fn on_win(&mut self, summary: &RunSummary) {
        info!("you win: score {:06}, lives {}", summary.score, summary.lives);
    }
}

/// Score, lives, level and outcome of the current run.
///
/// All writes go through the mutators so the observer sees every change.
pub struct Session {
    score: u32,
    lives: u32,
    level: u32,
    outcome: Option<Outcome>,
    observer: Box<dyn SessionObserver>,
}

impl Session {
    pub fn new(observer: Box<dyn SessionObserver>) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            outcome: None,
            observer,
        }
    }

    pub fn reset_run(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.outcome = None;
        self.observer.on_score(self.score);
        self.observer.on_lives(self.lives);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.observer.on_score(self.score);
    }

    /// Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.observer.on_lives(self.lives);
        self.lives
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        self.observer.on_level(level);
    }

    /// No-op once an outcome is set.
    pub fn trigger_game_over(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(Outcome::GameOver);
        let summary = self.summary(Outcome::GameOver);
        self.observer.on_game_over(&summary);
    }

    /// No-op once an outcome is set.
    pub fn trigger_win(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(Outcome::Win);
        let summary = self.summary(Outcome::Win);
        self.observer.on_win(&summary);
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Summary of the finished run, `None` while it is still going.
    pub fn result(&self) -> Option<RunSummary> {
        self.outcome.map(|o| self.summary(o))
    }

    fn summary(&self, outcome: Outcome) -> RunSummary {
        RunSummary {
            score: self.score,
            lives: self.lives,
            level: self.level,
            outcome,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Box::new(LogObserver))
    }
}
