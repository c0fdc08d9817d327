//! High-score persistence client.
//!
//! Failures never reach gameplay: submission reports `false`, the leaderboard comes
//! back empty, and the cause is logged.

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub email: String,
    #[serde(deserialize_with = "score_from_number_or_string")]
    pub score: u64,
    pub date: String,
}

/// Some backends return integer columns as JSON strings.
fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Client side of the score store.
pub trait ScoreService: Send + Sync {
    /// Records `score` for `email`. `false` on any failure.
    fn submit_score(&self, email: &str, score: u64) -> bool;

    /// Top scores, highest first. `limit` is clamped to `1..=100`; empty on any failure.
    fn leaderboard(&self, limit: u32) -> Vec<ScoreEntry>;
}

#[inline]
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LEADERBOARD_LIMIT)
}

/// Minimal client-side email check: non-empty and contains `@`.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.contains('@')
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    email: &'a str,
    score: u64,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
}

/// REST client: `POST {base}/api/scores`, `GET {base}/api/leaderboard?limit=N`.
pub struct HttpScoreClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpScoreClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scores_url(&self) -> String {
        format!("{}/api/scores", self.base_url)
    }

    pub fn leaderboard_url(&self, limit: u32) -> String {
        format!("{}/api/leaderboard?limit={}", self.base_url, clamp_limit(limit))
    }

    fn try_submit(&self, email: &str, score: u64) -> Result<bool, reqwest::Error> {
        let resp = self
            .client
            .post(self.scores_url())
            .json(&SubmitRequest { email, score })
            .send()?;
        let status = resp.status();
        let body: SubmitResponse = resp.json()?;
        Ok(status.is_success() && body.success)
    }

    fn try_leaderboard(&self, limit: u32) -> Result<Vec<ScoreEntry>, reqwest::Error> {
        self.client
            .get(self.leaderboard_url(limit))
            .send()?
            .error_for_status()?
            .json()
    }
}

impl ScoreService for HttpScoreClient {
    fn submit_score(&self, email: &str, score: u64) -> bool {
        match self.try_submit(email, score) {
            Ok(true) => {
                info!("score {score} submitted for {email}");
                true
            }
            Ok(false) => {
                warn!("score service rejected score {score} for {email}");
                false
            }
            Err(e) => {
                warn!("score submission failed: {e}");
                false
            }
        }
    }

    fn leaderboard(&self, limit: u32) -> Vec<ScoreEntry> {
        self.try_leaderboard(limit).unwrap_or_else(|e| {
            warn!("leaderboard fetch failed: {e}");
            Vec::new()
        })
    }
}

/// In-process append-only store with the same contract as the REST service.
#[derive(Debug, Default)]
pub struct MemoryScoreBoard {
    rows: Mutex<Vec<ScoreEntry>>,
}

impl MemoryScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreService for MemoryScoreBoard {
    fn submit_score(&self, email: &str, score: u64) -> bool {
        if !is_valid_email(email) {
            warn!("rejected score for invalid email {email:?}");
            return false;
        }
        let Ok(mut rows) = self.rows.lock() else {
            return false;
        };
        rows.push(ScoreEntry {
            email: email.trim().to_string(),
            score,
            date: Utc::now().format(DATE_FORMAT).to_string(),
        });
        true
    }

    fn leaderboard(&self, limit: u32) -> Vec<ScoreEntry> {
        let Ok(rows) = self.rows.lock() else {
            return Vec::new();
        };
        let mut sorted = rows.clone();
        // Stable: equal scores keep insertion order.
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(clamp_limit(limit) as usize);
        sorted
    }
}
