use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};

use crate::retry::RetryPolicy;

/// Runtime settings, environment-overridable with defaults matching the
/// published snapshots.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory for the leaderboard CSV snapshots.
    pub csv_dir: PathBuf,
    /// Season string in service format, e.g. "2025-26".
    pub season: String,
    pub season_type: String,
    pub leaders_top_n: usize,
    /// Attempted-shot gate for the shot-quality ranking.
    pub moreyball_min_attempts: f64,
    /// Minutes-played gate for the distance leaderboard.
    pub distance_min_minutes: f64,
    /// Attempt gate for the per-player shot-distance aggregate.
    pub shot_distance_min_attempts: f64,
    /// Row count of the trimmed YAML snapshots.
    pub yaml_trim: usize,
    pub retry: RetryPolicy,
}

impl Settings {
    pub fn from_env() -> Self {
        let attempts = env_u32("SNAPSHOT_RETRY_ATTEMPTS", 3).clamp(1, 10);
        let delay_ms = env_u64("SNAPSHOT_RETRY_DELAY_MS", 300);
        Self {
            csv_dir: PathBuf::from(
                env::var("SNAPSHOT_CSV_DIR").unwrap_or_else(|_| "data/dynamic".to_string()),
            ),
            season: env::var("SNAPSHOT_SEASON")
                .unwrap_or_else(|_| current_season(Local::now().date_naive())),
            season_type: env::var("SNAPSHOT_SEASON_TYPE")
                .unwrap_or_else(|_| "Regular Season".to_string()),
            leaders_top_n: env_usize("LEADERS_TOP_N", 50).clamp(1, 500),
            moreyball_min_attempts: env_f64("MOREYBALL_MIN_FGA", 200.0),
            distance_min_minutes: env_f64("DISTANCE_MIN_MINUTES", 500.0),
            shot_distance_min_attempts: env_f64("SHOT_DISTANCE_MIN_FGA", 50.0),
            yaml_trim: env_usize("SNAPSHOT_YAML_TRIM", 30).max(1),
            retry: RetryPolicy::new(attempts, Duration::from_millis(delay_ms)),
        }
    }

    /// Short tag for season-stamped filenames: "2024-25" becomes "24-25".
    pub fn season_tag(&self) -> String {
        self.season.get(2..).unwrap_or(&self.season).to_string()
    }
}

/// Seasons roll over in October.
pub fn current_season(today: NaiveDate) -> String {
    let start_year = if today.month() >= 10 {
        today.year()
    } else {
        today.year() - 1
    };
    format!("{start_year}-{:02}", (start_year + 1) % 100)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}
