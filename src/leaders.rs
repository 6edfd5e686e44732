use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::config::Settings;
use crate::stats_api::{self, ApiError, StatTable};

/// Leaderboard categories, by service abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCategory {
    Points,
    Rebounds,
    Assists,
}

impl StatCategory {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            StatCategory::Points => "PTS",
            StatCategory::Rebounds => "REB",
            StatCategory::Assists => "AST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerMode {
    PerGame,
    Totals,
}

impl PerMode {
    pub fn as_param(&self) -> &'static str {
        match self {
            PerMode::PerGame => "PerGame",
            PerMode::Totals => "Totals",
        }
    }
}

/// Fetch one leaderboard, truncated to the configured top N. Single
/// attempt: a failing category is skipped by the driver, not retried.
pub fn fetch_league_leaders(
    client: &Client,
    settings: &Settings,
    category: StatCategory,
    per_mode: PerMode,
) -> Result<StatTable> {
    let url = stats_api::league_leaders_url(
        category.abbreviation(),
        per_mode.as_param(),
        &settings.season,
        &settings.season_type,
    );
    let body = stats_api::fetch_raw(client, &url).with_context(|| {
        format!(
            "league leaders request {} ({})",
            category.abbreviation(),
            per_mode.as_param()
        )
    })?;
    let mut table = parse_league_leaders_json(&body).with_context(|| {
        format!(
            "league leaders response {} ({})",
            category.abbreviation(),
            per_mode.as_param()
        )
    })?;
    table.truncate(settings.leaders_top_n);
    Ok(table)
}

pub fn parse_league_leaders_json(raw: &str) -> Result<StatTable, ApiError> {
    stats_api::parse_single_table(raw)
}
