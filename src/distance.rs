//! Distance leaderboard over the player-tracking speed/distance dataset.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::Settings;
use crate::export;
use crate::rankings;
use crate::stats_api::{self, ApiError};

pub const MARATHON_MILES: f64 = 26.219;

#[derive(Debug, Clone)]
pub struct DistanceRow {
    pub player_id: u64,
    pub player_name: String,
    pub team_abbreviation: String,
    pub games_played: f64,
    pub minutes: f64,
    pub dist_miles: f64,
    pub avg_speed: Option<f64>,
    pub marathons: f64,
    pub miles_per_game: Option<f64>,
    pub miles_per_36: Option<f64>,
}

pub fn fetch_distance_rows(client: &Client, settings: &Settings) -> Result<Vec<DistanceRow>> {
    let url = stats_api::pt_stats_url(&settings.season, &settings.season_type);
    let body = stats_api::fetch_raw(client, &url).context("speed/distance request")?;
    parse_pt_stats_json(&body).context("speed/distance response")
}

pub fn parse_pt_stats_json(raw: &str) -> Result<Vec<DistanceRow>, ApiError> {
    let table = stats_api::parse_multi_table(raw, "LeagueDashPtStats")?;
    let id_col = table.column("PLAYER_ID")?;
    let name_col = table.column("PLAYER_NAME")?;
    let team_col = table.column("TEAM_ABBREVIATION")?;
    let gp_col = table.column("GP")?;
    let min_col = table.column("MIN")?;
    let miles_col = table.column("DIST_MILES")?;
    let speed_col = table.column("AVG_SPEED")?;

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let games_played = stats_api::cell_f64(row, gp_col).unwrap_or_default();
            let minutes = stats_api::cell_f64(row, min_col).unwrap_or_default();
            let dist_miles = stats_api::cell_f64(row, miles_col).unwrap_or_default();
            DistanceRow {
                player_id: stats_api::cell_u64(row, id_col).unwrap_or_default(),
                player_name: stats_api::cell_string(row, name_col),
                team_abbreviation: stats_api::cell_string(row, team_col),
                games_played,
                minutes,
                dist_miles,
                avg_speed: stats_api::cell_f64(row, speed_col),
                marathons: dist_miles / MARATHON_MILES,
                miles_per_game: per_unit(dist_miles, games_played),
                miles_per_36: per_unit(dist_miles, minutes).map(|rate| rate * 36.0),
            }
        })
        .collect();
    Ok(rows)
}

fn per_unit(total: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(total / denominator)
    }
}

/// Gate by minutes played and sort by miles per 36.
pub fn build_ranking(rows: Vec<DistanceRow>, min_minutes: f64) -> Vec<DistanceRow> {
    rankings::rank_and_filter(rows, |row| row.minutes, min_minutes, |row| row.miles_per_36)
}

pub fn csv_header() -> Vec<String> {
    [
        "PLAYER_ID",
        "PLAYER_NAME",
        "TEAM_ABBREVIATION",
        "GP",
        "MIN",
        "DIST_MILES",
        "AVG_SPEED",
        "DIST_MARATHONS",
        "MILES_PER_GAME",
        "MILES_PER_36",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

pub fn csv_row(row: &DistanceRow) -> Vec<String> {
    vec![
        row.player_id.to_string(),
        row.player_name.clone(),
        row.team_abbreviation.clone(),
        export::fmt_f64(row.games_played),
        export::fmt_f64(row.minutes),
        export::fmt_f64(row.dist_miles),
        export::fmt_opt(row.avg_speed),
        export::fmt_f64(row.marathons),
        export::fmt_opt(row.miles_per_game),
        export::fmt_opt(row.miles_per_36),
    ]
}

/// YAML snapshot row; every value stringified.
#[derive(Debug, Serialize)]
pub struct DistanceSnapshot {
    pub id: String,
    pub name: String,
    pub team: String,
    pub games: String,
    pub minutes: String,
    pub miles: String,
    pub avg_speed: String,
    pub marathons: String,
    pub miles_per_game: String,
    pub miles_per_thirty: String,
}

pub fn snapshot_rows(rows: &[DistanceRow]) -> Vec<DistanceSnapshot> {
    rows.iter()
        .map(|row| DistanceSnapshot {
            id: row.player_id.to_string(),
            name: row.player_name.clone(),
            team: row.team_abbreviation.clone(),
            games: export::fmt_f64(row.games_played),
            minutes: export::fmt_f64(row.minutes),
            miles: export::fmt_f64(row.dist_miles),
            avg_speed: export::fmt_opt(row.avg_speed),
            marathons: export::fmt_f64(row.marathons),
            miles_per_game: export::fmt_opt(row.miles_per_game),
            miles_per_thirty: export::fmt_opt(row.miles_per_36),
        })
        .collect()
}
