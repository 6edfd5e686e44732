//! Per-player shot-distance aggregate over the league-wide shot chart.

use std::collections::HashMap;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::Settings;
use crate::export;
use crate::rankings;
use crate::stats_api::{self, ApiError};

/// Franchise id to abbreviation, pinned so snapshots do not depend on a
/// second fetch.
pub const TEAM_ABBREVIATIONS: &[(u64, &str)] = &[
    (1610612737, "ATL"),
    (1610612738, "BOS"),
    (1610612739, "CLE"),
    (1610612740, "NOP"),
    (1610612741, "CHI"),
    (1610612742, "DAL"),
    (1610612743, "DEN"),
    (1610612744, "GSW"),
    (1610612745, "HOU"),
    (1610612746, "LAC"),
    (1610612747, "LAL"),
    (1610612748, "MIA"),
    (1610612749, "MIL"),
    (1610612750, "MIN"),
    (1610612751, "BKN"),
    (1610612752, "NYK"),
    (1610612753, "ORL"),
    (1610612754, "IND"),
    (1610612755, "PHI"),
    (1610612756, "PHX"),
    (1610612757, "POR"),
    (1610612758, "SAC"),
    (1610612759, "SAS"),
    (1610612760, "OKC"),
    (1610612761, "TOR"),
    (1610612762, "UTA"),
    (1610612763, "MEM"),
    (1610612764, "WAS"),
    (1610612765, "DET"),
    (1610612766, "CHA"),
];

pub fn team_abbreviation(team_id: u64) -> Option<&'static str> {
    TEAM_ABBREVIATIONS
        .iter()
        .find(|(id, _)| *id == team_id)
        .map(|(_, abbr)| *abbr)
}

/// One shot attempt from the shot-chart dataset.
#[derive(Debug, Clone)]
pub struct ShotEvent {
    pub player_id: u64,
    pub player_name: String,
    pub team_id: u64,
    pub zone_basic: String,
    pub distance: f64,
    pub loc_x: f64,
    pub loc_y: f64,
    pub made: bool,
}

impl ShotEvent {
    /// Zone labels for three-point regions all carry a literal `3`.
    pub fn point_value(&self) -> u8 {
        if self.zone_basic.contains('3') { 3 } else { 2 }
    }
}

pub fn parse_shot_chart_json(raw: &str) -> Result<Vec<ShotEvent>, ApiError> {
    let table = stats_api::parse_multi_table(raw, "Shot_Chart_Detail")?;
    let player_col = table.column("PLAYER_ID")?;
    let name_col = table.column("PLAYER_NAME")?;
    let team_col = table.column("TEAM_ID")?;
    let zone_col = table.column("SHOT_ZONE_BASIC")?;
    let dist_col = table.column("SHOT_DISTANCE")?;
    let x_col = table.column("LOC_X")?;
    let y_col = table.column("LOC_Y")?;
    let made_col = table.column("SHOT_MADE_FLAG")?;

    let events = table
        .rows
        .iter()
        .map(|row| ShotEvent {
            player_id: stats_api::cell_u64(row, player_col).unwrap_or_default(),
            player_name: stats_api::cell_string(row, name_col),
            team_id: stats_api::cell_u64(row, team_col).unwrap_or_default(),
            zone_basic: stats_api::cell_string(row, zone_col),
            distance: stats_api::cell_f64(row, dist_col).unwrap_or_default(),
            loc_x: stats_api::cell_f64(row, x_col).unwrap_or_default(),
            loc_y: stats_api::cell_f64(row, y_col).unwrap_or_default(),
            made: stats_api::cell_f64(row, made_col).unwrap_or_default() != 0.0,
        })
        .collect();
    Ok(events)
}

/// League-wide fetch: player and team both zero select every shot. The
/// endpoint is the flaky one, so it runs under the retry policy.
pub fn fetch_league_shots(client: &Client, settings: &Settings) -> Result<Vec<ShotEvent>> {
    let url = stats_api::shot_chart_url(0, &settings.season, &settings.season_type);
    settings.retry.run("league shot chart fetch", || {
        let body = stats_api::fetch_raw(client, &url)?;
        Ok(parse_shot_chart_json(&body)?)
    })
}

/// Attempt count and mean distances for one make/miss split.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistanceSplit {
    pub attempts: u64,
    pub avg_all: Option<f64>,
    pub avg_three: Option<f64>,
    pub avg_two: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PlayerShotDistance {
    pub player_id: u64,
    pub player_name: String,
    pub team_abbreviation: String,
    pub all: DistanceSplit,
    pub made: DistanceSplit,
    pub missed: DistanceSplit,
}

#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: u64,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SplitAcc {
    all: MeanAcc,
    three: MeanAcc,
    two: MeanAcc,
}

impl SplitAcc {
    fn push(&mut self, event: &ShotEvent) {
        self.all.push(event.distance);
        if event.point_value() == 3 {
            self.three.push(event.distance);
        } else {
            self.two.push(event.distance);
        }
    }

    fn finish(&self) -> DistanceSplit {
        DistanceSplit {
            attempts: self.all.count,
            avg_all: self.all.mean(),
            avg_three: self.three.mean(),
            avg_two: self.two.mean(),
        }
    }
}

#[derive(Debug, Default)]
struct PlayerAcc {
    player_name: String,
    team_id: u64,
    all: SplitAcc,
    made: SplitAcc,
    missed: SplitAcc,
}

/// Group shots by player, first-seen order, and compute the
/// (all/made/missed) x (all/3pt/2pt) distance grid.
pub fn aggregate(events: &[ShotEvent]) -> Vec<PlayerShotDistance> {
    let mut order: Vec<u64> = Vec::new();
    let mut accs: HashMap<u64, PlayerAcc> = HashMap::new();

    for event in events {
        let acc = accs.entry(event.player_id).or_insert_with(|| {
            order.push(event.player_id);
            PlayerAcc {
                player_name: event.player_name.clone(),
                team_id: event.team_id,
                ..PlayerAcc::default()
            }
        });
        acc.all.push(event);
        if event.made {
            acc.made.push(event);
        } else {
            acc.missed.push(event);
        }
    }

    order
        .iter()
        .filter_map(|player_id| accs.get(player_id).map(|acc| (player_id, acc)))
        .map(|(player_id, acc)| PlayerShotDistance {
            player_id: *player_id,
            player_name: acc.player_name.clone(),
            team_abbreviation: team_abbreviation(acc.team_id).unwrap_or("").to_string(),
            all: acc.all.finish(),
            made: acc.made.finish(),
            missed: acc.missed.finish(),
        })
        .collect()
}

/// Gate by total attempts and sort by overall average distance.
pub fn build_ranking(rows: Vec<PlayerShotDistance>, min_attempts: f64) -> Vec<PlayerShotDistance> {
    rankings::rank_and_filter(
        rows,
        |row| row.all.attempts as f64,
        min_attempts,
        |row| row.all.avg_all,
    )
}

pub fn csv_header() -> Vec<String> {
    [
        "PLAYER_ID",
        "PLAYER_NAME",
        "TEAM_ABBREVIATION",
        "ALL_FGA",
        "ALL_ALL_AVG_DISTANCE",
        "ALL_3PT_AVG_DISTANCE",
        "ALL_2PT_AVG_DISTANCE",
        "MADE_FGA",
        "MADE_ALL_AVG_DISTANCE",
        "MADE_3PT_AVG_DISTANCE",
        "MADE_2PT_AVG_DISTANCE",
        "MISS_FGA",
        "MISS_ALL_AVG_DISTANCE",
        "MISS_3PT_AVG_DISTANCE",
        "MISS_2PT_AVG_DISTANCE",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

pub fn csv_row(row: &PlayerShotDistance) -> Vec<String> {
    let mut out = vec![
        row.player_id.to_string(),
        row.player_name.clone(),
        row.team_abbreviation.clone(),
    ];
    for split in [&row.all, &row.made, &row.missed] {
        out.push(split.attempts.to_string());
        out.push(export::fmt_opt(split.avg_all));
        out.push(export::fmt_opt(split.avg_three));
        out.push(export::fmt_opt(split.avg_two));
    }
    out
}

/// YAML snapshot row; every value stringified, missing means empty.
#[derive(Debug, Serialize)]
pub struct ShotDistanceSnapshot {
    pub id: String,
    pub name: String,
    pub team: String,
    pub fga: String,
    pub all_avg_dist: String,
    pub thr_avg_dist: String,
    pub two_avg_dist: String,
    pub made_fga: String,
    pub made_all_avg_dist: String,
    pub made_thr_avg_dist: String,
    pub made_two_avg_dist: String,
    pub miss_fga: String,
    pub miss_all_avg_dist: String,
    pub miss_thr_avg_dist: String,
    pub miss_two_avg_dist: String,
}

pub fn snapshot_rows(rows: &[PlayerShotDistance]) -> Vec<ShotDistanceSnapshot> {
    rows.iter()
        .map(|row| ShotDistanceSnapshot {
            id: row.player_id.to_string(),
            name: row.player_name.clone(),
            team: row.team_abbreviation.clone(),
            fga: row.all.attempts.to_string(),
            all_avg_dist: export::fmt_opt(row.all.avg_all),
            thr_avg_dist: export::fmt_opt(row.all.avg_three),
            two_avg_dist: export::fmt_opt(row.all.avg_two),
            made_fga: row.made.attempts.to_string(),
            made_all_avg_dist: export::fmt_opt(row.made.avg_all),
            made_thr_avg_dist: export::fmt_opt(row.made.avg_three),
            made_two_avg_dist: export::fmt_opt(row.made.avg_two),
            miss_fga: row.missed.attempts.to_string(),
            miss_all_avg_dist: export::fmt_opt(row.missed.avg_all),
            miss_thr_avg_dist: export::fmt_opt(row.missed.avg_three),
            miss_two_avg_dist: export::fmt_opt(row.missed.avg_two),
        })
        .collect()
}
