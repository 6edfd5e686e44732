//! Shot-quality ("moreyball") ranking: share of shots taken at the rim or
//! from three, per player, over the shot-location dataset.

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::Settings;
use crate::export;
use crate::rankings;
use crate::stats_api::{self, ApiError, ShotLocationTable};

/// Pinned zone set of the shot-location dataset. `Corner 3` duplicates the
/// separate left/right corner columns, so unduplicated totals subtract it
/// back out.
pub const SHOT_ZONES: [&str; 8] = [
    "Restricted Area",
    "In The Paint (Non-RA)",
    "Mid-Range",
    "Left Corner 3",
    "Right Corner 3",
    "Above the Break 3",
    "Backcourt",
    "Corner 3",
];

/// Per-zone values for one shot measure (makes or attempts).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoneTotals {
    pub restricted_area: f64,
    pub paint_non_ra: f64,
    pub mid_range: f64,
    pub left_corner_3: f64,
    pub right_corner_3: f64,
    pub above_break_3: f64,
    pub backcourt: f64,
    pub corner_3: f64,
}

impl ZoneTotals {
    fn zone_sum(&self) -> f64 {
        self.restricted_area
            + self.paint_non_ra
            + self.mid_range
            + self.left_corner_3
            + self.right_corner_3
            + self.above_break_3
            + self.backcourt
            + self.corner_3
    }

    /// Unduplicated shot total: the combined corner-three column counts the
    /// same shots as the left/right corner columns.
    pub fn total_shots(&self) -> f64 {
        self.zone_sum() - self.corner_3
    }

    pub fn total_from_three(&self) -> f64 {
        self.above_break_3 + self.corner_3 + self.backcourt
    }
}

/// Derived shot-quality columns for one shot measure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShotQuality {
    pub total_shots: f64,
    pub total_from_three: f64,
    pub pct_restricted_area: Option<f64>,
    pub pct_three: Option<f64>,
    /// Sum of the two shares. The inputs are not complements, so values
    /// above 1.0 are legitimate and left unclamped.
    pub pct_moreyball: Option<f64>,
}

pub fn shot_quality(zones: &ZoneTotals) -> ShotQuality {
    let total_shots = zones.total_shots();
    let total_from_three = zones.total_from_three();
    let pct_restricted_area = ratio3(zones.restricted_area, total_shots);
    let pct_three = ratio3(total_from_three, total_shots);
    let pct_moreyball = match (pct_restricted_area, pct_three) {
        (Some(ra), Some(three)) => Some(export::round3(ra + three)),
        _ => None,
    };
    ShotQuality {
        total_shots,
        total_from_three,
        pct_restricted_area,
        pct_three,
        pct_moreyball,
    }
}

fn ratio3(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(export::round3(numerator / denominator))
    }
}

#[derive(Debug, Clone)]
pub struct MoreyballRow {
    pub player_id: u64,
    pub player_name: String,
    pub team_abbreviation: String,
    pub makes: ZoneTotals,
    pub attempts: ZoneTotals,
    pub makes_quality: ShotQuality,
    pub attempts_quality: ShotQuality,
}

pub fn fetch_shot_locations(client: &Client, settings: &Settings) -> Result<ShotLocationTable> {
    let url = stats_api::shot_locations_url(&settings.season, &settings.season_type);
    settings.retry.run("shot locations fetch", || {
        let body = stats_api::fetch_raw(client, &url)?;
        Ok(stats_api::parse_shot_locations(&body)?)
    })
}

/// Decode rows into the nested zone record and derive the shot-quality
/// columns for makes and attempts independently.
pub fn rows_from_table(table: &ShotLocationTable) -> Result<Vec<MoreyballRow>, ApiError> {
    let id_col = table.identity_column("PLAYER_ID")?;
    let name_col = table.identity_column("PLAYER_NAME")?;
    let team_col = table.identity_column("TEAM_ABBREVIATION")?;

    // Resolve every pinned zone up front so a renamed column fails the job,
    // not one row at a time.
    let mut fgm_cols = [0usize; SHOT_ZONES.len()];
    let mut fga_cols = [0usize; SHOT_ZONES.len()];
    for (idx, zone) in SHOT_ZONES.iter().enumerate() {
        fgm_cols[idx] = table.zone_column(zone, "FGM")?;
        fga_cols[idx] = table.zone_column(zone, "FGA")?;
    }

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let makes = zone_totals(row, &fgm_cols);
        let attempts = zone_totals(row, &fga_cols);
        out.push(MoreyballRow {
            player_id: stats_api::cell_u64(row, id_col).unwrap_or_default(),
            player_name: stats_api::cell_string(row, name_col),
            team_abbreviation: stats_api::cell_string(row, team_col),
            makes_quality: shot_quality(&makes),
            attempts_quality: shot_quality(&attempts),
            makes,
            attempts,
        });
    }
    Ok(out)
}

fn zone_totals(row: &[serde_json::Value], cols: &[usize; SHOT_ZONES.len()]) -> ZoneTotals {
    let value = |idx: usize| stats_api::cell_f64(row, cols[idx]).unwrap_or_default();
    ZoneTotals {
        restricted_area: value(0),
        paint_non_ra: value(1),
        mid_range: value(2),
        left_corner_3: value(3),
        right_corner_3: value(4),
        above_break_3: value(5),
        backcourt: value(6),
        corner_3: value(7),
    }
}

/// Gate by attempted shots and sort by the attempt-side moreyball share.
pub fn build_ranking(
    table: &ShotLocationTable,
    min_attempts: f64,
) -> Result<Vec<MoreyballRow>, ApiError> {
    let rows = rows_from_table(table)?;
    Ok(rankings::rank_and_filter(
        rows,
        |row| row.attempts_quality.total_shots,
        min_attempts,
        |row| row.attempts_quality.pct_moreyball,
    ))
}

pub fn csv_header() -> Vec<String> {
    let mut out = vec![
        "PLAYER_ID".to_string(),
        "PLAYER_NAME".to_string(),
        "TEAM_ABBREVIATION".to_string(),
    ];
    for zone in SHOT_ZONES {
        out.push(format!("{zone}_FGM"));
        out.push(format!("{zone}_FGA"));
    }
    for measure in ["FGM", "FGA"] {
        out.push(format!("Total Shots_{measure}"));
        out.push(format!("Total from 3_{measure}"));
        out.push(format!("Pct RA_{measure}"));
        out.push(format!("Pct 3_{measure}"));
        out.push(format!("Pct Moreyball_{measure}"));
    }
    out
}

pub fn csv_row(row: &MoreyballRow) -> Vec<String> {
    let mut out = vec![
        row.player_id.to_string(),
        row.player_name.clone(),
        row.team_abbreviation.clone(),
    ];
    for (makes, attempts) in zone_pairs(row) {
        out.push(export::fmt_f64(makes));
        out.push(export::fmt_f64(attempts));
    }
    for quality in [&row.makes_quality, &row.attempts_quality] {
        out.push(export::fmt_f64(quality.total_shots));
        out.push(export::fmt_f64(quality.total_from_three));
        out.push(export::fmt_opt(quality.pct_restricted_area));
        out.push(export::fmt_opt(quality.pct_three));
        out.push(export::fmt_opt(quality.pct_moreyball));
    }
    out
}

fn zone_pairs(row: &MoreyballRow) -> [(f64, f64); SHOT_ZONES.len()] {
    let m = &row.makes;
    let a = &row.attempts;
    [
        (m.restricted_area, a.restricted_area),
        (m.paint_non_ra, a.paint_non_ra),
        (m.mid_range, a.mid_range),
        (m.left_corner_3, a.left_corner_3),
        (m.right_corner_3, a.right_corner_3),
        (m.above_break_3, a.above_break_3),
        (m.backcourt, a.backcourt),
        (m.corner_3, a.corner_3),
    ]
}

/// Trimmed-field YAML snapshot row; every value stringified.
#[derive(Debug, Serialize)]
pub struct MoreyballSnapshot {
    pub id: String,
    pub name: String,
    pub team: String,
    pub fga: String,
    pub fgm: String,
    pub pct_ra: String,
    pub pct_three: String,
    pub pct_moreyball: String,
}

pub fn snapshot_rows(rows: &[MoreyballRow]) -> Vec<MoreyballSnapshot> {
    rows.iter()
        .map(|row| MoreyballSnapshot {
            id: row.player_id.to_string(),
            name: row.player_name.clone(),
            team: row.team_abbreviation.clone(),
            fga: export::fmt_f64(row.attempts_quality.total_shots),
            fgm: export::fmt_f64(row.makes_quality.total_shots),
            pct_ra: export::fmt_opt(row.attempts_quality.pct_restricted_area),
            pct_three: export::fmt_opt(row.attempts_quality.pct_three),
            pct_moreyball: export::fmt_opt(row.attempts_quality.pct_moreyball),
        })
        .collect()
}
