//! Wire-level decoding for the stats.nba.com tabular envelope.
//!
//! Every dataset arrives as `resultSet`/`resultSets` objects carrying
//! `headers` plus a `rowSet` of raw JSON cells. The shot-location dataset
//! uses two header levels (zone names spanning groups of measure columns);
//! those decode into [`ShotLocationTable`] and are flattened explicitly
//! rather than through column-label string algebra.

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const STATS_BASE_URL: &str = "https://stats.nba.com/stats";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("empty response body")]
    EmptyBody,
    #[error("invalid envelope json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("result set not present in response")]
    MissingResultSet,
    #[error("header level `{0}` not present")]
    MissingHeaderLevel(&'static str),
    #[error("column `{0}` not present")]
    MissingColumn(String),
    #[error("shot zone `{0}` not present")]
    MissingZone(String),
}

/// One decoded tabular result: column names plus rows of raw JSON cells.
#[derive(Debug, Clone)]
pub struct StatTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl StatTable {
    pub fn column(&self, name: &str) -> Result<usize, ApiError> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| ApiError::MissingColumn(name.to_string()))
    }

    pub fn truncate(&mut self, top_n: usize) {
        self.rows.truncate(top_n);
    }

    /// Render every cell to a string, for CSV export of the full table.
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                (0..self.headers.len())
                    .map(|idx| cell_string(row, idx))
                    .collect()
            })
            .collect()
    }
}

/// Two-level shot-location table: identity columns followed by one group of
/// measure columns per zone.
#[derive(Debug, Clone)]
pub struct ShotLocationTable {
    pub identity_headers: Vec<String>,
    /// Zone names in wire order.
    pub zones: Vec<String>,
    /// Measure names within each zone group, e.g. FGM / FGA / FG_PCT.
    pub measures: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ShotLocationTable {
    pub fn identity_column(&self, name: &str) -> Result<usize, ApiError> {
        self.identity_headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| ApiError::MissingColumn(name.to_string()))
    }

    pub fn zone_column(&self, zone: &str, measure: &str) -> Result<usize, ApiError> {
        let zone_idx = self
            .zones
            .iter()
            .position(|name| name == zone)
            .ok_or_else(|| ApiError::MissingZone(zone.to_string()))?;
        let measure_idx = self
            .measures
            .iter()
            .position(|name| name == measure)
            .ok_or_else(|| ApiError::MissingColumn(measure.to_string()))?;
        Ok(self.identity_headers.len() + zone_idx * self.measures.len() + measure_idx)
    }

    /// Collapse the two header levels into flat `<Zone>_<MEASURE>` labels.
    pub fn flattened_headers(&self) -> Vec<String> {
        let mut out = self.identity_headers.clone();
        for zone in &self.zones {
            for measure in &self.measures {
                out.push(format!("{zone}_{measure}"));
            }
        }
        out
    }
}

#[derive(Debug, Deserialize)]
struct NamedResultSet {
    #[serde(default)]
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SingleEnvelope {
    #[serde(rename = "resultSet")]
    result_set: NamedResultSet,
}

#[derive(Debug, Deserialize)]
struct MultiEnvelope {
    #[serde(rename = "resultSets")]
    result_sets: Vec<NamedResultSet>,
}

#[derive(Debug, Deserialize)]
struct ShotLocationsEnvelope {
    #[serde(rename = "resultSets")]
    result_sets: ShotLocationsSet,
}

#[derive(Debug, Deserialize)]
struct ShotLocationsSet {
    headers: Vec<HeaderLevel>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct HeaderLevel {
    #[serde(rename = "columnsToSkip", default)]
    columns_to_skip: usize,
    #[serde(rename = "columnSpan", default = "one")]
    column_span: usize,
    #[serde(rename = "columnNames")]
    column_names: Vec<String>,
}

fn one() -> usize {
    1
}

/// Decode a `resultSet` (singular) envelope, as returned by the
/// league-leaders endpoint.
pub fn parse_single_table(raw: &str) -> Result<StatTable, ApiError> {
    let parsed: SingleEnvelope = serde_json::from_str(non_empty(raw)?)?;
    Ok(StatTable {
        headers: parsed.result_set.headers,
        rows: parsed.result_set.row_set,
    })
}

/// Decode a `resultSets` (list) envelope, preferring the named set and
/// falling back to the first one.
pub fn parse_multi_table(raw: &str, preferred: &str) -> Result<StatTable, ApiError> {
    let parsed: MultiEnvelope = serde_json::from_str(non_empty(raw)?)?;
    let mut sets = parsed.result_sets;
    if sets.is_empty() {
        return Err(ApiError::MissingResultSet);
    }
    let idx = sets
        .iter()
        .position(|set| set.name.eq_ignore_ascii_case(preferred))
        .unwrap_or(0);
    let set = sets.swap_remove(idx);
    Ok(StatTable {
        headers: set.headers,
        rows: set.row_set,
    })
}

/// Decode the two-level shot-location envelope. The first header level
/// carries the zone names (spanning `columnSpan` measure columns each,
/// after `columnsToSkip` identity columns); the second carries the full
/// flat column list.
pub fn parse_shot_locations(raw: &str) -> Result<ShotLocationTable, ApiError> {
    let parsed: ShotLocationsEnvelope = serde_json::from_str(non_empty(raw)?)?;
    let set = parsed.result_sets;
    let mut levels = set.headers.into_iter();
    let zone_level = levels
        .next()
        .ok_or(ApiError::MissingHeaderLevel("SHOT_CATEGORY"))?;
    let column_level = levels.next().ok_or(ApiError::MissingHeaderLevel("columns"))?;

    let skip = zone_level.columns_to_skip;
    let span = zone_level.column_span.max(1);
    let identity_headers: Vec<String> = column_level.column_names.iter().take(skip).cloned().collect();
    let measures: Vec<String> = column_level
        .column_names
        .iter()
        .skip(skip)
        .take(span)
        .cloned()
        .collect();
    if measures.len() < span {
        return Err(ApiError::MissingHeaderLevel("columns"));
    }

    Ok(ShotLocationTable {
        identity_headers,
        zones: zone_level.column_names,
        measures,
        rows: set.row_set,
    })
}

fn non_empty(raw: &str) -> Result<&str, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(ApiError::EmptyBody);
    }
    Ok(trimmed)
}

/// Raw cell helpers: the service mixes numbers, strings, and nulls freely.
pub fn cell_f64(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx)? {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub fn cell_u64(row: &[Value], idx: usize) -> Option<u64> {
    match row.get(idx)? {
        Value::Number(num) => num.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub fn cell_string(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(num)) => num.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn fetch_raw(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        let preview: String = body.chars().take(200).collect();
        return Err(anyhow!("http {status}: {preview}"));
    }
    Ok(body)
}

pub fn league_leaders_url(category: &str, per_mode: &str, season: &str, season_type: &str) -> String {
    format!(
        "{STATS_BASE_URL}/leagueleaders?LeagueID=00&PerMode48={per_mode}&Scope=S&Season={}&SeasonType={}&StatCategory={category}",
        encode(season),
        encode(season_type),
    )
}

pub fn shot_locations_url(season: &str, season_type: &str) -> String {
    format!(
        "{STATS_BASE_URL}/leaguedashplayershotlocations?College=&Conference=&Country=&DateFrom=&DateTo=&DistanceRange=By+Zone&Division=&DraftPick=&DraftYear=&GameScope=&GameSegment=&Height=&LastNGames=0&LeagueID=00&Location=&MeasureType=Base&Month=0&OpponentTeamID=0&Outcome=&PORound=0&PaceAdjust=N&PerMode=Totals&Period=0&PlayerExperience=&PlayerPosition=&PlusMinus=N&Rank=N&Season={}&SeasonSegment=&SeasonType={}&ShotClockRange=&StarterBench=&TeamID=0&VsConference=&VsDivision=&Weight=",
        encode(season),
        encode(season_type),
    )
}

pub fn pt_stats_url(season: &str, season_type: &str) -> String {
    format!(
        "{STATS_BASE_URL}/leaguedashptstats?College=&Conference=&Country=&DateFrom=&DateTo=&Division=&DraftPick=&DraftYear=&GameScope=&Height=&LastNGames=0&LeagueID=00&Location=&Month=0&OpponentTeamID=0&Outcome=&PORound=0&PerMode=Totals&PlayerExperience=&PlayerOrTeam=Player&PlayerPosition=&PtMeasureType=SpeedDistance&Season={}&SeasonSegment=&SeasonType={}&StarterBench=&TeamID=0&VsConference=&VsDivision=&Weight=",
        encode(season),
        encode(season_type),
    )
}

pub fn shot_chart_url(player_id: u64, season: &str, season_type: &str) -> String {
    format!(
        "{STATS_BASE_URL}/shotchartdetail?AheadBehind=&ClutchTime=&ContextFilter=&ContextMeasure=FGA&DateFrom=&DateTo=&EndPeriod=&EndRange=&GameID=&GameSegment=&LastNGames=0&LeagueID=00&Location=&Month=0&OpponentTeamID=0&Outcome=&Period=0&PlayerID={player_id}&PlayerPosition=&PointDiff=&Position=&RangeType=&RookieYear=&Season={}&SeasonSegment=&SeasonType={}&StartPeriod=&StartRange=&TeamID=0&VsConference=&VsDivision=",
        encode(season),
        encode(season_type),
    )
}

pub fn all_players_url(season: &str) -> String {
    format!(
        "{STATS_BASE_URL}/commonallplayers?IsOnlyCurrentSeason=1&LeagueID=00&Season={}",
        encode(season),
    )
}

pub fn headshot_url(player_id: u64) -> String {
    format!("https://cdn.nba.com/headshots/nba/latest/1040x760/{player_id}.png")
}

fn encode(value: &str) -> String {
    value.replace(' ', "+")
}
