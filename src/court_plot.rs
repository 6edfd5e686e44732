//! Court shot chart: fixed court geometry plus one season of shot attempts
//! for a single player, rasterized to PNG.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::canvas::{Canvas, Color, FontWeight, Style, arc_points};
use crate::config::Settings;
use crate::shot_distance::{self, ShotEvent};
use crate::stats_api::{self, ApiError};

// Chart palette.
const COURT_BG: &str = "#F4F5EF";
const COURT_LINES: &str = "#2A4644";
const COURT_TINT: &str = "#FBE9E2";

// Chart canvas in court units: x spans -300..300 (right to left, matching
// the broadcast view), y spans -100 (behind the baseline) to 500.
const CANVAS_SIZE: f64 = 600.0;
const LINE_WIDTH: f64 = 1.5;
const SHOT_RADIUS: f64 = 7.0;

#[derive(Debug, Clone)]
pub struct PlayerListing {
    pub id: u64,
    pub display_name: String,
}

pub fn parse_player_index_json(raw: &str) -> Result<Vec<PlayerListing>, ApiError> {
    let table = stats_api::parse_multi_table(raw, "CommonAllPlayers")?;
    let id_col = table.column("PERSON_ID")?;
    let name_col = table.column("DISPLAY_FIRST_LAST")?;
    let listings = table
        .rows
        .iter()
        .map(|row| PlayerListing {
            id: stats_api::cell_u64(row, id_col).unwrap_or_default(),
            display_name: stats_api::cell_string(row, name_col),
        })
        .collect();
    Ok(listings)
}

/// Case-insensitive exact match on the display name.
pub fn match_player<'a>(listings: &'a [PlayerListing], name: &str) -> Option<&'a PlayerListing> {
    listings
        .iter()
        .find(|listing| listing.display_name.eq_ignore_ascii_case(name))
}

pub struct CourtChart {
    pub player_id: u64,
    pub player_name: String,
    pub season: String,
    pub shots: Vec<ShotEvent>,
    pub headshot_png: Option<Vec<u8>>,
}

/// Resolve the player, fetch their shots and headshot. An unmatched name is
/// an error; a failed shot fetch degrades to an empty chart; a failed
/// headshot fetch degrades to no photo.
pub fn load(
    client: &Client,
    settings: &Settings,
    player_name: &str,
    with_photo: bool,
) -> Result<CourtChart> {
    let url = stats_api::all_players_url(&settings.season);
    let body = stats_api::fetch_raw(client, &url).context("player index request")?;
    let listings = parse_player_index_json(&body).context("player index response")?;
    let listing = match_player(&listings, player_name).ok_or_else(|| {
        anyhow!(
            "player `{player_name}` not found in the {} player index",
            settings.season
        )
    })?;
    let player_id = listing.id;
    let player_name = listing.display_name.clone();

    let shots = match settings.retry.run("shot chart fetch", || {
        let url = stats_api::shot_chart_url(player_id, &settings.season, &settings.season_type);
        let body = stats_api::fetch_raw(client, &url)?;
        Ok(shot_distance::parse_shot_chart_json(&body)?)
    }) {
        Ok(shots) => shots,
        Err(err) => {
            warn!("shot data unavailable for {player_name}, drawing empty chart: {err:#}");
            Vec::new()
        }
    };

    let headshot_png = if with_photo {
        fetch_headshot(client, player_id)
    } else {
        None
    };

    Ok(CourtChart {
        player_id,
        player_name,
        season: settings.season.clone(),
        shots,
        headshot_png,
    })
}

fn fetch_headshot(client: &Client, player_id: u64) -> Option<Vec<u8>> {
    let url = stats_api::headshot_url(player_id);
    match client.get(&url).send() {
        Ok(resp) if resp.status().is_success() => resp.bytes().ok().map(|bytes| bytes.to_vec()),
        Ok(resp) => {
            warn!("headshot request returned {}", resp.status());
            None
        }
        Err(err) => {
            warn!("headshot fetch failed: {err}");
            None
        }
    }
}

/// Map court units to canvas units. The x axis is mirrored (broadcast
/// view); the y axis points up on court and down on canvas.
fn to_canvas(x: f64, y: f64) -> (f64, f64) {
    (300.0 - x, 500.0 - y)
}

fn transform(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.into_iter().map(|(x, y)| to_canvas(x, y)).collect()
}

/// Axis-aligned rectangle given in court units (origin corner + extents).
fn court_rect(canvas: &mut Canvas, x: f64, y: f64, w: f64, h: f64, style: Style) {
    let (sx, sy) = to_canvas(x + w, y + h);
    canvas.rect(sx, sy, w, h, style);
}

fn court_line(canvas: &mut Canvas, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
    let (sx1, sy1) = to_canvas(x1, y1);
    let (sx2, sy2) = to_canvas(x2, y2);
    canvas.line(sx1, sy1, sx2, sy2, color, LINE_WIDTH);
}

fn court_arc(canvas: &mut Canvas, cx: f64, cy: f64, r: f64, start: f64, end: f64, color: Color) {
    canvas.polyline(transform(arc_points(cx, cy, r, start, end)), color, LINE_WIDTH);
}

/// Draw the court markings at their literal coordinates: key, free-throw
/// circle, three-point arc and corners, restricted area, hoop, backboard,
/// baseline, plus the half-court extension. The three-point and
/// restricted-area regions are tinted to set off the high-value zones.
pub fn draw_court(canvas: &mut Canvas) {
    let bg = Color::hex(COURT_BG);
    let lines = Color::hex(COURT_LINES);
    let tint = Color::hex(COURT_TINT);

    canvas.rect(0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE, Style::filled(bg));

    // Three-point region shading: arc wedge plus the corner rectangle.
    let mut wedge = vec![to_canvas(0.0, 0.0)];
    wedge.extend(transform(arc_points(0.0, 0.0, 238.5, 22.25, 157.75)));
    canvas.polygon(wedge, Style::filled(tint));
    court_rect(canvas, -220.5, -47.5, 441.0, 137.5, Style::filled(tint));

    // Key.
    court_rect(
        canvas,
        -80.0,
        -47.5,
        160.0,
        190.0,
        Style::fill_stroke(tint, lines, LINE_WIDTH),
    );

    // Free-throw circle, drawn as its two halves.
    court_arc(canvas, 0.0, 142.5, 60.0, 0.0, 180.0, lines);
    court_arc(canvas, 0.0, 142.5, 60.0, 180.0, 360.0, lines);

    // Three-point arc and corner lines.
    court_arc(canvas, 0.0, 0.0, 238.5, 22.25, 157.75, lines);
    court_line(canvas, -220.5, -47.5, -220.5, 90.0, lines);
    court_line(canvas, 220.5, -47.5, 220.5, 90.0, lines);

    // Restricted area over the key tint.
    canvas.circle(
        to_canvas(0.0, 0.0).0,
        to_canvas(0.0, 0.0).1,
        40.0,
        Style::filled(bg),
    );
    court_arc(canvas, 0.0, 0.0, 40.0, 0.0, 180.0, lines);

    // Hoop and backboard.
    let (hx, hy) = to_canvas(0.0, 0.0);
    canvas.circle(hx, hy, 7.5, Style::stroked(lines, LINE_WIDTH));
    court_line(canvas, -30.0, -11.0, 30.0, -11.0, lines);

    // Baseline.
    court_line(canvas, -250.0, -47.5, 250.0, -47.5, lines);

    // Half-court extension.
    court_arc(canvas, 0.0, 422.5, 60.0, 180.0, 360.0, lines);
    court_line(canvas, -250.0, -47.5, -250.0, 422.5, lines);
    court_line(canvas, 250.0, -47.5, 250.0, 422.5, lines);
    court_line(canvas, -250.0, 422.5, 250.0, 422.5, lines);
}

/// Build the full chart scene: court, shot scatter, titles, and the
/// optional headshot in the top-right corner.
pub fn render_svg(chart: &CourtChart, title: Option<&str>, subtitle: Option<&str>) -> String {
    let mut canvas = Canvas::new(CANVAS_SIZE, CANVAS_SIZE);
    draw_court(&mut canvas);

    let made = Color::hex("#008000").with_alpha(0.4);
    let missed = Color::hex("#FF0000").with_alpha(0.4);
    for shot in &chart.shots {
        let color = if shot.made { made } else { missed };
        let (cx, cy) = to_canvas(shot.loc_x, shot.loc_y);
        canvas.circle(cx, cy, SHOT_RADIUS, Style::fill_stroke(color, color, 1.0));
    }

    let ink = Color::hex(COURT_LINES);
    let default_title = format!("Shooting Chart - {}", chart.player_name);
    let default_subtitle = format!("{} season", chart.season);
    let (tx, ty) = to_canvas(250.0, 460.0);
    let (sx, sy) = to_canvas(250.0, 440.0);
    canvas.text(
        tx,
        ty,
        title.unwrap_or(&default_title),
        22.0,
        ink,
        FontWeight::Bold,
    );
    canvas.text(
        sx,
        sy,
        subtitle.unwrap_or(&default_subtitle),
        16.0,
        ink,
        FontWeight::Regular,
    );

    if let Some(png) = &chart.headshot_png {
        let href = format!("data:image/png;base64,{}", BASE64.encode(png));
        canvas.image(432.0, 68.0, 96.0, 70.0, href);
    }

    canvas.to_svg()
}

/// Rasterize the SVG scene and write it out.
pub fn save_png(svg: &str, path: &Path, scale: f32) -> Result<()> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| anyhow!("svg parse: {err}"))?;

    let size = tree.size();
    let width = (size.width() * scale).round() as u32;
    let height = (size.height() * scale).round() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("failed to create {width}x{height} pixmap"))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let png = pixmap.encode_png().context("png encode")?;
    fs::write(path, png).with_context(|| format!("failed writing {}", path.display()))?;
    info!("chart saved to {}", path.display());
    Ok(())
}
