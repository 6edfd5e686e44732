use std::fs;
use std::path::PathBuf;

use hoopsnap::court_plot::{match_player, parse_player_index_json};
use hoopsnap::distance::parse_pt_stats_json;
use hoopsnap::leaders::parse_league_leaders_json;
use hoopsnap::shot_distance::parse_shot_chart_json;
use hoopsnap::stats_api::{ApiError, parse_shot_locations};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn league_leaders_fixture_parses() {
    let raw = read_fixture("league_leaders.json");
    let table = parse_league_leaders_json(&raw).expect("fixture should parse");
    assert_eq!(table.headers.len(), 11);
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.column("PTS").expect("PTS column"), 10);

    let rows = table.to_string_rows();
    assert_eq!(rows[0][2], "Shai Gilgeous-Alexander");
    assert_eq!(rows[0][10], "31.2");
    assert_eq!(rows[1][4], "LAL");
}

#[test]
fn league_leaders_truncates_to_top_n() {
    let raw = read_fixture("league_leaders.json");
    let mut table = parse_league_leaders_json(&raw).expect("fixture should parse");
    table.truncate(2);
    assert_eq!(table.rows.len(), 2);
}

#[test]
fn empty_bodies_are_rejected() {
    assert!(matches!(
        parse_league_leaders_json(""),
        Err(ApiError::EmptyBody)
    ));
    assert!(matches!(
        parse_league_leaders_json("null"),
        Err(ApiError::EmptyBody)
    ));
    assert!(matches!(parse_shot_locations("  "), Err(ApiError::EmptyBody)));
}

#[test]
fn shot_locations_two_level_headers_decode() {
    let raw = read_fixture("shot_locations.json");
    let table = parse_shot_locations(&raw).expect("fixture should parse");

    assert_eq!(
        table.identity_headers,
        ["PLAYER_ID", "PLAYER_NAME", "TEAM_ID", "TEAM_ABBREVIATION", "AGE"]
    );
    assert_eq!(table.zones.len(), 8);
    assert_eq!(table.measures, ["FGM", "FGA", "FG_PCT"]);
    assert_eq!(table.rows.len(), 3);

    // Identity columns come first, then one measure group per zone.
    assert_eq!(table.identity_column("PLAYER_NAME").expect("column"), 1);
    assert_eq!(table.zone_column("Restricted Area", "FGM").expect("column"), 5);
    assert_eq!(table.zone_column("Restricted Area", "FGA").expect("column"), 6);
    assert_eq!(table.zone_column("Corner 3", "FGA").expect("column"), 27);

    assert!(matches!(
        table.zone_column("Deep Midcourt", "FGA"),
        Err(ApiError::MissingZone(_))
    ));
}

#[test]
fn shot_locations_flattened_headers_join_zone_and_measure() {
    let raw = read_fixture("shot_locations.json");
    let table = parse_shot_locations(&raw).expect("fixture should parse");
    let flat = table.flattened_headers();
    assert_eq!(flat.len(), 5 + 8 * 3);
    assert_eq!(flat[5], "Restricted Area_FGM");
    assert_eq!(flat[6], "Restricted Area_FGA");
    assert_eq!(flat[28], "Corner 3_FG_PCT");
}

#[test]
fn pt_stats_fixture_derives_distance_metrics() {
    let raw = read_fixture("pt_stats.json");
    let rows = parse_pt_stats_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 4);

    let curry = &rows[0];
    assert_eq!(curry.player_name, "Stephen Curry");
    assert_eq!(curry.games_played, 10.0);
    assert_eq!(curry.minutes, 400.0);
    assert_eq!(curry.miles_per_game, Some(5.0));
    assert_eq!(curry.miles_per_36, Some(4.5));
    assert!((curry.marathons - 1.907).abs() < 1e-3);
}

#[test]
fn pt_stats_zero_denominators_are_missing_not_panics() {
    let raw = read_fixture("pt_stats.json");
    let rows = parse_pt_stats_json(&raw).expect("fixture should parse");
    let idle = rows
        .iter()
        .find(|row| row.games_played == 0.0)
        .expect("zero-game row");
    assert_eq!(idle.miles_per_game, None);
    assert_eq!(idle.miles_per_36, None);
    assert!(idle.marathons > 0.0);
}

#[test]
fn shot_chart_fixture_parses_and_classifies() {
    let raw = read_fixture("shot_chart.json");
    let events = parse_shot_chart_json(&raw).expect("fixture should parse");
    assert_eq!(events.len(), 5);

    let three = &events[0];
    assert_eq!(three.player_name, "Stephen Curry");
    assert_eq!(three.zone_basic, "Above the Break 3");
    assert_eq!(three.point_value(), 3);
    assert!(three.made);
    assert_eq!(three.loc_x, -50.0);
    assert_eq!(three.loc_y, 250.0);

    let layup = &events[2];
    assert_eq!(layup.zone_basic, "Restricted Area");
    assert_eq!(layup.point_value(), 2);

    let midrange = &events[3];
    assert_eq!(midrange.point_value(), 2);
    assert!(!midrange.made);
}

#[test]
fn player_index_resolves_names_case_insensitively() {
    let raw = read_fixture("player_index.json");
    let listings = parse_player_index_json(&raw).expect("fixture should parse");
    assert_eq!(listings.len(), 3);

    let curry = match_player(&listings, "stephen curry").expect("should match");
    assert_eq!(curry.id, 201939);
    assert_eq!(curry.display_name, "Stephen Curry");

    assert!(match_player(&listings, "Stephen").is_none());
    assert!(match_player(&listings, "VICTOR WEMBANYAMA").is_some());
}
