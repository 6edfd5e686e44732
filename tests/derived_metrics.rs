use std::fs;
use std::path::PathBuf;

use hoopsnap::moreyball::{ZoneTotals, build_ranking, rows_from_table, shot_quality};
use hoopsnap::shot_distance::{aggregate, parse_shot_chart_json};
use hoopsnap::stats_api::parse_shot_locations;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn zone_totals_exclude_the_combined_corner_column() {
    // The combined corner-three column repeats the left/right corner shots,
    // so the unduplicated total subtracts it once.
    let zones = ZoneTotals {
        restricted_area: 40.0,
        paint_non_ra: 12.0,
        mid_range: 8.0,
        left_corner_3: 4.0,
        right_corner_3: 6.0,
        above_break_3: 20.0,
        backcourt: 0.0,
        corner_3: 10.0,
    };
    assert_eq!(zones.total_shots(), 90.0);
    assert_eq!(zones.total_from_three(), 30.0);

    let quality = shot_quality(&zones);
    assert_eq!(quality.pct_restricted_area, Some(0.444));
    assert_eq!(quality.pct_three, Some(0.333));
    assert_eq!(quality.pct_moreyball, Some(0.777));
}

#[test]
fn zero_attempts_yield_missing_shares() {
    let quality = shot_quality(&ZoneTotals::default());
    assert_eq!(quality.total_shots, 0.0);
    assert_eq!(quality.pct_restricted_area, None);
    assert_eq!(quality.pct_three, None);
    assert_eq!(quality.pct_moreyball, None);
}

#[test]
fn moreyball_share_above_one_is_not_clamped() {
    // The two shares overlap rather than partition the total, so their sum
    // can legitimately pass 1.0.
    let zones = ZoneTotals {
        restricted_area: 50.0,
        above_break_3: 20.0,
        corner_3: 70.0,
        ..ZoneTotals::default()
    };
    let quality = shot_quality(&zones);
    assert_eq!(quality.total_shots, 70.0);
    assert_eq!(quality.pct_restricted_area, Some(0.714));
    assert_eq!(quality.pct_three, Some(1.286));
    assert_eq!(quality.pct_moreyball, Some(2.0));
}

#[test]
fn shot_location_rows_decode_both_measures() {
    let raw = read_fixture("shot_locations.json");
    let table = parse_shot_locations(&raw).expect("fixture should parse");
    let rows = rows_from_table(&table).expect("rows should decode");
    assert_eq!(rows.len(), 3);

    let alpha = &rows[0];
    assert_eq!(alpha.player_name, "Arden Vale");
    assert_eq!(alpha.team_abbreviation, "GSW");
    assert_eq!(alpha.makes_quality.total_shots, 90.0);
    assert_eq!(alpha.makes_quality.pct_restricted_area, Some(0.444));
    assert_eq!(alpha.attempts_quality.total_shots, 242.0);
    assert_eq!(alpha.attempts_quality.pct_restricted_area, Some(0.331));
    assert_eq!(alpha.attempts_quality.pct_three, Some(0.38));
    assert_eq!(alpha.attempts_quality.pct_moreyball, Some(0.711));

    // All-zero makes degrade to missing shares, not a crash.
    let gamma = &rows[2];
    assert_eq!(gamma.makes_quality.pct_moreyball, None);
}

#[test]
fn moreyball_ranking_gates_then_sorts() {
    let raw = read_fixture("shot_locations.json");
    let table = parse_shot_locations(&raw).expect("fixture should parse");
    let ranked = build_ranking(&table, 200.0).expect("ranking should build");

    // The low-volume row falls to the attempt gate; the rest sort by the
    // attempt-side share, descending.
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].player_name, "Miles Okafor");
    assert_eq!(ranked[0].attempts_quality.pct_moreyball, Some(0.949));
    assert_eq!(ranked[1].player_name, "Arden Vale");
}

#[test]
fn shot_distance_aggregates_split_by_result_and_value() {
    let raw = read_fixture("shot_chart.json");
    let events = parse_shot_chart_json(&raw).expect("fixture should parse");
    let rows = aggregate(&events);
    assert_eq!(rows.len(), 2);

    let curry = &rows[0];
    assert_eq!(curry.player_name, "Stephen Curry");
    assert_eq!(curry.team_abbreviation, "GSW");
    assert_eq!(curry.all.attempts, 3);
    assert!((curry.all.avg_all.expect("mean") - 55.0 / 3.0).abs() < 1e-9);
    assert_eq!(curry.all.avg_three, Some(27.0));
    assert_eq!(curry.all.avg_two, Some(1.0));
    assert_eq!(curry.made.attempts, 2);
    assert_eq!(curry.made.avg_all, Some(13.5));
    assert_eq!(curry.missed.attempts, 1);
    assert_eq!(curry.missed.avg_all, Some(28.0));
    assert_eq!(curry.missed.avg_two, None);

    let james = &rows[1];
    assert_eq!(james.team_abbreviation, "LAL");
    assert_eq!(james.all.attempts, 2);
    assert_eq!(james.all.avg_all, Some(8.5));
    assert_eq!(james.all.avg_three, None);
}

#[test]
fn shot_distance_ranking_orders_by_overall_average() {
    let raw = read_fixture("shot_chart.json");
    let events = parse_shot_chart_json(&raw).expect("fixture should parse");
    let ranked = hoopsnap::shot_distance::build_ranking(aggregate(&events), 1.0);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].player_name, "Stephen Curry");
    assert_eq!(ranked[1].player_name, "LeBron James");

    // The gate is strict: two attempts do not clear a two-attempt minimum.
    let gated = hoopsnap::shot_distance::build_ranking(aggregate(&events), 2.0);
    assert_eq!(gated.len(), 1);
    assert_eq!(gated[0].player_name, "Stephen Curry");
}

#[test]
fn distance_ranking_respects_the_minutes_gate() {
    let raw = read_fixture("pt_stats.json");
    let rows = hoopsnap::distance::parse_pt_stats_json(&raw).expect("fixture should parse");

    let strict = hoopsnap::distance::build_ranking(rows.clone(), 500.0);
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].player_name, "Luka Doncic");

    let loose = hoopsnap::distance::build_ranking(rows, 100.0);
    let names: Vec<&str> = loose.iter().map(|row| row.player_name.as_str()).collect();
    assert_eq!(names, ["Stephen Curry", "Nikola Jokic", "Luka Doncic"]);
}
