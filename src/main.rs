use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use reqwest::blocking::Client;
use tracing::{error, info, warn};

use hoopsnap::config::Settings;
use hoopsnap::http_client::http_client;
use hoopsnap::leaders::{self, PerMode, StatCategory};
use hoopsnap::{court_plot, distance, export, moreyball, shot_distance};

#[derive(Parser)]
#[command(name = "hoopsnap", about = "NBA statistics snapshot generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// League-leader CSV snapshots for the fixed category sequence
    Leaders,
    /// Shot-quality ranking snapshot (CSV + YAML)
    Moreyball,
    /// Distance-leader snapshot (CSV + YAML)
    Distance,
    /// Per-player shot-distance aggregate (CSV + YAML)
    ShotDistance,
    /// Render a court shot chart for one player
    Chart {
        /// Player display name; defaults to the top shot-quality player
        #[arg(long)]
        player: Option<String>,
        /// Output image path
        #[arg(long, default_value = "plot.png")]
        output: PathBuf,
        /// Skip the headshot overlay
        #[arg(long)]
        no_photo: bool,
    },
    /// Run every snapshot job in sequence
    All,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    match run(&cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, settings: &Settings) -> Result<()> {
    let client = http_client()?;
    info!(
        "season {} ({}), snapshots under {}",
        settings.season,
        settings.season_type,
        settings.csv_dir.display()
    );

    match command {
        Command::Leaders => run_leader_jobs(client, settings),
        Command::Moreyball => moreyball_job(client, settings),
        Command::Distance => distance_job(client, settings),
        Command::ShotDistance => shot_distance_job(client, settings),
        Command::Chart {
            player,
            output,
            no_photo,
        } => chart_job(client, settings, player.as_deref(), output, !no_photo),
        Command::All => run_all(client, settings),
    }
}

/// Category sequence is fixed and deterministic; one failing dataset never
/// blocks its siblings.
fn run_all(client: &Client, settings: &Settings) -> Result<()> {
    let mut failures: Vec<String> = Vec::new();

    run_job(&mut failures, "leaders PTS (PerGame)", || {
        leaders_job(client, settings, StatCategory::Points, PerMode::PerGame)
    });
    run_job(&mut failures, "leaders PTS (Totals)", || {
        leaders_job(client, settings, StatCategory::Points, PerMode::Totals)
    });
    run_job(&mut failures, "moreyball ranking", || {
        moreyball_job(client, settings)
    });
    run_job(&mut failures, "leaders REB (PerGame)", || {
        leaders_job(client, settings, StatCategory::Rebounds, PerMode::PerGame)
    });
    run_job(&mut failures, "leaders AST (PerGame)", || {
        leaders_job(client, settings, StatCategory::Assists, PerMode::PerGame)
    });
    run_job(&mut failures, "distance leaders", || {
        distance_job(client, settings)
    });
    run_job(&mut failures, "shot distance", || {
        shot_distance_job(client, settings)
    });

    if failures.is_empty() {
        info!("all snapshot jobs completed");
    } else {
        warn!("{} snapshot job(s) failed: {}", failures.len(), failures.join("; "));
    }
    Ok(())
}

fn run_job(failures: &mut Vec<String>, label: &str, job: impl FnOnce() -> Result<()>) {
    if let Err(err) = job() {
        warn!("{label} failed: {err:#}");
        failures.push(label.to_string());
    }
}

fn run_leader_jobs(client: &Client, settings: &Settings) -> Result<()> {
    let mut failures: Vec<String> = Vec::new();
    for (category, per_mode) in [
        (StatCategory::Points, PerMode::PerGame),
        (StatCategory::Points, PerMode::Totals),
        (StatCategory::Rebounds, PerMode::PerGame),
        (StatCategory::Assists, PerMode::PerGame),
    ] {
        let label = format!("{} ({})", category.abbreviation(), per_mode.as_param());
        run_job(&mut failures, &label, || {
            leaders_job(client, settings, category, per_mode)
        });
    }
    if !failures.is_empty() {
        warn!("{} leader job(s) failed", failures.len());
    }
    Ok(())
}

fn leaders_job(
    client: &Client,
    settings: &Settings,
    category: StatCategory,
    per_mode: PerMode,
) -> Result<()> {
    let table = leaders::fetch_league_leaders(client, settings, category, per_mode)?;
    let path = settings.csv_dir.join(format!(
        "NBA_Leaders_{}_{}.csv",
        category.abbreviation(),
        per_mode.as_param()
    ));
    export::write_csv(&path, &table.headers, &table.to_string_rows())
}

fn moreyball_job(client: &Client, settings: &Settings) -> Result<()> {
    let table = moreyball::fetch_shot_locations(client, settings)?;
    let ranked = moreyball::build_ranking(&table, settings.moreyball_min_attempts)?;
    if ranked.is_empty() {
        warn!(
            "no players clear the {} attempted-shot gate",
            settings.moreyball_min_attempts
        );
    }

    let rows: Vec<Vec<String>> = ranked.iter().map(moreyball::csv_row).collect();
    export::write_csv(
        &settings.csv_dir.join("Moreyball_Ranking.csv"),
        &moreyball::csv_header(),
        &rows,
    )?;

    let snapshots = moreyball::snapshot_rows(&ranked);
    export::write_yaml(Path::new("moreyball.yml"), &snapshots, Some(settings.yaml_trim))?;
    export::write_yaml(Path::new("moreyball_full.yml"), &snapshots, None)
}

fn distance_job(client: &Client, settings: &Settings) -> Result<()> {
    let rows = distance::fetch_distance_rows(client, settings)?;
    let ranked = distance::build_ranking(rows, settings.distance_min_minutes);
    if ranked.is_empty() {
        warn!(
            "no players clear the {}-minute gate",
            settings.distance_min_minutes
        );
    }

    let csv_rows: Vec<Vec<String>> = ranked.iter().map(distance::csv_row).collect();
    export::write_csv(
        &settings.csv_dir.join("NBA_Leaders_Distance"),
        &distance::csv_header(),
        &csv_rows,
    )?;
    export::write_yaml(Path::new("distance.yml"), &distance::snapshot_rows(&ranked), None)
}

fn shot_distance_job(client: &Client, settings: &Settings) -> Result<()> {
    let events = shot_distance::fetch_league_shots(client, settings)?;
    let aggregated = shot_distance::aggregate(&events);
    let ranked = shot_distance::build_ranking(aggregated, settings.shot_distance_min_attempts);
    if ranked.is_empty() {
        warn!(
            "no players clear the {}-attempt gate",
            settings.shot_distance_min_attempts
        );
    }

    let csv_rows: Vec<Vec<String>> = ranked.iter().map(shot_distance::csv_row).collect();
    let csv_name = format!("SHOOTING_DISTANCE_{}.csv", settings.season_tag());
    export::write_csv(Path::new(&csv_name), &shot_distance::csv_header(), &csv_rows)?;
    export::write_yaml(
        Path::new("shot_distance.yml"),
        &shot_distance::snapshot_rows(&ranked),
        None,
    )
}

fn chart_job(
    client: &Client,
    settings: &Settings,
    player: Option<&str>,
    output: &Path,
    with_photo: bool,
) -> Result<()> {
    let name = match player {
        Some(name) => name.to_string(),
        None => {
            let table = moreyball::fetch_shot_locations(client, settings)?;
            let ranked = moreyball::build_ranking(&table, settings.moreyball_min_attempts)?;
            let top = ranked
                .first()
                .ok_or_else(|| anyhow!("no qualifying player to chart"))?;
            info!("charting top shot-quality player {}", top.player_name);
            top.player_name.clone()
        }
    };

    let chart = court_plot::load(client, settings, &name, with_photo)?;
    let svg = court_plot::render_svg(&chart, None, None);
    court_plot::save_png(&svg, output, 2.0)
}
