use anyhow::{bail, Context, Result};
use clap::Parser;
use geo::Point;
use std::path::{Path, PathBuf};
use treasure_hunt_core::{
    HttpSubmitter, RecordingMode, SessionConfig, SessionSnapshot, ShapeRegistry, ShapeTracer,
    Submission, Submitter, TracerPhase, TracerView,
};

mod track;

use track::read_track;

#[derive(Parser, Debug)]
#[command(
    name = "trace-replay",
    author,
    version,
    about = "Replay a recorded GPS track against a treasure hunt shape",
    long_about = "Feeds every position of a recorded track through the same progress \
                  tracker the app uses and reports which waypoints were reached.\n\n\
                  Useful for tuning the reach threshold of a new shape before sending \
                  players out, and for re-submitting a walk that never made it to the \
                  results service."
)]
struct Args {
    /// Recorded track (GeoJSON LineString or Point features, lon/lat)
    #[arg(short, long)]
    track: PathBuf,

    /// Shape to trace; overrides the config file
    #[arg(short, long)]
    shape: Option<String>,

    /// Extra shapes as a GeoJSON FeatureCollection of named LineStrings
    #[arg(long)]
    shapes: Option<PathBuf>,

    /// Session config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reach threshold in meters; overrides the config file
    #[arg(long)]
    threshold: Option<f64>,

    /// Record without a start press, from the first sample after the start
    /// waypoint is reached until the last waypoint is reached
    #[arg(long)]
    implicit: bool,

    /// Finish and submit the path if every waypoint was reached
    #[arg(long)]
    finish: bool,

    /// Results service URL; overrides the config file
    #[arg(long)]
    endpoint: Option<String>,

    /// Player nickname sent with the path; overrides the config file
    #[arg(long)]
    nickname: Option<String>,

    /// Write the final map layers to this GeoJSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, PartialEq)]
struct ReplayStats {
    samples: usize,
    /// Sample index at which each waypoint was reached.
    reached_at: Vec<usize>,
    started_at: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let config = load_config(&args)?;
    log::info!("=== Trace Replay ===");
    log::info!("Track: {}", args.track.display());
    log::info!("Shape: {}", config.shape);

    let mut registry = ShapeRegistry::builtin();
    if let Some(path) = &args.shapes {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shapes file: {}", path.display()))?;
        registry.extend(
            ShapeRegistry::from_geojson(&content)
                .with_context(|| format!("Invalid shapes file: {}", path.display()))?,
        );
    }

    let shape = registry.resolve(&config.shape).with_context(|| {
        let known: Vec<_> = registry.names().iter().map(|n| n.to_string()).collect();
        format!("Known shapes: {}", known.join(", "))
    })?;
    let mut tracer = ShapeTracer::new(shape, config.tracer)?;

    let track = read_track(&args.track)?;
    let stats = replay(&mut tracer, &track);
    report(&tracer, &stats);

    if args.finish {
        finish(&mut tracer, &config)?;
    }

    if let Some(path) = &args.output {
        write_view(&tracer, config.tracer.future_points, path)?;
        log::info!("Wrote map layers to {}", path.display());
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str::<SessionConfig>(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => match &args.shape {
            Some(shape) => SessionConfig::new(shape.as_str()),
            None => bail!("Either --shape or --config must be given"),
        },
    };

    if let Some(shape) = &args.shape {
        config.shape = shape.as_str().into();
    }
    if let Some(threshold) = args.threshold {
        config.tracer.threshold = threshold;
    }
    if args.implicit {
        config.tracer.recording = RecordingMode::Implicit;
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(nickname) = &args.nickname {
        config.nickname = nickname.clone();
    }

    Ok(config)
}

/// Feed lon/lat samples through the tracer. In explicit mode recording is
/// started as soon as the player has been near the start, like a player
/// pressing start right away.
fn replay(tracer: &mut ShapeTracer, track: &[Point]) -> ReplayStats {
    let frame = *tracer.shape().frame();
    let mut stats = ReplayStats::default();

    for (index, &lon_lat) in track.iter().enumerate() {
        let before = tracer.target_index();
        tracer.on_position(frame.project(lon_lat));
        stats.samples += 1;

        if tracer.target_index() > before {
            log::debug!(
                "Sample {index}: reached waypoint {}/{}",
                tracer.target_index(),
                tracer.shape().len()
            );
            stats.reached_at.push(index);
        }

        if stats.started_at.is_none()
            && tracer.config().recording == RecordingMode::Explicit
            && tracer.start()
        {
            log::debug!("Sample {index}: recording started");
            stats.started_at = Some(index);
        }
    }

    stats
}

fn report(tracer: &ShapeTracer, stats: &ReplayStats) {
    log::info!("");
    log::info!("Replayed {} samples", stats.samples);
    log::info!(
        "Reached {}/{} waypoints, recorded {} path points",
        tracer.target_index(),
        tracer.shape().len(),
        tracer.recorded_path().len()
    );

    match tracer.phase() {
        TracerPhase::ReadyToFinish => log::info!("Shape complete"),
        _ if !tracer.was_near_start() => log::warn!("The track never came near the start"),
        _ => {
            if let Some(target) = tracer.shape().get(tracer.target_index()) {
                let closest = tracer
                    .last_position()
                    .map(|p| treasure_hunt_core::distance(p, target));
                log::warn!(
                    "Stuck at waypoint {} (last sample {:.1} m away)",
                    tracer.target_index(),
                    closest.unwrap_or(f64::NAN)
                );
            }
        }
    }
}

fn finish(tracer: &mut ShapeTracer, config: &SessionConfig) -> Result<()> {
    let Some(submission) = tracer.finish() else {
        log::warn!("Not every waypoint was reached, nothing to submit");
        return Ok(());
    };

    match &config.endpoint {
        Some(endpoint) => submit(&submission, &config.nickname, endpoint),
        None => {
            let request = submission.to_request(&config.nickname);
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
    }
}

fn submit(submission: &Submission, nickname: &str, endpoint: &str) -> Result<()> {
    let request = submission.to_request(nickname);
    let submitter = HttpSubmitter::new(endpoint);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime
        .block_on(submitter.submit(&request))
        .with_context(|| format!("Failed to submit to {endpoint}"))?;

    log::info!("Submitted {} points to {endpoint}", request.points.len());
    Ok(())
}

fn write_view(tracer: &ShapeTracer, future_points: usize, path: &Path) -> Result<()> {
    let snapshot = SessionSnapshot {
        tracer: tracer.snapshot(),
        position_error: None,
    };
    let view = TracerView::build(tracer.shape(), &snapshot, future_points);

    let json = serde_json::to_string_pretty(&view.to_geojson())?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
