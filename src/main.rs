use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tokio::time::{MissedTickBehavior, interval};
use tokio::{select, signal};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use trip_analytics::analytics::{RegionClassifier, report};
use trip_analytics::clock::{Clock, SystemClock};
use trip_analytics::config::Settings;
use trip_analytics::feed::read_feed;
use trip_analytics::model::Trip;

/// Classifies, positions and aggregates the trips of a feed snapshot
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Feed snapshot, a JSON array of trips
    #[arg(env = "FEED_FILE")]
    feed: PathBuf,

    /// Time zone the feed's clock times are expressed in
    #[arg(long, env = "TRIP_TZ", default_value = "Europe/Paris")]
    timezone: String,

    /// JSON file with the ordered region boxes, defaults to the French regions
    #[arg(long, env = "REGIONS_FILE")]
    regions: Option<PathBuf>,

    /// Length of the rankings
    #[arg(long, env = "TOP_N", default_value_t = 10)]
    top: usize,

    /// Only track this trip instead of printing the whole dashboard
    #[arg(long, env = "TRIP_ID")]
    trip: Option<String>,

    /// Re-read the feed every N seconds instead of running once
    #[arg(long, env = "REFRESH_SECS")]
    refresh: Option<u64>,

    /// Seconds between two position updates of the tracked trip in watch mode
    #[arg(long, env = "TICK_SECS", default_value_t = 5)]
    tick: u64,

    #[arg(long, env = "LOG_DIR", default_value = "./logs")]
    log_dir: PathBuf,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    _ = dotenv();
    let args = Args::parse();

    let _guard = init_tracing(&args.log_dir);

    let settings = Settings::new(&args.timezone, args.regions.as_deref(), args.top)
        .context("invalid configuration")?;
    info!(timezone = %settings.timezone, regions = settings.regions.regions.len(), "loaded settings");

    let regions = RegionClassifier::new(settings.regions.clone());
    let clock = SystemClock {
        tz: settings.timezone,
    };

    match args.refresh {
        None => run_once(&args, &settings, &regions, &clock),
        Some(secs) => watch(&args, &settings, &regions, &clock, secs).await,
    }
}

fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let appender = tracing_appender::rolling::daily(log_dir, "trip_analytics.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);

    // A layer that logs events to rolling files.
    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_appender)
        .with_ansi(false)
        .pretty();

    // stdout is reserved for the JSON output
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact();

    Registry::default()
        .with(file_log)
        .with(stderr_log)
        .with(env_filter)
        .init();

    guard
}

fn run_once(
    args: &Args,
    settings: &Settings,
    regions: &RegionClassifier,
    clock: &impl Clock,
) -> Result<()> {
    let trips = read_feed(&args.feed)?;
    let now = clock.now();

    let output = match &args.trip {
        Some(trip_id) => {
            let trip = find_trip(&trips, trip_id)
                .with_context(|| format!("trip {trip_id} isn't in the feed"))?;
            serde_json::to_string_pretty(&report::track(trip, now))?
        }
        None => serde_json::to_string_pretty(&report::build(
            trips,
            now,
            regions,
            settings.top_n,
        ))?,
    };

    println!("{output}");

    Ok(())
}

/// Refreshes the dashboard on one timer and redraws the tracked trip on another
async fn watch(
    args: &Args,
    settings: &Settings,
    regions: &RegionClassifier,
    clock: &impl Clock,
    refresh_secs: u64,
) -> Result<()> {
    let mut refresh = interval(Duration::from_secs(refresh_secs.max(1)));
    let mut redraw = interval(Duration::from_secs(args.tick.max(1)));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut trips: Vec<Trip> = vec![];

    loop {
        select! {
            _ = refresh.tick() => {
                match read_feed(&args.feed) {
                    Ok(fresh) => {
                        trips = fresh;
                        let dashboard = report::build(trips.clone(), clock.now(), regions, settings.top_n);
                        println!("{}", serde_json::to_string(&dashboard)?);
                    }
                    Err(e) => error!("{:?}", anyhow::Error::from(e).context("error refreshing the feed")),
                }
            }
            _ = redraw.tick(), if args.trip.is_some() => {
                let Some(trip_id) = &args.trip else { continue };
                match find_trip(&trips, trip_id) {
                    Some(trip) => println!("{}", serde_json::to_string(&report::track(trip, clock.now()))?),
                    None => warn!(trip_id = %trip_id, "tracked trip isn't in the current snapshot"),
                }
            }
            res = signal::ctrl_c() => {
                res.context("error waiting for ctrl-c")?;
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

fn find_trip<'a>(trips: &'a [Trip], trip_id: &str) -> Option<&'a Trip> {
    trips.iter().find(|t| t.trip_id == trip_id)
}
