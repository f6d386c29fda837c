//! Delivery Drone Simulator CLI
//!
//! Runs the delivery simulation and logs fleet progress, optionally
//! streaming the map layers as JSON lines.

use anyhow::Result;
use clap::Parser;
use delivery_domain::DroneId;
use delivery_simulator::{
    spawn, DashboardSession, FleetSnapshot, MotionSimulator, RuntimeOptions, SimulatorConfig,
    ViewEvent,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "delivery-sim")]
#[command(about = "Simulate delivery drones flying between hubs")]
struct Args {
    /// Number of drones
    #[arg(short, long)]
    drones: Option<usize>,

    /// Number of hubs
    #[arg(long)]
    hubs: Option<usize>,

    /// Step size in degrees per tick
    #[arg(long)]
    speed: Option<f64>,

    /// Tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for reproducible hub and drone generation
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Drone to select at startup, e.g. DRN0005
    #[arg(long)]
    select: Option<String>,

    /// Print the map layers of every snapshot as a JSON line
    #[arg(long)]
    geojson: bool,

    /// Keep ticking after every order is delivered
    #[arg(long)]
    keep_running: bool,
}

impl Args {
    fn apply(&self, config: &mut SimulatorConfig) {
        if let Some(drones) = self.drones {
            config.drone_count = drones;
        }
        if let Some(hubs) = self.hubs {
            config.hub_count = hubs;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = SimulatorConfig::from_env();
    args.apply(&mut config);

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate()?;

    info!(
        hubs = config.hub_count,
        drones = config.drone_count,
        speed = config.speed,
        tick_ms = config.tick_ms,
        seed = ?config.seed,
        map_token = config.map_token.is_some(),
        "Starting delivery simulation"
    );
    if config.map_token.is_none() {
        warn!("MAPBOX_TOKEN is not set; map clients will not be able to load tiles");
    }

    let mut rng = config.rng();
    let session = DashboardSession::from_config(&config, &mut rng)?;
    let options = RuntimeOptions {
        tick_interval: config.tick_interval(),
        stop_when_delivered: !args.keep_running,
        max_ticks: args.ticks,
    };
    let handle = spawn(session, MotionSimulator::new(config.speed), options);

    if let Some(id) = &args.select {
        handle
            .send(ViewEvent::DroneClicked {
                id: DroneId::new(id.as_str()),
            })
            .await?;
    }

    let mut last_tick = 0;
    let on_snapshot = |snapshot: &FleetSnapshot| {
        if args.geojson {
            match serde_json::to_string(&snapshot.map) {
                Ok(json) => println!("{json}"),
                Err(err) => warn!(error = %err, "Failed to encode map layers"),
            }
        }

        if snapshot.tick != last_tick {
            last_tick = snapshot.tick;
            info!(
                "Tick {} | In transit: {}/{}",
                snapshot.tick, snapshot.in_transit, snapshot.list.count
            );
            if let Some(detail) = &snapshot.detail {
                info!(
                    "  {} ({}) {} | {} | {:.3} km to {}",
                    detail.id,
                    detail.order_id,
                    detail.status,
                    detail.position_label,
                    detail.remaining_km,
                    detail.end_location
                );
            }
        }
    };

    let session = handle
        .run_until(tokio::signal::ctrl_c(), on_snapshot)
        .await?;
    let fleet = session.fleet();

    info!("=== DELIVERY SUMMARY ===");
    info!(
        "{} ticks | {} of {} orders delivered",
        session.tick_count(),
        fleet.len() - fleet.in_transit_count(),
        fleet.len()
    );
    for drone in fleet.drones() {
        info!(
            "{} {} | {} -> {} | {}",
            drone.id, drone.order_id, drone.start_location, drone.end_location, drone.order_status
        );
    }

    Ok(())
}
