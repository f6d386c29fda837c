//! Dashboard session: the fleet plus the view state around it.

use chrono::{DateTime, Utc};
use delivery_domain::{DroneId, Hub, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SimulatorConfig;
use crate::error::SimulatorResult;
use crate::fleet::Fleet;
use crate::hubs::generate_hubs;
use crate::motion::{MotionSimulator, TickReport};
use crate::presentation::{DroneDetailView, DroneListView, MapLayers};

/// Zoom level the camera flies to when a drone is picked.
pub const FOCUS_ZOOM: f64 = 15.0;
/// Zoom level of the initial overview.
pub const OVERVIEW_ZOOM: f64 = 13.0;

/// Map camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: Position,
    pub zoom: f64,
}

/// User interaction forwarded by the map or the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// A drone marker or list row was clicked.
    DroneClicked { id: DroneId },
    ClearSelection,
    ToggleSidebar,
}

/// Render-ready state after a tick or an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSnapshot {
    pub session_id: Uuid,
    pub tick: u64,
    pub taken_at: DateTime<Utc>,
    pub sidebar_open: bool,
    pub camera: Camera,
    pub map: MapLayers,
    pub list: DroneListView,
    pub detail: Option<DroneDetailView>,
    pub in_transit: usize,
}

/// Everything a single dashboard owns.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    hubs: Vec<Hub>,
    fleet: Fleet,
    sidebar_open: bool,
    camera: Camera,
    tick: u64,
}

impl DashboardSession {
    pub fn new(hubs: Vec<Hub>, fleet: Fleet, center: Position) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            hubs,
            fleet,
            sidebar_open: true,
            camera: Camera {
                center,
                zoom: OVERVIEW_ZOOM,
            },
            tick: 0,
        }
    }

    /// Generate hubs and drones from configuration.
    pub fn from_config<R>(config: &SimulatorConfig, rng: &mut R) -> SimulatorResult<Self>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let hubs = generate_hubs(config.center, config.hub_radius, config.hub_count, rng)?;
        let fleet = Fleet::generate(config.drone_count, &hubs, rng)?;

        let session = Self::new(hubs, fleet, config.center);
        info!(
            session_id = %session.session_id,
            hubs = session.hubs.len(),
            drones = session.fleet.len(),
            "Session initialized"
        );
        Ok(session)
    }

    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advance the fleet one tick.
    pub fn tick(&mut self, motion: &MotionSimulator) -> TickReport {
        let (fleet, report) = std::mem::take(&mut self.fleet).tick(motion);
        self.fleet = fleet;
        self.tick += 1;

        for id in &report.arrived {
            info!(tick = self.tick, drone_id = %id, "Drone delivered");
        }
        debug!(
            tick = self.tick,
            moved = report.moved,
            arrived = report.arrived.len(),
            in_transit = report.in_transit,
            "Tick complete"
        );

        report
    }

    /// Apply a user interaction.
    pub fn handle(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::DroneClicked { id } => match self.fleet.select(&id) {
                Ok(drone) => {
                    self.camera = Camera {
                        center: drone.current_position,
                        zoom: FOCUS_ZOOM,
                    };
                    self.sidebar_open = true;
                    debug!(drone_id = %id, "Drone selected");
                }
                Err(err) => warn!(drone_id = %id, error = %err, "Ignoring click"),
            },
            ViewEvent::ClearSelection => self.fleet.clear_selection(),
            ViewEvent::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
        }
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            session_id: self.session_id,
            tick: self.tick,
            taken_at: Utc::now(),
            sidebar_open: self.sidebar_open,
            camera: self.camera,
            map: MapLayers::from_fleet(&self.fleet),
            list: DroneListView::from_fleet(&self.fleet),
            detail: DroneDetailView::from_fleet(&self.fleet),
            in_transit: self.fleet.in_transit_count(),
        }
    }
}
