//! # Delivery Simulator
//!
//! Simulated delivery drones for the tracker dashboard.
//!
//! ## Features
//!
//! - Random hub scatter around a center point
//! - Drone factory with jittered starts and direct routes
//! - Fixed-step linear motion with arrival snapping
//! - Live selection, GeoJSON layers and sidebar views
//! - Tokio tick loop with clean cancellation

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod factory;
pub mod fleet;
pub mod hubs;
pub mod motion;
pub mod presentation;
pub mod runtime;
pub mod session;

pub use config::{ConfigError, SimulatorConfig};
pub use error::{SimulatorError, SimulatorResult};
pub use factory::{create_drone, generate_fleet};
pub use fleet::Fleet;
pub use hubs::generate_hubs;
pub use motion::{MotionSimulator, StepOutcome, TickReport};
pub use presentation::{DroneDetailView, DroneListView, MapLayers};
pub use runtime::{spawn, RuntimeOptions, SimulationHandle};
pub use session::{Camera, DashboardSession, FleetSnapshot, ViewEvent};
