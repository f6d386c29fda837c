//! # Delivery Drone Tracker - Domain Model
//!
//! Value objects, entities and errors shared by the simulator and the
//! presentation boundary. Nothing in here performs I/O or owns time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// A point in the lon/lat coordinate plane.
///
/// Serializes as the GeoJSON pair `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

impl Position {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Per-axis difference `other - self`, planar.
    #[must_use]
    pub fn displacement_to(&self, other: &Position) -> Displacement {
        Displacement {
            d_longitude: other.longitude - self.longitude,
            d_latitude: other.latitude - self.latitude,
        }
    }

    /// Calculate great-circle distance to another point (Haversine formula)
    #[must_use]
    pub fn distance_to_km(&self, other: &Position) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    pub const fn to_array(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<[f64; 2]> for Position {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        position.to_array()
    }
}

impl Add<Displacement> for Position {
    type Output = Position;

    fn add(self, rhs: Displacement) -> Position {
        Position::new(
            self.longitude + rhs.d_longitude,
            self.latitude + rhs.d_latitude,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.longitude, self.latitude)
    }
}

/// Planar offset between two positions, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Displacement {
    pub d_longitude: f64,
    pub d_latitude: f64,
}

impl Displacement {
    /// Euclidean norm in degree units.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.d_longitude.hypot(self.d_latitude)
    }

    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            d_longitude: self.d_longitude * factor,
            d_latitude: self.d_latitude * factor,
        }
    }
}

/// Drone identifier, rendered as `DRN0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DroneId(String);

impl DroneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_number(number: u32) -> Self {
        Self(format!("DRN{number:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DroneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Order identifier, rendered as `ORD-` followed by six base-36 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub const PREFIX: &'static str = "ORD-";
    pub const SUFFIX_LEN: usize = 6;

    pub fn from_suffix(suffix: &str) -> Self {
        Self(format!("{}{}", Self::PREFIX, suffix.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Delivery order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "in transit")]
    InTransit,
    #[serde(rename = "delivered")]
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InTransit => "in transit",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// Hub entity - named fixed waypoint usable as origin or destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hub {
    pub name: String,
    pub position: Position,
}

impl Hub {
    /// Hub name for a sequential index, zero-padded to three digits.
    pub fn name_for_index(index: usize) -> String {
        format!("HUB {index:03}")
    }
}

/// Straight-line route through an ordered list of positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub waypoints: Vec<Position>,
}

impl Route {
    pub fn direct(start: Position, end: Position) -> Self {
        Self {
            waypoints: vec![start, end],
        }
    }

    /// Total great-circle length of all legs.
    #[must_use]
    pub fn length_km(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|leg| leg[0].distance_to_km(&leg[1]))
            .sum()
    }
}

/// Drone entity - a simulated delivery in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: DroneId,
    pub order_id: OrderId,
    pub order_status: OrderStatus,

    // Route endpoints
    pub start_location: String,
    pub end_location: String,

    // Kinematics
    pub current_position: Position,
    pub destination_position: Position,
    pub route: Route,

    /// Index of the route waypoint the drone is heading to. Starts at 1.
    pub waypoint_index: usize,
}

impl Drone {
    pub const INITIAL_WAYPOINT: usize = 1;

    pub fn is_in_transit(&self) -> bool {
        self.waypoint_index <= Self::INITIAL_WAYPOINT
    }

    /// Snap to the destination and close the order.
    ///
    /// A delivered drone is left untouched.
    pub fn mark_delivered(&mut self) {
        if !self.is_in_transit() {
            return;
        }
        self.current_position = self.destination_position;
        self.waypoint_index = Self::INITIAL_WAYPOINT + 1;
        self.order_status = OrderStatus::Delivered;
    }

    #[must_use]
    pub fn remaining_km(&self) -> f64 {
        self.current_position
            .distance_to_km(&self.destination_position)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DomainError {
    #[error("At least 2 hubs are required to plan a delivery, found {found}")]
    InsufficientHubs { found: usize },

    #[error("Invalid hub scatter radius: {0}")]
    InvalidRadius(f64),

    #[error("Drone not found: {0}")]
    DroneNotFound(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
