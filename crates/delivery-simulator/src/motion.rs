//! Linear motion toward the destination, one fixed step per tick.

use delivery_domain::{Drone, DroneId};
use serde::{Deserialize, Serialize};

/// Arrival threshold as a multiple of the step size.
///
/// Lets the final jump exceed one nominal step instead of creeping toward
/// the destination forever.
pub const ARRIVAL_FACTOR: f64 = 1.5;

/// What a single tick did to a drone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Already delivered; untouched.
    Frozen,
    Moved,
    Arrived,
}

/// Per-tick summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub moved: usize,
    pub arrived: Vec<DroneId>,
    pub in_transit: usize,
}

impl TickReport {
    pub fn all_delivered(&self) -> bool {
        self.in_transit == 0
    }
}

/// Motion simulator with a fixed step size in degrees per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSimulator {
    speed: f64,
}

impl MotionSimulator {
    /// `speed` must be positive; [`crate::SimulatorConfig::validate`]
    /// rejects anything else.
    pub const fn new(speed: f64) -> Self {
        Self { speed }
    }

    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Advance one drone by one tick.
    pub fn advance(&self, mut drone: Drone) -> (Drone, StepOutcome) {
        if !drone.is_in_transit() {
            return (drone, StepOutcome::Frozen);
        }

        let delta = drone
            .current_position
            .displacement_to(&drone.destination_position);
        let distance = delta.length();

        if distance < self.speed * ARRIVAL_FACTOR {
            drone.mark_delivered();
            return (drone, StepOutcome::Arrived);
        }

        let fraction = (self.speed / distance).min(1.0);
        drone.current_position = drone.current_position + delta.scale(fraction);
        (drone, StepOutcome::Moved)
    }

    /// Advance every drone once. Updates are independent of each other.
    pub fn step(&self, drones: Vec<Drone>) -> (Vec<Drone>, TickReport) {
        let mut report = TickReport::default();

        let next = drones
            .into_iter()
            .map(|drone| {
                let (drone, outcome) = self.advance(drone);
                match outcome {
                    StepOutcome::Moved => report.moved += 1,
                    StepOutcome::Arrived => report.arrived.push(drone.id.clone()),
                    StepOutcome::Frozen => {}
                }
                if drone.is_in_transit() {
                    report.in_transit += 1;
                }
                drone
            })
            .collect();

        (next, report)
    }
}

impl Default for MotionSimulator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_domain::{OrderId, OrderStatus, Position, Route};

    const SPEED: f64 = 0.00005;

    fn drone_between(current: Position, destination: Position) -> Drone {
        Drone {
            id: DroneId::from_number(1),
            order_id: OrderId::from_suffix("TEST01"),
            order_status: OrderStatus::InTransit,
            start_location: "HUB 000".to_string(),
            end_location: "HUB 001".to_string(),
            current_position: current,
            destination_position: destination,
            route: Route::direct(current, destination),
            waypoint_index: 1,
        }
    }

    fn distance(drone: &Drone) -> f64 {
        drone
            .current_position
            .displacement_to(&drone.destination_position)
            .length()
    }

    #[test]
    fn test_single_step_far_from_destination() {
        let sim = MotionSimulator::new(SPEED);
        let drone = drone_between(Position::new(0.0, 0.0), Position::new(1.0, 0.0));

        let (drone, outcome) = sim.advance(drone);
        assert_eq!(outcome, StepOutcome::Moved);
        assert!((drone.current_position.longitude - 0.00005).abs() < 1e-15);
        assert_eq!(drone.current_position.latitude, 0.0);
        assert_eq!(drone.waypoint_index, 1);
        assert_eq!(drone.order_status, OrderStatus::InTransit);
    }

    #[test]
    fn test_snaps_inside_arrival_threshold() {
        let sim = MotionSimulator::new(SPEED);
        let destination = Position::new(1.0, 0.0);
        let drone = drone_between(Position::new(0.99993, 0.0), destination);

        let (drone, outcome) = sim.advance(drone);
        assert_eq!(outcome, StepOutcome::Arrived);
        assert_eq!(drone.current_position, destination);
        assert_eq!(drone.waypoint_index, 2);
        assert_eq!(drone.order_status, OrderStatus::Delivered);
    }

    #[test]
    fn test_distance_strictly_decreases_until_arrival() {
        let sim = MotionSimulator::new(0.001);
        let mut drone = drone_between(Position::new(106.70, 10.77), Position::new(106.71, 10.775));
        let mut last = distance(&drone);
        let mut ticks = 0;

        loop {
            let (next, outcome) = sim.advance(drone);
            drone = next;
            ticks += 1;
            if outcome == StepOutcome::Arrived {
                break;
            }
            let now = distance(&drone);
            assert!(now < last, "tick {ticks}: {now} >= {last}");
            last = now;
            assert!(ticks < 1_000, "drone never arrived");
        }

        assert_eq!(drone.current_position, drone.destination_position);
    }

    #[test]
    fn test_arrived_drone_is_frozen() {
        let sim = MotionSimulator::new(SPEED);
        let (arrived, _) = sim.advance(drone_between(
            Position::new(0.99993, 0.0),
            Position::new(1.0, 0.0),
        ));

        let (after, outcome) = sim.advance(arrived.clone());
        assert_eq!(outcome, StepOutcome::Frozen);
        assert_eq!(after, arrived);
    }

    #[test]
    fn test_step_reports_arrivals() {
        let sim = MotionSimulator::new(SPEED);
        let mut far = drone_between(Position::new(0.0, 0.0), Position::new(1.0, 0.0));
        far.id = DroneId::from_number(1);
        let mut near = drone_between(Position::new(0.99993, 0.0), Position::new(1.0, 0.0));
        near.id = DroneId::from_number(2);

        let (drones, report) = sim.step(vec![far, near]);
        assert_eq!(report.moved, 1);
        assert_eq!(report.arrived, vec![DroneId::from_number(2)]);
        assert_eq!(report.in_transit, 1);
        assert!(!report.all_delivered());
        assert_eq!(drones[0].id, DroneId::from_number(1));

        let (_, report) = sim.step(drones);
        assert_eq!(report.moved, 1);
        assert!(report.arrived.is_empty());
    }
}
