//! Drone creation from a hub set.

use delivery_domain::{
    DomainError, DomainResult, Drone, DroneId, Hub, OrderId, OrderStatus, Position, Route,
};
use rand::Rng;
use tracing::debug;

/// Per-axis start jitter bound, in degrees.
pub const START_JITTER: f64 = 0.00005;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Create drone `number` with a random start and a different random end hub.
pub fn create_drone<R>(number: u32, hubs: &[Hub], rng: &mut R) -> DomainResult<Drone>
where
    R: Rng + ?Sized,
{
    if hubs.len() < 2 {
        return Err(DomainError::InsufficientHubs { found: hubs.len() });
    }

    let start_idx = rng.gen_range(0..hubs.len());
    // Draw from the remaining hubs and shift past the start index.
    let mut end_idx = rng.gen_range(0..hubs.len() - 1);
    if end_idx >= start_idx {
        end_idx += 1;
    }

    let start_hub = &hubs[start_idx];
    let end_hub = &hubs[end_idx];

    let start_position = Position::new(
        start_hub.position.longitude + rng.gen_range(-START_JITTER..=START_JITTER),
        start_hub.position.latitude + rng.gen_range(-START_JITTER..=START_JITTER),
    );

    let drone = Drone {
        id: DroneId::from_number(number),
        order_id: random_order_id(rng),
        order_status: OrderStatus::InTransit,
        start_location: start_hub.name.clone(),
        end_location: end_hub.name.clone(),
        current_position: start_position,
        destination_position: end_hub.position,
        route: Route::direct(start_position, end_hub.position),
        waypoint_index: Drone::INITIAL_WAYPOINT,
    };

    debug!(
        drone_id = %drone.id,
        from = %drone.start_location,
        to = %drone.end_location,
        route_km = drone.route.length_km(),
        "Drone created"
    );

    Ok(drone)
}

/// Create drones `DRN0001..=count` over the same hub set.
pub fn generate_fleet<R>(count: usize, hubs: &[Hub], rng: &mut R) -> DomainResult<Vec<Drone>>
where
    R: Rng + ?Sized,
{
    (1..=count)
        .map(|n| create_drone(u32::try_from(n).unwrap_or(u32::MAX), hubs, rng))
        .collect()
}

fn random_order_id<R>(rng: &mut R) -> OrderId
where
    R: Rng + ?Sized,
{
    let suffix: String = (0..OrderId::SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    OrderId::from_suffix(&suffix)
}
