//! Hub generation for the delivery area.

use delivery_domain::{DomainError, DomainResult, Hub, Position};
use rand::Rng;

/// Largest accepted scatter radius, in degrees.
pub const MAX_HUB_RADIUS: f64 = 180.0;

/// Scatter `count` hubs uniformly inside the square of side `2 * radius`
/// centered on `center`.
///
/// Names are unique (`HUB 000`, `HUB 001`, ...); positions are not.
pub fn generate_hubs<R>(
    center: Position,
    radius: f64,
    count: usize,
    rng: &mut R,
) -> DomainResult<Vec<Hub>>
where
    R: Rng + ?Sized,
{
    if !(0.0..=MAX_HUB_RADIUS).contains(&radius) {
        return Err(DomainError::InvalidRadius(radius));
    }

    let hubs = (0..count)
        .map(|index| Hub {
            name: Hub::name_for_index(index),
            position: Position::new(
                center.longitude + rng.gen_range(-radius..=radius),
                center.latitude + rng.gen_range(-radius..=radius),
            ),
        })
        .collect();

    Ok(hubs)
}
