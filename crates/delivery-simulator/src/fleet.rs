//! Authoritative drone collection and the selection that points into it.

use delivery_domain::{DomainError, DomainResult, Drone, DroneId, Hub};
use rand::Rng;

use crate::factory::generate_fleet;
use crate::motion::{MotionSimulator, TickReport};

/// All drones of a session plus the currently selected id.
///
/// The selection stores only the id. Every read of the selected drone goes
/// through the current collection, so it cannot drift from what the map
/// renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    drones: Vec<Drone>,
    selected: Option<DroneId>,
}

impl Fleet {
    pub fn new(drones: Vec<Drone>) -> Self {
        Self {
            drones,
            selected: None,
        }
    }

    /// Launch `count` drones over `hubs`.
    pub fn generate<R>(count: usize, hubs: &[Hub], rng: &mut R) -> DomainResult<Self>
    where
        R: Rng + ?Sized,
    {
        generate_fleet(count, hubs, rng).map(Self::new)
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    pub fn get(&self, id: &DroneId) -> Option<&Drone> {
        self.drones.iter().find(|d| &d.id == id)
    }

    pub fn in_transit_count(&self) -> usize {
        self.drones.iter().filter(|d| d.is_in_transit()).count()
    }

    pub fn all_delivered(&self) -> bool {
        self.in_transit_count() == 0
    }

    /// Select a drone by id.
    pub fn select(&mut self, id: &DroneId) -> DomainResult<&Drone> {
        let drone = self
            .drones
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| DomainError::DroneNotFound(id.to_string()))?;
        self.selected = Some(drone.id.clone());
        Ok(drone)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&DroneId> {
        self.selected.as_ref()
    }

    /// Live view of the selected drone.
    pub fn selected(&self) -> Option<&Drone> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &DroneId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Drones other than the selected one, in collection order.
    pub fn unselected(&self) -> impl Iterator<Item = &Drone> {
        self.drones.iter().filter(move |d| !self.is_selected(&d.id))
    }

    /// Advance every drone one tick, replacing the whole collection.
    #[must_use]
    pub fn tick(self, motion: &MotionSimulator) -> (Self, TickReport) {
        let (drones, report) = motion.step(self.drones);
        (
            Self {
                drones,
                selected: self.selected,
            },
            report,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubs::generate_hubs;
    use delivery_domain::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fleet(count: usize) -> Fleet {
        let mut rng = StdRng::seed_from_u64(17);
        let hubs = generate_hubs(Position::new(106.7, 10.77), 0.05, 20, &mut rng).unwrap();
        Fleet::generate(count, &hubs, &mut rng).unwrap()
    }

    #[test]
    fn test_selected_view_tracks_live_position() {
        let motion = MotionSimulator::default();
        let mut fleet = fleet(10);
        let id = DroneId::from("DRN0005");

        let before = fleet.select(&id).unwrap().current_position;
        let (fleet, _) = fleet.tick(&motion);

        let selected = fleet.selected().unwrap();
        let authoritative = fleet.get(&id).unwrap();
        assert_eq!(selected.id, id);
        assert_eq!(selected.current_position, authoritative.current_position);
        assert_ne!(selected.current_position, before);
    }

    #[test]
    fn test_select_unknown_drone() {
        let mut fleet = fleet(3);
        let err = fleet.select(&DroneId::from("DRN0099")).unwrap_err();
        assert_eq!(err, DomainError::DroneNotFound("DRN0099".to_string()));
        assert!(fleet.selected().is_none());
    }

    #[test]
    fn test_unselected_excludes_selection() {
        let mut fleet = fleet(4);
        fleet.select(&DroneId::from_number(2)).unwrap();

        let ids: Vec<_> = fleet.unselected().map(|d| d.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["DRN0001", "DRN0003", "DRN0004"]);

        fleet.clear_selection();
        assert_eq!(fleet.unselected().count(), 4);
    }

    #[test]
    fn test_fleet_eventually_delivers_everything() {
        // Large step so the whole fleet lands within a few hundred ticks.
        let motion = MotionSimulator::new(0.001);
        let mut fleet = fleet(8);
        let mut delivered = 0;

        for _ in 0..500 {
            let (next, report) = fleet.tick(&motion);
            fleet = next;
            delivered += report.arrived.len();
            if report.all_delivered() {
                break;
            }
        }

        assert!(fleet.all_delivered());
        assert_eq!(delivered, 8);
    }
}
