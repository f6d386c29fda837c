//! # Presentation Boundary
//!
//! Render-ready data for the map and sidebar collaborators. The map takes
//! GeoJSON feature collections; the sidebar takes plain serializable views.
//! Everything here is derived from a [`Fleet`] on demand and never cached.

use delivery_domain::{Drone, OrderStatus, Position, Route};
use serde::Serialize;
use serde_json::{json, Value};

use crate::fleet::Fleet;

/// `FeatureCollection` of drone points, one feature per drone.
pub fn drones_to_geojson<'a, I>(drones: I) -> Value
where
    I: IntoIterator<Item = &'a Drone>,
{
    let features: Vec<Value> = drones
        .into_iter()
        .map(|drone| {
            json!({
                "type": "Feature",
                "properties": {
                    "id": drone.id,
                    "status": drone.order_status.as_str(),
                    "destination": drone.end_location,
                    "cluster": false,
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": drone.current_position,
                },
            })
        })
        .collect();

    feature_collection(features)
}

/// `FeatureCollection` holding the route as a single `LineString`.
pub fn route_to_geojson(route: &Route) -> Value {
    feature_collection(vec![json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": route.waypoints,
        },
        "properties": {},
    })])
}

/// `FeatureCollection` holding one bare point.
pub fn point_to_geojson(position: Position) -> Value {
    feature_collection(vec![json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": position,
        },
        "properties": {},
    })])
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Layers drawn for the selected drone on top of the clustered source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedLayers {
    pub icon: Value,
    pub halo: Value,
    pub route: Value,
}

/// All map sources for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayers {
    /// Every drone except the selected one; fed to the clustering source.
    pub clustered: Value,
    pub selected: Option<SelectedLayers>,
}

impl MapLayers {
    pub fn from_fleet(fleet: &Fleet) -> Self {
        let selected = fleet.selected().map(|drone| SelectedLayers {
            icon: drones_to_geojson([drone]),
            halo: point_to_geojson(drone.current_position),
            route: route_to_geojson(&drone.route),
        });

        Self {
            clustered: drones_to_geojson(fleet.unselected()),
            selected,
        }
    }
}

/// Display color for an order status.
pub fn status_color(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::InTransit => "#FF0000",
        OrderStatus::Delivered => "#009900",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneListEntry {
    pub id: String,
    pub status: &'static str,
    pub status_color: &'static str,
    pub destination: String,
    pub selected: bool,
}

/// Sidebar list of all drones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneListView {
    pub count: usize,
    pub entries: Vec<DroneListEntry>,
}

impl DroneListView {
    pub fn from_fleet(fleet: &Fleet) -> Self {
        let entries = fleet
            .drones()
            .iter()
            .map(|drone| DroneListEntry {
                id: drone.id.to_string(),
                status: drone.order_status.as_str(),
                status_color: status_color(drone.order_status),
                destination: drone.end_location.clone(),
                selected: fleet.is_selected(&drone.id),
            })
            .collect();

        Self {
            count: fleet.len(),
            entries,
        }
    }
}

/// Sidebar detail card for the selected drone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneDetailView {
    pub id: String,
    pub order_id: String,
    pub status: &'static str,
    pub status_color: &'static str,
    pub start_location: String,
    pub end_location: String,
    pub position: Position,
    /// Position formatted to four decimals, `lon, lat`.
    pub position_label: String,
    pub remaining_km: f64,
}

impl DroneDetailView {
    pub fn from_drone(drone: &Drone) -> Self {
        Self {
            id: drone.id.to_string(),
            order_id: drone.order_id.to_string(),
            status: drone.order_status.as_str(),
            status_color: status_color(drone.order_status),
            start_location: drone.start_location.clone(),
            end_location: drone.end_location.clone(),
            position: drone.current_position,
            position_label: drone.current_position.to_string(),
            remaining_km: drone.remaining_km(),
        }
    }

    /// Detail of the current selection, looked up live.
    pub fn from_fleet(fleet: &Fleet) -> Option<Self> {
        fleet.selected().map(Self::from_drone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubs::generate_hubs;
    use crate::motion::MotionSimulator;
    use delivery_domain::DroneId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fleet(count: usize) -> Fleet {
        let mut rng = StdRng::seed_from_u64(31);
        let hubs = generate_hubs(Position::new(106.7, 10.77), 0.05, 10, &mut rng).unwrap();
        Fleet::generate(count, &hubs, &mut rng).unwrap()
    }

    #[test]
    fn test_drones_to_geojson_shape() {
        let fleet = fleet(3);
        let fc = drones_to_geojson(fleet.drones());

        assert_eq!(fc["type"], "FeatureCollection");
        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);

        let first = &features[0];
        let drone = &fleet.drones()[0];
        assert_eq!(first["geometry"]["type"], "Point");
        assert_eq!(first["properties"]["id"], "DRN0001");
        assert_eq!(first["properties"]["status"], "in transit");
        assert_eq!(first["properties"]["destination"], drone.end_location.as_str());
        assert_eq!(first["properties"]["cluster"], false);
        assert_eq!(
            first["geometry"]["coordinates"][0].as_f64().unwrap(),
            drone.current_position.longitude
        );
    }

    #[test]
    fn test_route_is_two_point_line_string() {
        let fleet = fleet(1);
        let route = route_to_geojson(&fleet.drones()[0].route);
        let geometry = &route["features"][0]["geometry"];
        assert_eq!(geometry["type"], "LineString");
        assert_eq!(geometry["coordinates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_map_layers_split_selection_from_clusters() {
        let mut fleet = fleet(5);
        let layers = MapLayers::from_fleet(&fleet);
        assert!(layers.selected.is_none());
        assert_eq!(layers.clustered["features"].as_array().unwrap().len(), 5);

        fleet.select(&DroneId::from_number(3)).unwrap();
        let layers = MapLayers::from_fleet(&fleet);
        assert_eq!(layers.clustered["features"].as_array().unwrap().len(), 4);

        let selected = layers.selected.unwrap();
        assert_eq!(selected.icon["features"][0]["properties"]["id"], "DRN0003");
        assert_eq!(
            selected.halo["features"][0]["geometry"]["coordinates"],
            selected.icon["features"][0]["geometry"]["coordinates"]
        );
    }

    #[test]
    fn test_list_view_marks_selection() {
        let mut fleet = fleet(3);
        fleet.select(&DroneId::from_number(2)).unwrap();

        let list = DroneListView::from_fleet(&fleet);
        assert_eq!(list.count, 3);
        let flags: Vec<bool> = list.entries.iter().map(|e| e.selected).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(list.entries[0].status_color, "#FF0000");
    }

    #[test]
    fn test_detail_view_reads_authoritative_position_after_tick() {
        let motion = MotionSimulator::default();
        let mut fleet = fleet(10);
        let id = DroneId::from("DRN0005");
        fleet.select(&id).unwrap();

        let (fleet, _) = fleet.tick(&motion);
        let detail = DroneDetailView::from_fleet(&fleet).unwrap();

        assert_eq!(detail.id, "DRN0005");
        assert_eq!(detail.position, fleet.get(&id).unwrap().current_position);
        assert_eq!(detail.position_label, fleet.get(&id).unwrap().current_position.to_string());
        assert!(detail.order_id.starts_with("ORD-"));
    }

    #[test]
    fn test_detail_view_empty_without_selection() {
        assert!(DroneDetailView::from_fleet(&fleet(2)).is_none());
    }
}
