//! Real Paris locations for test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use trip_planner::location::Location;

/// A named place.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub lon: f64,
    pub lat: f64,
}

impl Place {
    pub const fn new(name: &'static str, lon: f64, lat: f64) -> Self {
        Self { name, lon, lat }
    }

    pub fn location(&self) -> Location {
        Location::new(self.lon, self.lat)
    }
}

// ============================================================================
// Depots (good for vehicle start/end)
// ============================================================================

pub const DEPOTS: &[Place] = &[
    Place::new("Gare de Lyon", 2.3733, 48.8443),
    Place::new("Gare du Nord", 2.3553, 48.8809),
    Place::new("Gare Montparnasse", 2.3212, 48.8412),
];

// ============================================================================
// Landmarks (jobs)
// ============================================================================

pub const LANDMARKS: &[Place] = &[
    Place::new("Louvre", 2.3376, 48.8606),
    Place::new("Notre-Dame", 2.3499, 48.8530),
    Place::new("Eiffel Tower", 2.2945, 48.8584),
    Place::new("Sacré-Cœur", 2.3431, 48.8867),
    Place::new("Panthéon", 2.3464, 48.8462),
    Place::new("Arc de Triomphe", 2.2950, 48.8738),
    Place::new("Centre Pompidou", 2.3522, 48.8606),
    Place::new("Musée d'Orsay", 2.3266, 48.8600),
];
