//! Geographic points and bounding rectangles.

use serde::{Deserialize, Serialize};

/// A point on the map.
///
/// Serialized as a `[longitude, latitude]` pair, the order used by the
/// solving API and the dataset files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for Location {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Location> for [f64; 2] {
    fn from(location: Location) -> Self {
        [location.lon, location.lat]
    }
}

/// Axis-aligned rectangle covering a set of locations.
///
/// Can only grow; shrinking requires rebuilding from the remaining points
/// with [`Bounds::covering`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    south_west: Location,
    north_east: Location,
}

impl Bounds {
    /// Degenerate rectangle around a single point.
    pub fn from_point(location: Location) -> Self {
        Self {
            south_west: location,
            north_east: location,
        }
    }

    /// Smallest rectangle covering every point, or `None` for no points.
    pub fn covering<I>(locations: I) -> Option<Self>
    where
        I: IntoIterator<Item = Location>,
    {
        let mut bounds: Option<Bounds> = None;
        for location in locations {
            extend_bounds(&mut bounds, location);
        }
        bounds
    }

    pub fn south_west(&self) -> Location {
        self.south_west
    }

    pub fn north_east(&self) -> Location {
        self.north_east
    }

    pub fn extend(&mut self, location: Location) {
        self.south_west.lon = self.south_west.lon.min(location.lon);
        self.south_west.lat = self.south_west.lat.min(location.lat);
        self.north_east.lon = self.north_east.lon.max(location.lon);
        self.north_east.lat = self.north_east.lat.max(location.lat);
    }

    pub fn contains(&self, location: Location) -> bool {
        location.lon >= self.south_west.lon
            && location.lon <= self.north_east.lon
            && location.lat >= self.south_west.lat
            && location.lat <= self.north_east.lat
    }
}

/// Extend an optional rectangle, creating it on the first point.
pub fn extend_bounds(bounds: &mut Option<Bounds>, location: Location) {
    match bounds {
        Some(bounds) => bounds.extend(location),
        None => *bounds = Some(Bounds::from_point(location)),
    }
}
