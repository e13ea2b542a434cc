//! Test fixtures for trip-planner.
//!
//! Provides:
//! - Real Paris landmark locations (from OpenStreetMap)
//! - Builders for jobs, vehicles and recorded managers

#![allow(dead_code)]

pub mod paris_locations;

pub use paris_locations::*;

use trip_planner::manager::TripManager;
use trip_planner::model::{Job, Vehicle};
use trip_planner::view::ViewEvent;

/// Manager recording every view event, with the given job limit.
pub fn recorded_manager(max_jobs: usize) -> TripManager<Vec<ViewEvent>> {
    TripManager::with_max_jobs(max_jobs, Vec::new())
}

/// Job `id` placed at `place`, named after it.
pub fn job_at(id: u64, place: &Place) -> Job {
    Job::new(id, place.location()).with_description(place.name)
}

/// Default vehicle starting at `place`.
pub fn vehicle_from(id: u64, place: &Place) -> Vehicle {
    Vehicle::new(id).with_start(place.location())
}
