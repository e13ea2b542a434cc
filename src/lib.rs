//! trip-planner core
//!
//! Client-side dataset manager for a VRP map front-end: jobs, vehicles,
//! bounds and the solution lifecycle, projected to the view through events.

pub mod config;
pub mod error;
pub mod location;
pub mod manager;
pub mod model;
pub mod polyline;
pub mod solution;
pub mod solver;
pub mod traits;
pub mod view;
