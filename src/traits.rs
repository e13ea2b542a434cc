//! Collaborator seams for the trip planner.
//!
//! The manager only depends on these; the map front-end and the HTTP solver
//! client implement them.

use serde_json::Value;

use crate::error::SolveError;
use crate::model::{Job, Vehicle};
use crate::view::ViewEvent;

/// Receives view updates produced by dataset transitions.
pub trait ViewSink {
    fn apply(&mut self, event: ViewEvent);
}

/// Computes routes for a problem.
///
/// Returns the raw solver response; the manager parses the routes it needs
/// and keeps the rest for summaries.
pub trait RouteSolver {
    fn solve(&self, jobs: &[Job], vehicles: &[Vehicle]) -> Result<Value, SolveError>;
}
