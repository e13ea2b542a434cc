//! Error types for dataset mutations and solve requests.

use std::fmt;

use crate::model::{JobId, VehicleId};
use crate::polyline::PolylineError;
use crate::view::Endpoint;

#[derive(Debug)]
pub enum DatasetError {
    /// Adding a job would exceed the configured maximum.
    CapacityExceeded { max: usize },
    /// The vehicle would be left with neither a start nor an end.
    InvariantViolation { vehicle: VehicleId },
    /// A vehicle was added with neither a start nor an end.
    NoEndpoint { vehicle: VehicleId },
    UnknownJob(JobId),
    UnknownVehicle(VehicleId),
    DuplicateJob(JobId),
    DuplicateVehicle(VehicleId),
    /// The vehicle has no such endpoint to remove.
    MissingEndpoint { vehicle: VehicleId, endpoint: Endpoint },
    /// Reassignment needs the default vehicle, which is not in the dataset.
    NoDefaultVehicle,
    NoSolution,
    Geometry(PolylineError),
    Output(serde_json::Error),
}

impl DatasetError {
    /// Whether the error is one the user is told about directly.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            DatasetError::CapacityExceeded { .. }
                | DatasetError::InvariantViolation { .. }
                | DatasetError::NoEndpoint { .. }
        )
    }
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::CapacityExceeded { max } => {
                write!(f, "Number of jobs can't exceed {}.", max)
            }
            DatasetError::InvariantViolation { .. } => f.write_str("Can't delete both start and end."),
            DatasetError::NoEndpoint { vehicle } => {
                write!(f, "Vehicle {} needs a start or an end.", vehicle)
            }
            DatasetError::UnknownJob(id) => write!(f, "unknown job {}", id),
            DatasetError::UnknownVehicle(id) => write!(f, "unknown vehicle {}", id),
            DatasetError::DuplicateJob(id) => write!(f, "job {} already exists", id),
            DatasetError::DuplicateVehicle(id) => write!(f, "vehicle {} already exists", id),
            DatasetError::MissingEndpoint { vehicle, endpoint } => {
                write!(f, "vehicle {} has no {}", vehicle, endpoint)
            }
            DatasetError::NoDefaultVehicle => f.write_str("no default vehicle to reassign to"),
            DatasetError::NoSolution => f.write_str("no solution to display"),
            DatasetError::Geometry(err) => write!(f, "invalid route geometry: {}", err),
            DatasetError::Output(err) => write!(f, "invalid solver output: {}", err),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Geometry(err) => Some(err),
            DatasetError::Output(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PolylineError> for DatasetError {
    fn from(err: PolylineError) -> Self {
        DatasetError::Geometry(err)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Output(err)
    }
}

#[derive(Debug)]
pub enum SolveError {
    Http(reqwest::Error),
    /// The solver answered with a non-zero status code.
    Rejected { code: i64, message: String },
    /// Solving needs at least one job, one vehicle and no current solution.
    NotSolvable,
    Dataset(DatasetError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Http(err) => write!(f, "solver request failed: {}", err),
            SolveError::Rejected { code, message } => {
                write!(f, "solver error {}: {}", code, message)
            }
            SolveError::NotSolvable => f.write_str("at least one job and one vehicle are required"),
            SolveError::Dataset(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Http(err) => Some(err),
            SolveError::Dataset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SolveError {
    fn from(err: reqwest::Error) -> Self {
        SolveError::Http(err)
    }
}

impl From<DatasetError> for SolveError {
    fn from(err: DatasetError) -> Self {
        SolveError::Dataset(err)
    }
}
