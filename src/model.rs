//! Jobs, vehicles and the dataset import format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Description given to a job that arrives without one.
pub const DEFAULT_JOB_DESCRIPTION: &str = "No description";
pub const DEFAULT_START_DESCRIPTION: &str = "Start";
pub const DEFAULT_END_DESCRIPTION: &str = "End";

/// An identifier that is neither an integer nor a decimal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError {
    raw: String,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier {:?}: expected a non-negative integer", self.raw)
    }
}

impl std::error::Error for IdError {}

/// Identifier as it may appear in hand-written or exported files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

macro_rules! canonical_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Numbers and decimal strings normalize to the same value on ingestion.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "RawId", into = "u64")]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| IdError { raw: s.to_string() })
            }
        }

        impl TryFrom<RawId> for $name {
            type Error = IdError;

            fn try_from(raw: RawId) -> Result<Self, Self::Error> {
                match raw {
                    RawId::Number(value) => Ok(Self(value)),
                    RawId::Text(text) => text.parse(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

canonical_id!(
    /// Caller-assigned job identifier.
    JobId
);
canonical_id!(
    /// Caller-assigned vehicle identifier.
    VehicleId
);

/// A single location to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Job {
    pub fn new(id: u64, location: Location) -> Self {
        Self {
            id: JobId::new(id),
            location,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_JOB_DESCRIPTION)
    }
}

/// A vehicle with an optional start and an optional end.
///
/// A vehicle held by the manager always keeps at least one of the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_description: Option<String>,
}

impl Vehicle {
    pub fn new(id: u64) -> Self {
        Self {
            id: VehicleId::new(id),
            start: None,
            start_description: None,
            end: None,
            end_description: None,
        }
    }

    pub fn with_start(mut self, start: Location) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: Location) -> Self {
        self.end = Some(end);
        self
    }

    pub fn has_endpoint(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn start_description(&self) -> &str {
        self.start_description.as_deref().unwrap_or(DEFAULT_START_DESCRIPTION)
    }

    pub fn end_description(&self) -> &str {
        self.end_description.as_deref().unwrap_or(DEFAULT_END_DESCRIPTION)
    }

    /// Start and end locations that are present, start first.
    pub fn endpoints(&self) -> impl Iterator<Item = Location> + '_ {
        self.start.iter().chain(self.end.iter()).copied()
    }
}

/// Import/export shape of a whole problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
