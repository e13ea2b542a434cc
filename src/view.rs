//! Events pushed from the dataset manager to the map, panel and label layers.
//!
//! The manager never touches the widgets directly. Each state transition is
//! described by a sequence of [`ViewEvent`]s handed to a
//! [`ViewSink`](crate::traits::ViewSink), so the state machine can be driven
//! and inspected without a map.

use std::fmt;

use crate::location::{Bounds, Location};
use crate::model::{JobId, VehicleId};
use crate::polyline::Polyline;
use crate::traits::ViewSink;

/// Which end of a vehicle's trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

/// Identity of a map marker, one per job and per vehicle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKey {
    Job(JobId),
    Start(VehicleId),
    End(VehicleId),
}

impl MarkerKey {
    pub fn endpoint(vehicle: VehicleId, endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Start => MarkerKey::Start(vehicle),
            Endpoint::End => MarkerKey::End(vehicle),
        }
    }
}

/// Map controls available in the current phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub fit: bool,
    pub clear: bool,
    pub solve: bool,
    pub summary: bool,
    pub animate: bool,
}

/// Lifecycle events emitted by the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    Fit,
    Clear,
    Animate,
    Collapse,
    ZoomEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    MarkerAdded {
        key: MarkerKey,
        location: Location,
        description: String,
    },
    MarkerRemoved {
        key: MarkerKey,
    },
    PopupOpened {
        key: MarkerKey,
    },
    PopupsClosed,
    PannedTo {
        location: Location,
    },
    FitBounds {
        bounds: Bounds,
    },
    /// Job row with delete, set-as-start and set-as-end actions.
    JobRowAdded {
        job: JobId,
        description: String,
    },
    JobRowRemoved {
        job: JobId,
    },
    EndpointRowSet {
        vehicle: VehicleId,
        endpoint: Endpoint,
        description: String,
    },
    EndpointRowCleared {
        vehicle: VehicleId,
        endpoint: Endpoint,
    },
    JobDisplayShown,
    JobDisplayHidden,
    SolutionRowAdded {
        rank: usize,
        job: JobId,
        description: String,
    },
    SolutionDisplayCleared,
    PanelCleared,
    PanelToggled,
    RouteDrawn {
        index: usize,
        path: Polyline,
    },
    RouteRemoved {
        index: usize,
    },
    RouteAnimated {
        index: usize,
    },
    /// Numbered tooltip on a job marker.
    RankTooltipSet {
        job: JobId,
        rank: usize,
    },
    RankTooltipsRemoved,
    /// Register a job marker and its rank with the label-placement layer.
    LabelAdded {
        job: JobId,
        rank: usize,
    },
    /// Recompute non-overlapping label placement.
    LabelsPlaced,
    /// Tear down label placement before a rebuild.
    LabelsReset,
    ControlsChanged(Controls),
    /// Message for the user, e.g. a refused operation.
    Notice(String),
}

impl ViewSink for Vec<ViewEvent> {
    fn apply(&mut self, event: ViewEvent) {
        self.push(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl ViewSink for NullView {
    fn apply(&mut self, _event: ViewEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_key_for_endpoint() {
        let vehicle = VehicleId::new(3);
        assert_eq!(MarkerKey::endpoint(vehicle, Endpoint::Start), MarkerKey::Start(vehicle));
        assert_eq!(MarkerKey::endpoint(vehicle, Endpoint::End), MarkerKey::End(vehicle));
    }

    #[test]
    fn test_vec_records_events() {
        let mut events: Vec<ViewEvent> = Vec::new();
        events.apply(ViewEvent::PopupsClosed);
        events.apply(ViewEvent::LabelsPlaced);
        assert_eq!(events, vec![ViewEvent::PopupsClosed, ViewEvent::LabelsPlaced]);
    }
}
