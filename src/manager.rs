//! Trip dataset manager.
//!
//! Owns the jobs, vehicles, markers, bounds and solution of one planning
//! session, and keeps the view in sync by emitting [`ViewEvent`]s.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{DatasetError, SolveError};
use crate::location::{extend_bounds, Bounds, Location};
use crate::model::{
    Dataset, Job, JobId, Vehicle, VehicleId, DEFAULT_END_DESCRIPTION, DEFAULT_JOB_DESCRIPTION,
    DEFAULT_START_DESCRIPTION,
};
use crate::polyline::Polyline;
use crate::solution::{Route, Solution, SolutionFile};
use crate::traits::{RouteSolver, ViewSink};
use crate::view::{Controls, Endpoint, MapEvent, MarkerKey, ViewEvent};

/// Vehicle that receives jobs reassigned as a start or an end.
pub const DEFAULT_VEHICLE_ID: VehicleId = VehicleId::new(0);

/// Where the session stands, which decides the available controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    /// Some input, but not both a job and a vehicle.
    HasInput,
    Solvable,
    HasSolution,
}

impl Phase {
    pub fn controls(self) -> Controls {
        match self {
            Phase::Empty => Controls::default(),
            Phase::HasInput => Controls {
                fit: true,
                clear: true,
                ..Controls::default()
            },
            Phase::Solvable => Controls {
                fit: true,
                clear: true,
                solve: true,
                ..Controls::default()
            },
            Phase::HasSolution => Controls {
                fit: true,
                clear: true,
                summary: true,
                animate: true,
                ..Controls::default()
            },
        }
    }
}

/// Outcome of a bulk [`TripManager::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    pub vehicles_added: usize,
    pub jobs_added: usize,
    /// Entries refused by the usual add rules, in input order.
    pub rejected: Vec<DatasetError>,
}

pub struct TripManager<V: ViewSink> {
    max_jobs: usize,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    markers: BTreeMap<MarkerKey, Location>,
    bounds: Option<Bounds>,
    routes: Vec<Polyline>,
    ranks: BTreeMap<JobId, usize>,
    output: Option<Value>,
    /// Next placement on the map is a vehicle endpoint rather than a job.
    first_place: bool,
    controls: Controls,
    view: V,
}

impl<V: ViewSink> TripManager<V> {
    pub fn new(config: &Config, view: V) -> Self {
        Self::with_max_jobs(config.max_job_number, view)
    }

    pub fn with_max_jobs(max_jobs: usize, view: V) -> Self {
        Self {
            max_jobs,
            jobs: Vec::new(),
            vehicles: Vec::new(),
            markers: BTreeMap::new(),
            bounds: None,
            routes: Vec::new(),
            ranks: BTreeMap::new(),
            output: None,
            first_place: true,
            controls: Controls::default(),
            view,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn jobs_len(&self) -> usize {
        self.jobs.len()
    }

    pub fn vehicles_len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }

    pub fn has_solution(&self) -> bool {
        !self.routes.is_empty()
    }

    pub fn phase(&self) -> Phase {
        if self.has_solution() {
            Phase::HasSolution
        } else if !self.jobs.is_empty() && !self.vehicles.is_empty() {
            Phase::Solvable
        } else if !self.jobs.is_empty() || !self.vehicles.is_empty() {
            Phase::HasInput
        } else {
            Phase::Empty
        }
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// 1-based visiting rank of a job in the current solution.
    pub fn rank_of(&self, id: JobId) -> Option<usize> {
        self.ranks.get(&id).copied()
    }

    pub fn routes(&self) -> &[Polyline] {
        &self.routes
    }

    pub fn output(&self) -> Option<&Value> {
        self.output.as_ref()
    }

    pub fn marker(&self, key: MarkerKey) -> Option<Location> {
        self.markers.get(&key).copied()
    }

    /// Live marker keys, in key order.
    pub fn markers(&self) -> impl Iterator<Item = MarkerKey> + '_ {
        self.markers.keys().copied()
    }

    pub fn is_first_place(&self) -> bool {
        self.first_place
    }

    pub fn first_place_set(&mut self) {
        self.first_place = false;
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // ------------------------------------------------------------------
    // Jobs and vehicles
    // ------------------------------------------------------------------

    pub fn add_job(&mut self, mut job: Job) -> Result<(), DatasetError> {
        if self.jobs.len() >= self.max_jobs {
            return Err(self.refuse(DatasetError::CapacityExceeded { max: self.max_jobs }));
        }
        if self.job_index(job.id).is_some() {
            return Err(DatasetError::DuplicateJob(job.id));
        }

        self.clear_solution();

        let description = job
            .description
            .get_or_insert_with(|| DEFAULT_JOB_DESCRIPTION.to_string())
            .clone();
        extend_bounds(&mut self.bounds, job.location);

        let key = MarkerKey::Job(job.id);
        self.add_marker(key, job.location, description.clone());
        self.emit(ViewEvent::JobRowAdded {
            job: job.id,
            description,
        });
        self.emit(ViewEvent::PopupOpened { key });

        debug!("Added job {} at {:?}", job.id, job.location);
        self.jobs.push(job);
        self.sync_controls();
        Ok(())
    }

    pub fn add_vehicle(&mut self, mut vehicle: Vehicle) -> Result<(), DatasetError> {
        if !vehicle.has_endpoint() {
            return Err(self.refuse(DatasetError::NoEndpoint { vehicle: vehicle.id }));
        }
        if self.vehicle_index(vehicle.id).is_some() {
            return Err(DatasetError::DuplicateVehicle(vehicle.id));
        }

        self.clear_solution();

        if vehicle.start.is_some() && vehicle.start_description.is_none() {
            vehicle.start_description = Some(DEFAULT_START_DESCRIPTION.to_string());
        }
        if vehicle.end.is_some() && vehicle.end_description.is_none() {
            vehicle.end_description = Some(DEFAULT_END_DESCRIPTION.to_string());
        }

        if let Some(start) = vehicle.start {
            extend_bounds(&mut self.bounds, start);
            self.place_endpoint(vehicle.id, Endpoint::Start, start, vehicle.start_description());
        }
        if let Some(end) = vehicle.end {
            extend_bounds(&mut self.bounds, end);
            self.place_endpoint(vehicle.id, Endpoint::End, end, vehicle.end_description());
        }

        debug!("Added vehicle {}", vehicle.id);
        self.vehicles.push(vehicle);
        self.sync_controls();
        Ok(())
    }

    /// Removes a job and returns it.
    pub fn remove_job(&mut self, id: JobId) -> Result<Job, DatasetError> {
        let index = self.job_index(id).ok_or(DatasetError::UnknownJob(id))?;

        self.clear_solution();
        self.remove_marker(MarkerKey::Job(id));
        let job = self.jobs.remove(index);
        self.emit(ViewEvent::JobRowRemoved { job: id });
        self.recompute_bounds();

        debug!("Removed job {}", id);
        self.sync_controls();
        Ok(job)
    }

    pub fn remove_vehicle_start(&mut self, id: VehicleId) -> Result<(), DatasetError> {
        self.remove_vehicle_endpoint(id, Endpoint::Start)
    }

    pub fn remove_vehicle_end(&mut self, id: VehicleId) -> Result<(), DatasetError> {
        self.remove_vehicle_endpoint(id, Endpoint::End)
    }

    fn remove_vehicle_endpoint(&mut self, id: VehicleId, endpoint: Endpoint) -> Result<(), DatasetError> {
        let index = self.vehicle_index(id).ok_or(DatasetError::UnknownVehicle(id))?;

        let vehicle = &self.vehicles[index];
        let (own, other) = match endpoint {
            Endpoint::Start => (vehicle.start, vehicle.end),
            Endpoint::End => (vehicle.end, vehicle.start),
        };
        if own.is_none() {
            return Err(DatasetError::MissingEndpoint { vehicle: id, endpoint });
        }
        if other.is_none() {
            return Err(self.refuse(DatasetError::InvariantViolation { vehicle: id }));
        }

        self.clear_solution();
        self.remove_marker(MarkerKey::endpoint(id, endpoint));

        let vehicle = &mut self.vehicles[index];
        match endpoint {
            Endpoint::Start => {
                vehicle.start = None;
                vehicle.start_description = None;
            }
            Endpoint::End => {
                vehicle.end = None;
                vehicle.end_description = None;
            }
        }
        self.emit(ViewEvent::EndpointRowCleared { vehicle: id, endpoint });
        self.recompute_bounds();

        debug!("Removed {} of vehicle {}", endpoint, id);
        self.sync_controls();
        Ok(())
    }

    pub fn reassign_job_as_start(&mut self, id: JobId) -> Result<(), DatasetError> {
        self.reassign_job(id, Endpoint::Start)
    }

    pub fn reassign_job_as_end(&mut self, id: JobId) -> Result<(), DatasetError> {
        self.reassign_job(id, Endpoint::End)
    }

    /// Moves a job onto the default vehicle's start or end.
    fn reassign_job(&mut self, id: JobId, endpoint: Endpoint) -> Result<(), DatasetError> {
        let job_index = self.job_index(id).ok_or(DatasetError::UnknownJob(id))?;
        let vehicle_index = self
            .vehicle_index(DEFAULT_VEHICLE_ID)
            .ok_or(DatasetError::NoDefaultVehicle)?;

        self.clear_solution();

        let location = self.jobs[job_index].location;
        let description = self.jobs[job_index].description().to_string();

        let key = MarkerKey::endpoint(DEFAULT_VEHICLE_ID, endpoint);
        if self.markers.contains_key(&key) {
            self.remove_marker(key);
        }

        let vehicle = &mut self.vehicles[vehicle_index];
        match endpoint {
            Endpoint::Start => {
                vehicle.start = Some(location);
                vehicle.start_description = Some(description.clone());
            }
            Endpoint::End => {
                vehicle.end = Some(location);
                vehicle.end_description = Some(description.clone());
            }
        }
        self.place_endpoint(DEFAULT_VEHICLE_ID, endpoint, location, &description);

        debug!("Job {} becomes {} of vehicle {}", id, endpoint, DEFAULT_VEHICLE_ID);
        self.remove_job(id)?;
        Ok(())
    }

    /// Drops every job, vehicle, marker and the solution, and empties the
    /// panel.
    pub fn clear_all(&mut self) {
        self.first_place = true;
        self.clear_solution();

        let keys: Vec<MarkerKey> = self.markers.keys().copied().collect();
        for key in keys {
            self.remove_marker(key);
        }
        self.jobs.clear();
        self.vehicles.clear();
        self.bounds = None;
        self.emit(ViewEvent::PanelCleared);

        self.sync_controls();
        debug!("Cleared dataset");
    }

    /// Replaces the dataset with an imported one.
    ///
    /// Vehicles go first so jobs are placed after their depots, the same
    /// order a user would enter them.
    pub fn load(&mut self, dataset: Dataset) -> LoadReport {
        self.clear_all();

        let mut report = LoadReport::default();
        for vehicle in dataset.vehicles {
            match self.add_vehicle(vehicle) {
                Ok(()) => report.vehicles_added += 1,
                Err(err) => report.rejected.push(err),
            }
        }
        for job in dataset.jobs {
            match self.add_job(job) {
                Ok(()) => report.jobs_added += 1,
                Err(err) => report.rejected.push(err),
            }
        }

        self.first_place_set();

        if !report.rejected.is_empty() {
            warn!("Skipped {} entries while loading dataset", report.rejected.len());
        }
        info!(
            "Loaded {} vehicles and {} jobs",
            report.vehicles_added, report.jobs_added
        );
        report
    }

    /// Rebuilds bounds from every job and vehicle endpoint.
    pub fn recompute_bounds(&mut self) {
        let vehicle_points = self.vehicles.iter().flat_map(Vehicle::endpoints);
        let job_points = self.jobs.iter().map(|job| job.location);
        self.bounds = Bounds::covering(vehicle_points.chain(job_points));
    }

    // ------------------------------------------------------------------
    // Solution
    // ------------------------------------------------------------------

    /// Draws a computed route and numbers its jobs.
    pub fn set_solution(&mut self, route: &Route) -> Result<(), DatasetError> {
        let path = route.path()?;
        let ranks = route.job_ranks();
        if let Some((missing, _)) = ranks.iter().find(|(job, _)| self.job_index(*job).is_none()) {
            return Err(DatasetError::UnknownJob(*missing));
        }

        for point in path.points() {
            extend_bounds(&mut self.bounds, *point);
        }
        let index = self.routes.len();
        self.emit(ViewEvent::RouteDrawn {
            index,
            path: path.clone(),
        });
        self.fit_view();
        self.emit(ViewEvent::JobDisplayHidden);

        for (job, rank) in ranks {
            let description = self.job(job).map(|j| j.description().to_string()).unwrap_or_default();
            self.ranks.insert(job, rank);
            self.emit(ViewEvent::RankTooltipSet { job, rank });
            self.emit(ViewEvent::LabelAdded { job, rank });
            self.emit(ViewEvent::SolutionRowAdded {
                rank,
                job,
                description,
            });
        }
        self.emit(ViewEvent::LabelsPlaced);

        self.routes.push(path);
        info!("Displaying route {} for vehicle {}", index, route.vehicle);
        self.sync_controls();
        Ok(())
    }

    pub fn set_output(&mut self, output: Value) {
        self.output = Some(output);
    }

    /// Stores a raw solver response and draws all of its routes.
    ///
    /// Replaces any current solution. On error nothing is left drawn.
    pub fn apply_output(&mut self, output: Value) -> Result<usize, DatasetError> {
        let solution = Solution::from_output(&output)?;

        self.clear_solution();
        self.output = Some(output);
        for route in &solution.routes {
            if let Err(err) = self.set_solution(route) {
                warn!("Discarding solution: {}", err);
                self.clear_solution();
                return Err(err);
            }
        }
        Ok(solution.routes.len())
    }

    /// Applies a saved solution file, if it carries solver output.
    pub fn load_solution(&mut self, file: SolutionFile) -> Result<usize, DatasetError> {
        match file.output {
            Some(output) => self.apply_output(output),
            None => Ok(0),
        }
    }

    /// Sends the dataset to a solver and displays the result.
    pub fn solve_with<S: RouteSolver>(&mut self, solver: &S) -> Result<usize, SolveError> {
        if self.phase() != Phase::Solvable {
            return Err(SolveError::NotSolvable);
        }
        let output = solver.solve(&self.jobs, &self.vehicles)?;
        Ok(self.apply_output(output)?)
    }

    /// Removes drawn routes and rank labels and discards solver output.
    pub fn clear_solution(&mut self) {
        self.output = None;
        if !self.has_solution() {
            return;
        }

        self.emit(ViewEvent::SolutionDisplayCleared);
        self.emit(ViewEvent::JobDisplayShown);
        for index in 0..self.routes.len() {
            self.emit(ViewEvent::RouteRemoved { index });
        }
        self.routes.clear();

        if !self.ranks.is_empty() {
            self.ranks.clear();
            self.emit(ViewEvent::RankTooltipsRemoved);
            self.emit(ViewEvent::LabelsReset);
        }

        debug!("Cleared solution");
        self.sync_controls();
    }

    /// Plays the drawing animation on the first route.
    pub fn animate_solution(&mut self) -> Result<(), DatasetError> {
        if !self.has_solution() {
            return Err(DatasetError::NoSolution);
        }
        self.close_all_popups();
        self.emit(ViewEvent::RouteAnimated { index: 0 });
        Ok(())
    }

    /// Rebuilds label placement from the stored ranks.
    pub fn reset_labels(&mut self) {
        if !self.has_solution() {
            return;
        }
        self.emit(ViewEvent::LabelsReset);
        let ranks: Vec<(JobId, usize)> = self.ranks.iter().map(|(job, rank)| (*job, *rank)).collect();
        for (job, rank) in ranks {
            self.emit(ViewEvent::LabelAdded { job, rank });
        }
        self.emit(ViewEvent::LabelsPlaced);
    }

    // ------------------------------------------------------------------
    // Map interaction
    // ------------------------------------------------------------------

    pub fn fit_view(&mut self) {
        if let Some(bounds) = self.bounds {
            self.emit(ViewEvent::FitBounds { bounds });
        }
    }

    pub fn close_all_popups(&mut self) {
        self.emit(ViewEvent::PopupsClosed);
    }

    /// Opens a job's popup and centers the map on it.
    pub fn show_job(&mut self, id: JobId) -> Result<(), DatasetError> {
        if !self.show_marker(MarkerKey::Job(id)) {
            return Err(DatasetError::UnknownJob(id));
        }
        Ok(())
    }

    pub fn show_start(&mut self, id: VehicleId) -> Result<(), DatasetError> {
        self.show_endpoint(id, Endpoint::Start)
    }

    pub fn show_end(&mut self, id: VehicleId) -> Result<(), DatasetError> {
        self.show_endpoint(id, Endpoint::End)
    }

    fn show_endpoint(&mut self, id: VehicleId, endpoint: Endpoint) -> Result<(), DatasetError> {
        if self.vehicle_index(id).is_none() {
            return Err(DatasetError::UnknownVehicle(id));
        }
        if !self.show_marker(MarkerKey::endpoint(id, endpoint)) {
            return Err(DatasetError::MissingEndpoint { vehicle: id, endpoint });
        }
        Ok(())
    }

    /// Dispatches a map widget event.
    pub fn handle(&mut self, event: MapEvent) -> Result<(), DatasetError> {
        match event {
            MapEvent::Fit => self.fit_view(),
            MapEvent::Clear => self.clear_all(),
            MapEvent::Animate => self.animate_solution()?,
            MapEvent::Collapse => self.emit(ViewEvent::PanelToggled),
            MapEvent::ZoomEnd => self.reset_labels(),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn emit(&mut self, event: ViewEvent) {
        self.view.apply(event);
    }

    fn refuse(&mut self, err: DatasetError) -> DatasetError {
        warn!("Refused: {}", err);
        self.emit(ViewEvent::Notice(err.to_string()));
        err
    }

    fn job_index(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|job| job.id == id)
    }

    fn vehicle_index(&self, id: VehicleId) -> Option<usize> {
        self.vehicles.iter().position(|vehicle| vehicle.id == id)
    }

    fn add_marker(&mut self, key: MarkerKey, location: Location, description: String) {
        self.markers.insert(key, location);
        self.emit(ViewEvent::MarkerAdded {
            key,
            location,
            description,
        });
    }

    fn remove_marker(&mut self, key: MarkerKey) {
        if self.markers.remove(&key).is_some() {
            self.emit(ViewEvent::MarkerRemoved { key });
        }
    }

    fn place_endpoint(&mut self, vehicle: VehicleId, endpoint: Endpoint, location: Location, description: &str) {
        let key = MarkerKey::endpoint(vehicle, endpoint);
        self.add_marker(key, location, description.to_string());
        self.emit(ViewEvent::EndpointRowSet {
            vehicle,
            endpoint,
            description: description.to_string(),
        });
        self.emit(ViewEvent::PopupOpened { key });
    }

    fn show_marker(&mut self, key: MarkerKey) -> bool {
        match self.markers.get(&key).copied() {
            Some(location) => {
                self.emit(ViewEvent::PopupOpened { key });
                self.emit(ViewEvent::PannedTo { location });
                true
            }
            None => false,
        }
    }

    fn sync_controls(&mut self) {
        let controls = self.phase().controls();
        if controls != self.controls {
            self.controls = controls;
            self.emit(ViewEvent::ControlsChanged(controls));
        }
    }
}
