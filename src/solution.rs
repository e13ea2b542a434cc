//! Solver output shapes and visiting ranks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::location::Location;
use crate::model::{JobId, VehicleId};
use crate::polyline::{Polyline, PolylineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Start,
    Job,
    End,
    /// Breaks, pickups and other step types the front-end does not number.
    #[serde(other)]
    Other,
}

/// One stop of a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStep")]
pub struct Step {
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Job visited at this step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Step as sent by the solver. Newer versions name the job `id`, and some
/// send both `job` and `id`; `job` wins.
#[derive(Deserialize)]
struct RawStep {
    #[serde(rename = "type")]
    kind: StepKind,
    #[serde(default)]
    job: Option<JobId>,
    #[serde(default)]
    id: Option<JobId>,
    #[serde(default)]
    location: Option<Location>,
}

impl From<RawStep> for Step {
    fn from(raw: RawStep) -> Self {
        Self {
            kind: raw.kind,
            job: raw.job.or(raw.id),
            location: raw.location,
        }
    }
}

impl Step {
    pub fn job(id: JobId) -> Self {
        Self {
            kind: StepKind::Job,
            job: Some(id),
            location: None,
        }
    }

    pub fn start() -> Self {
        Self {
            kind: StepKind::Start,
            job: None,
            location: None,
        }
    }

    pub fn end() -> Self {
        Self {
            kind: StepKind::End,
            job: None,
            location: None,
        }
    }

    /// The visited job, for `job` steps only.
    pub fn visited_job(&self) -> Option<JobId> {
        match self.kind {
            StepKind::Job => self.job,
            _ => None,
        }
    }
}

/// A computed route for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub vehicle: VehicleId,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Encoded polyline of the driven path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
}

impl Route {
    pub fn new(vehicle: VehicleId, steps: Vec<Step>) -> Self {
        Self {
            vehicle,
            steps,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Decoded path; a route without geometry has an empty path.
    pub fn path(&self) -> Result<Polyline, PolylineError> {
        match &self.geometry {
            Some(encoded) => Polyline::decode(encoded),
            None => Ok(Polyline::new(Vec::new())),
        }
    }

    /// Visited jobs with their 1-based rank, in visiting order.
    pub fn job_ranks(&self) -> Vec<(JobId, usize)> {
        self.steps
            .iter()
            .filter_map(Step::visited_job)
            .enumerate()
            .map(|(index, job)| (job, index + 1))
            .collect()
    }
}

/// Typed view of a raw solver response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Solution {
    pub fn from_output(output: &Value) -> Result<Self, serde_json::Error> {
        Solution::deserialize(output)
    }
}

/// Saved solution file; `output` holds the raw solver response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ranks_skip_non_job_steps() {
        let route = Route::new(
            VehicleId::new(0),
            vec![
                Step::start(),
                Step::job(JobId::new(7)),
                Step {
                    kind: StepKind::Other,
                    job: None,
                    location: None,
                },
                Step::job(JobId::new(3)),
                Step::end(),
            ],
        );

        assert_eq!(route.job_ranks(), vec![(JobId::new(7), 1), (JobId::new(3), 2)]);
    }

    #[test]
    fn test_parse_solver_output() {
        let output = json!({
            "code": 0,
            "summary": {"cost": 1234},
            "routes": [{
                "vehicle": 0,
                "cost": 1234,
                "steps": [
                    {"type": "start", "location": [2.3, 48.8]},
                    {"type": "job", "job": "1", "location": [2.4, 48.9]},
                    {"type": "break"},
                    {"type": "end", "location": [2.3, 48.8]}
                ],
                "geometry": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"
            }]
        });

        let solution = Solution::from_output(&output).unwrap();
        assert_eq!(solution.code, 0);
        assert_eq!(solution.routes.len(), 1);

        let route = &solution.routes[0];
        assert_eq!(route.steps[2].kind, StepKind::Other);
        assert_eq!(route.job_ranks(), vec![(JobId::new(1), 1)]);
        assert_eq!(route.path().unwrap().points().len(), 3);
    }

    #[test]
    fn test_step_accepts_id_field() {
        let step: Step = serde_json::from_value(json!({"type": "job", "id": 4})).unwrap();
        assert_eq!(step.visited_job(), Some(JobId::new(4)));
    }

    #[test]
    fn test_step_with_both_job_and_id_prefers_job() {
        let step: Step = serde_json::from_value(json!({"type": "job", "job": 4, "id": "4"})).unwrap();
        assert_eq!(step.visited_job(), Some(JobId::new(4)));

        let step: Step = serde_json::from_value(json!({"type": "job", "job": 5, "id": 9})).unwrap();
        assert_eq!(step.job, Some(JobId::new(5)));
    }

    #[test]
    fn test_output_with_duplicated_step_ids_parses() {
        let output = json!({
            "routes": [{
                "vehicle": 0,
                "steps": [{"type": "start"}, {"type": "job", "job": 2, "id": 2}, {"type": "end"}]
            }]
        });
        let solution = Solution::from_output(&output).unwrap();
        assert_eq!(solution.routes[0].job_ranks(), vec![(JobId::new(2), 1)]);
    }

    #[test]
    fn test_route_without_geometry_has_empty_path() {
        let route = Route::new(VehicleId::new(0), vec![Step::start()]);
        assert!(route.path().unwrap().is_empty());
    }

    #[test]
    fn test_solution_file_without_output() {
        let file: SolutionFile = serde_json::from_str("{}").unwrap();
        assert!(file.output.is_none());
    }
}
