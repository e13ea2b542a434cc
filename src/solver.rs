//! HTTP adapter for the VROOM-style solving API.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::model::{Job, Vehicle};
use crate::traits::RouteSolver;

#[derive(Debug, Clone)]
pub struct SolverClient {
    config: SolverConfig,
    client: reqwest::blocking::Client,
}

impl SolverClient {
    pub fn new(config: SolverConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteSolver for SolverClient {
    fn solve(&self, jobs: &[Job], vehicles: &[Vehicle]) -> Result<Value, SolveError> {
        let request = SolveRequest {
            vehicles,
            jobs,
            options: SolveOptions { g: true },
        };

        debug!(
            "Posting problem to {} ({} jobs, {} vehicles)",
            self.config.base_url,
            jobs.len(),
            vehicles.len()
        );

        let output: Value = self
            .client
            .post(&self.config.base_url)
            .json(&request)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())?;

        let code = output.get("code").and_then(Value::as_i64).unwrap_or(0);
        if code != 0 {
            let message = output
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            warn!("Solver rejected problem: {} ({})", message, code);
            return Err(SolveError::Rejected { code, message });
        }

        info!("Solver returned a solution");
        Ok(output)
    }
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    vehicles: &'a [Vehicle],
    jobs: &'a [Job],
    options: SolveOptions,
}

#[derive(Debug, Serialize)]
struct SolveOptions {
    /// Ask for route geometry.
    g: bool,
}
