//! Bridge to the cat population model, an R script run as a child process.
//!
//! The script prints its result as an escaped JSON string on stdout. The
//! payload is cut out of the interpreter transcript and parsed.

use std::collections::HashMap;
use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{instrument, warn};

use crate::domain::error::DomainError;
use crate::infrastructure::config::SimulationConfig;

const MODEL_SCRIPT: &str = "model.R";
const PAYLOAD_MARKER: &str = r#"{\"trial.1"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParams {
    pub simulation_length: i64,
    pub init_pop: i64,
    pub simulation_count: i64,
    pub maturation_interval: i64,
    pub gestation_interval: i64,
    pub pregnancy_interval: i64,
    pub fertile_interval: i64,
    pub impregnation_rate: f64,
    pub cats_die: bool,
    pub cat_lifespan: i64,
    pub min_litter_size: i64,
    pub max_litter_size: i64,
    pub sex_dist: String,
    pub litter_dist: String,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            simulation_length: 24,
            init_pop: 1,
            simulation_count: 10,
            maturation_interval: 6,
            gestation_interval: 3,
            pregnancy_interval: 0,
            fertile_interval: 18,
            impregnation_rate: 0.95,
            cats_die: false,
            cat_lifespan: 24 * 30,
            min_litter_size: 1,
            max_litter_size: 6,
            sex_dist: "normal".to_string(),
            litter_dist: "normal".to_string(),
        }
    }
}

impl SimulationParams {
    /// Overlays query string values on the defaults. Unknown keys are ignored.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, DomainError> {
        let mut params = Self::default();

        for (key, value) in query {
            let value = value.trim();
            match key.as_str() {
                "simulation_length" => params.simulation_length = parse_int(key, value)?,
                "init_pop" => params.init_pop = parse_int(key, value)?,
                "simulation_count" => params.simulation_count = parse_int(key, value)?,
                "maturation_interval" => params.maturation_interval = parse_int(key, value)?,
                "gestation_interval" => params.gestation_interval = parse_int(key, value)?,
                "pregnancy_interval" => params.pregnancy_interval = parse_int(key, value)?,
                "fertile_interval" => params.fertile_interval = parse_int(key, value)?,
                "cat_lifespan" => params.cat_lifespan = parse_int(key, value)?,
                "min_litter_size" => params.min_litter_size = parse_int(key, value)?,
                "max_litter_size" => params.max_litter_size = parse_int(key, value)?,
                "impregnation_rate" => params.impregnation_rate = parse_rate(key, value)?,
                "cats_die" => params.cats_die = !value.is_empty() && value != "0",
                "sex_dist" => params.sex_dist = sanitize_name(value),
                "litter_dist" => params.litter_dist = sanitize_name(value),
                _ => {}
            }
        }

        Ok(params)
    }

    /// Positional arguments in the order the model script reads them.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.simulation_length.to_string(),
            self.init_pop.to_string(),
            self.simulation_count.to_string(),
            self.maturation_interval.to_string(),
            self.gestation_interval.to_string(),
            self.pregnancy_interval.to_string(),
            self.fertile_interval.to_string(),
            self.impregnation_rate.to_string(),
            if self.cats_die { "TRUE" } else { "FALSE" }.to_string(),
            self.cat_lifespan.to_string(),
            self.min_litter_size.to_string(),
            self.max_litter_size.to_string(),
            self.sex_dist.clone(),
            self.litter_dist.clone(),
        ]
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, DomainError> {
    value
        .parse()
        .map_err(|_| DomainError::InvalidRequest(format!("{key} must be an integer")))
}

fn parse_rate(key: &str, value: &str) -> Result<f64, DomainError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
        .ok_or_else(|| DomainError::InvalidRequest(format!("{key} must be a finite number")))
}

fn sanitize_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Pulls the JSON document out of an interpreter transcript.
pub fn extract_payload(output: &str) -> Result<serde_json::Value, DomainError> {
    let start = output
        .find(PAYLOAD_MARKER)
        .ok_or_else(|| DomainError::Simulation("no simulation payload in output".to_string()))?;
    let tail = &output[start..];
    let end = tail
        .rfind('}')
        .ok_or_else(|| DomainError::Simulation("unterminated simulation payload".to_string()))?;

    let json = strip_slashes(&tail[..=end]);
    serde_json::from_str(&json)
        .map_err(|e| DomainError::Simulation(format!("invalid simulation payload: {}", e)))
}

/// Drops one level of backslash escaping.
fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Clone)]
pub struct SimulationService {
    config: SimulationConfig,
}

impl SimulationService {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    fn command(&self, params: &SimulationParams) -> Command {
        let mut command = Command::new(&self.config.r_binary);
        command
            .arg("--vanilla")
            .arg("--args")
            .args(params.to_args())
            .current_dir(&self.config.model_dir)
            .env("DYLD_LIBRARY_PATH", " ")
            .kill_on_drop(true);
        command
    }

    #[instrument(skip(self))]
    pub async fn run(&self, params: &SimulationParams) -> Result<serde_json::Value, DomainError> {
        let script_path = self.config.model_dir.join(MODEL_SCRIPT);
        let script = tokio::fs::File::open(&script_path)
            .await
            .map_err(|e| {
                DomainError::Simulation(format!(
                    "cannot open {}: {}",
                    script_path.display(),
                    e
                ))
            })?
            .into_std()
            .await;

        let mut command = self.command(params);
        command.stdin(Stdio::from(script));

        let output = timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| {
                DomainError::Simulation(format!(
                    "model did not finish within {}s",
                    self.config.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                DomainError::Simulation(format!("cannot run {}: {}", self.config.r_binary, e))
            })?;

        if !output.status.success() {
            warn!(status = %output.status, "model exited unsuccessfully");
        }

        let mut transcript = String::from_utf8_lossy(&output.stdout).into_owned();
        transcript.push_str(&String::from_utf8_lossy(&output.stderr));
        extract_payload(&transcript)
    }
}
