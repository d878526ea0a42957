use std::collections::HashMap;

use crate::application::simulation_service::{SimulationParams, SimulationService};
use crate::domain::error::DomainError;
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::{error, info};

#[get("/projects/cat-model/data")]
async fn run_simulation(
    req: HttpRequest,
    simulation: web::Data<SimulationService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, DomainError> {
    let params = SimulationParams::from_query(&query)?;

    let payload = simulation.run(&params).await.map_err(|e| {
        error!(request_id = %request_id(&req), "simulation failed: {}", e);
        e
    })?;

    info!(
        request_id = %request_id(&req),
        simulation_count = params.simulation_count,
        "simulation completed"
    );

    Ok(HttpResponse::Ok().json(payload))
}
