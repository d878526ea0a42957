pub mod post_service;
pub mod simulation_service;
