pub mod post;
pub mod simulation;
