pub mod denormalize;
pub mod post_repository;
pub mod post_row;
