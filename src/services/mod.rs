pub mod auth_service;
pub mod profile_service;
pub mod token_service;
