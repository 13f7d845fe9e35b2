pub mod auth;
pub mod dashboard;
pub mod header;
pub mod labels;
pub mod orders;
pub mod services;
pub mod team;
pub mod website;
pub mod workspace;
