//! Library exports for webapp-login, shared between the binary and tests.

pub mod auth;
pub mod config;
pub mod models;
pub mod providers;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
