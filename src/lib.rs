pub mod api;
pub mod auth;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod service;
pub mod utils;
