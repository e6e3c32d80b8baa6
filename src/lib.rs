pub mod config;
pub mod content_client;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod rcs_client;
pub mod reconciler;
pub mod registration;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
