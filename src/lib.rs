pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod routes;
pub mod state;
