pub mod app;
pub mod config;
pub mod error;
pub mod ingest;
pub mod recipes;
pub mod state;
