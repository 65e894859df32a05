pub mod config;
pub mod error;
pub mod events;
pub mod matching;
pub mod partnerships;
pub mod repository;
pub mod telemetry;
