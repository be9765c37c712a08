pub mod api;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod init;
pub mod models;
pub mod repository;
pub mod services;

pub use error::MythosError;
