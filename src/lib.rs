pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod executor;
pub mod runner;
pub mod types;
