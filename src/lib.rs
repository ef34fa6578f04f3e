pub mod browser;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod output;
pub mod portal;
pub mod ratings;
pub mod utils;
