pub mod logging;

pub mod config;
pub mod error;
pub mod logdir;
pub mod sweep;

pub mod cli;
pub mod engine;
pub mod plotting;
