//! Process configuration, read from flags or the environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "data-service")]
#[command(about = "REST API service for Data resources")]
pub struct Config {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Enable verbose debug logging (true/false, 1/0, yes/no)
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    /// Give up on a store call after this many milliseconds
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,

    /// JSON file holding an array of Data payloads to load at startup
    #[arg(long, env = "SEED_FILE")]
    pub seed: Option<PathBuf>,
}

impl Config {
    /// `host:port` for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
