//! Gateway configuration from environment variables

use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP/websocket server binds to
    pub listen_addr: SocketAddr,
    /// Depth of the command queue feeding the engine
    pub queue_depth: usize,
    /// Buffered book updates per event topic before slow subscribers lag
    pub broadcast_capacity: usize,
    /// Enqueue a small demo data set at startup
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            queue_depth: 1024,
            broadcast_capacity: 256,
            seed_demo: false,
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: env_parsed("EXCHANGE_LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            queue_depth: env_parsed("EXCHANGE_QUEUE_DEPTH").unwrap_or(defaults.queue_depth),
            broadcast_capacity: env_parsed("EXCHANGE_BROADCAST_CAPACITY")
                .unwrap_or(defaults.broadcast_capacity),
            seed_demo: std::env::var("EXCHANGE_SEED_DEMO")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.seed_demo),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.queue_depth, 1024);
        assert!(!config.seed_demo);
    }
}
