//! Process-wide configuration, loaded once at startup and passed explicitly
//! into the components that need it. The signing secret is required; its
//! absence is a startup failure, never a per-request one.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};

const DEFAULT_HTTP_PORT: u16 = 7880;
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_GC_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC secret for token signing. Read-only after startup.
    pub jwt_secret: String,
    /// Lifetime stamped into issued tokens.
    pub token_ttl: Duration,
    /// Sweep interval for the revocation garbage collector.
    pub gc_interval: Duration,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("CHIRP_JWT_SECRET")
            .map_err(|_| anyhow!("CHIRP_JWT_SECRET is not set; refusing to start without a signing secret"))?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("CHIRP_JWT_SECRET is empty; refusing to start without a signing secret"));
        }

        let token_ttl = env_secs("CHIRP_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        let gc_interval = env_secs("CHIRP_GC_INTERVAL_SECS", DEFAULT_GC_INTERVAL_SECS)?;
        let http_port = match std::env::var("CHIRP_HTTP_PORT") {
            Ok(v) => v.parse::<u16>().with_context(|| format!("CHIRP_HTTP_PORT is not a valid port: {}", v))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        Ok(Config { jwt_secret, token_ttl, gc_interval, http_port })
    }
}

fn env_secs(name: &str, default: u64) -> Result<Duration> {
    match std::env::var(name) {
        Ok(v) => {
            let secs = v.parse::<u64>().with_context(|| format!("{} is not a valid number of seconds: {}", name, v))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
