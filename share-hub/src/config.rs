//! Server configuration: command-line flags with environment fallbacks.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEV_SECRET: &str = "share-hub-dev-secret";

#[derive(Parser, Debug, Default)]
#[command(name = "share-hub")]
#[command(about = "Document sharing and profile API")]
pub struct Cli {
    /// Listen address [env: SHARE_HUB_ADDR, default 127.0.0.1:3000]
    #[arg(short, long)]
    pub addr: Option<String>,

    /// Persist records under this directory instead of keeping them in memory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Lifetime of issued access tokens in seconds
    #[arg(long)]
    pub token_ttl_secs: Option<u64>,

    /// Accept the X-User-Id header as caller identity (local development only)
    #[arg(long)]
    pub trust_user_header: bool,

    /// Use a built-in JWT secret when SHARE_HUB_JWT_SECRET is unset
    #[arg(long)]
    pub dev: bool,

    /// Log filter, e.g. "info" or "share_hub=debug"
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: Option<PathBuf>,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub trust_user_header: bool,
    pub log_level: String,
}

impl Config {
    /// Merge flags over environment variables over defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::load_with(cli, |key| std::env::var(key).ok())
    }

    pub(crate) fn load_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = cli
            .addr
            .clone()
            .or_else(|| env("SHARE_HUB_ADDR"))
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("invalid listen address {}", addr))?;

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env("SHARE_HUB_DATA_DIR").map(PathBuf::from));

        let jwt_secret = match env("SHARE_HUB_JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if cli.dev => DEV_SECRET.to_string(),
            _ => return Err(anyhow!("SHARE_HUB_JWT_SECRET must be set (or pass --dev)")),
        };

        let ttl_secs = match cli.token_ttl_secs {
            Some(secs) => secs,
            None => match env("SHARE_HUB_TOKEN_TTL_SECS") {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("invalid SHARE_HUB_TOKEN_TTL_SECS {}", raw))?,
                None => 3600,
            },
        };
        if ttl_secs == 0 {
            return Err(anyhow!("token ttl must be positive"));
        }

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            addr,
            data_dir,
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_secs),
            trust_user_header: cli.trust_user_header,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_secret() {
        let cfg = Config::load_with(&Cli::default(), env_of(&[("SHARE_HUB_JWT_SECRET", "s3")])).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.token_ttl, Duration::from_secs(3600));
        assert!(cfg.data_dir.is_none());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn missing_secret_fails_unless_dev() {
        assert!(Config::load_with(&Cli::default(), env_of(&[])).is_err());
        let cli = Cli {
            dev: true,
            ..Default::default()
        };
        assert_eq!(Config::load_with(&cli, env_of(&[])).unwrap().jwt_secret, DEV_SECRET);
    }

    #[test]
    fn flags_override_env() {
        let cli = Cli {
            addr: Some("0.0.0.0:9000".into()),
            token_ttl_secs: Some(60),
            ..Default::default()
        };
        let cfg = Config::load_with(
            &cli,
            env_of(&[
                ("SHARE_HUB_JWT_SECRET", "s3"),
                ("SHARE_HUB_ADDR", "127.0.0.1:1"),
                ("SHARE_HUB_TOKEN_TTL_SECS", "5"),
                ("SHARE_HUB_DATA_DIR", "/var/lib/share-hub"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.token_ttl, Duration::from_secs(60));
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/var/lib/share-hub")));
    }

    #[test]
    fn bad_values_are_errors() {
        let env = env_of(&[("SHARE_HUB_JWT_SECRET", "s3"), ("SHARE_HUB_TOKEN_TTL_SECS", "soon")]);
        assert!(Config::load_with(&Cli::default(), env).is_err());
        let cli = Cli {
            addr: Some("nowhere".into()),
            ..Default::default()
        };
        assert!(Config::load_with(&cli, env_of(&[("SHARE_HUB_JWT_SECRET", "s3")])).is_err());
    }
}
