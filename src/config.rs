use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Default upstream transcription endpoint (OpenAI Whisper API).
pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default transcription model identifier sent with every upstream request.
pub const DEFAULT_MODEL: &str = "whisper-1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Directory where uploads are spooled before forwarding.
    /// Defaults to the system temp directory when unset.
    pub spool_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Explicit origin allow-list (no wildcard); credentials are permitted
    /// only for these origins.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Bearer credential for the transcription service. Required; startup
    /// fails when it is absent from both config file and environment.
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

impl Config {
    /// Load configuration from an optional TOML file plus environment
    /// overrides (`OPENAI_API_KEY`, `PORT`, `FRONTEND_URL`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default(
                "cors.allowed_origins",
                vec!["http://localhost:3000".to_string()],
            )?
            .set_default("upstream.api_key", "")?
            .set_default("upstream.endpoint", DEFAULT_UPSTREAM_ENDPOINT)?
            .set_default("upstream.model", DEFAULT_MODEL)?;

        builder = match path {
            Some(path) => builder.add_source(config::File::with_name(path)),
            None => {
                builder.add_source(config::File::with_name("config/voice-relay").required(false))
            }
        };

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_env_overrides()?;

        if cfg.upstream.api_key.is_empty() {
            bail!("upstream API key is missing; set OPENAI_API_KEY or upstream.api_key");
        }

        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.upstream.api_key = key;
            }
        }

        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse()?;
        }

        // The production frontend origin joins the allow-list alongside the
        // local development origin.
        if let Ok(origin) = std::env::var("FRONTEND_URL") {
            if !origin.is_empty() && !self.cors.allowed_origins.contains(&origin) {
                self.cors.allowed_origins.push(origin);
            }
        }

        Ok(())
    }

    /// Spool directory for upload artifacts, falling back to the system
    /// temp directory.
    pub fn spool_dir(&self) -> PathBuf {
        self.server
            .spool_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
