use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::Asset;
use crate::registry::{demo_assets, AssetRegistry};
use crate::store::DEFAULT_WINDOW_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Replaces the built-in demo plants when present.
    #[serde(default, skip_serializing)]
    pub assets: Option<Vec<Asset>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            window_capacity: default_window_capacity(),
        }
    }
}

fn default_tick_ms() -> u64 {
    2000
}

fn default_window_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        // Optional: allow API_HOST / API_PORT env to override whatever YAML had
        if let Ok(host) = std::env::var("API_HOST") {
            cfg.api.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            cfg.api.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid API_PORT '{}': {}", port, e))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(self.api.port != 0, "api.port cannot be 0");
        anyhow::ensure!(self.simulation.tick_ms >= 1, "simulation.tick_ms must be at least 1");
        anyhow::ensure!(
            self.simulation.window_capacity >= 1,
            "simulation.window_capacity must be at least 1"
        );
        if let Some(assets) = &self.assets {
            anyhow::ensure!(!assets.is_empty(), "assets list cannot be empty when given");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Build the asset registry from config, falling back to the demo plants.
    pub fn registry(&self) -> Result<AssetRegistry, crate::error::AppError> {
        AssetRegistry::new(self.assets.clone().unwrap_or_else(demo_assets))
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
/// "$$" becomes a literal "$".
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let close = match it.peek().copied() {
            Some('$') => {
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };

        it.next();
        let var = read_until(&mut it, close)
            .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
        let val = std::env::var(&var)
            .with_context(|| format!("missing environment variable: {}", var))?;
        out.push_str(&val);
    }

    Ok(out)
}

fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}
