use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agent_core::{GeminiTransport, ScriptedTransport, SessionTransport};
use anyhow::{Context, Result};
use dom_adapter::VirtualDocument;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::env::LogFormat;
use crate::config::Config;

const LOCAL_ENV_PATH: &str = "config/local.env";

/// Load `KEY=VALUE` lines from `config/local.env`; variables already set win.
pub fn load_local_env_overrides() {
    let path = Path::new(LOCAL_ENV_PATH);
    if !path.exists() {
        return;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            for (key, value) in parse_env_lines(&contents) {
                if env::var(&key).is_ok() {
                    continue;
                }
                env::set_var(key, value);
            }
            info!(path = %path.display(), "Loaded environment overrides from local.env");
        }
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read local.env overrides");
        }
    }
}

fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            warn!(line = idx + 1, "invalid local.env entry; skipping");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs.push((key.to_string(), unquote(value.trim())));
    }
    pairs
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\n", "\n"),
        None => value.to_string(),
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(level: &str, debug: bool, format: LogFormat) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Human => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path.clone()
        }
        // Priority: ./config/sitepilot.yaml > ~/.config/sitepilot/config.yaml
        None => match default_config_path() {
            Some(path) => path,
            None => {
                info!("No config file found, using defaults");
                return Ok(LoadedConfig {
                    config: Config::default(),
                    path: None,
                });
            }
        },
    };

    let content = fs::read_to_string(&config_path)
        .await
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    let config = Config::from_yaml_str(&content)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

    info!("Loaded configuration from: {}", config_path.display());
    Ok(LoadedConfig {
        config,
        path: Some(config_path),
    })
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("config/sitepilot.yaml");
    if local.exists() {
        return Some(local);
    }
    let mut path = dirs::config_dir()?;
    path.push("sitepilot");
    path.push("config.yaml");
    path.exists().then_some(path)
}

pub fn load_page(path: &Path) -> Result<Arc<VirtualDocument>> {
    let document = VirtualDocument::load(path)
        .with_context(|| format!("Failed to load page fixture {}", path.display()))?;
    Ok(Arc::new(document))
}

/// Scripted replies when a script is given, the Gemini API otherwise.
pub fn build_transport(config: &Config, script: Option<&Path>) -> Result<Box<dyn SessionTransport>> {
    match script {
        Some(path) => {
            let transport = ScriptedTransport::load(path)
                .with_context(|| format!("Failed to load reply script {}", path.display()))?;
            info!(path = %path.display(), replies = transport.remaining(), "Using scripted model replies");
            Ok(Box::new(transport))
        }
        None => {
            let transport = GeminiTransport::new(config.agent.clone())
                .context("Gemini transport unavailable (set GEMINI_API_KEY or use --script)")?;
            info!(model = %config.agent.model, "Using Gemini transport");
            Ok(Box::new(transport))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_env_lines() {
        let pairs = parse_env_lines(
            "# comment\nGEMINI_API_KEY=abc\n\nbroken line\nSITEPILOT_MODEL=\"gemini \\\"pro\\\"\"\n=orphan\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("GEMINI_API_KEY".to_string(), "abc".to_string()),
                ("SITEPILOT_MODEL".to_string(), "gemini \"pro\"".to_string()),
            ]
        );
    }
}
