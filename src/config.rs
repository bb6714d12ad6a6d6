//! Configuration for finance-architect.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (API_KEY / GEMINI_API_KEY, FINANCE_ARCHITECT_MODEL,
//!    FINANCE_ARCHITECT_OUTPUT)
//! 2. Config file (.finance-architect/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .finance-architect/config.yaml
//! - Paths in config file are relative to the directory holding .finance-architect/
//!
//! The API credential is read once. When it is missing the credential stays
//! empty and generation fails at request time, not at startup.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Directory holding the config file
const CONFIG_DIR: &str = ".finance-architect";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub gemini: Option<GeminiSection>,
    #[serde(default)]
    pub export: Option<ExportSection>,
    #[serde(default)]
    pub seed: Option<SeedSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSection {
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSection {
    /// Where transcript files are written (relative to project root)
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSection {
    /// Alternative seed series JSON (relative to project root)
    pub file: Option<String>,
}

/// Resolved configuration
#[derive(Clone)]
pub struct ResolvedConfig {
    /// Gemini API credential (empty when not provided)
    pub api_key: String,
    /// Model used for generation
    pub model: String,
    /// Gemini REST base URL
    pub endpoint: String,
    /// Directory transcript files are written to
    pub output_dir: PathBuf,
    /// Seed series file, if the built-in seed is overridden
    pub seed_file: Option<PathBuf>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Whether a credential was provided
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Credential for display: last four characters only
    pub fn masked_api_key(&self) -> String {
        if self.api_key.is_empty() {
            return "(not set)".to_string();
        }
        let tail: String = self
            .api_key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", tail)
    }
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &self.masked_api_key())
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("output_dir", &self.output_dir)
            .field("seed_file", &self.seed_file)
            .field("config_file", &self.config_file)
            .finish()
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Default output directory: the user's downloads folder, else the cwd
fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve configuration from an optional config file and an environment lookup
fn resolve_config(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let file = config_path.map(load_config_file).transpose()?;

    // Base directory is the parent of .finance-architect/
    let base_dir = config_path
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));

    let gemini = file.as_ref().and_then(|f| f.gemini.as_ref());

    let api_key = env("API_KEY")
        .or_else(|| env("GEMINI_API_KEY"))
        .unwrap_or_default();

    let model = env("FINANCE_ARCHITECT_MODEL")
        .or_else(|| gemini.and_then(|g| g.model.clone()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let endpoint = gemini
        .and_then(|g| g.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let output_dir = if let Some(env_out) = env("FINANCE_ARCHITECT_OUTPUT") {
        PathBuf::from(env_out)
    } else if let Some(out) = file
        .as_ref()
        .and_then(|f| f.export.as_ref())
        .and_then(|e| e.output_dir.as_deref())
    {
        resolve_path(base_dir, out)
    } else {
        default_output_dir()
    };

    let seed_file = file
        .as_ref()
        .and_then(|f| f.seed.as_ref())
        .and_then(|s| s.file.as_deref())
        .map(|s| resolve_path(base_dir, s));

    Ok(ResolvedConfig {
        api_key,
        model,
        endpoint,
        output_dir,
        seed_file,
        config_file: config_path.map(Path::to_path_buf),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let config = resolve_config(config_file.as_deref(), |key| std::env::var(key).ok())?;

    if !config.has_api_key() {
        tracing::warn!("API_KEY is not set; generation requests will be rejected by the service");
    }

    Ok(config)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
