use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full engine configuration, usually loaded from `faultline.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub reason: ReasonConfig,
}

/// Limits and thresholds for heuristic graph construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Overall node budget per run. Half is reserved for log-derived nodes
    /// and half for request-derived nodes; explicit events fill toward the
    /// overall cap. Signals beyond the budget are silently dropped.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Window for temporal-adjacency edge inference, in milliseconds.
    #[serde(default = "default_time_window_ms")]
    pub time_window_ms: f64,
    /// Fraction of failed requests above which a synthetic
    /// `high_error_rate` node is added.
    #[serde(default = "default_error_rate_threshold")]
    pub error_rate_threshold: f64,
    /// Response time above which a request counts as failed, in
    /// milliseconds.
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            time_window_ms: default_time_window_ms(),
            error_rate_threshold: default_error_rate_threshold(),
            slow_request_ms: default_slow_request_ms(),
        }
    }
}

/// Selection limits for the analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_root_causes")]
    pub max_root_causes: usize,
    #[serde(default = "default_max_chains")]
    pub max_chains: usize,
    /// Chains whose confidence product falls below this are discarded.
    #[serde(default = "default_min_chain_confidence")]
    pub min_chain_confidence: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_root_causes: default_max_root_causes(),
            max_chains: default_max_chains(),
            min_chain_confidence: default_min_chain_confidence(),
        }
    }
}

/// External-refinement settings. Disabled by default; the engine produces a
/// complete rule-based result without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the bearer token, if the
    /// endpoint requires one.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Bounds on the graph summary forwarded to the reasoning service.
    #[serde(default = "default_max_summary_nodes")]
    pub max_summary_nodes: usize,
    #[serde(default = "default_max_summary_edges")]
    pub max_summary_edges: usize,
    #[serde(default = "default_analysis_goal")]
    pub analysis_goal: String,
}

impl Default for ReasonConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key_env: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_summary_nodes: default_max_summary_nodes(),
            max_summary_edges: default_max_summary_edges(),
            analysis_goal: default_analysis_goal(),
        }
    }
}

/// Load an [`EngineConfig`] from a TOML file. A missing file yields the
/// defaults; a present-but-invalid file is an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_max_nodes() -> usize {
    50
}

const fn default_time_window_ms() -> f64 {
    5000.0
}

const fn default_error_rate_threshold() -> f64 {
    0.10
}

const fn default_slow_request_ms() -> f64 {
    3000.0
}

const fn default_max_root_causes() -> usize {
    5
}

const fn default_max_chains() -> usize {
    10
}

const fn default_min_chain_confidence() -> f64 {
    0.1
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    250
}

const fn default_max_backoff_ms() -> u64 {
    2_000
}

const fn default_max_summary_nodes() -> usize {
    50
}

const fn default_max_summary_edges() -> usize {
    120
}

fn default_analysis_goal() -> String {
    "Identify the most likely root cause and recommend remediations".to_string()
}
