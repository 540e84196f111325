use serde::{Deserialize, Serialize};

/// Frame loop settings shared by every runner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Logical time added per frame callback.
    pub frame_step:     f64,
    /// Assumed display refresh rate; converts durations to frame counts.
    pub nominal_fps:    u32,
    /// Master seed for scene RNGs.
    pub seed:           u64,
    pub surface_width:  f64,
    pub surface_height: f64,
    /// Undrained events kept per runner; the oldest are dropped first.
    pub event_log_cap:  usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            frame_step:     1.0,
            nominal_fps:    60,
            seed:           42,
            surface_width:  500.0,
            surface_height: 300.0,
            event_log_cap:  1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub addr:         String,
    /// OpenAI-compatible chat completions endpoint.
    pub upstream_url: String,
    pub model:        String,
    /// Cap on generated length.
    pub max_tokens:   u32,
    /// Name of the environment variable holding the upstream API key.
    pub api_key_env:  String,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            addr:         "127.0.0.1:3000".into(),
            upstream_url: "https://api.groq.com/openai/v1/chat/completions".into(),
            model:        "llama-3.1-8b-instant".into(),
            max_tokens:   crate::gateway::DEFAULT_MAX_TOKENS,
            api_key_env:  "GROQ_API_KEY".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { db_path: "qviz.db".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub runner:  RunnerConfig,
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load from a JSON file. Missing sections and fields take defaults.
    /// In tests, use AppConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Config for unit tests: in-memory storage, fixed seed.
    pub fn default_test() -> Self {
        Self {
            runner: RunnerConfig {
                seed: 0xDEAD_BEEF,
                ..RunnerConfig::default()
            },
            gateway: GatewayConfig {
                addr: "127.0.0.1:0".into(),
                ..GatewayConfig::default()
            },
            storage: StorageConfig { db_path: ":memory:".into() },
        }
    }
}
