//! Agent Configuration
//!
//! Built-in defaults, overlaid by an optional TOML file, then by environment
//! variables. Command-line flags are applied last by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use docsmith_llm::{ProviderConfig, ProviderType};

use crate::utils::error::{AppError, AppResult};

/// File picked up from the target directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "docsmith.toml";

/// Run-level limits and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Coordinator phases per run before generation is forced
    pub max_iterations: usize,
    /// ReAct turns per plan step
    pub max_react_iterations: usize,
    /// Steps kept from the initial plan
    pub max_plan_steps: usize,
    /// Missing areas turned into new steps per reflection
    pub max_replan_steps: usize,
    /// Output language for generated documentation (e.g. "English", "中文")
    pub language: Option<String>,
    /// Where the Markdown site is written (relative paths resolve against the target)
    pub output_dir: PathBuf,
    /// Where plan.md, memory.json and progress.log are written
    pub state_dir: PathBuf,
    /// LLM connection settings
    pub llm: LlmSettings,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_react_iterations: 20,
            max_plan_steps: 8,
            max_replan_steps: 3,
            language: None,
            output_dir: PathBuf::from("docs"),
            state_dir: PathBuf::from(".docsmith"),
            llm: LlmSettings::default(),
        }
    }
}

/// The `[llm]` table. `model` falls back to the provider's default model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: ProviderType,
    pub model: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub proxy: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        let base = ProviderConfig::default();
        Self {
            provider: base.provider,
            model: None,
            api_key: None,
            base_url: None,
            max_tokens: base.max_tokens,
            temperature: base.temperature,
            timeout_secs: base.timeout_secs,
            proxy: None,
        }
    }
}

impl LlmSettings {
    /// Build the gateway configuration.
    pub fn to_provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider,
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self
                .model
                .clone()
                .unwrap_or_else(|| self.provider.default_model().to_string()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
            proxy: self.proxy.clone(),
        }
    }
}

impl AgentConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::config(format!("invalid TOML: {}", e)))
    }

    /// Load defaults overlaid by a TOML file.
    ///
    /// An explicit `path` must exist. Without one, `docsmith.toml` in `target`
    /// is used when present.
    pub fn load(path: Option<&Path>, target: &Path) -> AppResult<Self> {
        let candidate = match path {
            Some(p) => {
                if !p.is_file() {
                    return Err(AppError::config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => Some(target.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };

        match candidate {
            Some(file) => {
                let content = std::fs::read_to_string(&file)?;
                tracing::debug!(path = %file.display(), "loaded configuration file");
                Self::from_toml_str(&content)
                    .map_err(|e| AppError::config(format!("{}: {}", file.display(), e)))
            }
            None => Ok(Self::default()),
        }
    }

    /// Overlay the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an environment lookup.
    ///
    /// `DOCSMITH_API_KEY` wins over `OPENAI_API_KEY`. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("DOCSMITH_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("DOCSMITH_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(url) = get("DOCSMITH_BASE_URL") {
            self.llm.base_url = Some(url);
        }
    }

    /// Resolve relative output and state directories against the target.
    pub fn resolve_dirs(&mut self, target: &Path) {
        if self.output_dir.is_relative() {
            self.output_dir = target.join(&self.output_dir);
        }
        if self.state_dir.is_relative() {
            self.state_dir = target.join(&self.state_dir);
        }
    }

    /// Reject configurations the agent cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("max_iterations", self.max_iterations),
            ("max_react_iterations", self.max_react_iterations),
            ("max_plan_steps", self.max_plan_steps),
        ] {
            if value == 0 {
                return Err(AppError::config(format!("{} must be at least 1", name)));
            }
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AppError::config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        let has_key = self
            .llm
            .api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false);
        if self.llm.provider.requires_api_key() && !has_key {
            return Err(AppError::config(format!(
                "no API key configured for provider '{}'; set DOCSMITH_API_KEY or OPENAI_API_KEY",
                self.llm.provider
            )));
        }
        Ok(())
    }
}
