use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MyceliaConfig {
    pub llm: LlmConfig,
    pub vault: VaultConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// Credential for the Messages API. Empty means "not configured".
    pub api_key: String,
    /// Conversational model used for visible replies.
    pub model: String,
    /// Cheaper model used for extraction and journaling.
    pub extraction_model: String,
    pub endpoint: String,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VaultConfig {
    /// Vault root. Empty means "not configured".
    pub path: String,
    pub writing_perspective: WritingPerspective,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

/// Pronoun voice used in generated notes and journal entries.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WritingPerspective {
    First,
    #[default]
    Second,
}

impl WritingPerspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

impl std::fmt::Display for WritingPerspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WritingPerspective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "second" => Ok(Self::Second),
            _ => Err(format!("unknown writing perspective: {s}")),
        }
    }
}

impl Default for MyceliaConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            vault: VaultConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-sonnet-4-6".into(),
            extraction_model: "claude-haiku-4-5-20251001".into(),
            endpoint: "https://api.anthropic.com/v1".into(),
            max_tokens: 4096,
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            writing_perspective: WritingPerspective::Second,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Returns `~/.mycelia/`
pub fn default_mycelia_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mycelia")
}

/// Returns the default config file path: `~/.mycelia/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mycelia_dir().join("config.toml")
}

impl MyceliaConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MyceliaConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// `MYCELIA_API_KEY` wins over `ANTHROPIC_API_KEY`; the others are
    /// `MYCELIA_VAULT`, `MYCELIA_PERSPECTIVE`, `MYCELIA_MODEL`, `MYCELIA_EXTRACTION_MODEL`
    /// and `MYCELIA_LOG_LEVEL`. An unrecognized perspective is ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MYCELIA_API_KEY").or_else(|_| std::env::var("ANTHROPIC_API_KEY")) {
            self.llm.api_key = val;
        }
        if let Ok(val) = std::env::var("MYCELIA_VAULT") {
            self.vault.path = val;
        }
        if let Ok(val) = std::env::var("MYCELIA_PERSPECTIVE") {
            match val.trim().to_lowercase().parse() {
                Ok(perspective) => self.vault.writing_perspective = perspective,
                Err(e) => tracing::warn!(error = %e, "MYCELIA_PERSPECTIVE ignored"),
            }
        }
        if let Ok(val) = std::env::var("MYCELIA_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("MYCELIA_EXTRACTION_MODEL") {
            self.llm.extraction_model = val;
        }
        if let Ok(val) = std::env::var("MYCELIA_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    /// Resolve the vault root, expanding `~` if needed. `None` when no vault is set.
    pub fn vault_root(&self) -> Option<PathBuf> {
        let path = self.vault.path.trim();
        if path.is_empty() {
            None
        } else {
            Some(expand_tilde(path))
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.llm.api_key.trim().is_empty()
    }

    /// Both a credential and a vault are present.
    pub fn is_configured(&self) -> bool {
        self.has_api_key() && self.vault_root().is_some()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unconfigured() {
        let config = MyceliaConfig::default();
        assert_eq!(config.llm.model, "claude-sonnet-4-6");
        assert_eq!(config.llm.extraction_model, "claude-haiku-4-5-20251001");
        assert_eq!(config.vault.writing_perspective, WritingPerspective::Second);
        assert_eq!(config.log.level, "info");
        assert!(config.vault_root().is_none());
        assert!(!config.is_configured());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[llm]
api_key = "sk-test"
extraction_model = "fast-model"

[vault]
path = "/tmp/vault"
writing_perspective = "first"
"#;
        let config: MyceliaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.extraction_model, "fast-model");
        assert_eq!(config.vault.writing_perspective, WritingPerspective::First);
        assert_eq!(config.vault_root(), Some(PathBuf::from("/tmp/vault")));
        // defaults still apply for unset fields
        assert_eq!(config.llm.model, "claude-sonnet-4-6");
        assert_eq!(config.llm.max_tokens, 4096);
        assert!(config.is_configured());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MyceliaConfig::default();
        std::env::set_var("MYCELIA_API_KEY", "sk-env");
        std::env::set_var("MYCELIA_VAULT", "/tmp/env-vault");
        std::env::set_var("MYCELIA_LOG_LEVEL", "trace");
        std::env::set_var("MYCELIA_PERSPECTIVE", "First");

        config.apply_env_overrides();

        assert_eq!(config.llm.api_key, "sk-env");
        assert_eq!(config.vault.path, "/tmp/env-vault");
        assert_eq!(config.log.level, "trace");
        assert_eq!(config.vault.writing_perspective, WritingPerspective::First);

        std::env::set_var("MYCELIA_PERSPECTIVE", "third");
        config.apply_env_overrides();
        assert_eq!(config.vault.writing_perspective, WritingPerspective::First);

        // Clean up
        std::env::remove_var("MYCELIA_API_KEY");
        std::env::remove_var("MYCELIA_VAULT");
        std::env::remove_var("MYCELIA_LOG_LEVEL");
        std::env::remove_var("MYCELIA_PERSPECTIVE");
    }

    #[test]
    fn perspective_parses() {
        assert_eq!("first".parse::<WritingPerspective>(), Ok(WritingPerspective::First));
        assert!("third".parse::<WritingPerspective>().is_err());
        assert_eq!(WritingPerspective::Second.to_string(), "second");
    }
}
