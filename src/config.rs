//! Settings document.
//!
//! `.rulefusion.yml` declares which files belong to which tool and the level of
//! each rule:
//!
//! ```yaml
//! tools:
//!   copilot:
//!     include: [".copilot/**/*.yml"]
//!   cursor:
//!     include: [".cursor/**/*.md"]
//!     exclude: [".cursor/drafts/**"]
//! exclude: ["node_modules/**"]
//! rules:
//!   duplicate-key: error
//!   undefined-ref: error
//!   priority-cycle: error
//!   range-conflict: warning
//! ```
//!
//! A missing settings file is not an error: [`Config::default`] is used.

use crate::error::ConfigError;
use crate::{RuleId, RuleLevel};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = ".rulefusion.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Tool namespace -> the files it owns, in declaration order. The order
    /// decides which file counts as the first declaration of a key.
    pub tools: IndexMap<String, ToolConfig>,
    /// Patterns excluded for every tool.
    #[serde(default)]
    pub exclude: Vec<String>,
    pub rules: RuleLevels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<BestPracticesConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ToolConfig {
    fn new(include: &[&str]) -> Self {
        Self { include: include.iter().map(|s| s.to_string()).collect(), exclude: Vec::new() }
    }
}

/// Configured level of each rule. All four must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleLevels {
    pub duplicate_key: RuleLevel,
    pub undefined_ref: RuleLevel,
    pub priority_cycle: RuleLevel,
    pub range_conflict: RuleLevel,
}

impl RuleLevels {
    /// Every rule at the same level.
    pub fn all(level: RuleLevel) -> Self {
        Self { duplicate_key: level, undefined_ref: level, priority_cycle: level, range_conflict: level }
    }

    /// Level of `rule`. `parse-error` is always an error.
    pub fn level(&self, rule: RuleId) -> RuleLevel {
        match rule {
            RuleId::DuplicateKey => self.duplicate_key,
            RuleId::UndefinedRef => self.undefined_ref,
            RuleId::PriorityCycle => self.priority_cycle,
            RuleId::RangeConflict => self.range_conflict,
            RuleId::ParseError => RuleLevel::Error,
        }
    }

    /// Copy with `rule` set to `level`. Setting `parse-error` has no effect.
    pub fn with(mut self, rule: RuleId, level: RuleLevel) -> Self {
        match rule {
            RuleId::DuplicateKey => self.duplicate_key = level,
            RuleId::UndefinedRef => self.undefined_ref = level,
            RuleId::PriorityCycle => self.priority_cycle = level,
            RuleId::RangeConflict => self.range_conflict = level,
            RuleId::ParseError => {}
        }
        self
    }
}

impl Default for RuleLevels {
    fn default() -> Self {
        Self {
            duplicate_key: RuleLevel::Error,
            undefined_ref: RuleLevel::Error,
            priority_cycle: RuleLevel::Error,
            range_conflict: RuleLevel::Warning,
        }
    }
}

/// AI-assisted analysis settings. Accepted and validated; static analysis is
/// the only mode that runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BestPracticesConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalogs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut tools = IndexMap::new();
        tools.insert("copilot".to_string(), ToolConfig::new(&[".copilot/**/*.yml", ".copilot/**/*.yaml"]));
        tools.insert("cursor".to_string(), ToolConfig::new(&[".cursor/**/*.md"]));
        tools.insert("claude".to_string(), ToolConfig::new(&[".claude/**/*.yml", ".claude/**/*.yaml", "CLAUDE.md"]));

        Config {
            tools,
            exclude: vec!["node_modules/**".to_string(), "dist/**".to_string(), "build/**".to_string()],
            rules: RuleLevels::default(),
            ai: Some(AiConfig { enabled: false, provider: None, model: None }),
            best_practices: Some(BestPracticesConfig { enabled: false, catalogs: Vec::new() }),
        }
    }
}

impl Config {
    /// Load the settings document at `path` (or [`DEFAULT_CONFIG_PATH`]).
    ///
    /// A missing file yields the defaults; a present but unreadable, malformed
    /// or invalid file is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_yaml_str(&text, path)?;
        debug!(path = %path.display(), tools = config.tools.len(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate a settings document. `origin` is only used in errors.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Config, ConfigError> {
        let config: Config =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml { path: origin.to_path_buf(), source })?;
        config.validate().map_err(|reason| ConfigError::Invalid { path: origin.to_path_buf(), reason })?;
        Ok(config)
    }

    /// Checks serde cannot express: non-empty tool names and include lists,
    /// and well-formed glob patterns.
    pub fn validate(&self) -> Result<(), String> {
        for (name, tool) in &self.tools {
            if name.trim().is_empty() {
                return Err("tool names must not be empty".to_string());
            }
            if tool.include.is_empty() {
                return Err(format!("tool '{name}' has no include patterns"));
            }
            for pattern in tool.include.iter().chain(&tool.exclude) {
                check_pattern(pattern).map_err(|err| format!("tool '{name}': {err}"))?;
            }
        }
        for pattern in &self.exclude {
            check_pattern(pattern)?;
        }
        Ok(())
    }

    /// Path of the settings file, resolved against `root` when relative.
    pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
        if path.is_relative() { root.join(path) } else { path.to_path_buf() }
    }
}

fn check_pattern(pattern: &str) -> Result<(), String> {
    glob::Pattern::new(pattern).map(|_| ()).map_err(|err| format!("invalid glob pattern '{pattern}': {err}"))
}
