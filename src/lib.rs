//! Cross-tool consistency checks for AI assistant rule files.
//!
//! Every assistant keeps its own family of rule files (a "tool namespace").
//! `rulefusion` parses those files into a generic [`NestedValue`] tree and runs
//! four independent checks over the whole corpus:
//!
//! - `duplicate-key`: the same key path declared by more than one tool
//! - `undefined-ref`: a `${...}` token that names no known key path
//! - `priority-cycle`: `dependencies` declarations that loop back on themselves
//! - `range-conflict`: overlapping `{min, max}` ranges under the same key path
//!
//! The checks live under `src/rules/`, the orchestration under `src/engine/`.
//! Configuration loading, file discovery and format parsing are the outer
//! collaborators in [`config`], [`discover`] and [`parse`].

#[macro_use]
mod macros;
mod api;
mod engine;
mod rules;

pub mod config;
pub mod discover;
pub mod error;
pub mod parse;
mod value;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use api::{AnalysisDetails, AnalysisResult, AnalysisResultVerbose, Options, check, check_verbose_with, check_with};
pub use config::{Config, RuleLevels};
pub use engine::{
    AnalyzedDocument, DocumentFacts, NamedRange, RuleMask, RuleMetrics, RunMetrics, RunResult, StaticEngine,
    extract_dependency_identifiers, extract_key_paths, extract_named_ranges, extract_references, ranges_overlap,
};
pub use error::{ConfigError, DiscoveryError, ParseError};
pub use parse::{DocumentParser, FileParser, ParsedContent};
pub use value::NestedValue;

// --- Documents ---------------------------------------------------------------

/// Source format of a document.
///
/// YAML and JSON are *structured*: the whole file is the value tree. Markdown
/// is *textual*: the value tree is reconstructed from `## ` sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Yaml,
    Json,
    Markdown,
}

impl ContentType {
    /// Classify a file by its extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Some(ContentType::Yaml),
            "json" => Some(ContentType::Json),
            "md" | "markdown" => Some(ContentType::Markdown),
            _ => None,
        }
    }

    pub fn is_textual(self) -> bool {
        matches!(self, ContentType::Markdown)
    }
}

/// A candidate rule file, tagged with the tool namespace that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub path: String,
    pub tool: String,
    pub content_type: ContentType,
}

impl Document {
    pub fn new(path: impl Into<String>, tool: impl Into<String>, content_type: ContentType) -> Self {
        Self { path: path.into(), tool: tool.into(), content_type }
    }

    /// `tool:path`, the node identity used by the dependency graph.
    pub fn identity(&self) -> String {
        format!("{}:{}", self.tool, self.path)
    }
}

// --- Rules and violations ----------------------------------------------------

/// Identifier of a check. `ParseError` is reserved for documents that could
/// not be parsed and cannot be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    DuplicateKey,
    UndefinedRef,
    PriorityCycle,
    RangeConflict,
    ParseError,
}

impl RuleId {
    /// The four configurable rules, in evaluation order.
    pub const CONFIGURABLE: [RuleId; 4] =
        [RuleId::DuplicateKey, RuleId::UndefinedRef, RuleId::PriorityCycle, RuleId::RangeConflict];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::DuplicateKey => "duplicate-key",
            RuleId::UndefinedRef => "undefined-ref",
            RuleId::PriorityCycle => "priority-cycle",
            RuleId::RangeConflict => "range-conflict",
            RuleId::ParseError => "parse-error",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Severity of a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => f.write_str("error"),
            Level::Warning => f.write_str("warning"),
        }
    }
}

/// Configured level of a rule. `Off` disables the rule entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warning,
    Off,
}

impl RuleLevel {
    /// The level violations are reported at, or `None` when the rule is off.
    pub fn as_level(self) -> Option<Level> {
        match self {
            RuleLevel::Error => Some(Level::Error),
            RuleLevel::Warning => Some(Level::Warning),
            RuleLevel::Off => None,
        }
    }
}

/// One consistency problem, attributed to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: RuleId,
    pub level: Level,
    pub message: String,
    pub file: String,
}

impl Violation {
    pub(crate) fn new(rule: RuleId, level: Level, message: String, file: impl Into<String>) -> Self {
        Self { rule, level, message, file: file.into() }
    }
}
