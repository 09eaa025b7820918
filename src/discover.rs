//! File discovery.
//!
//! Expands every tool's include patterns below a root directory and tags each
//! match with the tool that owns it:
//!
//! ```text
//! tools.copilot.include = [".copilot/**/*.yml"]
//!   glob(<root>/.copilot/**/*.yml) -> exclude filter -> extension check
//!   -> Document { path: ".copilot/style.yml", tool: "copilot", content_type: Yaml }
//! ```
//!
//! Paths are reported relative to the root with `/` separators, so reports do
//! not depend on where the tool was started from.

use crate::config::Config;
use crate::error::DiscoveryError;
use crate::{ContentType, Document};
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const INCLUDE_OPTIONS: MatchOptions =
    MatchOptions { case_sensitive: true, require_literal_separator: true, require_literal_leading_dot: false };

pub struct FileDetector<'a> {
    config: &'a Config,
    root: PathBuf,
}

impl<'a> FileDetector<'a> {
    pub fn new(config: &'a Config, root: impl Into<PathBuf>) -> Self {
        Self { config, root: root.into() }
    }

    /// Find every candidate document, tools in declaration order and matches in
    /// pattern then path order.
    pub fn detect(&self) -> Result<Vec<Document>, DiscoveryError> {
        let global_excludes = compile(&self.config.exclude)?;
        let root_pattern = Pattern::escape(&self.root.to_string_lossy());
        let mut documents = Vec::new();

        for (tool, tool_config) in &self.config.tools {
            let mut excludes = global_excludes.clone();
            excludes.extend(compile(&tool_config.exclude)?);
            let mut seen: HashSet<String> = HashSet::new();

            for include in &tool_config.include {
                let pattern = format!("{}/{}", root_pattern.trim_end_matches('/'), include);
                let entries = glob::glob_with(&pattern, INCLUDE_OPTIONS)
                    .map_err(|source| DiscoveryError::Pattern { pattern: include.clone(), source })?;

                for entry in entries {
                    let path = match entry {
                        Ok(path) => path,
                        Err(err) => {
                            warn!(pattern = %include, error = %err, "skipping unreadable path");
                            continue;
                        }
                    };
                    if !path.is_file() {
                        continue;
                    }

                    let relative = relative_path(&self.root, &path);
                    if excludes.iter().any(|p| p.matches(&relative)) {
                        debug!(path = %relative, tool = %tool, "excluded");
                        continue;
                    }
                    let Some(content_type) =
                        path.extension().and_then(|ext| ext.to_str()).and_then(ContentType::from_extension)
                    else {
                        continue;
                    };
                    if seen.insert(relative.clone()) {
                        documents.push(Document::new(relative, tool.clone(), content_type));
                    }
                }
            }
        }

        debug!(count = documents.len(), root = %self.root.display(), "discovered documents");
        Ok(documents)
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, DiscoveryError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|source| DiscoveryError::Pattern { pattern: p.clone(), source }))
        .collect()
}

/// `path` relative to `root`, joined with `/`.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RuleLevels, ToolConfig};
    use indexmap::IndexMap;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "a: 1\n").unwrap();
    }

    fn config(tools: &[(&str, &[&str], &[&str])], exclude: &[&str]) -> Config {
        let tools: IndexMap<String, ToolConfig> = tools
            .iter()
            .map(|(name, include, exclude)| {
                (
                    name.to_string(),
                    ToolConfig {
                        include: include.iter().map(|s| s.to_string()).collect(),
                        exclude: exclude.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect();
        Config {
            tools,
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            rules: RuleLevels::default(),
            ai: None,
            best_practices: None,
        }
    }

    #[test]
    fn tags_matches_with_tool_and_type() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".copilot/style.yml");
        touch(dir.path(), ".copilot/nested/extra.json");
        touch(dir.path(), ".cursor/rules.md");
        touch(dir.path(), ".cursor/notes.txt");

        let cfg = config(&[("copilot", &[".copilot/**/*"], &[]), ("cursor", &[".cursor/*"], &[])], &[]);
        let mut docs = FileDetector::new(&cfg, dir.path()).detect().unwrap();
        docs.sort_by(|a, b| (&a.tool, &a.path).cmp(&(&b.tool, &b.path)));

        assert_eq!(
            docs,
            vec![
                Document::new(".copilot/nested/extra.json", "copilot", ContentType::Json),
                Document::new(".copilot/style.yml", "copilot", ContentType::Yaml),
                Document::new(".cursor/rules.md", "cursor", ContentType::Markdown),
            ]
        );
    }

    #[test]
    fn global_and_tool_excludes_apply() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "rules/keep.yml");
        touch(dir.path(), "rules/draft.yml");
        touch(dir.path(), "node_modules/pkg/rules.yml");

        let cfg = config(&[("claude", &["**/*.yml"], &["rules/draft.yml"])], &["node_modules/**"]);
        let docs = FileDetector::new(&cfg, dir.path()).detect().unwrap();

        assert_eq!(docs, vec![Document::new("rules/keep.yml", "claude", ContentType::Yaml)]);
    }

    #[test]
    fn overlapping_patterns_keep_one_entry_per_tool() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "CLAUDE.md");

        let cfg = config(&[("claude", &["CLAUDE.md", "*.md"], &[]), ("cursor", &["*.md"], &[])], &[]);
        let docs = FileDetector::new(&cfg, dir.path()).detect().unwrap();

        assert_eq!(
            docs,
            vec![
                Document::new("CLAUDE.md", "claude", ContentType::Markdown),
                Document::new("CLAUDE.md", "cursor", ContentType::Markdown),
            ]
        );
    }

    #[test]
    fn tools_are_walked_in_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "z/rules.yml");
        touch(dir.path(), "a/rules.yml");

        let cfg = config(&[("zeta", &["z/*.yml"], &[]), ("alpha", &["a/*.yml"], &[])], &[]);
        let docs = FileDetector::new(&cfg, dir.path()).detect().unwrap();
        let tools: Vec<&str> = docs.iter().map(|d| d.tool.as_str()).collect();
        assert_eq!(tools, vec!["zeta", "alpha"]);

        let loaded = Config::from_yaml_str(
            "tools:\n  zeta:\n    include: ['z/*.yml']\n  alpha:\n    include: ['a/*.yml']\n\
             rules:\n  duplicate-key: error\n  undefined-ref: error\n  \
             priority-cycle: error\n  range-conflict: error\n",
            Path::new("x.yml"),
        )
        .unwrap();
        let docs = FileDetector::new(&loaded, dir.path()).detect().unwrap();
        let tools: Vec<&str> = docs.iter().map(|d| d.tool.as_str()).collect();
        assert_eq!(tools, vec!["zeta", "alpha"]);
    }

    #[test]
    fn default_tools_keep_copilot_cursor_claude_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".claude/b.yml");
        touch(dir.path(), ".copilot/a.yml");

        let docs = FileDetector::new(&Config::default(), dir.path()).detect().unwrap();
        let tools: Vec<&str> = docs.iter().map(|d| d.tool.as_str()).collect();
        assert_eq!(tools, vec!["copilot", "claude"]);
    }

    #[test]
    fn no_matches_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let docs = FileDetector::new(&Config::default(), dir.path()).detect().unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn bad_include_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[("x", &["a/***/b"], &[])], &[]);
        assert!(FileDetector::new(&cfg, dir.path()).detect().is_err());
    }
}
