//! Format-specific parsing.
//!
//! [`DocumentParser`] is the seam between the engine and the filesystem: the
//! engine only ever asks it for one document's [`ParsedContent`]. [`FileParser`]
//! is the on-disk implementation:
//!
//! ```text
//! Document ─ read <root>/<path> ─┬─ Yaml     -> serde_yaml  -> NestedValue
//!                                ├─ Json     -> serde_json  -> NestedValue
//!                                └─ Markdown -> sections    -> NestedValue (+ frontmatter)
//! ```

use crate::error::ParseError;
use crate::{ContentType, Document, NestedValue};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Output of a parser for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedContent {
    /// The tree every rule looks at.
    pub value: NestedValue,
    /// YAML frontmatter of a Markdown document. Informational only; the rules
    /// do not read it.
    pub frontmatter: Option<NestedValue>,
}

impl From<NestedValue> for ParsedContent {
    fn from(value: NestedValue) -> Self {
        Self { value, frontmatter: None }
    }
}

/// Produces the parsed content of a document.
///
/// Implementations may do I/O; the engine awaits all documents before it
/// evaluates any rule, and turns an `Err` into a `parse-error` violation for
/// that document alone.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, document: &Document) -> Result<ParsedContent, ParseError>;
}

/// Reads documents from disk below `root`.
#[derive(Debug, Clone)]
pub struct FileParser {
    root: PathBuf,
}

impl FileParser {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Parse already-loaded text. `path` is only used in errors.
    pub fn parse_text(content_type: ContentType, text: &str, path: &Path) -> Result<ParsedContent, ParseError> {
        match content_type {
            ContentType::Yaml => parse_yaml(text, path).map(ParsedContent::from),
            ContentType::Json => parse_json(text, path).map(ParsedContent::from),
            ContentType::Markdown => Ok(parse_markdown(text)),
        }
    }
}

#[async_trait]
impl DocumentParser for FileParser {
    async fn parse(&self, document: &Document) -> Result<ParsedContent, ParseError> {
        let path = self.root.join(&document.path);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ParseError::Io { path: path.clone(), source })?;
        Self::parse_text(document.content_type, &text, &path)
    }
}

/// Whole-file YAML. An empty document is `null`.
///
/// The text is loaded as a `serde_yaml::Value` first, so scalar keys of any
/// type and non-finite floats are accepted (see [`NestedValue`]'s
/// `From<serde_yaml::Value>`).
pub fn parse_yaml(text: &str, path: &Path) -> Result<NestedValue, ParseError> {
    if text.trim().is_empty() {
        return Ok(NestedValue::Null);
    }
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .map(NestedValue::from)
        .map_err(|source| ParseError::Yaml { path: path.to_path_buf(), source })
}

/// Whole-file JSON.
pub fn parse_json(text: &str, path: &Path) -> Result<NestedValue, ParseError> {
    serde_json::from_str(text).map_err(|source| ParseError::Json { path: path.to_path_buf(), source })
}

/// Sectioned Markdown.
///
/// - A line that is exactly `---` (ignoring surrounding whitespace) opens or
///   closes a YAML frontmatter block; a block that fails to parse is ignored.
/// - `## Title` opens a section. Text before the first section is ignored.
/// - A section whose body has `- key: value` / `* key: value` items becomes a
///   mapping of those items; otherwise it is kept as raw text.
///
/// ```text
/// ## Style                  { "Style": { "indent": "2 spaces",
/// - indent: 2 spaces                     "quotes": "single" },
/// - quotes: single            "Notes": "Free text.\n" }
/// ## Notes
/// Free text.
/// ```
pub fn parse_markdown(text: &str) -> ParsedContent {
    let mut sections: BTreeMap<String, NestedValue> = BTreeMap::new();
    let mut frontmatter = None;

    let mut current_section = String::new();
    let mut current_body: Vec<&str> = Vec::new();
    let mut in_frontmatter = false;
    let mut frontmatter_lines: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim() == "---" {
            if in_frontmatter {
                match serde_yaml::from_str::<serde_yaml::Value>(&frontmatter_lines.join("\n")) {
                    Ok(value) => frontmatter = Some(NestedValue::from(value)),
                    Err(err) => tracing::debug!(error = %err, "ignoring unparsable frontmatter"),
                }
                frontmatter_lines.clear();
            }
            in_frontmatter = !in_frontmatter;
            continue;
        }
        if in_frontmatter {
            frontmatter_lines.push(line);
            continue;
        }

        if let Some(title) = line.strip_prefix("## ") {
            if !current_section.is_empty() {
                sections.insert(std::mem::take(&mut current_section), parse_section(&current_body.join("\n")));
            }
            current_section = title.trim().to_string();
            current_body.clear();
        } else if !current_section.is_empty() {
            current_body.push(line);
        }
    }

    if !current_section.is_empty() {
        sections.insert(current_section, parse_section(&current_body.join("\n")));
    }

    ParsedContent { value: NestedValue::Mapping(sections), frontmatter }
}

fn parse_section(body: &str) -> NestedValue {
    let mut items: BTreeMap<String, NestedValue> = BTreeMap::new();

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(item) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) else {
            continue;
        };
        let item = item.trim();
        if let Some((key, value)) = item.split_once(':') {
            if !key.is_empty() {
                items.insert(key.trim().to_string(), NestedValue::from(value.trim()));
            }
        }
    }

    if items.is_empty() { NestedValue::String(body.to_string()) } else { NestedValue::Mapping(items) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn markdown_sections_become_mappings() {
        let text = "# Title\nignored\n## Style\n- indent: 2 spaces\n* quotes: single\n\n## Notes\nFree text.\n";
        let parsed = parse_markdown(text);

        assert_eq!(
            parsed.value,
            NestedValue::from(json!({
                "Style": {"indent": "2 spaces", "quotes": "single"},
                "Notes": "Free text.\n",
            }))
        );
        assert_eq!(parsed.frontmatter, None);
    }

    #[test]
    fn markdown_items_split_at_first_colon() {
        let parsed = parse_markdown("## Links\n- docs: https://example.com/x\n- : no key\n");
        assert_eq!(parsed.value, NestedValue::from(json!({"Links": {"docs": "https://example.com/x"}})));
    }

    #[test]
    fn markdown_frontmatter_is_kept_apart() {
        let text = "---\ndependencies: [\"copilot:a.yml\"]\n---\n## Rules\n- a: b\n";
        let parsed = parse_markdown(text);

        assert_eq!(parsed.frontmatter, Some(NestedValue::from(json!({"dependencies": ["copilot:a.yml"]}))));
        assert_eq!(parsed.value, NestedValue::from(json!({"Rules": {"a": "b"}})));
    }

    #[test]
    fn broken_frontmatter_is_ignored() {
        let parsed = parse_markdown("---\nkey: [unclosed\n---\n## A\ntext\n");
        assert_eq!(parsed.frontmatter, None);
        assert_eq!(parsed.value, NestedValue::from(json!({"A": "text\n"})));
    }

    #[test]
    fn markdown_without_sections_is_an_empty_mapping() {
        assert_eq!(parse_markdown("just prose\n").value, NestedValue::Mapping(BTreeMap::new()));
    }

    #[test]
    fn yaml_errors_name_the_file() {
        let err = parse_yaml("a: [1, 2", Path::new("bad.yml")).unwrap_err();
        assert!(err.to_string().contains("bad.yml"), "{err}");
        assert_eq!(parse_yaml("  \n", Path::new("empty.yml")).unwrap(), NestedValue::Null);
    }

    #[test]
    fn yaml_numeric_and_boolean_keys_are_strings() {
        let text = "priorities:\n  1: low\n  2: high\ntrue: on\nlimit: .inf\n";
        let value = parse_yaml(text, Path::new("p.yml")).unwrap();
        assert_eq!(
            value,
            NestedValue::from(json!({
                "priorities": {"1": "low", "2": "high"},
                "true": "on",
                "limit": ".inf",
            }))
        );
    }

    #[test]
    fn yaml_errors_keep_the_location() {
        let err = parse_yaml("a: 1\nb: [2\n", Path::new("bad.yml")).unwrap_err();
        let ParseError::Yaml { source, .. } = &err else { panic!("expected a YAML error, got {err}") };
        assert!(source.location().is_some(), "{err}");
    }

    #[test]
    fn json_errors_name_the_file() {
        let err = parse_json("{\"a\":", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[tokio::test]
    async fn file_parser_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".copilot")).unwrap();
        std::fs::write(dir.path().join(".copilot/a.yml"), "style:\n  indent: 2\n").unwrap();

        let parser = FileParser::new(dir.path());
        let doc = Document::new(".copilot/a.yml", "copilot", ContentType::Yaml);
        let parsed = parser.parse(&doc).await.unwrap();
        assert_eq!(parsed.value, NestedValue::from(json!({"style": {"indent": 2}})));

        let missing = Document::new(".copilot/missing.yml", "copilot", ContentType::Yaml);
        assert!(matches!(parser.parse(&missing).await, Err(ParseError::Io { .. })));
    }
}
