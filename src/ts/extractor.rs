//! Entity extraction: depth-first walk over a parsed file collecting
//! function, method, and constructor declarations as [`CodeEntity`] values.

use crate::entity::CodeEntity;
use crate::pool::with_parser;
use crate::ts::errors::GrammarError;
use crate::ts::lang::Lang;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::warn;
use tree_sitter::Node;

static OPEN_PAREN_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s+").expect("hardcoded regex"));
static WS_CLOSE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\)").expect("hardcoded regex"));
static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("hardcoded regex"));

/// Parse `file_path` once and append up to `max_entities` entities.
///
/// `None` collects everything. Declarations without a body (abstract or
/// interface signatures) are skipped. A syntax error node abandons its own
/// subtree with a warning; entities already collected from sibling subtrees
/// are kept.
pub fn extract_from_file(
    entities: &mut Vec<CodeEntity>,
    file_path: &Path,
    lang: Lang,
    max_entities: Option<usize>,
) -> Result<(), GrammarError> {
    let source = fs::read_to_string(file_path).map_err(|e| GrammarError::Io {
        path: file_path.to_path_buf(),
        source: e,
    })?;

    let tree = with_parser(lang, |parser| parser.parse(&source))??;
    let lines: Vec<&str> = source.lines().collect();

    let mut pass = ExtractionPass {
        entities,
        source: &source,
        lines: &lines,
        file_path,
        lang,
        max_entities,
    };
    pass.walk(tree.root_node());

    Ok(())
}

struct ExtractionPass<'a> {
    entities: &'a mut Vec<CodeEntity>,
    source: &'a str,
    lines: &'a [&'a str],
    file_path: &'a Path,
    lang: Lang,
    max_entities: Option<usize>,
}

impl ExtractionPass<'_> {
    fn at_capacity(&self) -> bool {
        self.max_entities
            .is_some_and(|max| self.entities.len() >= max)
    }

    fn walk(&mut self, node: Node<'_>) {
        if self.at_capacity() {
            return;
        }
        if node.is_error() || node.is_missing() {
            warn!(
                file = %self.file_path.display(),
                line = node.start_position().row + 1,
                "syntax error encountered, abandoning subtree"
            );
            return;
        }

        if self.lang.entity_kinds().contains(&node.kind())
            && node.child_by_field_name("body").is_some()
        {
            let entity = self.build_entity(node);
            self.entities.push(entity);
            if self.at_capacity() {
                return;
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child);
        }
    }

    fn build_entity(&self, node: Node<'_>) -> CodeEntity {
        // start/end positions are (row, col) zero-based
        let start_row = node.start_position().row;
        let end_row = node.end_position().row;
        let snippet = &self.lines[start_row..=end_row.min(self.lines.len() - 1)];

        let (indent_level, indent_size) = detect_indent(snippet.first().copied().unwrap_or(""));
        let prefix = indent_level * indent_size;
        let dedented: Vec<String> = snippet.iter().map(|line| dedent_line(line, prefix)).collect();

        CodeEntity {
            file_path: self.file_path.to_path_buf(),
            line_start: start_row + 1,
            line_end: end_row + 1,
            indent_level,
            indent_size,
            lang: self.lang,
            src_code: dedented.join("\n"),
            name: self.entity_name(node),
            signature: self.entity_signature(node),
            complexity: complexity_score(node, self.lang),
        }
    }

    fn entity_name(&self, node: Node<'_>) -> String {
        node.child_by_field_name("name")
            .map(|n| self.source[n.byte_range()].to_string())
            .unwrap_or_default()
    }

    /// Source text from the declaration start up to (excluding) its body,
    /// whitespace-normalized.
    fn entity_signature(&self, node: Node<'_>) -> String {
        let Some(body) = node.child_by_field_name("body") else {
            return String::new();
        };
        let raw = &self.source[node.start_byte()..body.start_byte()];
        normalize_signature(raw)
    }
}

/// Inspect the leading whitespace run of the unit's first line.
///
/// Any tab in the run forces `indent_size = 1` with the run length as the
/// level; otherwise the run length itself is the indent size (4 when the
/// line has no indentation) and the level is the integer quotient.
pub fn detect_indent(first_line: &str) -> (usize, usize) {
    let run: usize = first_line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();
    let has_tab = first_line.chars().take(run).any(|c| c == '\t');

    if has_tab {
        (run, 1)
    } else {
        let indent_size = if run == 0 { 4 } else { run };
        (run / indent_size, indent_size)
    }
}

/// Strip `prefix` leading characters; lines shorter than the prefix lose all
/// leading tabs and spaces instead (fallback for inconsistent bodies).
fn dedent_line(line: &str, prefix: usize) -> String {
    match line.char_indices().nth(prefix) {
        Some((byte_offset, _)) => line[byte_offset..].to_string(),
        None if line.chars().count() == prefix => String::new(),
        None => line.trim_start_matches([' ', '\t']).to_string(),
    }
}

fn normalize_signature(raw: &str) -> String {
    let trimmed = raw.trim_end();
    let opened = OPEN_PAREN_WS.replace_all(trimmed, "(");
    let closed = WS_CLOSE_PAREN.replace_all(&opened, ")");
    WS_RUN.replace_all(&closed, " ").trim().to_string()
}

/// Branch-count complexity: one per branch-inducing node in the subtree,
/// plus one for the entry point.
fn complexity_score(node: Node<'_>, lang: Lang) -> u32 {
    let branch_kinds = lang.branch_kinds();
    let mut score = 1u32;
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if branch_kinds.contains(&current.kind()) {
            score += 1;
        }
        let mut cursor = current.walk();
        for child in current.children(&mut cursor) {
            stack.push(child);
        }
    }
    score
}
