use crate::ts::errors::GrammarError;
use crate::ts::lang::Lang;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper bound to one grammar.
pub struct EntityParser {
    parser: Parser,
    lang: Lang,
}

impl EntityParser {
    /// Create a parser for the given language.
    pub fn new(lang: Lang) -> Result<Self, GrammarError> {
        let mut parser = Parser::new();
        parser
            .set_language(&lang.grammar())
            .map_err(|_| GrammarError::LanguageSet { lang })?;

        Ok(Self { parser, lang })
    }

    /// The grammar this parser is bound to.
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, GrammarError> {
        self.parser
            .parse(source, None)
            .ok_or(GrammarError::ParseFailed { lang: self.lang })
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, GrammarError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource {
            source,
            tree,
            lang: self.lang,
        })
    }
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
    pub lang: Lang,
}

impl<'a> ParsedSource<'a> {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR nodes.
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }

    /// Extract text for a node's byte range.
    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }
}

fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}
