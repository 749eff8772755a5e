use ast_grep_language::{LanguageExt, SupportLang};
use serde::{Deserialize, Serialize};
use tree_sitter::Language;

/// Placeholder marker written into stub bodies.
pub const TODO_REWRITE: &str = "TODO: Implement this function";

/// Supported grammars, dispatched by file extension.
///
/// Each variant knows which syntax-tree node kinds constitute an extractable
/// entity (functions, methods, constructors), which kinds contribute to the
/// coarse complexity score, and how to render a stub body. Unknown extensions
/// resolve to `None` from [`Lang::from_ext`] and are skipped by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lang {
    Rust,
    Python,
    Java,
    Go,
    TypeScript,
    Tsx,
    JavaScript,
}

impl Lang {
    /// Resolve a language from a file extension (without the leading dot).
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "go" => Some(Self::Go),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Get the tree-sitter grammar from ast-grep-language.
    pub fn grammar(self) -> Language {
        match self {
            Self::Rust => SupportLang::Rust.get_ts_language(),
            Self::Python => SupportLang::Python.get_ts_language(),
            Self::Java => SupportLang::Java.get_ts_language(),
            Self::Go => SupportLang::Go.get_ts_language(),
            Self::TypeScript => SupportLang::TypeScript.get_ts_language(),
            Self::Tsx => SupportLang::Tsx.get_ts_language(),
            Self::JavaScript => SupportLang::JavaScript.get_ts_language(),
        }
    }

    /// Node kinds that declare an extractable entity.
    ///
    /// Bodiless declarations of these kinds (abstract methods, interface
    /// signatures, forward declarations) are filtered by the extractor via
    /// the grammar's `body` field.
    pub fn entity_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &["function_item"],
            Self::Python => &["function_definition"],
            Self::Java => &["method_declaration", "constructor_declaration"],
            Self::Go => &["function_declaration", "method_declaration"],
            Self::TypeScript | Self::Tsx | Self::JavaScript => &[
                "function_declaration",
                "generator_function_declaration",
                "method_definition",
            ],
        }
    }

    /// Node kinds that contribute to the branch-count complexity score.
    pub fn branch_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &[
                "if_expression",
                "match_arm",
                "while_expression",
                "for_expression",
                "loop_expression",
            ],
            Self::Python => &[
                "if_statement",
                "for_statement",
                "while_statement",
                "except_clause",
                "boolean_operator",
                "conditional_expression",
            ],
            Self::Java => &[
                "if_statement",
                "for_statement",
                "enhanced_for_statement",
                "while_statement",
                "do_statement",
                "catch_clause",
                "ternary_expression",
            ],
            Self::Go => &[
                "if_statement",
                "for_statement",
                "expression_switch_statement",
                "type_switch_statement",
                "select_statement",
            ],
            Self::TypeScript | Self::Tsx | Self::JavaScript => &[
                "if_statement",
                "for_statement",
                "for_in_statement",
                "while_statement",
                "do_statement",
                "switch_case",
                "catch_clause",
                "ternary_expression",
            ],
        }
    }

    /// Render a stub body for a signature: placeholder comment plus the
    /// grammar's block terminator.
    pub fn stub(self, signature: &str) -> String {
        match self {
            Self::Python => format!("{signature}\n    # {TODO_REWRITE}"),
            _ => format!("{signature} {{\n\t// {TODO_REWRITE}\n}}"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::Java => "java",
            Self::Go => "go",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
