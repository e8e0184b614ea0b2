//! Bundled lexer catalog
//!
//! Tree-sitter grammars with their highlight queries. Registration order is
//! fixed, so a file claimed by several grammars (`*.h`) always resolves the
//! same way.

use std::sync::Arc;

use tree_sitter::Language;

use super::lexer::{LexerCatalog, LexerDescriptor, Tokenizer};
use super::treesitter::TreeSitterLexer;
use crate::error::Result;

/// The lexers shipped with lexstyle
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl LexerCatalog for BuiltinCatalog {
    fn lexers(&self) -> Result<Vec<LexerDescriptor>> {
        Ok(vec![
            grammar(
                "bash",
                &["*.sh", "*.bash", "*.zsh", ".bashrc", ".bash_profile", ".zshrc"],
                || tree_sitter_bash::LANGUAGE.into(),
                || tree_sitter_bash::HIGHLIGHT_QUERY.to_string(),
            )?,
            grammar(
                "c",
                &["*.c", "*.h"],
                || tree_sitter_c::LANGUAGE.into(),
                || tree_sitter_c::HIGHLIGHT_QUERY.to_string(),
            )?,
            // The C++ query only covers C++ additions; C's is the base
            grammar(
                "cpp",
                &["*.cpp", "*.cc", "*.cxx", "*.c++", "*.hpp", "*.hh", "*.hxx", "*.h"],
                || tree_sitter_cpp::LANGUAGE.into(),
                || format!("{}\n{}", tree_sitter_c::HIGHLIGHT_QUERY, tree_sitter_cpp::HIGHLIGHT_QUERY),
            )?,
            grammar(
                "go",
                &["*.go"],
                || tree_sitter_go::LANGUAGE.into(),
                || tree_sitter_go::HIGHLIGHTS_QUERY.to_string(),
            )?,
            grammar(
                "javascript",
                &["*.js", "*.mjs", "*.cjs", "*.jsx"],
                || tree_sitter_javascript::LANGUAGE.into(),
                || tree_sitter_javascript::HIGHLIGHT_QUERY.to_string(),
            )?,
            grammar(
                "json",
                &["*.json"],
                || tree_sitter_json::LANGUAGE.into(),
                || tree_sitter_json::HIGHLIGHTS_QUERY.to_string(),
            )?,
            grammar(
                "python",
                &["*.py", "*.pyw", "*.pyi", "SConstruct", "SConscript"],
                || tree_sitter_python::LANGUAGE.into(),
                || tree_sitter_python::HIGHLIGHTS_QUERY.to_string(),
            )?,
            grammar(
                "rust",
                &["*.rs"],
                || tree_sitter_rust::LANGUAGE.into(),
                || tree_sitter_rust::HIGHLIGHTS_QUERY.to_string(),
            )?,
            grammar(
                "toml",
                &["*.toml", "Cargo.lock"],
                || tree_sitter_toml_ng::LANGUAGE.into(),
                || tree_sitter_toml_ng::HIGHLIGHTS_QUERY.to_string(),
            )?,
        ])
    }
}

/// Describe a lexer backed by a grammar and its highlight query
fn grammar(
    id: &'static str,
    patterns: &[&str],
    language: fn() -> Language,
    query: fn() -> String,
) -> Result<LexerDescriptor> {
    LexerDescriptor::new(
        id,
        patterns,
        Arc::new(move || -> Result<Box<dyn Tokenizer>> {
            Ok(Box::new(TreeSitterLexer::new(id, &language(), &query())?))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tokens::Token;

    fn lexer(id: &str) -> Box<dyn Tokenizer> {
        BuiltinCatalog
            .lexers()
            .unwrap()
            .into_iter()
            .find(|d| d.id() == id)
            .unwrap()
            .build()
            .unwrap()
    }

    fn has(tokens: &[Token<'_>], kind: &str, text: &str) -> bool {
        tokens
            .iter()
            .any(|t| t.kind.chain().any(|k| k == kind) && t.text == text)
    }

    #[test]
    fn test_catalog_order_is_stable() {
        let ids: Vec<String> = BuiltinCatalog
            .lexers()
            .unwrap()
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(
            ids,
            vec!["bash", "c", "cpp", "go", "javascript", "json", "python", "rust", "toml"]
        );
    }

    #[test]
    fn test_every_lexer_builds() {
        for descriptor in BuiltinCatalog.lexers().unwrap() {
            let tokenizer = descriptor.build().unwrap();
            assert_eq!(tokenizer.name(), descriptor.id());
        }
    }

    #[test]
    fn test_every_lexer_covers_input() {
        let input = "x = \"a\\\"b\" # 1.5 /* c */ 0x1F 'q' [t]\n\tλ;";
        for descriptor in BuiltinCatalog.lexers().unwrap() {
            let tokenizer = descriptor.build().unwrap();
            let tokens = tokenizer.lex(input).unwrap();
            let rebuilt: String = tokens.iter().map(|t| t.text).collect();
            assert_eq!(rebuilt, input, "lexer {}", descriptor.id());
        }
    }

    #[test]
    fn test_python_string_and_keyword() {
        let tokens = lexer("python").lex("def f():\n    return \"hi\"\n").unwrap();
        assert!(has(&tokens, "Keyword", "def"));
        assert!(has(&tokens, "Literal.String", "\"hi\""));
    }

    #[test]
    fn test_json_number() {
        let tokens = lexer("json").lex(r#"{"port": 8080}"#).unwrap();
        assert!(has(&tokens, "Literal.Number", "8080"));
    }

    #[test]
    fn test_c_comment() {
        let tokens = lexer("c").lex("int x; /* note */\n").unwrap();
        assert!(has(&tokens, "Comment", "/* note */"));
    }
}
