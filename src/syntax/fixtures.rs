//! Test fixtures
//!
//! A small Ruby rule table. Its tokens are fixed by the table, so tests can
//! assert exact kinds and offsets for `puts "hello"`.

use std::sync::Arc;

use super::builtin::BuiltinCatalog;
use super::lexer::{LexerDescriptor, Tokenizer};
use super::registry::LexerRegistry;
use super::rules::{RuleLexer, RuleTable};
use crate::error::Result;

pub const PATTERNS: &[&str] = &[
    "*.rb", "*.ruby", "*.rbw", "*.rake", "*.gemspec", "*.podspec", "*.ru", "*.thor",
    "Rakefile", "Gemfile", "Guardfile", "Capfile", "Podfile", "Vagrantfile",
];

pub const RULES: RuleTable = &[
    ("Comment.Multiline", r"=begin\b[\s\S]*?\n=end\b"),
    ("Comment.Single", r"#[^\n]*"),
    ("Literal.String.Double", r#""(?:[^"\\]|\\.)*""#),
    ("Literal.String.Single", r"'(?:[^'\\]|\\.)*'"),
    ("Literal.String.Backtick", r"`(?:[^`\\]|\\.)*`"),
    ("Operator", r"::"),
    ("Literal.String.Symbol", r":[A-Za-z_]\w*[?!=]?"),
    ("Name.Variable.Class", r"@@[A-Za-z_]\w*"),
    ("Name.Variable.Instance", r"@[A-Za-z_]\w*"),
    ("Name.Variable.Global", r"\$[A-Za-z_]\w*"),
    ("Keyword.Constant", r"\b(?:true|false|nil|self|__FILE__|__LINE__)\b"),
    ("Keyword", r"\b(?:alias|and|begin|break|case|class|def|do|else|elsif|end|ensure|for|if|in|module|next|not|or|redo|rescue|retry|return|super|then|undef|unless|until|when|while|yield)\b"),
    ("Name.Builtin", r"\b(?:puts|print|p|pp|require|require_relative|load|include|extend|prepend|attr_accessor|attr_reader|attr_writer|private|protected|public|raise|lambda|proc|loop)\b"),
    ("Literal.Number.Hex", r"0[xX][0-9a-fA-F_]+"),
    ("Literal.Number.Bin", r"0[bB][01_]+"),
    ("Literal.Number.Float", r"\d[\d_]*\.\d[\d_]*(?:[eE][+-]?\d+)?"),
    ("Literal.Number.Integer", r"\d[\d_]*"),
    ("Name.Constant", r"[A-Z]\w*"),
    ("Name", r"[a-z_]\w*[?!]?"),
    ("Text.Whitespace", r"\s+"),
    ("Operator", r"\.\.\.?|[+\-*/%&|^!<>=~]+"),
    ("Punctuation", r"[(){}\[\],.;:]"),
];

/// The Ruby rule lexer
pub fn ruby() -> LexerDescriptor {
    LexerDescriptor::new(
        "ruby",
        PATTERNS,
        Arc::new(|| -> Result<Box<dyn Tokenizer>> { Ok(Box::new(RuleLexer::new("ruby", RULES)?)) }),
    )
    .unwrap()
}

/// The bundled catalog plus the Ruby fixture
pub fn registry() -> LexerRegistry {
    let registry = LexerRegistry::from_catalog(&BuiltinCatalog).unwrap();
    registry.register(ruby()).unwrap();
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tokens::Token;

    fn lex(input: &str) -> Vec<Token<'_>> {
        ruby().build().unwrap().lex(input).unwrap()
    }

    #[test]
    fn test_puts_string() {
        let tokens = lex(r#"puts "hello""#);
        assert_eq!(
            tokens,
            vec![
                Token::new("Name.Builtin", "puts"),
                Token::new("Text.Whitespace", " "),
                Token::new("Literal.String.Double", "\"hello\""),
            ]
        );
    }

    #[test]
    fn test_method_definition() {
        let tokens = lex("def greet(name)\n  @name = name\nend");
        assert_eq!(tokens[0], Token::new("Keyword", "def"));
        assert!(tokens.contains(&Token::new("Name.Variable.Instance", "@name")));
        assert_eq!(tokens.last(), Some(&Token::new("Keyword", "end")));
    }

    #[test]
    fn test_symbols_and_constants() {
        let tokens = lex("Foo::BAR = :baz");
        assert_eq!(tokens[0], Token::new("Name.Constant", "Foo"));
        assert!(tokens.contains(&Token::new("Literal.String.Symbol", ":baz")));
    }

    #[test]
    fn test_comment() {
        let tokens = lex("x = 1 # note");
        assert_eq!(tokens.last(), Some(&Token::new("Comment.Single", "# note")));
    }

    #[test]
    fn test_keyword_after_number_needs_boundary() {
        let tokens = lex("1.5end");
        assert_eq!(
            tokens,
            vec![
                Token::new("Literal.Number.Float", "1.5"),
                Token::new("Name", "end"),
            ]
        );
        assert_eq!(lex("x end")[2], Token::new("Keyword", "end"));
    }

    #[test]
    fn test_registry_adds_ruby_to_catalog() {
        let registry = registry();
        assert_eq!(registry.resolve_for("Rakefile").unwrap().id(), "ruby");
        assert_eq!(registry.resolve_for("main.rs").unwrap().id(), "rust");
    }
}
