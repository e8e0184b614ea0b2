//! Regex rule tables
//!
//! A rule lexer tries its rules in order at the current position; the first
//! rule that matches a non-empty prefix produces the next token. Text that no
//! rule claims is gathered into `Text` tokens so the output always covers the
//! input.

use regex::Regex;

use super::lexer::Tokenizer;
use super::tokens::{Token, TokenKind};
use crate::error::{Error, Result};

/// A single pattern rule
///
/// Matches a regex at the current position and assigns a token kind to the
/// match. Assertions such as `\b` see the character before the position.
pub struct PatternRule {
    /// Token kind to assign to matches
    pub kind: TokenKind,
    /// Pattern anchored at the start of the text
    pattern: Regex,
    /// Pattern anchored one character in, captured as group 1
    after_char: Regex,
}

impl PatternRule {
    /// Create a new pattern rule
    pub fn new(kind: &'static str, pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            kind: TokenKind::from_static(kind),
            pattern: Regex::new(&format!(r"\A(?:{})", pattern))?,
            after_char: Regex::new(&format!(r"\A(?s:.)((?:{}))", pattern))?,
        })
    }

    /// Length of the match at `start`, if the rule matches a non-empty prefix
    pub fn match_len(&self, text: &str, start: usize) -> Option<usize> {
        let prev = text[..start].chars().next_back().map_or(0, char::len_utf8);
        let len = if prev == 0 {
            self.pattern.find(&text[start..]).map(|m| m.end())
        } else {
            self.after_char
                .captures(&text[start - prev..])
                .and_then(|caps| caps.get(1))
                .map(|m| m.end() - prev)
        };
        len.filter(|&len| len > 0)
    }
}

/// Ordered rule table, tried first to last
pub type RuleTable = &'static [(&'static str, &'static str)];

/// A tokenizer driven by an ordered rule table
pub struct RuleLexer {
    name: String,
    rules: Vec<PatternRule>,
}

impl RuleLexer {
    /// Compile a rule table
    pub fn new(name: &str, rules: RuleTable) -> Result<Self> {
        let lexer = Self {
            name: name.to_string(),
            rules: Vec::with_capacity(rules.len()),
        };
        lexer.with_rules(rules)
    }

    /// Append rules after the existing ones
    pub fn with_rules(mut self, rules: RuleTable) -> Result<Self> {
        for &(kind, pattern) in rules {
            let rule = PatternRule::new(kind, pattern).map_err(|source| Error::Build {
                lexer: self.name.clone(),
                source,
            })?;
            self.rules.push(rule);
        }
        Ok(self)
    }

    /// Number of compiled rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn match_at(&self, text: &str, pos: usize) -> Option<(&PatternRule, usize)> {
        self.rules
            .iter()
            .find_map(|rule| rule.match_len(text, pos).map(|len| (rule, pos + len)))
    }
}

impl Tokenizer for RuleLexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn lex<'t>(&self, text: &'t str) -> Result<Vec<Token<'t>>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        // Start of the pending run of unclaimed text
        let mut plain = 0;

        while pos < text.len() {
            match self.match_at(text, pos) {
                Some((rule, end)) => {
                    if plain < pos {
                        tokens.push(Token::new(TokenKind::TEXT, &text[plain..pos]));
                    }
                    tokens.push(Token::new(rule.kind.clone(), &text[pos..end]));
                    pos = end;
                    plain = end;
                }
                None => {
                    // Skip one character, staying on a UTF-8 boundary
                    pos += text[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        if plain < text.len() {
            tokens.push(Token::new(TokenKind::TEXT, &text[plain..]));
        }

        Ok(tokens)
    }
}
