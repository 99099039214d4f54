//! The rule language
//!
//! Inference rules are loaded from a text table addressed by path keys
//! such as `rules.nal1`. A block holds one rule per line, either
//! one-premise (`P |- C .name`) or two-premise (`{P1. P2} |- C .name`),
//! with a trailing `'` marking an inverse variant. Patterns are built from
//! atoms, variables, statements, and negation.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

use crate::term::Copula;

/// A malformed rule table or rule line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("unknown rule block: {0}")]
    UnknownBlock(String),

    #[error("rule line outside any block: {0}")]
    NoBlock(String),

    #[error("malformed rule line: {0}")]
    MalformedLine(String),

    #[error("malformed pattern: {0}")]
    BadPattern(String),
}

/// A term pattern of the rule language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A concrete atom that must match literally.
    Atom(SmartString<LazyCompact>),

    /// A rule variable; any identifier whose first non-prefix character
    /// is uppercase.
    Var(SmartString<LazyCompact>),

    /// A statement pattern over one of the rule-language copulas.
    Statement {
        copula: Copula,
        subject: Box<Pattern>,
        predicate: Box<Pattern>,
    },

    /// A negation pattern `(--, X)`.
    Negation(Box<Pattern>),
}

/// Whether a token is a rule variable (`^[?$]?[A-Z][A-Za-z0-9_]*$`).
pub fn is_variable_token(token: &str) -> bool {
    let rest = token
        .strip_prefix(['?', '$'])
        .unwrap_or(token);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_atom_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The copulas the rule language can pattern over.
const RULE_COPULAS: [&str; 3] = ["-->", "<->", "==>"];

/// Find a top-level copula in a statement body.
fn find_copula(body: &str) -> Option<(Copula, usize)> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        let rest = &body[i..];
        if let Some(symbol) = RULE_COPULAS.iter().find(|c| rest.starts_with(**c)) {
            if depth == 0 {
                return Some((Copula::from_symbol(symbol)?, i));
            }
            i += symbol.len();
            continue;
        }
        match bytes[i] {
            b'<' | b'(' => depth += 1,
            b'>' | b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    None
}

impl Pattern {
    /// Parse a pattern from its textual form.
    pub fn parse(input: &str) -> Result<Pattern, RuleError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(RuleError::BadPattern(input.to_string()));
        }
        if s.starts_with('<') && s.ends_with('>') {
            let inner = &s[1..s.len() - 1];
            let (copula, pos) =
                find_copula(inner).ok_or_else(|| RuleError::BadPattern(input.to_string()))?;
            let subject = Pattern::parse(&inner[..pos])?;
            let predicate = Pattern::parse(&inner[pos + 3..])?;
            return Ok(Pattern::Statement {
                copula,
                subject: Box::new(subject),
                predicate: Box::new(predicate),
            });
        }
        if s.starts_with('(') && s.ends_with(')') {
            let inner = s[1..s.len() - 1].trim();
            if let Some(rest) = inner.strip_prefix("--") {
                let rest = rest
                    .trim_start()
                    .strip_prefix(',')
                    .ok_or_else(|| RuleError::BadPattern(input.to_string()))?;
                return Ok(Pattern::Negation(Box::new(Pattern::parse(rest)?)));
            }
            return Err(RuleError::BadPattern(input.to_string()));
        }
        if is_variable_token(s) {
            return Ok(Pattern::Var(SmartString::from(s)));
        }
        if is_atom_token(s) {
            return Ok(Pattern::Atom(SmartString::from(s)));
        }
        Err(RuleError::BadPattern(input.to_string()))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Atom(name) => write!(f, "{}", name),
            Pattern::Var(name) => write!(f, "{}", name),
            Pattern::Statement {
                copula,
                subject,
                predicate,
            } => write!(f, "<{} {} {}>", subject, copula.symbol(), predicate),
            Pattern::Negation(inner) => write!(f, "(--, {})", inner),
        }
    }
}

/// A single inference rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// One or two premise patterns.
    pub premises: Vec<Pattern>,

    /// The conclusion template.
    pub conclusion: Pattern,

    /// Rule name, as used by the guards.
    pub name: String,

    /// Whether the rule is the inverse variant of its name.
    pub primed: bool,
}

impl Rule {
    /// Parse one rule line.
    pub fn parse(line: &str) -> Result<Rule, RuleError> {
        let (lhs, rhs) = line
            .split_once("|-")
            .ok_or_else(|| RuleError::MalformedLine(line.to_string()))?;
        let lhs = lhs.trim();
        let rhs = rhs.trim();

        let premises = if lhs.starts_with('{') && lhs.ends_with('}') {
            let inner = &lhs[1..lhs.len() - 1];
            let parts: Vec<&str> = inner
                .split('.')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            if parts.len() != 2 {
                return Err(RuleError::MalformedLine(line.to_string()));
            }
            vec![Pattern::parse(parts[0])?, Pattern::parse(parts[1])?]
        } else {
            vec![Pattern::parse(lhs)?]
        };

        let dot = rhs
            .rfind('.')
            .ok_or_else(|| RuleError::MalformedLine(line.to_string()))?;
        let conclusion = Pattern::parse(&rhs[..dot])?;
        let mut name = rhs[dot + 1..].trim().to_string();
        let primed = name.ends_with('\'');
        if primed {
            name.pop();
        }
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RuleError::MalformedLine(line.to_string()));
        }

        Ok(Rule {
            premises,
            conclusion,
            name,
            primed,
        })
    }

    /// The rule's label in explanations: its name, primed for inverses.
    pub fn label(&self) -> String {
        if self.primed {
            format!("{}'", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// A parsed rule table: blocks of rules addressed by path keys.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    blocks: IndexMap<String, Vec<Rule>>,
}

impl RuleTable {
    /// Parse a whole table. Loading is atomic per block: a bad line
    /// fails the parse naming the offending line.
    pub fn parse(text: &str) -> Result<RuleTable, RuleError> {
        let mut blocks: IndexMap<String, Vec<Rule>> = IndexMap::new();
        let mut current: Option<String> = None;
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('\'') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                let key = line[1..line.len() - 1].trim().to_string();
                blocks.entry(key.clone()).or_default();
                current = Some(key);
                continue;
            }
            let block = current
                .clone()
                .ok_or_else(|| RuleError::NoBlock(line.to_string()))?;
            let rule = Rule::parse(line)?;
            blocks.entry(block).or_default().push(rule);
        }
        Ok(RuleTable { blocks })
    }

    /// The rule table shipped with the crate.
    pub fn builtin() -> &'static RuleTable {
        static TABLE: OnceLock<RuleTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            RuleTable::parse(include_str!("nal.rules")).expect("builtin rule table parses")
        })
    }

    /// The rules of one block.
    pub fn block(&self, key: &str) -> Option<&[Rule]> {
        self.blocks.get(key).map(Vec::as_slice)
    }

    /// The available block keys, in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_tokens() {
        assert!(is_variable_token("S"));
        assert!(is_variable_token("M1"));
        assert!(is_variable_token("$X"));
        assert!(is_variable_token("?Y"));
        assert!(!is_variable_token("bird"));
        assert!(!is_variable_token("_S"));
        assert!(!is_variable_token(""));
    }

    #[test]
    fn test_parse_statement_pattern() {
        let p = Pattern::parse("<S --> P>").unwrap();
        match p {
            Pattern::Statement {
                copula,
                subject,
                predicate,
            } => {
                assert_eq!(copula, Copula::Inheritance);
                assert_eq!(*subject, Pattern::Var("S".into()));
                assert_eq!(*predicate, Pattern::Var("P".into()));
            }
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_negation_pattern() {
        let p = Pattern::parse("<(--, P) ==> (--, S)>").unwrap();
        match p {
            Pattern::Statement {
                copula, subject, ..
            } => {
                assert_eq!(copula, Copula::Implication);
                assert_eq!(*subject, Pattern::Negation(Box::new(Pattern::Var("P".into()))));
            }
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn test_parse_two_premise_rule() {
        let rule = Rule::parse("{<M --> P>. <S --> M>} |- <S --> P> .deduction").unwrap();
        assert_eq!(rule.premises.len(), 2);
        assert_eq!(rule.name, "deduction");
        assert!(!rule.primed);
        assert_eq!(rule.label(), "deduction");
    }

    #[test]
    fn test_parse_primed_rule() {
        let rule = Rule::parse("<P --> S> |- <S --> P> .conversion'").unwrap();
        assert_eq!(rule.premises.len(), 1);
        assert_eq!(rule.name, "conversion");
        assert!(rule.primed);
        assert_eq!(rule.label(), "conversion'");
    }

    #[test]
    fn test_malformed_lines() {
        assert!(Rule::parse("<S --> P> .noentail").is_err());
        assert!(Rule::parse("{<M --> P>} |- <S --> P> .lonely").is_err());
        assert!(Rule::parse("<S --> P> |- <P --> S>").is_err());
    }

    #[test]
    fn test_table_blocks_and_comments() {
        let table = RuleTable::parse(
            "# a comment\n' another comment\n[rules.test]\n<P --> S> |- <S --> P> .conversion\n",
        )
        .unwrap();
        assert_eq!(table.block("rules.test").unwrap().len(), 1);
        assert!(table.block("rules.other").is_none());
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["rules.test"]);
    }

    #[test]
    fn test_rule_outside_block_fails() {
        let err = RuleTable::parse("<P --> S> |- <S --> P> .conversion\n").unwrap_err();
        assert!(matches!(err, RuleError::NoBlock(_)));
    }

    #[test]
    fn test_builtin_table_has_expected_blocks() {
        let table = RuleTable::builtin();
        assert!(table.block("rules.immediate").is_some());
        assert!(table.block("rules.nal1").is_some());
        assert_eq!(table.block("rules.nal1").unwrap().len(), 4);
    }
}
