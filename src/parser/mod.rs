//! Narsese parser
//!
//! Turns Narsese text into tasks: `[budget] sentence`, with the sentence
//! grammar `<term copula term> punctuation [tense] [truth]`. The grammar
//! lives in `narsese.pest`; this module builds terms, truths, budgets,
//! and stamps out of the parse tree and fills in the punctuation
//! defaults.

use pest::iterators::Pair;
use pest::Parser as _;
use pest_derive::Parser;
use thiserror::Error;

use crate::budget::Budget;
use crate::config::{
    Params, DEFAULT_JUDGMENT_CONFIDENCE, DEFAULT_JUDGMENT_DURABILITY, DEFAULT_JUDGMENT_PRIORITY,
    DEFAULT_QUESTION_DURABILITY, DEFAULT_QUESTION_PRIORITY, HORIZON,
};
use crate::stamp::{Stamp, Tense};
use crate::task::{Punctuation, Sentence, Task, TaskType};
use crate::term::{Connector, Copula, Term, VarKind};
use crate::time::Clock;
use crate::truth::Truth;

#[derive(Parser)]
#[grammar = "parser/narsese.pest"]
struct NarseseParser;

/// Malformed Narsese input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("invalid number: {0}")]
    Number(String),

    #[error("connector {connector} cannot take {count} components")]
    Arity { connector: String, count: usize },
}

/// Parse a full Narsese input line into a task.
pub fn parse_task(input: &str, clock: &Clock, params: &Params) -> Result<Task, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut pairs = NarseseParser::parse(Rule::task, input)
        .map_err(|e| ParseError::Syntax(e.to_string()))?;
    let task_pair = pairs.next().expect("task rule matched");

    let mut budget_values: Vec<f32> = Vec::new();
    let mut term = None;
    let mut punctuation = Punctuation::Judgment;
    let mut tense = Tense::None;
    let mut truth_values: Vec<f32> = Vec::new();

    for pair in task_pair.into_inner() {
        match pair.as_rule() {
            Rule::budget => budget_values = numbers(pair)?,
            Rule::sentence => {
                for part in pair.into_inner() {
                    match part.as_rule() {
                        Rule::punctuation => {
                            punctuation = match part.as_str() {
                                "." => Punctuation::Judgment,
                                "?" => Punctuation::Question,
                                _ => Punctuation::Goal,
                            }
                        }
                        Rule::tense => {
                            tense = match part.as_str() {
                                ":/:" => Tense::Future,
                                ":|:" => Tense::Present,
                                ":\\:" => Tense::Past,
                                _ => Tense::Eternal,
                            }
                        }
                        Rule::truth => truth_values = numbers(part)?,
                        _ => term = Some(build_term(part)?),
                    }
                }
            }
            Rule::EOI => {}
            _ => {}
        }
    }

    let term = term.ok_or_else(|| ParseError::Syntax("missing term".to_string()))?;
    let stamp = Stamp::input(clock, tense, params.duration);

    let truth = {
        let frequency = truth_values.first().copied().unwrap_or(1.0).clamp(0.0, 1.0);
        let confidence = truth_values
            .get(1)
            .copied()
            .unwrap_or(DEFAULT_JUDGMENT_CONFIDENCE)
            .clamp(0.0, 1.0);
        let horizon = truth_values.get(2).copied().unwrap_or(HORIZON);
        Truth::with_horizon(frequency, confidence, horizon)
    };

    let (sentence, default_budget) = match punctuation {
        Punctuation::Judgment => (
            Sentence::judgment(term, truth, stamp),
            (
                DEFAULT_JUDGMENT_PRIORITY,
                DEFAULT_JUDGMENT_DURABILITY,
                truth.quality(),
            ),
        ),
        Punctuation::Goal => (
            Sentence::goal(term, truth, stamp),
            (
                DEFAULT_JUDGMENT_PRIORITY,
                DEFAULT_JUDGMENT_DURABILITY,
                truth.quality(),
            ),
        ),
        Punctuation::Question => (
            Sentence::question(term, stamp),
            (DEFAULT_QUESTION_PRIORITY, DEFAULT_QUESTION_DURABILITY, 1.0),
        ),
    };

    let budget = Budget::new(
        budget_values
            .first()
            .copied()
            .unwrap_or(default_budget.0)
            .clamp(0.0, 1.0),
        budget_values
            .get(1)
            .copied()
            .unwrap_or(default_budget.1)
            .clamp(0.0, 1.0),
        budget_values
            .get(2)
            .copied()
            .unwrap_or(default_budget.2)
            .clamp(0.0, 1.0),
    );

    Ok(Task::new(sentence, budget, TaskType::Input))
}

/// Parse a bare term; used by tests and inspection tools.
pub fn parse_term(input: &str) -> Result<Term, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut pairs = NarseseParser::parse(Rule::term_only, input)
        .map_err(|e| ParseError::Syntax(e.to_string()))?;
    let pair = pairs
        .next()
        .expect("term rule matched")
        .into_inner()
        .next()
        .expect("term content");
    build_term(pair)
}

fn numbers(pair: Pair<Rule>) -> Result<Vec<f32>, ParseError> {
    pair.into_inner()
        .map(|p| {
            p.as_str()
                .parse::<f32>()
                .map_err(|_| ParseError::Number(p.as_str().to_string()))
        })
        .collect()
}

fn build_term(pair: Pair<Rule>) -> Result<Term, ParseError> {
    match pair.as_rule() {
        Rule::atom => Ok(Term::atom(pair.as_str())),
        Rule::variable => {
            let text = pair.as_str();
            let kind = VarKind::from_prefix(text.chars().next().expect("variable prefix"))
                .expect("grammar admits only variable prefixes");
            Ok(Term::var(kind, &text[1..]))
        }
        Rule::statement => {
            let mut inner = pair.into_inner();
            let subject = build_term(inner.next().expect("statement subject"))?;
            let copula_text = inner.next().expect("statement copula").as_str();
            let copula = Copula::from_symbol(copula_text)
                .ok_or_else(|| ParseError::Syntax(copula_text.to_string()))?;
            let predicate = build_term(inner.next().expect("statement predicate"))?;
            Ok(Term::statement(copula, subject, predicate))
        }
        Rule::negation => {
            let mut inner = pair.into_inner();
            Ok(Term::negation(build_term(
                inner.next().expect("negated term"),
            )?))
        }
        Rule::compound => {
            let mut inner = pair.into_inner();
            let symbol = inner.next().expect("connector").as_str();
            let connector = Connector::from_symbol(symbol)
                .ok_or_else(|| ParseError::Syntax(symbol.to_string()))?;
            let components: Vec<Term> = inner.map(build_term).collect::<Result<_, _>>()?;
            if !connector.arity_ok(components.len()) {
                return Err(ParseError::Arity {
                    connector: symbol.to_string(),
                    count: components.len(),
                });
            }
            Ok(Term::compound(connector, components))
        }
        Rule::product => {
            let components: Vec<Term> =
                pair.into_inner().map(build_term).collect::<Result<_, _>>()?;
            Ok(Term::compound(Connector::Product, components))
        }
        Rule::set_ext => {
            let components: Vec<Term> =
                pair.into_inner().map(build_term).collect::<Result<_, _>>()?;
            Ok(Term::compound(Connector::SetExt, components))
        }
        Rule::set_int => {
            let components: Vec<Term> =
                pair.into_inner().map(build_term).collect::<Result<_, _>>()?;
            Ok(Term::compound(Connector::SetInt, components))
        }
        other => Err(ParseError::Syntax(format!("{:?}", other))),
    }
}
