//! `showIf` rules: lexing, parsing and evaluation.
//!
//! A rule reads `<source> <op> <value>[|<value>...]`, for example
//! `country == LT|LV` or `age >= 18`. It holds when the source field's value
//! compares true against any of the listed values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use logos::Logos;

/// Rule token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Operators (longest match wins, so `===` beats `==`) ──────────
    #[token("===")]
    StrictEq,

    #[token("==")]
    Eq,

    #[token("!==")]
    StrictNe,

    #[token("!=")]
    Ne,

    #[token("<=")]
    Le,

    #[token("<")]
    Lt,

    #[token(">=")]
    Ge,

    #[token(">")]
    Gt,

    // ── Operands ─────────────────────────────────────────────────────
    #[token("|")]
    Pipe,

    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    #[regex(r"'[^']*'")]
    SingleQuoted,

    /// Bare word: field names, numbers, unquoted values.
    #[regex(r#"[^ \t\n\r\f|=!<>'"]+"#)]
    Word,
}

/// Comparison operator of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Eq | Token::StrictEq => CompareOp::Eq,
            Token::Ne | Token::StrictNe => CompareOp::Ne,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn test(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from rule parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConditionError {
    #[error("empty condition")]
    Empty,
    #[error("invalid character at byte {position}")]
    InvalidToken { position: usize },
    #[error("expected field name at byte {position}, found `{found}`")]
    ExpectedSource { position: usize, found: String },
    #[error("expected comparison operator after `{source_name}`")]
    ExpectedOperator { source_name: String },
    #[error("expected value at byte {position}")]
    ExpectedValue { position: usize },
    #[error("unexpected `{found}` at byte {position}")]
    UnexpectedToken { position: usize, found: String },
}

/// A parsed `showIf` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Name of the field whose value is tested.
    pub source: String,
    pub op: CompareOp,
    /// Alternatives; the rule holds if any one matches.
    pub values: Vec<String>,
}

struct Spanned {
    token: Token,
    text: String,
    start: usize,
}

impl Condition {
    pub fn parse(input: &str) -> Result<Self, ConditionError> {
        let tokens = lex(input)?;
        let mut iter = tokens.into_iter().peekable();

        let source = match iter.next() {
            None => return Err(ConditionError::Empty),
            Some(Spanned { token: Token::Word, text, .. }) => text,
            Some(other) => {
                return Err(ConditionError::ExpectedSource {
                    position: other.start,
                    found: other.text,
                })
            }
        };

        let op = iter
            .next()
            .and_then(|t| CompareOp::from_token(&t.token))
            .ok_or_else(|| ConditionError::ExpectedOperator {
                source_name: source.clone(),
            })?;

        let mut values = Vec::new();
        let mut position = input.len();
        loop {
            match iter.next() {
                Some(tok) => {
                    position = tok.start;
                    match operand(&tok) {
                        Some(value) => values.push(value),
                        None => return Err(ConditionError::ExpectedValue { position }),
                    }
                }
                None => return Err(ConditionError::ExpectedValue { position }),
            }
            match iter.next() {
                None => break,
                Some(Spanned { token: Token::Pipe, start, .. }) => position = start + 1,
                Some(other) => {
                    return Err(ConditionError::UnexpectedToken {
                        position: other.start,
                        found: other.text,
                    })
                }
            }
        }

        Ok(Self { source, op, values })
    }

    /// Test the rule against the source field's current value.
    ///
    /// Each alternative compares numerically when both sides parse as
    /// numbers, and as plain strings otherwise.
    pub fn evaluate(&self, value: &str) -> bool {
        self.values
            .iter()
            .any(|expected| self.op.test(compare(value, expected)))
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.op, self.values.join("|"))
    }
}

fn lex(input: &str) -> Result<Vec<Spanned>, ConditionError> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.map_err(|_| ConditionError::InvalidToken { position: span.start })?;
        tokens.push(Spanned {
            token,
            text: lexer.slice().to_owned(),
            start: span.start,
        });
    }
    Ok(tokens)
}

fn operand(tok: &Spanned) -> Option<String> {
    match tok.token {
        Token::Word => Some(tok.text.clone()),
        Token::DoubleQuoted | Token::SingleQuoted => Some(tok.text[1..tok.text.len() - 1].to_owned()),
        _ => None,
    }
}

fn compare(actual: &str, expected: &str) -> Ordering {
    match (parse_number(actual), parse_number(expected)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Less),
        _ => actual.cmp(expected),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
