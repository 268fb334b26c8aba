//! Boolean formula parser and evaluator for normalized condition syntax.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! or      := and ("or" and)*
//! and     := unary ("and" unary)*
//! unary   := "not" unary | primary
//! primary := "(" or ")" | identifier
//! ```
//!
//! Identifiers are runs of alphanumeric characters, `_` and `-`.

use super::{ConditionError, ConditionResult};
use std::collections::{BTreeMap, BTreeSet};

/// Parsed boolean formula over tag identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Var(String),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
}

/// Variable assignment used to evaluate a formula.
pub type Assignment = BTreeMap<String, bool>;

impl Formula {
    /// Parses normalized condition syntax.
    pub fn parse(input: &str) -> ConditionResult<Self> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let formula = parser.parse_or()?;
        match parser.peek() {
            None => Ok(formula),
            Some(token) => Err(token.unexpected()),
        }
    }

    /// Returns every identifier referenced by the formula.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Var(name) => {
                out.insert(name.clone());
            }
            Self::Not(inner) => inner.collect_variables(out),
            Self::And(parts) | Self::Or(parts) => {
                for part in parts {
                    part.collect_variables(out);
                }
            }
        }
    }

    /// Builds the assignment for a set of true identifiers.
    ///
    /// Every referenced identifier starts as `false`; every identifier in
    /// `truths` is then set to `true`.
    pub fn assignment(&self, truths: &BTreeSet<String>) -> Assignment {
        let mut assignment: Assignment = self
            .variables()
            .into_iter()
            .map(|name| (name, false))
            .collect();
        for name in truths {
            assignment.insert(name.clone(), true);
        }
        assignment
    }

    /// Evaluates the formula; identifiers absent from `assignment` are false.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        match self {
            Self::Var(name) => assignment.get(name).copied().unwrap_or(false),
            Self::Not(inner) => !inner.evaluate(assignment),
            Self::And(parts) => parts.iter().all(|part| part.evaluate(assignment)),
            Self::Or(parts) => parts.iter().any(|part| part.evaluate(assignment)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Ident(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

impl Token {
    fn unexpected(&self) -> ConditionError {
        let text = match &self.kind {
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::And => "and".to_string(),
            TokenKind::Or => "or".to_string(),
            TokenKind::Not => "not".to_string(),
            TokenKind::Ident(name) => name.clone(),
        };
        ConditionError::UnexpectedToken {
            token: text,
            position: self.position,
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

fn tokenize(input: &str) -> ConditionResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        let kind = match ch {
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            c if is_ident_char(c) => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                match word.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    _ => TokenKind::Ident(word),
                }
            }
            other => {
                return Err(ConditionError::UnexpectedChar {
                    ch: other,
                    position,
                })
            }
        };
        tokens.push(Token { kind, position });
    }

    if tokens.is_empty() {
        return Err(ConditionError::Empty);
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|token| &token.kind) == Some(kind) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn parse_or(&mut self) -> ConditionResult<Formula> {
        let mut parts = vec![self.parse_and()?];
        while self.consume(&TokenKind::Or) {
            parts.push(self.parse_and()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Formula::Or(parts)
        })
    }

    fn parse_and(&mut self) -> ConditionResult<Formula> {
        let mut parts = vec![self.parse_unary()?];
        while self.consume(&TokenKind::And) {
            parts.push(self.parse_unary()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Formula::And(parts)
        })
    }

    fn parse_unary(&mut self) -> ConditionResult<Formula> {
        if self.consume(&TokenKind::Not) {
            return Ok(Formula::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ConditionResult<Formula> {
        let token = self.advance().ok_or(ConditionError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Ident(name) => Ok(Formula::Var(name)),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(other.unexpected()),
                    None => Err(ConditionError::UnexpectedEnd),
                }
            }
            _ => Err(token.unexpected()),
        }
    }
}
