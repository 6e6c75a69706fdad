//! Profile expressions used by `config.activate.on-profile`.
//!
//! Grammar:
//!
//! ```text
//! list    := op ( ',' op )*          any of the listed operands
//! op      := unary ( '&' unary )*
//!          | unary ( '|' unary )*
//! unary   := '!' unary | '(' list ')' | name
//! ```
//!
//! `&` and `|` cannot be mixed without parentheses.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Result};
use crate::keys;
use crate::profiles::ProfileSet;

/// A parsed profile expression.
///
/// # Examples
///
/// ```
/// use stratum::profiles::{ProfileExpression, ProfileSet};
///
/// let expr = ProfileExpression::parse("prod & !eu").unwrap();
/// let profiles = ProfileSet::new(vec!["prod".into()], vec![]);
/// assert!(expr.matches(&profiles));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileExpression {
    /// A single profile name.
    Profile(String),
    /// Negation.
    Not(Box<ProfileExpression>),
    /// Every operand matches.
    All(Vec<ProfileExpression>),
    /// At least one operand matches.
    Any(Vec<ProfileExpression>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Not,
    And,
    Or,
    Comma,
    Open,
    Close,
}

impl ProfileExpression {
    /// Parse an expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the expression is empty or malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(malformed(text, "expression is empty"));
        }
        let mut parser = Parser {
            text,
            tokens,
            pos: 0,
        };
        let expr = parser.list()?;
        if parser.pos != parser.tokens.len() {
            return Err(malformed(text, "unexpected trailing input"));
        }
        Ok(expr)
    }

    /// Evaluate against the accepted profiles of a profile set.
    #[must_use]
    pub fn matches(&self, profiles: &ProfileSet) -> bool {
        self.matches_with(&|name| profiles.is_accepted(name))
    }

    /// Evaluate with a custom profile predicate.
    pub fn matches_with<F>(&self, accepted: &F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Self::Profile(name) => accepted(name),
            Self::Not(inner) => !inner.matches_with(accepted),
            Self::All(items) => items.iter().all(|e| e.matches_with(accepted)),
            Self::Any(items) => items.iter().any(|e| e.matches_with(accepted)),
        }
    }
}

impl fmt::Display for ProfileExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[ProfileExpression], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, ")")
        }

        match self {
            Self::Profile(name) => write!(f, "{name}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::All(items) => join(f, items, "&"),
            Self::Any(items) => join(f, items, "|"),
        }
    }
}

fn malformed(text: &str, reason: &str) -> Error {
    Error::Binding {
        name: keys::ACTIVATE_ON_PROFILE.to_string(),
        message: format!("malformed profile expression '{text}': {reason}"),
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<Chars<'_>> = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        let token = match c {
            '!' => Token::Not,
            '&' => Token::And,
            '|' => Token::Or,
            ',' => Token::Comma,
            '(' => Token::Open,
            ')' => Token::Close,
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            _ => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || "!&|,()".contains(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                tokens.push(Token::Name(name));
                continue;
            }
        };
        chars.next();
        tokens.push(token);
    }
    tokens
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn list(&mut self) -> Result<ProfileExpression> {
        let mut items = vec![self.operation()?];
        while self.peek() == Some(&Token::Comma) {
            self.next();
            items.push(self.operation()?);
        }
        Ok(collapse(items, ProfileExpression::Any))
    }

    fn operation(&mut self) -> Result<ProfileExpression> {
        let mut items = vec![self.unary()?];
        let mut operator: Option<Token> = None;
        while let Some(token @ (Token::And | Token::Or)) = self.peek().cloned() {
            match &operator {
                Some(existing) if *existing != token => {
                    return Err(malformed(
                        self.text,
                        "'&' and '|' must not be mixed without parentheses",
                    ));
                }
                _ => operator = Some(token),
            }
            self.next();
            items.push(self.unary()?);
        }
        Ok(match operator {
            Some(Token::Or) => collapse(items, ProfileExpression::Any),
            _ => collapse(items, ProfileExpression::All),
        })
    }

    fn unary(&mut self) -> Result<ProfileExpression> {
        match self.next() {
            Some(Token::Not) => Ok(ProfileExpression::Not(Box::new(self.unary()?))),
            Some(Token::Open) => {
                let inner = self.list()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(malformed(self.text, "missing ')'")),
                }
            }
            Some(Token::Name(name)) => Ok(ProfileExpression::Profile(name)),
            Some(_) => Err(malformed(self.text, "expected a profile name")),
            None => Err(malformed(self.text, "unexpected end of expression")),
        }
    }
}

fn collapse(
    mut items: Vec<ProfileExpression>,
    build: fn(Vec<ProfileExpression>) -> ProfileExpression,
) -> ProfileExpression {
    if items.len() == 1 {
        items.remove(0)
    } else {
        build(items)
    }
}
