//! Single binary arithmetic expressions
//!
//! Only `<number> <op> <number>` is recognized. The operands are parsed and
//! the result computed directly; nothing from the message is ever evaluated.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static ARITHMETIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*([+\-*/])\s*([0-9]+(?:\.[0-9]+)?)").expect("arithmetic pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        };
        f.write_str(symbol)
    }
}

/// One `lhs op rhs` expression found in a message
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub lhs: f64,
    pub op: Operator,
    pub rhs: f64,
    /// The expression exactly as it appeared in the message
    pub text: String,
}

impl BinaryExpression {
    /// The result, or `None` when it is not a finite number (division by zero)
    pub fn evaluate(&self) -> Option<f64> {
        let value = self.op.apply(self.lhs, self.rhs);
        value.is_finite().then_some(value)
    }
}

/// First binary expression in `message`, if any
pub fn parse_arithmetic(message: &str) -> Option<BinaryExpression> {
    let caps = ARITHMETIC_RE.captures(message)?;

    Some(BinaryExpression {
        lhs: caps.get(1)?.as_str().parse().ok()?,
        op: Operator::from_symbol(caps.get(2)?.as_str())?,
        rhs: caps.get(3)?.as_str().parse().ok()?,
        text: caps.get(0)?.as_str().to_string(),
    })
}

/// `42` rather than `42.0`, `2.5` stays `2.5`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub(crate) fn answer(expr: &BinaryExpression, value: f64) -> String {
    format!(
        "Hi! I'm Machan. Even offline, I can help with that calculation: {} = {}\n\n\
         This showcases the computational power I bring to our workflow automation platform!",
        expr.text,
        format_number(value)
    )
}
