//! Pure comparison semantics, free of any tracing side effects.
//!
//! The tracer in [`crate::tracer`] evaluates operators through these
//! functions so that what a traced site returns is exactly what the untraced
//! operator would have returned.

use std::{fmt, str::FromStr};

use crate::error::TraceError;

/// The operators the string tracer accepts
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EqualityOperator {
    /// `==`
    Eq,
    /// `===`
    StrictEq,
    /// `!=`
    Neq,
    /// `!==`
    StrictNeq,
}

/// Every operator the numeric tracer accepts
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Eq,
    /// `===`
    StrictEq,
    /// `!=`
    Neq,
    /// `!==`
    StrictNeq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl EqualityOperator {
    pub const ALL: [EqualityOperator; 4] = [
        EqualityOperator::Eq,
        EqualityOperator::StrictEq,
        EqualityOperator::Neq,
        EqualityOperator::StrictNeq,
    ];

    pub fn symbol(self) -> &'static str {
        Operator::from(self).symbol()
    }

    /// Whether this operator yields `true` when its operands differ
    pub fn is_negated(self) -> bool {
        matches!(self, EqualityOperator::Neq | EqualityOperator::StrictNeq)
    }
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::StrictEq,
        Operator::Neq,
        Operator::StrictNeq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::StrictEq => "===",
            Operator::Neq => "!=",
            Operator::StrictNeq => "!==",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }
}

impl From<EqualityOperator> for Operator {
    fn from(op: EqualityOperator) -> Self {
        match op {
            EqualityOperator::Eq => Operator::Eq,
            EqualityOperator::StrictEq => Operator::StrictEq,
            EqualityOperator::Neq => Operator::Neq,
            EqualityOperator::StrictNeq => Operator::StrictNeq,
        }
    }
}

impl FromStr for Operator {
    type Err = TraceError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| TraceError::UnrecognizedOperator(symbol.to_owned()))
    }
}

impl FromStr for EqualityOperator {
    type Err = TraceError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        EqualityOperator::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| TraceError::UnrecognizedOperator(symbol.to_owned()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for EqualityOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A runtime value handed to [`crate::tracer::ComparisonTracer::trace_and_return`],
/// tagged with its type by the instrumentation.
#[derive(Debug, Clone, PartialEq)]
pub enum TracedValue {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Anything we have no way of reporting (objects, booleans, null, ...)
    Other,
}

impl TracedValue {
    /// Returns the value as an `i64` if it's a number with no fractional part
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TracedValue::Integer(value) => Some(*value),
            TracedValue::Float(value) => integral(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TracedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TracedValue::Integer(_) | TracedValue::Float(_))
    }
}

impl From<i64> for TracedValue {
    fn from(value: i64) -> Self {
        TracedValue::Integer(value)
    }
}

impl From<f64> for TracedValue {
    fn from(value: f64) -> Self {
        TracedValue::Float(value)
    }
}

impl From<&str> for TracedValue {
    fn from(value: &str) -> Self {
        TracedValue::Text(value.to_owned())
    }
}

impl From<String> for TracedValue {
    fn from(value: String) -> Self {
        TracedValue::Text(value)
    }
}

/// Returns `value` as an `i64` if it is finite and has no fractional part.
///
/// Values outside the `i64` range saturate, which is what the engine's
/// 64-bit comparison tables would see anyway.
pub fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Evaluates an equality operator over two strings. Loose and strict
/// equality agree when both sides are strings.
pub fn compare_strings(a: &str, b: &str, op: EqualityOperator) -> bool {
    match op {
        EqualityOperator::Eq | EqualityOperator::StrictEq => a == b,
        EqualityOperator::Neq | EqualityOperator::StrictNeq => a != b,
    }
}

/// Evaluates any operator over two numbers with IEEE 754 semantics: every
/// comparison against NaN is false except the inequalities.
pub fn compare_numbers(a: f64, b: f64, op: Operator) -> bool {
    match op {
        Operator::Eq | Operator::StrictEq => a == b,
        Operator::Neq | Operator::StrictNeq => a != b,
        Operator::Gt => a > b,
        Operator::Gte => a >= b,
        Operator::Lt => a < b,
        Operator::Lte => a <= b,
    }
}
