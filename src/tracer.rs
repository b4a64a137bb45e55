//! Stand-ins for comparison operators at instrumented sites.
//!
//! Each function evaluates the comparison exactly as the raw operator would
//! and, on the side, hands the operands to the engine so it can steer
//! mutation toward flipping the branch. The side channel never changes the
//! returned value.

use crate::{
    compare::{compare_numbers, compare_strings, integral, EqualityOperator, Operator, TracedValue},
    error::TraceError,
    feedback::CompareFeedback,
};

/// Tracing front-end bound to a feedback channel
pub struct ComparisonTracer<'a, F: CompareFeedback + ?Sized> {
    feedback: &'a mut F,
}

impl<'a, F: CompareFeedback + ?Sized> ComparisonTracer<'a, F> {
    pub fn new(feedback: &'a mut F) -> Self {
        ComparisonTracer { feedback }
    }

    /// Traced string `==`, `===`, `!=` or `!==`.
    ///
    /// The engine only hears about the comparison when the two strings
    /// differ and neither is empty. That holds for all four operators: for
    /// `!=` it is the `true` branch being reported, since the point is to
    /// push the input toward making the strings equal.
    pub fn trace_equality(&mut self, a: &str, b: &str, op: EqualityOperator, id: usize) -> bool {
        let result = compare_strings(a, b, op);
        let unequal = if op.is_negated() { result } else { !result };

        if unequal && !a.is_empty() && !b.is_empty() {
            self.feedback.trace_unequal_strings(id, a, b);
        }

        result
    }

    /// [`ComparisonTracer::trace_equality`] for call sites that still carry
    /// the operator as its source symbol.
    pub fn trace_equality_symbol(
        &mut self,
        a: &str,
        b: &str,
        symbol: &str,
        id: usize,
    ) -> Result<bool, TraceError> {
        let op = symbol.parse::<EqualityOperator>()?;
        Ok(self.trace_equality(a, b, op, id))
    }

    /// Traced numeric comparison.
    ///
    /// Integer operands are always reported, before the operator is
    /// evaluated and regardless of the outcome.
    pub fn trace_numeric(&mut self, a: f64, b: f64, op: Operator, id: usize) -> bool {
        if let (Some(a), Some(b)) = (integral(a), integral(b)) {
            self.feedback.trace_integer_compare(id, a, b);
        }

        compare_numbers(a, b, op)
    }

    /// [`ComparisonTracer::trace_numeric`] for call sites that still carry
    /// the operator as its source symbol. An unknown symbol is reported
    /// before anything is traced.
    pub fn trace_numeric_symbol(
        &mut self,
        a: f64,
        b: f64,
        symbol: &str,
        id: usize,
    ) -> Result<bool, TraceError> {
        let op = symbol.parse::<Operator>()?;
        Ok(self.trace_numeric(a, b, op, id))
    }

    /// Reports `current` against the constant `target` and hands `target`
    /// back untouched.
    ///
    /// Two integral numbers go out as an integer comparison, two strings as
    /// an unequal-strings event (with no equality check: the site compares
    /// against a literal and always wants it surfaced). Any other pairing is
    /// dropped.
    pub fn trace_and_return(
        &mut self,
        current: &TracedValue,
        target: TracedValue,
        id: usize,
    ) -> TracedValue {
        match (current, &target) {
            (TracedValue::Text(current), TracedValue::Text(target)) => {
                self.feedback.trace_unequal_strings(id, current, target);
            }
            _ if current.is_numeric() && target.is_numeric() => {
                if let (Some(current), Some(target)) = (current.as_integer(), target.as_integer()) {
                    self.feedback.trace_integer_compare(id, current, target);
                }
            }
            _ => {}
        }

        target
    }
}
