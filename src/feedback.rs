use std::collections::{BTreeSet, HashSet};

/// The engine's comparison feedback channel. Every traced comparison that is
/// worth reporting ends up in one of these two calls, tagged with the id of
/// the instrumentation site it came from.
pub trait CompareFeedback {
    /// Two strings were compared and turned out to differ
    fn trace_unequal_strings(&mut self, id: usize, a: &str, b: &str);

    /// Two integers were compared
    fn trace_integer_compare(&mut self, id: usize, a: i64, b: i64);
}

impl<F: CompareFeedback + ?Sized> CompareFeedback for &mut F {
    fn trace_unequal_strings(&mut self, id: usize, a: &str, b: &str) {
        (**self).trace_unequal_strings(id, a, b)
    }

    fn trace_integer_compare(&mut self, id: usize, a: i64, b: i64) {
        (**self).trace_integer_compare(id, a, b)
    }
}

impl<F: CompareFeedback + ?Sized> CompareFeedback for Box<F> {
    fn trace_unequal_strings(&mut self, id: usize, a: &str, b: &str) {
        (**self).trace_unequal_strings(id, a, b)
    }

    fn trace_integer_compare(&mut self, id: usize, a: i64, b: i64) {
        (**self).trace_integer_compare(id, a, b)
    }
}

/// In-process feedback channel that keeps every distinct operand pair it is
/// handed, per site.
#[derive(Debug, Default, Clone)]
pub struct ComparisonOperandMap {
    pub integers: BTreeSet<(usize, i64, i64)>,
    pub strings: HashSet<(usize, String, String)>,
}

impl ComparisonOperandMap {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn clear(&mut self) {
        self.integers.clear();
        self.strings.clear();
    }

    pub fn len(&self) -> usize {
        self.integers.len() + self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integers.is_empty() && self.strings.is_empty()
    }

    pub fn contains_strings(&self, id: usize, a: &str, b: &str) -> bool {
        self.strings.contains(&(id, a.to_owned(), b.to_owned()))
    }

    pub fn contains_integers(&self, id: usize, a: i64, b: i64) -> bool {
        self.integers.contains(&(id, a, b))
    }
}

impl CompareFeedback for ComparisonOperandMap {
    fn trace_unequal_strings(&mut self, id: usize, a: &str, b: &str) {
        self.strings.insert((id, a.to_owned(), b.to_owned()));
    }

    fn trace_integer_compare(&mut self, id: usize, a: i64, b: i64) {
        self.integers.insert((id, a, b));
    }
}
