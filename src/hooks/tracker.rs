use serde::{Deserialize, Serialize};

use super::{HookIdentity, HookRegistry, TrackedHook};
use crate::report::DiagnosticReporter;

/// Snapshot of all three categories, in report order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSummary {
    pub not_applied: Vec<TrackedHook>,
    pub applied: Vec<TrackedHook>,
    pub available: Vec<TrackedHook>,
}

/// Tracks which hooks were installed, which could have been, and which were
/// asked for but matched nothing.
///
/// The three tables are independent. Registering the same hook as both
/// applied and available is the caller's mistake and isn't rejected here;
/// [`HookTracker::categorize_unknown`] is the only step that checks one table
/// against the others.
#[derive(Debug, Default, Clone)]
pub struct HookTracker {
    applied: HookRegistry,
    available: HookRegistry,
    not_applied: HookRegistry,
}

impl HookTracker {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_applied(&mut self, pkg: &str, target: &str) {
        self.applied.add(pkg, target);
    }

    pub fn add_available(&mut self, pkg: &str, target: &str) {
        self.available.add(pkg, target);
    }

    pub fn add_not_applied(&mut self, pkg: &str, target: &str) {
        self.not_applied.add(pkg, target);
    }

    /// Files every requested hook that is neither applied nor available
    /// under not-applied. Returns `self` so calls can be chained.
    pub fn categorize_unknown<'a, I>(&mut self, requested: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a HookIdentity>,
    {
        for hook in requested {
            if !self.applied.has(&hook.package, &hook.target)
                && !self.available.has(&hook.package, &hook.target)
            {
                self.not_applied.add(&hook.package, &hook.target);
            }
        }

        self
    }

    /// Drops not-applied entries that have since been reported as applied
    /// or available. Returns `self` so calls can be chained.
    pub fn prune_not_applied(&mut self) -> &mut Self {
        let resolved: Vec<(String, String)> = self
            .not_applied
            .iter()
            .filter(|(pkg, target)| {
                self.applied.has(pkg, target) || self.available.has(pkg, target)
            })
            .map(|(pkg, target)| (pkg.to_owned(), target.to_owned()))
            .collect();

        for (pkg, target) in resolved {
            self.not_applied.remove(&pkg, &target);
        }

        self
    }

    pub fn clear(&mut self) {
        self.applied.clear();
        self.available.clear();
        self.not_applied.clear();
    }

    pub fn applied(&self) -> Vec<TrackedHook> {
        self.applied.serialize()
    }

    pub fn available(&self) -> Vec<TrackedHook> {
        self.available.serialize()
    }

    pub fn not_applied(&self) -> Vec<TrackedHook> {
        self.not_applied.serialize()
    }

    pub(crate) fn applied_registry(&self) -> &HookRegistry {
        &self.applied
    }

    pub(crate) fn available_registry(&self) -> &HookRegistry {
        &self.available
    }

    pub(crate) fn not_applied_registry(&self) -> &HookRegistry {
        &self.not_applied
    }

    pub fn summary(&self) -> HookSummary {
        HookSummary {
            not_applied: self.not_applied(),
            applied: self.applied(),
            available: self.available(),
        }
    }

    /// Renders [`HookTracker::summary`] as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.summary())
    }

    /// Dumps the hook summary to stderr.
    ///
    /// # Panics
    ///
    /// Panics if stderr can't be written to.
    pub fn print(&self) {
        DiagnosticReporter::stderr()
            .summary(self)
            .expect("failed to write hook summary to stderr");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    fn id(pkg: &str, target: &str) -> HookIdentity {
        HookIdentity::new(pkg, target)
    }

    fn tracked(pkg: &str, target: &str) -> TrackedHook {
        TrackedHook {
            pkg: pkg.to_owned(),
            target: target.to_owned(),
        }
    }

    #[test]
    fn add_methods_fill_their_own_table() {
        let mut tracker = HookTracker::new();
        tracker.add_applied("fs", "open");
        tracker.add_available("path", "join");
        tracker.add_not_applied("zlib", "inflate");

        assert_eq!(tracker.applied(), vec![tracked("fs", "open")]);
        assert_eq!(tracker.available(), vec![tracked("path", "join")]);
        assert_eq!(tracker.not_applied(), vec![tracked("zlib", "inflate")]);
    }

    #[test]
    fn categorize_skips_known_hooks() {
        let mut tracker = HookTracker::new();
        tracker.add_applied("fs", "open");
        tracker.add_available("path", "join");

        let requested = [id("fs", "open"), id("path", "join"), id("zlib", "inflate")];
        tracker.categorize_unknown(&requested);

        assert_eq!(tracker.not_applied(), vec![tracked("zlib", "inflate")]);
        assert_eq!(tracker.applied(), vec![tracked("fs", "open")]);
        assert_eq!(tracker.available(), vec![tracked("path", "join")]);
    }

    #[test]
    fn categorize_chains() {
        let mut tracker = HookTracker::new();
        let first = [id("a", "1")];
        let second = [id("b", "2")];

        let count = tracker
            .categorize_unknown(&first)
            .categorize_unknown(&second)
            .not_applied()
            .len();

        assert_eq!(count, 2);
    }

    #[test]
    fn categorize_ignores_order_and_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut requested = vec![
            id("fs", "open"),
            id("fs", "open"),
            id("path", "join"),
            id("http", "request"),
            id("http", "request"),
            id("crypto", "randomBytes"),
        ];

        let mut baseline = HookTracker::new();
        baseline.add_applied("path", "join");
        baseline.categorize_unknown(&requested);
        let expected = baseline.not_applied();

        for _ in 0..20 {
            requested.shuffle(&mut rng);
            let mut tracker = HookTracker::new();
            tracker.add_applied("path", "join");
            tracker.categorize_unknown(&requested);
            assert_eq!(tracker.not_applied(), expected);
        }

        assert_eq!(
            expected,
            vec![
                tracked("crypto", "randomBytes"),
                tracked("fs", "open"),
                tracked("http", "request"),
            ]
        );
    }

    #[test]
    fn categorized_hooks_land_in_exactly_one_table() {
        let mut tracker = HookTracker::new();
        tracker.add_applied("a", "applied");
        tracker.add_available("a", "available");

        let requested = [id("a", "applied"), id("a", "available"), id("a", "missing")];
        tracker.categorize_unknown(&requested);

        for hook in &requested {
            let hits = [
                tracker.applied_registry(),
                tracker.available_registry(),
                tracker.not_applied_registry(),
            ]
            .iter()
            .filter(|registry| registry.has(&hook.package, &hook.target))
            .count();
            assert_eq!(hits, 1, "{hook} should be in exactly one table");
        }
    }

    #[test]
    fn prune_drops_hooks_applied_after_categorizing() {
        let mut tracker = HookTracker::new();
        let requested = [id("fs", "open"), id("path", "join"), id("zlib", "inflate")];
        tracker.categorize_unknown(&requested);

        tracker.add_applied("fs", "open");
        tracker.add_available("path", "join");
        tracker.prune_not_applied().categorize_unknown(&requested);

        assert_eq!(tracker.not_applied(), vec![tracked("zlib", "inflate")]);
        assert_eq!(tracker.applied(), vec![tracked("fs", "open")]);
        assert_eq!(tracker.available(), vec![tracked("path", "join")]);
    }

    #[test]
    fn clear_empties_all_tables() {
        let mut tracker = HookTracker::new();
        tracker.add_applied("a", "1");
        tracker.add_available("b", "2");
        tracker.add_not_applied("c", "3");

        tracker.clear();

        assert!(tracker.applied().is_empty());
        assert!(tracker.available().is_empty());
        assert!(tracker.not_applied().is_empty());
    }

    #[test]
    fn summary_round_trips_through_json() {
        let mut tracker = HookTracker::new();
        tracker.add_applied("fs", "open");
        tracker.add_not_applied("zlib", "inflate");

        let json = tracker.to_json().unwrap();
        let summary: HookSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(summary, tracker.summary());
        assert!(json.contains("\"pkg\": \"fs\""));
        assert!(json.contains("\"not_applied\""));
    }

    #[test]
    fn print_handles_empty_tracker() {
        HookTracker::new().print();
    }
}
