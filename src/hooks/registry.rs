use std::collections::{BTreeMap, BTreeSet};

use super::TrackedHook;

/// Set of (package, target) pairs keyed by package.
///
/// Both levels are ordered, so [`HookRegistry::serialize`] is a plain walk
/// and always comes out sorted by package, then target.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HookRegistry {
    hooks: BTreeMap<String, BTreeSet<String>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts the pair. Adding a pair that's already present does nothing.
    pub fn add(&mut self, pkg: &str, target: &str) {
        match self.hooks.get_mut(pkg) {
            Some(targets) => {
                if !targets.contains(target) {
                    targets.insert(target.to_owned());
                }
            }
            None => {
                self.hooks
                    .insert(pkg.to_owned(), BTreeSet::from([target.to_owned()]));
            }
        }
    }

    pub fn has(&self, pkg: &str, target: &str) -> bool {
        self.hooks
            .get(pkg)
            .map_or(false, |targets| targets.contains(target))
    }

    /// Drops the pair, returning whether it was present
    pub fn remove(&mut self, pkg: &str, target: &str) -> bool {
        let Some(targets) = self.hooks.get_mut(pkg) else {
            return false;
        };

        let removed = targets.remove(target);
        if targets.is_empty() {
            self.hooks.remove(pkg);
        }

        removed
    }

    pub fn clear(&mut self) {
        self.hooks.clear();
    }

    /// Total number of distinct pairs across all packages
    pub fn len(&self) -> usize {
        self.hooks.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(pkg, target)` in sorted order without allocating
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.hooks.iter().flat_map(|(pkg, targets)| {
            targets
                .iter()
                .map(move |target| (pkg.as_str(), target.as_str()))
        })
    }

    /// Flattens the table into a sorted list of [`TrackedHook`]s
    pub fn serialize(&self) -> Vec<TrackedHook> {
        self.iter()
            .map(|(pkg, target)| TrackedHook {
                pkg: pkg.to_owned(),
                target: target.to_owned(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    fn tracked(pkg: &str, target: &str) -> TrackedHook {
        TrackedHook {
            pkg: pkg.to_owned(),
            target: target.to_owned(),
        }
    }

    #[test]
    fn add_is_idempotent() {
        let mut registry = HookRegistry::new();
        registry.add("pkgA", "f1");
        let once = registry.serialize();
        registry.add("pkgA", "f1");

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.serialize(), once);
        assert_eq!(registry.serialize(), vec![tracked("pkgA", "f1")]);
    }

    #[test]
    fn serialize_sorts_by_package_first() {
        let mut registry = HookRegistry::new();
        registry.add("b", "y");
        registry.add("a", "z");

        assert_eq!(
            registry.serialize(),
            vec![tracked("a", "z"), tracked("b", "y")]
        );
    }

    #[test]
    fn serialize_is_case_sensitive() {
        let mut registry = HookRegistry::new();
        registry.add("pkg", "b");
        registry.add("pkg", "B");
        registry.add("Pkg", "a");

        assert_eq!(
            registry.serialize(),
            vec![tracked("Pkg", "a"), tracked("pkg", "B"), tracked("pkg", "b")]
        );
    }

    #[test]
    fn has_handles_unknown_packages() {
        let mut registry = HookRegistry::new();
        assert!(!registry.has("nope", "f"));

        registry.add("pkg", "f");
        assert!(registry.has("pkg", "f"));
        assert!(!registry.has("pkg", "g"));
        assert!(!registry.has("nope", "f"));
    }

    #[test]
    fn remove_drops_empty_packages() {
        let mut registry = HookRegistry::new();
        registry.add("fs", "open");
        registry.add("fs", "close");

        assert!(registry.remove("fs", "open"));
        assert!(!registry.remove("fs", "open"));
        assert!(!registry.remove("zlib", "inflate"));
        assert_eq!(registry.serialize(), vec![tracked("fs", "close")]);

        assert!(registry.remove("fs", "close"));
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut registry = HookRegistry::new();
        registry.add("a", "1");
        registry.add("a", "2");
        registry.add("b", "1");
        assert_eq!(registry.len(), 3);

        registry.clear();

        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(registry.serialize().is_empty());
        assert!(!registry.has("a", "1"));
        assert!(!registry.has("b", "1"));
    }

    #[test]
    fn random_additions_stay_sorted_and_counted() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let packages = ["fs", "path", "Buffer", "child_process", "zlib"];
        let targets = ["open", "join", "from", "exec", "inflate", "Open"];

        for _ in 0..50 {
            let mut registry = HookRegistry::new();
            let mut expected = BTreeSet::new();

            for _ in 0..rng.gen_range(0..40) {
                let pkg = packages.choose(&mut rng).unwrap();
                let target = targets.choose(&mut rng).unwrap();
                registry.add(pkg, target);
                expected.insert(tracked(pkg, target));
            }

            let serialized = registry.serialize();
            assert_eq!(registry.len(), expected.len());
            assert_eq!(serialized, expected.into_iter().collect::<Vec<_>>());
            assert_eq!(serialized, registry.serialize());
        }
    }
}
