//! Registered land variants and fallback resolution.

use std::collections::BTreeSet;

use super::direction::{variant_key, Direction};

/// Key used when a computed variant key has no registered variant.
pub const FALLBACK_KEY: &str = "X";

/// The set of land variant keys a project has artwork for.
///
/// Passed explicitly to whoever needs to resolve keys (serializer,
/// renderer, validation); there is no global table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTable {
    keys: BTreeSet<String>,
}

impl VariantTable {
    /// Table registering exactly the given keys.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// The "blob" keys: every neighbor set where a corner only appears
    /// together with both of its edges. The empty key is left out so that
    /// isolated tiles use the fallback, which leaves 46.
    pub fn blob() -> Self {
        let mut keys = BTreeSet::new();

        for mask in 0u16..256 {
            let present: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| mask & (1 << d.index()) != 0)
                .collect();

            let canonical = present.iter().all(|d| match d.corner_edges() {
                Some((a, b)) => present.contains(&a) && present.contains(&b),
                None => true,
            });

            if canonical && !present.is_empty() {
                keys.insert(variant_key(&present));
            }
        }

        Self { keys }
    }

    /// Whether a key has a registered variant.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// The key itself when registered, the fallback key otherwise.
    pub fn resolve<'a>(&self, key: &'a str) -> &'a str {
        if self.contains(key) {
            key
        } else {
            FALLBACK_KEY
        }
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no key is registered (everything resolves to fallback).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|s| s.as_str())
    }
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::blob()
    }
}
