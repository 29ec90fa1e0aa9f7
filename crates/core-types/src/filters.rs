use crate::enums::Dimension;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A snapshot of the active filter selections.
///
/// Each dimension maps to the set of values the user allowed. A dimension that
/// is absent, or present with an empty set, is unrestricted. Ordered maps keep
/// iteration (and therefore everything rendered from a snapshot) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    selections: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterState {
    /// An unrestricted snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterState::set`].
    pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(dimension, values);
        self
    }

    /// Replaces the allowed set for one dimension.
    pub fn set<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(dimension, values.into_iter().map(Into::into).collect());
    }

    /// Lifts the restriction on one dimension.
    pub fn clear(&mut self, dimension: Dimension) {
        self.selections.remove(&dimension);
    }

    /// The allowed set for `dimension`, or `None` when it is unrestricted.
    pub fn allowed(&self, dimension: Dimension) -> Option<&BTreeSet<String>> {
        self.selections.get(&dimension).filter(|values| !values.is_empty())
    }

    /// Whether `value` passes the restriction on `dimension`.
    pub fn permits(&self, dimension: Dimension, value: &str) -> bool {
        self.allowed(dimension)
            .is_none_or(|values| values.contains(value))
    }

    /// Every restricted dimension with its non-empty allowed set.
    pub fn restrictions(&self) -> impl Iterator<Item = (Dimension, &BTreeSet<String>)> {
        self.selections
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(dimension, values)| (*dimension, values))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.restrictions().next().is_none()
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return f.write_str("all data");
        }
        let parts: Vec<String> = self
            .restrictions()
            .map(|(dimension, values)| {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                format!("{} = {}", dimension, values.join(", "))
            })
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Anything that can hand the pipeline an immutable copy of the current selections.
pub trait FilterSource: Send + Sync {
    fn snapshot(&self) -> FilterState;
}

/// The live, shared selection edited by the filter widget.
///
/// Edits and snapshots are serialized by a lock, and a snapshot is an owned
/// copy, so an in-flight report never observes an edit made after it started.
#[derive(Debug, Default)]
pub struct LiveFilters {
    current: RwLock<FilterState>,
}

impl LiveFilters {
    pub fn new(initial: FilterState) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub fn set<I, S>(&self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(dimension, values);
    }

    pub fn replace(&self, state: FilterState) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn clear(&self) {
        self.replace(FilterState::new());
    }
}

impl FilterSource for LiveFilters {
    fn snapshot(&self) -> FilterState {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
