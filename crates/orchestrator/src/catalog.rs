use crate::error::OrchestratorError;
use crate::state::{lock_read, lock_write};
use core_types::AggregationView;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A one-line description of a registered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
}

/// The current contents of every registered aggregation view.
///
/// Views are refreshed independently by whatever maintains them; each run copies
/// the views it needs at assembly time, so a run sees each view as it was then.
#[derive(Debug, Default)]
pub struct ViewCatalog {
    views: RwLock<BTreeMap<String, AggregationView>>,
}

impl ViewCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers views; a later view replaces an earlier one of the same name.
    pub fn from_views(views: impl IntoIterator<Item = AggregationView>) -> Self {
        let catalog = Self::new();
        for view in views {
            if let Some(previous) = catalog.upsert(view) {
                tracing::warn!(view = %previous.name, "Duplicate view definition replaced.");
            }
        }
        catalog
    }

    /// Adds or refreshes a view, returning the one it replaced.
    pub fn upsert(&self, view: AggregationView) -> Option<AggregationView> {
        lock_write(&self.views).insert(view.name.clone(), view)
    }

    pub fn remove(&self, name: &str) -> Option<AggregationView> {
        lock_write(&self.views).remove(name)
    }

    pub fn get(&self, name: &str) -> Option<AggregationView> {
        lock_read(&self.views).get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        lock_read(&self.views).keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock_read(&self.views).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_read(&self.views).is_empty()
    }

    pub fn summaries(&self) -> Vec<ViewSummary> {
        lock_read(&self.views)
            .values()
            .map(|view| ViewSummary {
                name: view.name.clone(),
                columns: view.schema.columns().map(str::to_string).collect(),
                row_count: view.rows.len(),
            })
            .collect()
    }

    /// Copies the named views in `order`, failing if any is missing or has a
    /// malformed schema.
    pub fn select(&self, order: &[String]) -> Result<Vec<AggregationView>, OrchestratorError> {
        let views = lock_read(&self.views);
        let mut selected = Vec::with_capacity(order.len());
        for name in order {
            let view = views.get(name).ok_or_else(|| {
                OrchestratorError::Configuration(format!(
                    "view '{}' is not registered (known views: {})",
                    name,
                    views.keys().cloned().collect::<Vec<_>>().join(", ")
                ))
            })?;
            view.validate()
                .map_err(|source| OrchestratorError::InvalidSchema {
                    view: name.clone(),
                    source,
                })?;
            selected.push(view.clone());
        }
        Ok(selected)
    }
}
