//! # Vista Visibility Resolver
//!
//! Decides which rows of an aggregation view survive the current filter snapshot.
//!
//! ## Architectural Principles
//!
//! - **Pure Function:** [`resolve`] depends only on its two arguments. Nothing is cached,
//!   so a fresh snapshot always yields a fresh answer.
//! - **Declarative Predicates:** Membership is computed from the filter selections and
//!   the view's declared dimension columns, never from any display state.
//! - **Stable:** Output rows keep the view's original order.
//!
//! ## Public API
//!
//! - `resolve`: filter one view against one snapshot.
//! - `ViewPredicate`: the compiled per-view check, exposed for callers that test rows one by one.

use core_types::{AggregationView, Dimension, FilterState, ViewRow, ViewSchema, VisibleRow};
use std::collections::BTreeSet;

/// The restrictions of a snapshot that actually apply to one view's schema.
///
/// A restricted dimension the view has no column for is dropped: a view without
/// a `state` column always passes a state filter.
#[derive(Debug)]
pub struct ViewPredicate<'a> {
    checks: Vec<(usize, &'a BTreeSet<String>)>,
    ignored: Vec<Dimension>,
}

impl<'a> ViewPredicate<'a> {
    pub fn compile(schema: &ViewSchema, filters: &'a FilterState) -> Self {
        let mut checks = Vec::new();
        let mut ignored = Vec::new();
        for (dimension, allowed) in filters.restrictions() {
            match schema.dimension_index(dimension) {
                Some(index) => checks.push((index, allowed)),
                None => ignored.push(dimension),
            }
        }
        Self { checks, ignored }
    }

    /// A row passes when every applicable dimension value is in its allowed set.
    /// A row too short to carry a checked column never passes.
    pub fn matches(&self, row: &ViewRow) -> bool {
        self.checks.iter().all(|(index, allowed)| {
            row.dimensions
                .get(*index)
                .is_some_and(|value| allowed.contains(value))
        })
    }

    /// True when no restriction applies to this view at all.
    pub fn is_pass_through(&self) -> bool {
        self.checks.is_empty()
    }

    /// Restricted dimensions this view cannot be filtered by.
    pub fn ignored(&self) -> &[Dimension] {
        &self.ignored
    }
}

/// Returns the rows of `view` that satisfy `filters`, in their original order.
pub fn resolve(view: &AggregationView, filters: &FilterState) -> Vec<VisibleRow> {
    let predicate = ViewPredicate::compile(&view.schema, filters);
    if !predicate.ignored().is_empty() {
        tracing::trace!(
            view = %view.name,
            ignored = ?predicate.ignored(),
            "View has no column for some restricted dimensions; treating them as passing."
        );
    }

    let visible: Vec<VisibleRow> = view
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| predicate.matches(row))
        .map(|(source_index, row)| VisibleRow {
            source_index,
            row: row.clone(),
        })
        .collect();

    tracing::debug!(
        view = %view.name,
        total = view.rows.len(),
        visible = visible.len(),
        "Resolved visible rows."
    );
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CellValue, ViewRow};
    use rust_decimal_macros::dec;

    fn state_orders() -> AggregationView {
        AggregationView::new(
            "StateOrders",
            ViewSchema::new(["state", "segment"], ["orderCount"]),
        )
        .with_row(ViewRow::new(["California", "Consumer"], [412_i64]))
        .with_row(ViewRow::new(["Texas", "Corporate"], [208_i64]))
        .with_row(ViewRow::new(["California", "Corporate"], [97_i64]))
        .with_row(ViewRow::new(["Ohio", "Consumer"], [55_i64]))
    }

    fn monthly_trend() -> AggregationView {
        AggregationView::new("MonthlyTrend", ViewSchema::new(["month"], ["totalSales"]))
            .with_row(ViewRow::new(["2017-01"], [CellValue::from(dec!(1200.00))]))
            .with_row(ViewRow::new(["2017-02"], [CellValue::from(dec!(980.50))]))
    }

    fn indices(rows: &[VisibleRow]) -> Vec<usize> {
        rows.iter().map(|r| r.source_index).collect()
    }

    #[test]
    fn unrestricted_snapshot_returns_every_row_unchanged() {
        let view = state_orders();
        let visible = resolve(&view, &FilterState::new());

        assert_eq!(indices(&visible), vec![0, 1, 2, 3]);
        let rows: Vec<&ViewRow> = visible.iter().map(|v| &v.row).collect();
        assert_eq!(rows, view.rows.iter().collect::<Vec<_>>());
    }

    #[test]
    fn keeps_matching_rows_in_source_order() {
        let filters = FilterState::new().with(Dimension::State, ["California", "Ohio"]);
        let visible = resolve(&state_orders(), &filters);
        assert_eq!(indices(&visible), vec![0, 2, 3]);
    }

    #[test]
    fn every_restriction_must_hold() {
        let filters = FilterState::new()
            .with(Dimension::State, ["California"])
            .with(Dimension::Segment, ["Corporate"]);
        let visible = resolve(&state_orders(), &filters);
        assert_eq!(indices(&visible), vec![2]);
    }

    #[test]
    fn dimension_missing_from_schema_is_ignored() {
        let filters = FilterState::new().with(Dimension::State, ["California"]);
        let view = monthly_trend();

        let predicate = ViewPredicate::compile(&view.schema, &filters);
        assert!(predicate.is_pass_through());
        assert_eq!(predicate.ignored(), &[Dimension::State]);
        assert_eq!(indices(&resolve(&view, &filters)), vec![0, 1]);
    }

    #[test]
    fn value_absent_from_every_row_yields_nothing() {
        let filters = FilterState::new().with(Dimension::State, ["Alaska"]);
        assert!(resolve(&state_orders(), &filters).is_empty());
    }

    #[test]
    fn output_is_always_an_ordered_subset() {
        let view = state_orders();
        let snapshots = [
            FilterState::new().with(Dimension::Segment, ["Consumer"]),
            FilterState::new().with(Dimension::State, ["Texas", "Ohio"]),
            FilterState::new().with(Dimension::Category, ["Furniture"]),
            FilterState::new().with(Dimension::State, ["Nowhere"]),
        ];
        for filters in snapshots {
            let visible = resolve(&view, &filters);
            let idx = indices(&visible);
            assert!(idx.windows(2).all(|w| w[0] < w[1]), "{filters}: {idx:?}");
            for v in &visible {
                assert_eq!(view.rows[v.source_index], v.row);
            }
        }
    }

    #[test]
    fn short_row_fails_the_check_instead_of_panicking() {
        let view = AggregationView::new("Odd", ViewSchema::new(["state"], ["orders"]))
            .with_row(ViewRow::new(Vec::<String>::new(), [1_i64]));
        let filters = FilterState::new().with(Dimension::State, ["Texas"]);
        assert!(resolve(&view, &filters).is_empty());
    }
}
