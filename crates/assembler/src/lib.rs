//! # Vista Report Assembler
//!
//! Consolidates the visible rows of every selected view into one ordered
//! [`ReportDocument`].
//!
//! ## Architectural Principles
//!
//! - **One Section Per View:** Sections follow the caller's display order and are never
//!   merged, even when two views share a schema. A row's section is its provenance.
//! - **All or Nothing:** Every view and row is checked against its declared schema
//!   before the first section is built. A structural defect aborts the whole document.
//! - **Empty Is Not an Error:** A view with no visible rows still gets its section,
//!   marked as having no matching data.
//!
//! ## Public API
//!
//! - `ReportAssembler`: builds a `ReportDocument` from views and a filter snapshot.
//! - `AssemblyError`: the specific error types that can be returned from this crate.

use core_types::{AggregationView, FilterState, ReportDocument, Section, SectionBody};

pub mod error;

pub use error::AssemblyError;

pub const DEFAULT_TITLE: &str = "Sales Report";

/// Builds report documents under a fixed title.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    title: String,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl ReportAssembler {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Assembles one section per view, in the order given.
    #[tracing::instrument(
        name = "assemble",
        skip(self, views, filters),
        fields(views = views.len(), filters = %filters)
    )]
    pub fn assemble(
        &self,
        views: &[AggregationView],
        filters: &FilterState,
    ) -> Result<ReportDocument, AssemblyError> {
        for view in views {
            check_structure(view)?;
        }

        let sections: Vec<Section> = views
            .iter()
            .map(|view| {
                let visible = visibility::resolve(view, filters);
                let body = if visible.is_empty() {
                    SectionBody::NoMatchingData
                } else {
                    SectionBody::Rows(visible)
                };
                Section {
                    title: view.name.clone(),
                    dimension_columns: view.schema.dimensions.clone(),
                    measure_columns: view.schema.measures.clone(),
                    body,
                }
            })
            .collect();

        let document = ReportDocument {
            title: self.title.clone(),
            filters: filters.clone(),
            sections,
        };
        tracing::info!(
            sections = document.sections.len(),
            visible_rows = document.visible_row_count(),
            "Report document assembled."
        );
        Ok(document)
    }
}

/// Verifies the declared schema and that every row carries exactly the declared columns.
fn check_structure(view: &AggregationView) -> Result<(), AssemblyError> {
    view.validate().map_err(|source| AssemblyError::Schema {
        view: view.name.clone(),
        source,
    })?;

    let dims = view.schema.dimensions.len();
    let measures = view.schema.measures.len();
    for (index, row) in view.rows.iter().enumerate() {
        if row.dimensions.len() != dims || row.measures.len() != measures {
            return Err(AssemblyError::RowShape {
                view: view.name.clone(),
                row: index,
                expected: format!("{} dimension(s) and {} measure(s)", dims, measures),
                found: format!(
                    "{} dimension(s) and {} measure(s)",
                    row.dimensions.len(),
                    row.measures.len()
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CellValue, Dimension, SchemaError, ViewRow, ViewSchema};
    use rust_decimal_macros::dec;

    fn views() -> Vec<AggregationView> {
        vec![
            AggregationView::new("MonthlyTrend", ViewSchema::new(["month"], ["totalSales"]))
                .with_row(ViewRow::new(["2017-01"], [CellValue::from(dec!(14236.90))]))
                .with_row(ViewRow::new(["2017-02"], [CellValue::from(dec!(4519.89))])),
            AggregationView::new("StateOrders", ViewSchema::new(["state"], ["orderCount"]))
                .with_row(ViewRow::new(["California"], [412_i64]))
                .with_row(ViewRow::new(["Texas"], [208_i64])),
            AggregationView::new("ShipModeShare", ViewSchema::new(["shipMode"], ["orderCount"]))
                .with_row(ViewRow::new(["Standard Class"], [600_i64]))
                .with_row(ViewRow::new(["First Class"], [150_i64])),
        ]
    }

    fn titles(doc: &ReportDocument) -> Vec<&str> {
        doc.sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn state_filter_only_narrows_views_with_a_state_column() {
        let filters = FilterState::new().with(Dimension::State, ["California"]);
        let doc = ReportAssembler::default().assemble(&views(), &filters).unwrap();

        assert_eq!(titles(&doc), ["MonthlyTrend", "StateOrders", "ShipModeShare"]);
        assert_eq!(doc.sections[0].rows().len(), 2);
        assert_eq!(doc.sections[1].rows().len(), 1);
        assert_eq!(doc.sections[1].rows()[0].row.dimensions, ["California"]);
        assert_eq!(doc.sections[2].rows().len(), 2);
        assert_eq!(doc.filters, filters);
    }

    #[test]
    fn sections_follow_the_callers_order() {
        let mut reordered = views();
        reordered.reverse();
        let doc = ReportAssembler::default()
            .assemble(&reordered, &FilterState::new())
            .unwrap();
        assert_eq!(titles(&doc), ["ShipModeShare", "StateOrders", "MonthlyTrend"]);
    }

    #[test]
    fn empty_result_keeps_its_section() {
        let filters = FilterState::new().with(Dimension::ShipMode, ["Same Day"]);
        let doc = ReportAssembler::default().assemble(&views(), &filters).unwrap();

        assert_eq!(doc.sections.len(), 3);
        assert!(doc.sections[2].is_empty());
        assert_eq!(doc.sections[2].body, SectionBody::NoMatchingData);
        assert!(!doc.sections[0].is_empty());
    }

    #[test]
    fn identical_schemas_stay_in_separate_sections() {
        let a = AggregationView::new("East", ViewSchema::new(["state"], ["orders"]))
            .with_row(ViewRow::new(["New York"], [10_i64]));
        let b = AggregationView::new("West", ViewSchema::new(["state"], ["orders"]))
            .with_row(ViewRow::new(["Oregon"], [7_i64]));
        let doc = ReportAssembler::default()
            .assemble(&[a, b], &FilterState::new())
            .unwrap();

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].rows()[0].row.dimensions, ["New York"]);
        assert_eq!(doc.sections[1].rows()[0].row.dimensions, ["Oregon"]);
    }

    #[test]
    fn row_missing_a_declared_column_aborts_assembly() {
        let mut all = views();
        all[1].rows.push(ViewRow::new(["Ohio"], Vec::<CellValue>::new()));

        let err = ReportAssembler::default()
            .assemble(&all, &FilterState::new())
            .unwrap_err();
        match err {
            AssemblyError::RowShape { view, row, .. } => {
                assert_eq!(view, "StateOrders");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_schema_aborts_assembly() {
        let mut all = views();
        all.push(AggregationView::new("Broken", ViewSchema::new(["state"], ["state"])));

        let err = ReportAssembler::default()
            .assemble(&all, &FilterState::new())
            .unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Schema { ref view, source: SchemaError::DuplicateColumn(_) } if view == "Broken"
        ));
    }
}
