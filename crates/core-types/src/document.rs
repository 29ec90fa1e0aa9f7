use crate::filters::FilterState;
use crate::view::ViewRow;

/// Marker rendered in place of rows when a section has nothing visible.
pub const NO_MATCHING_DATA: &str = "(no matching data)";

/// A view row that passed the filter snapshot, with its position in the source view.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow {
    pub source_index: usize,
    pub row: ViewRow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Rows(Vec<VisibleRow>),
    NoMatchingData,
}

/// The rows of exactly one view, under that view's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub dimension_columns: Vec<String>,
    pub measure_columns: Vec<String>,
    pub body: SectionBody,
}

impl Section {
    /// Dimension columns followed by measure columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.dimension_columns
            .iter()
            .chain(self.measure_columns.iter())
            .map(String::as_str)
    }

    pub fn rows(&self) -> &[VisibleRow] {
        match &self.body {
            SectionBody::Rows(rows) => rows,
            SectionBody::NoMatchingData => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, SectionBody::NoMatchingData)
    }
}

/// The consolidated, not yet formatted report: one section per input view.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub filters: FilterState,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    pub fn visible_row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows().len()).sum()
    }
}
