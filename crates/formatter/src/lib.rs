//! # Vista Formatter
//!
//! Turns an assembled [`ReportDocument`] into a fixed-width, bordered text layout.
//!
//! ## Architectural Principles
//!
//! - **Presentation Only:** Column sizing, borders and header styles are applied on top
//!   of the document. Rows are never reordered, dropped or renamed.
//! - **Deterministic:** Tables are rendered without consulting the terminal, so the
//!   same document always formats to the same bytes.
//! - **Fatal on Malformed Input:** A section whose rows disagree with its columns aborts
//!   formatting; there is no partial output.
//!
//! ## Public API
//!
//! - `format`: the formatting entry point.
//! - `FormattedDocument` / `FormattedSection`: the laid-out result.
//! - `FormatError`: the specific error types that can be returned from this crate.

use core_types::{NO_MATCHING_DATA, ReportDocument, Section, SectionBody};

pub mod error;
pub mod style;

pub use error::FormatError;

/// One section after layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSection {
    pub title: String,
    /// Width of the widest rendered value per column, header included.
    pub column_widths: Vec<usize>,
    pub row_count: usize,
    pub banner: String,
    pub table: String,
}

/// The laid-out report, ready to be written as a fixed-layout file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDocument {
    pub header: Vec<String>,
    pub sections: Vec<FormattedSection>,
}

impl FormattedDocument {
    /// The full text of the report, newline terminated.
    pub fn render(&self) -> String {
        let mut out = self.header.join("\n");
        for section in &self.sections {
            out.push_str("\n\n");
            out.push_str(&section.banner);
            out.push('\n');
            out.push_str(&section.table);
        }
        out.push('\n');
        out
    }
}

/// Lays out every section of `doc`, in document order.
#[tracing::instrument(name = "format", skip(doc), fields(sections = doc.sections.len()))]
pub fn format(doc: &ReportDocument) -> Result<FormattedDocument, FormatError> {
    let sections = doc
        .sections
        .iter()
        .map(format_section)
        .collect::<Result<Vec<_>, _>>()?;

    let header = vec![doc.title.clone(), format!("Filters: {}", doc.filters)];
    tracing::debug!(sections = sections.len(), "Report document formatted.");
    Ok(FormattedDocument { header, sections })
}

fn format_section(section: &Section) -> Result<FormattedSection, FormatError> {
    let columns: Vec<&str> = section.columns().collect();
    if columns.is_empty() {
        return Err(FormatError::NoColumns(section.title.clone()));
    }

    let rows: Vec<Vec<String>> = match &section.body {
        SectionBody::Rows(visible) => visible
            .iter()
            .enumerate()
            .map(|(index, visible)| {
                let cells: Vec<String> = visible
                    .row
                    .dimensions
                    .iter()
                    .cloned()
                    .chain(visible.row.measures.iter().map(style::render_cell))
                    .collect();
                if cells.len() == columns.len() {
                    Ok(cells)
                } else {
                    Err(FormatError::MalformedSection {
                        section: section.title.clone(),
                        row: index,
                        expected: columns.len(),
                        found: cells.len(),
                    })
                }
            })
            .collect::<Result<_, _>>()?,
        SectionBody::NoMatchingData => {
            let mut marker = vec![String::new(); columns.len()];
            marker[0] = NO_MATCHING_DATA.to_string();
            vec![marker]
        }
    };

    let column_widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            rows.iter()
                .map(|row| style::display_width(&row[index]))
                .fold(style::display_width(name), usize::max)
        })
        .collect();

    Ok(FormattedSection {
        title: section.title.clone(),
        row_count: section.rows().len(),
        banner: style::banner(&section.title),
        table: style::section_table(
            &columns,
            section.dimension_columns.len(),
            &rows,
            &column_widths,
        ),
        column_widths,
    })
}
