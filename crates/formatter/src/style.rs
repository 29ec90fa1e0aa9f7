use comfy_table::{Cell, CellAlignment, ColumnConstraint, ContentArrangement, Table, Width};
use core_types::CellValue;
use rust_decimal::RoundingStrategy;

/// Box characters for section tables, in comfy-table preset order.
/// The `═` rule under the column header is what sets it apart from body rows.
pub const SECTION_TABLE: &str = "││──╞═╪╡│    ┬┴┌┐└┘";

/// A double-line frame for the section header row.
pub const SECTION_BANNER: &str = "║║══           ╔╗╚╝";

/// Fractional digits shown for decimal measures.
pub const DECIMAL_PLACES: u32 = 2;

/// The text a measure is displayed as.
pub fn render_cell(value: &CellValue) -> String {
    match value {
        CellValue::Decimal(v) => {
            let mut rounded =
                v.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(DECIMAL_PLACES);
            rounded.to_string()
        }
        other => other.to_string(),
    }
}

/// Display width of a rendered value.
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// A table that never consults the terminal, so identical input renders identical bytes.
fn fixed_table(preset: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Disabled)
        .force_no_tty();
    table
}

pub fn banner(title: &str) -> String {
    let mut table = fixed_table(SECTION_BANNER);
    table.add_row(vec![Cell::new(title)]);
    table.to_string()
}

/// Renders one section body. The first `dimension_count` columns are left-aligned,
/// measures are right-aligned, and the header row is centred.
pub fn section_table(
    columns: &[&str],
    dimension_count: usize,
    rows: &[Vec<String>],
    widths: &[usize],
) -> String {
    let mut table = fixed_table(SECTION_TABLE);

    table.set_header(
        columns
            .iter()
            .map(|name| Cell::new(name).set_alignment(CellAlignment::Center))
            .collect::<Vec<_>>(),
    );

    for row in rows {
        table.add_row(
            row.iter()
                .enumerate()
                .map(|(index, text)| {
                    let alignment = if index < dimension_count {
                        CellAlignment::Left
                    } else {
                        CellAlignment::Right
                    };
                    Cell::new(text).set_alignment(alignment)
                })
                .collect::<Vec<_>>(),
        );
    }

    for (index, width) in widths.iter().enumerate() {
        if let Some(column) = table.column_mut(index) {
            let width = u16::try_from(*width).unwrap_or(u16::MAX);
            column.set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(width)));
        }
    }

    table.to_string()
}
