use crate::enums::Dimension;
use crate::error::SchemaError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A single measure value in an aggregated row.
///
/// Untagged so the catalog JSON stays natural: `42` is an integer, `12.5` a
/// decimal, and every string is text, even one that looks numeric (`"02134"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    // Numbers only; the default decimal deserializer also accepts strings.
    Decimal(#[serde(with = "rust_decimal::serde::float")] Decimal),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Decimal(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// The declared shape of a view: dimension columns first, then measure columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSchema {
    pub dimensions: Vec<String>,
    pub measures: Vec<String>,
}

impl ViewSchema {
    pub fn new<D, M>(dimensions: D, measures: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimensions: dimensions.into_iter().map(Into::into).collect(),
            measures: measures.into_iter().map(Into::into).collect(),
        }
    }

    /// All column names in display order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.dimensions
            .iter()
            .chain(self.measures.iter())
            .map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.dimensions.len() + self.measures.len()
    }

    /// Position of the first dimension column bound to `dimension`, if any.
    ///
    /// Later columns bound to the same dimension are never filtered; see
    /// [`Dimension::from_column`] for the multi-grain date case.
    pub fn dimension_index(&self, dimension: Dimension) -> Option<usize> {
        self.dimensions
            .iter()
            .position(|column| Dimension::from_column(column) == Some(dimension))
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.column_count() == 0 {
            return Err(SchemaError::NoColumns);
        }
        let mut seen = HashSet::new();
        for (index, column) in self.columns().enumerate() {
            let trimmed = column.trim();
            if trimmed.is_empty() {
                return Err(SchemaError::BlankColumn(index));
            }
            if !seen.insert(trimmed) {
                return Err(SchemaError::DuplicateColumn(trimmed.to_string()));
            }
        }
        Ok(())
    }
}

/// One aggregated row, tagged with the dimension tuple it was aggregated over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub dimensions: Vec<String>,
    pub measures: Vec<CellValue>,
}

impl ViewRow {
    pub fn new<D, M>(dimensions: D, measures: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<CellValue>,
    {
        Self {
            dimensions: dimensions.into_iter().map(Into::into).collect(),
            measures: measures.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named, pre-computed aggregation of the sales dataset.
///
/// Views are produced by the external aggregation step and are read-only input
/// to the report pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationView {
    pub name: String,
    pub schema: ViewSchema,
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}

impl AggregationView {
    pub fn new(name: impl Into<String>, schema: ViewSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: ViewRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Checks the declared schema. Row contents are not inspected here.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        self.schema.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn state_orders() -> AggregationView {
        AggregationView::new("StateOrders", ViewSchema::new(["state"], ["orderCount"]))
            .with_row(ViewRow::new(["California"], [412_i64]))
            .with_row(ViewRow::new(["Texas"], [208_i64]))
    }

    #[test]
    fn valid_schema_passes() {
        assert_eq!(state_orders().validate(), Ok(()));
    }

    #[test]
    fn rejects_duplicate_columns_across_dimensions_and_measures() {
        let view = AggregationView::new("Dup", ViewSchema::new(["state"], ["state"]));
        assert_eq!(
            view.validate(),
            Err(SchemaError::DuplicateColumn("state".to_string()))
        );
    }

    #[test]
    fn rejects_blank_names_and_empty_schemas() {
        let unnamed = AggregationView::new("  ", ViewSchema::new(["state"], ["orders"]));
        assert_eq!(unnamed.validate(), Err(SchemaError::EmptyName));

        let empty = AggregationView::new("Empty", ViewSchema::default());
        assert_eq!(empty.validate(), Err(SchemaError::NoColumns));

        let blank = AggregationView::new("Blank", ViewSchema::new(["state", ""], ["orders"]));
        assert_eq!(blank.validate(), Err(SchemaError::BlankColumn(1)));
    }

    #[test]
    fn dimension_index_uses_column_binding() {
        let schema = ViewSchema::new(["region", "shipMode"], ["orderCount"]);
        assert_eq!(schema.dimension_index(Dimension::ShipMode), Some(1));
        assert_eq!(schema.dimension_index(Dimension::State), None);
    }

    #[test]
    fn multi_grain_view_binds_the_date_bucket_to_its_first_grain() {
        let schema = ViewSchema::new(["year", "month", "state"], ["orderCount"]);
        assert_eq!(schema.dimension_index(Dimension::DateBucket), Some(0));
        assert_eq!(schema.dimension_index(Dimension::State), Some(2));
    }

    #[test]
    fn parses_catalog_json() {
        let raw = r#"{
            "name": "MonthlyTrend",
            "schema": { "dimensions": ["month"], "measures": ["totalSales", "note"] },
            "rows": [ { "dimensions": ["2017-01"], "measures": [1234.50, "peak"] },
                      { "dimensions": ["2017-02"], "measures": [980, "flat"] } ]
        }"#;
        let view: AggregationView = serde_json::from_str(raw).unwrap();

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].measures[0], CellValue::Decimal(dec!(1234.50)));
        assert_eq!(view.rows[0].measures[1], CellValue::Text("peak".to_string()));
        assert_eq!(view.rows[1].measures[0], CellValue::Integer(980));
    }

    #[test]
    fn numeric_looking_strings_stay_text() {
        let raw = r#"{ "dimensions": ["Boston"], "measures": ["02134", "1e3", "1234.50"] }"#;
        let row: ViewRow = serde_json::from_str(raw).unwrap();

        assert_eq!(
            row.measures,
            vec![
                CellValue::from("02134"),
                CellValue::from("1e3"),
                CellValue::from("1234.50"),
            ]
        );
        let shown: Vec<String> = row.measures.iter().map(ToString::to_string).collect();
        assert_eq!(shown, ["02134", "1e3", "1234.50"]);
    }
}
