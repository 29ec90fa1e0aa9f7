use core_types::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("View '{view}' has a malformed schema: {source}")]
    Schema {
        view: String,
        #[source]
        source: SchemaError,
    },

    #[error(
        "Row {row} of view '{view}' does not match its schema: expected {expected}, found {found}"
    )]
    RowShape {
        view: String,
        row: usize,
        expected: String,
        found: String,
    },
}
