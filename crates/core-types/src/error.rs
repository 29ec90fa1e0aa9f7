use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown filter dimension: '{0}'")]
    UnknownDimension(String),
}

/// A defect in the declared shape of an aggregation view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("view name is empty")]
    EmptyName,

    #[error("schema declares no columns")]
    NoColumns,

    #[error("column {0} has a blank name")]
    BlankColumn(usize),

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),
}
