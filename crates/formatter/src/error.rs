use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(
        "Section '{section}' is malformed: row {row} has {found} cell(s) but the section declares {expected} column(s)"
    )]
    MalformedSection {
        section: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Section '{0}' declares no columns")]
    NoColumns(String),
}
