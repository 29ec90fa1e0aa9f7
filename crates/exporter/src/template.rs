use crate::error::ExportError;
use chrono::NaiveDate;
use std::fmt;

pub const DATE_PLACEHOLDER: &str = "{date}";
pub const DEFAULT_NAME_TEMPLATE: &str = "Report_{date}.txt";

/// A file name pattern with exactly one `{date}` placeholder, e.g. `Report_{date}.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate(String);

impl NameTemplate {
    pub fn parse(template: &str) -> Result<Self, ExportError> {
        let invalid = |reason: &str| ExportError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        match template.matches(DATE_PLACEHOLDER).count() {
            0 => return Err(invalid("missing the {date} placeholder")),
            1 => {}
            _ => return Err(invalid("the {date} placeholder may appear only once")),
        }
        if template.contains(['/', '\\']) {
            return Err(invalid("must be a file name, not a path"));
        }
        if template.replace(DATE_PLACEHOLDER, "").contains(['{', '}']) {
            return Err(invalid("only the {date} placeholder is supported"));
        }
        Ok(Self(template.to_string()))
    }

    /// The artifact file name for a report generated on `as_of`.
    pub fn file_name(&self, as_of: NaiveDate) -> String {
        self.0
            .replace(DATE_PLACEHOLDER, &as_of.format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self(DEFAULT_NAME_TEMPLATE.to_string())
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
