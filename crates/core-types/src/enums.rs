use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dimensions a user can restrict from the dashboard's filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    #[serde(alias = "date", alias = "month")]
    DateBucket,
    #[serde(alias = "shipMode", alias = "ship_mode")]
    ShipMode,
    Category,
    #[serde(alias = "subCategory", alias = "sub_category")]
    SubCategory,
    State,
    Segment,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::DateBucket,
        Dimension::ShipMode,
        Dimension::Category,
        Dimension::SubCategory,
        Dimension::State,
        Dimension::Segment,
    ];

    /// The canonical kebab-case name, as used in filter files and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::DateBucket => "date-bucket",
            Dimension::ShipMode => "ship-mode",
            Dimension::Category => "category",
            Dimension::SubCategory => "sub-category",
            Dimension::State => "state",
            Dimension::Segment => "segment",
        }
    }

    /// Binds a view's dimension column to a filterable dimension.
    ///
    /// Matching ignores case and punctuation, so `shipMode`, `Ship Mode` and
    /// `ship_mode` all bind to [`Dimension::ShipMode`]. Time grain columns
    /// (`month`, `quarter`, `year`, `order date`) bind to the date bucket.
    /// Returns `None` for columns no filter can restrict.
    ///
    /// A view carrying several grains (say `year` and `month`) binds the date
    /// bucket to the first of them only. A `date-bucket` selection is then
    /// compared against that column alone, so month values applied to a
    /// `year, month` view match nothing and the section comes out empty.
    pub fn from_column(column: &str) -> Option<Self> {
        let key: String = column
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "datebucket" | "date" | "orderdate" | "month" | "quarter" | "year" | "week" => {
                Some(Dimension::DateBucket)
            }
            "shipmode" => Some(Dimension::ShipMode),
            "category" => Some(Dimension::Category),
            "subcategory" => Some(Dimension::SubCategory),
            "state" => Some(Dimension::State),
            "segment" | "customersegment" => Some(Dimension::Segment),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::from_column(s).ok_or_else(|| CoreError::UnknownDimension(s.to_string()))
    }
}
