//! Input rows and reconciled output records.

use super::listing::{Observation, PageSource};

/// One row of the input dataset, columns in file order.
///
/// Column names are stored normalised (trimmed, upper-cased) so lookups are
/// insensitive to the spreadsheet's header spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRow {
    columns: Vec<(String, String)>,
}

impl InputRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (normalize_column_name(k.as_ref()), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let wanted = normalize_column_name(column);
        self.columns
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `column` when present and not blank.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn columns(&self) -> &[(String, String)] {
        &self.columns
    }
}

pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Reconciliation of one search observation with an optional product observation.
///
/// The product namespace is `None` when the product page could not be observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub input: InputRow,
    pub search: Observation,
    pub product: Option<Observation>,
}

impl OutputRecord {
    /// Flat `(column, value)` view; `None` renders as an empty cell.
    pub fn to_columns(&self) -> Vec<(String, Option<String>)> {
        let mut columns: Vec<(String, Option<String>)> = self
            .input
            .columns()
            .iter()
            .map(|(name, value)| (name.clone(), Some(value.clone())))
            .collect();

        push_namespace(&mut columns, PageSource::SearchPage, Some(&self.search));
        push_namespace(&mut columns, PageSource::ProductPage, self.product.as_ref());
        columns
    }
}

fn push_namespace(
    columns: &mut Vec<(String, Option<String>)>,
    source: PageSource,
    observation: Option<&Observation>,
) {
    let ns = match source {
        PageSource::SearchPage => "Search",
        PageSource::ProductPage => "Product",
    };

    columns.push((format!("{ns} Title"), observation.and_then(|o| o.title.clone())));
    columns.push((format!("{ns} URL"), observation.and_then(|o| o.url.clone())));
    columns.push((
        format!("{ns} Identifier"),
        observation.and_then(|o| o.identifier.as_ref().map(ToString::to_string)),
    ));

    for format in super::format::BookFormat::ALL {
        columns.push((
            format!("{ns} {} Price", format.display_name()),
            observation.and_then(|o| o.prices.get(format).map(ToString::to_string)),
        ));
    }

    if source == PageSource::SearchPage {
        columns.push((
            format!("{ns} Listing Count"),
            observation.and_then(|o| o.listing_count.map(|c| c.to_string())),
        ));
    }
}
