use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::AppError;

/// Columns an entry search may filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    ReadingName,
    PersonName,
    ClanName,
    StartDate,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::ReadingName,
        SearchField::PersonName,
        SearchField::ClanName,
        SearchField::StartDate,
    ];

    pub fn column(self) -> &'static str {
        match self {
            SearchField::ReadingName => "reading_name",
            SearchField::PersonName => "person_name",
            SearchField::ClanName => "clan_name",
            SearchField::StartDate => "start_date",
        }
    }

    /// `start_date` matches its literal `YYYY-MM-DD` text exactly; the text
    /// columns match case-insensitive substrings.
    pub fn is_exact(self) -> bool {
        matches!(self, SearchField::StartDate)
    }
}

impl FromStr for SearchField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchField::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| AppError::Validation(format!("Invalid field: {s}")))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Parses a `YYYY-MM-DD` query parameter.
pub fn parse_target_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format. Use YYYY-MM-DD.".to_string()))
}

/// Builds an ILIKE pattern that matches `query` as a literal substring.
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
