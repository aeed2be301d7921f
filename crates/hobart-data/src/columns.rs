//! Column-name normalization and canonical field resolution.
//!
//! Source files disagree on headers (`Net Income` vs `Net_Income`,
//! `Company` vs `Company_Name`). Headers are first normalized, then mapped
//! onto a small set of canonical names the loader understands.

use std::collections::HashSet;

/// Canonical fields the loader extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Ticker symbol, the join key.
    Symbol,
    /// Company display name.
    Company,
    /// Sector label.
    Sector,
    /// Index weight.
    Weight,
    /// Net income.
    NetIncome,
}

impl Field {
    /// All canonical fields.
    pub const ALL: [Self; 5] = [
        Self::Symbol,
        Self::Company,
        Self::Sector,
        Self::Weight,
        Self::NetIncome,
    ];

    /// Fields a composition file must provide.
    pub const REQUIRED: [Self; 3] = [Self::Symbol, Self::Weight, Self::NetIncome];

    /// Canonical column name.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Company => "Company",
            Self::Sector => "Sector",
            Self::Weight => "Weight",
            Self::NetIncome => "Net_Income",
        }
    }

    /// Normalized, lowercased header spellings accepted for this field.
    const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Symbol => &["symbol"],
            Self::Company => &["company", "company_name"],
            Self::Sector => &["sector"],
            Self::Weight => &["weight"],
            Self::NetIncome => &["net_income", "netincome"],
        }
    }

    /// Field a normalized header resolves to, if any.
    pub fn from_header(header: &str) -> Option<Self> {
        let lower = header.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&lower.as_str()))
    }
}

/// Normalize a raw header.
///
/// Trims, joins whitespace-separated words with `_` and drops punctuation
/// other than `_` and `#`.
///
/// # Examples
///
/// ```
/// use hobart_data::normalize_column_name;
///
/// assert_eq!(normalize_column_name(" Net Income "), "Net_Income");
/// assert_eq!(normalize_column_name("Mkt. Cap"), "Mkt_Cap");
/// ```
pub fn normalize_column_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '#')
        .collect()
}

/// Normalize a header row and map known spellings onto canonical names.
///
/// The first header resolving to a field takes the canonical name; later
/// ones keep their normalized spelling. Empty headers become `column_<i>`
/// and duplicates get a numeric suffix so every name is unique.
pub fn canonical_headers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let normalized: Vec<String> = raw.into_iter().map(normalize_column_name).collect();
    let mut claimed: HashSet<Field> = HashSet::new();
    let mut used: HashSet<String> = HashSet::new();

    normalized
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let mut name = match Field::from_header(header) {
                Some(field) if claimed.insert(field) => field.column().to_string(),
                _ if header.is_empty() => format!("column_{i}"),
                _ => header.clone(),
            };

            if used.contains(&name) {
                let base = name.clone();
                let mut n = 2;
                while used.contains(&name) {
                    name = format!("{base}_{n}");
                    n += 1;
                }
            }
            used.insert(name.clone());
            name
        })
        .collect()
}
