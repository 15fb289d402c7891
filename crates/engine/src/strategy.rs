use std::fmt;

use crate::config::{ColumnPatterns, MatchingType};
use crate::normalize::{normalize_email, normalize_phone};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Email,
    Phone,
}

impl KeyKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub fn normalize(&self, raw: Option<&str>) -> Option<String> {
        match self {
            Self::Email => normalize_email(raw),
            Self::Phone => normalize_phone(raw),
        }
    }
}

/// `"<kind>:<normalized value>"`. The kind prefix keeps a phone value from
/// ever colliding with an email value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(String);

impl MatchKey {
    pub fn new(kind: KeyKind, value: &str) -> Self {
        Self(format!("{}:{value}", kind.prefix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Column selection resolved once from the headers.
///
/// Each variant holds the positions it reads; `EmailOrPhone` also records
/// which normalizer each position uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStrategy {
    Email { columns: Vec<usize> },
    Phone { columns: Vec<usize> },
    EmailOrPhone { columns: Vec<(usize, KeyKind)> },
}

fn header_matches(header: &str, pattern: &str) -> bool {
    header.to_lowercase().contains(&pattern.to_lowercase())
}

fn columns_matching(headers: &[String], pattern: &str) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| header_matches(h, pattern))
        .map(|(i, _)| i)
        .collect()
}

impl MatchStrategy {
    pub fn new(matching: MatchingType, headers: &[String]) -> Self {
        Self::with_patterns(matching, headers, &ColumnPatterns::default())
    }

    pub fn with_patterns(
        matching: MatchingType,
        headers: &[String],
        patterns: &ColumnPatterns,
    ) -> Self {
        match matching {
            MatchingType::Email => Self::Email {
                columns: columns_matching(headers, &patterns.email),
            },
            MatchingType::Phone => Self::Phone {
                columns: columns_matching(headers, &patterns.phone),
            },
            MatchingType::EmailOrPhone => {
                // A header matching both patterns is read as email only.
                let columns = headers
                    .iter()
                    .enumerate()
                    .filter_map(|(i, h)| {
                        if header_matches(h, &patterns.email) {
                            Some((i, KeyKind::Email))
                        } else if header_matches(h, &patterns.phone) {
                            Some((i, KeyKind::Phone))
                        } else {
                            None
                        }
                    })
                    .collect();
                Self::EmailOrPhone { columns }
            }
        }
    }

    /// Positions of every column this strategy reads, in header order.
    pub fn key_columns(&self) -> Vec<usize> {
        match self {
            Self::Email { columns } | Self::Phone { columns } => columns.clone(),
            Self::EmailOrPhone { columns } => columns.iter().map(|(i, _)| *i).collect(),
        }
    }

    /// Keys present in `row`, in header order. Duplicates are kept.
    pub fn extract_keys(&self, row: &[String]) -> Vec<MatchKey> {
        let cell = |idx: usize| row.get(idx).map(String::as_str);
        let key = |idx: usize, kind: KeyKind| {
            kind.normalize(cell(idx)).map(|v| MatchKey::new(kind, &v))
        };

        match self {
            Self::Email { columns } => {
                columns.iter().filter_map(|&i| key(i, KeyKind::Email)).collect()
            }
            Self::Phone { columns } => {
                columns.iter().filter_map(|&i| key(i, KeyKind::Phone)).collect()
            }
            Self::EmailOrPhone { columns } => {
                columns.iter().filter_map(|&(i, kind)| key(i, kind)).collect()
            }
        }
    }
}
