use std::str::FromStr;

use serde::Deserialize;

use crate::error::GroupError;

// ---------------------------------------------------------------------------
// Matching type
// ---------------------------------------------------------------------------

/// Which identifying fields link two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingType {
    Email,
    Phone,
    EmailOrPhone,
}

impl MatchingType {
    pub const ALL: [MatchingType; 3] = [Self::Email, Self::Phone, Self::EmailOrPhone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::EmailOrPhone => "email_or_phone",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Email => "Match records with the same email address",
            Self::Phone => "Match records with the same phone number",
            Self::EmailOrPhone => "Match records with the same email OR phone",
        }
    }
}

impl FromStr for MatchingType {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GroupError::InvalidInput(format!("invalid matching type: {s}")))
    }
}

impl std::fmt::Display for MatchingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

pub const DEFAULT_ID_COLUMN: &str = "PersonID";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Default matching type when none is given on the command line.
    #[serde(default)]
    pub matching: Option<MatchingType>,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default)]
    pub columns: ColumnPatterns,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            matching: None,
            id_column: default_id_column(),
            columns: ColumnPatterns::default(),
        }
    }
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.into()
}

// ---------------------------------------------------------------------------
// Column patterns
// ---------------------------------------------------------------------------

/// Header substrings (case-insensitive) that mark identifying columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnPatterns {
    #[serde(default = "default_email_pattern")]
    pub email: String,
    #[serde(default = "default_phone_pattern")]
    pub phone: String,
}

impl Default for ColumnPatterns {
    fn default() -> Self {
        Self {
            email: default_email_pattern(),
            phone: default_phone_pattern(),
        }
    }
}

fn default_email_pattern() -> String {
    "email".into()
}

fn default_phone_pattern() -> String {
    "phone".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl GroupConfig {
    pub fn from_toml(input: &str) -> Result<Self, GroupError> {
        let config: GroupConfig =
            toml::from_str(input).map_err(|e| GroupError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GroupError> {
        if self.id_column.trim().is_empty() {
            return Err(GroupError::ConfigValidation("id_column must not be blank".into()));
        }
        if self.columns.email.trim().is_empty() {
            return Err(GroupError::ConfigValidation(
                "columns.email pattern must not be blank".into(),
            ));
        }
        if self.columns.phone.trim().is_empty() {
            return Err(GroupError::ConfigValidation(
                "columns.phone pattern must not be blank".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
