use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction: {0:?} (expected ASC or DESC)")]
pub struct SortParseError(pub String);

/// Parses the literal tokens `ASC` and `DESC`. Matching is case-sensitive.
impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(SortParseError(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("ASC"),
            SortDirection::Desc => f.write_str("DESC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_tokens() {
        assert_eq!("ASC".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
    }

    #[test]
    fn rejects_other_casing() {
        let err = "asc".parse::<SortDirection>().unwrap_err();
        assert_eq!(err, SortParseError("asc".into()));
        assert!(err.to_string().contains("\"asc\""), "{err}");
    }

    #[test]
    fn rejects_numeric_direction() {
        assert!("1".parse::<SortDirection>().is_err());
        assert!("".parse::<SortDirection>().is_err());
    }

    #[test]
    fn display_matches_token() {
        assert_eq!(SortDirection::Desc.to_string(), "DESC");
    }
}
