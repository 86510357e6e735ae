use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    /// Field value (or any element of an array field) is one of the values
    /// in the filter's array.
    In,
    /// Filter value is a regular expression matched against string fields.
    Regex,
}
