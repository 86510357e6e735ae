use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::operator::Operator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: Bson,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Eq,
            value: value.into(),
        }
    }

    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        Self {
            field: field.into(),
            operator: Operator::In,
            value: Bson::Array(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Regex,
            value: Bson::String(pattern.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterNode {
    Condition(Filter),
    Group(FilterGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub logical: LogicalOp,
    pub children: Vec<FilterNode>,
}

impl FilterGroup {
    /// Conjunction of plain conditions.
    pub fn all(conditions: impl IntoIterator<Item = Filter>) -> Self {
        Self {
            logical: LogicalOp::And,
            children: conditions.into_iter().map(FilterNode::Condition).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_in_builds_array_value() {
        let f = Filter::is_in("category", ["A", "B"]);
        assert_eq!(f.operator, Operator::In);
        assert_eq!(
            f.value,
            Bson::Array(vec![Bson::String("A".into()), Bson::String("B".into())])
        );
    }

    #[test]
    fn is_in_with_no_values_is_empty_array() {
        let f = Filter::is_in("category", Vec::<String>::new());
        assert_eq!(f.value, Bson::Array(vec![]));
    }

    #[test]
    fn all_wraps_conditions() {
        let group = FilterGroup::all([Filter::eq("a", 1_i32), Filter::regex("b", "x")]);
        assert_eq!(group.logical, LogicalOp::And);
        assert_eq!(group.children.len(), 2);
        assert!(matches!(&group.children[1], FilterNode::Condition(f) if f.field == "b"));
    }

    #[test]
    fn serde_shape_is_snake_case() {
        let group = FilterGroup::all([Filter::eq("status", "active")]);
        let json = serde_json::to_string(&group).unwrap();
        assert!(json.contains("\"logical\":\"and\""), "{json}");
        assert!(json.contains("\"condition\""), "{json}");
        assert!(json.contains("\"operator\":\"eq\""), "{json}");
    }
}
