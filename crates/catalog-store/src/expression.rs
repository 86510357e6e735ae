use bson::{Bson, Document};
use catalog_query::{Filter, FilterGroup, FilterNode, LogicalOp, Operator};
use regex::Regex;

use crate::compare::{get_path, values_eq};
use crate::error::StoreError;

/// A filter tree compiled for evaluation.
///
/// Regex patterns are compiled once here instead of once per document.
#[derive(Debug, Clone)]
pub(crate) enum Expression {
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Eq(String, Bson),
    In(String, Vec<Bson>),
    Regex(String, Regex),
}

impl Expression {
    /// `None` compiles to an empty conjunction, which matches every document.
    pub(crate) fn compile(group: Option<&FilterGroup>) -> Result<Self, StoreError> {
        match group {
            Some(group) => compile_group(group),
            None => Ok(Expression::And(Vec::new())),
        }
    }

    pub(crate) fn matches(&self, doc: &Document) -> bool {
        match self {
            Expression::And(children) => children.iter().all(|c| c.matches(doc)),
            Expression::Or(children) => children.iter().any(|c| c.matches(doc)),
            Expression::Eq(field, val) => match get_path(doc, field) {
                Some(Bson::Array(arr)) => arr.iter().any(|elem| values_eq(elem, val)),
                Some(v) => values_eq(v, val),
                None => false,
            },
            Expression::In(field, set) => match get_path(doc, field) {
                Some(Bson::Array(arr)) => arr
                    .iter()
                    .any(|elem| set.iter().any(|candidate| values_eq(elem, candidate))),
                Some(v) => set.iter().any(|candidate| values_eq(v, candidate)),
                None => false,
            },
            Expression::Regex(field, re) => match get_path(doc, field) {
                Some(Bson::String(s)) => re.is_match(s),
                _ => false,
            },
        }
    }
}

fn compile_group(group: &FilterGroup) -> Result<Expression, StoreError> {
    let children = group
        .children
        .iter()
        .map(compile_node)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match group.logical {
        LogicalOp::And => Expression::And(children),
        LogicalOp::Or => Expression::Or(children),
    })
}

fn compile_node(node: &FilterNode) -> Result<Expression, StoreError> {
    match node {
        FilterNode::Condition(filter) => compile_filter(filter),
        FilterNode::Group(group) => compile_group(group),
    }
}

fn compile_filter(filter: &Filter) -> Result<Expression, StoreError> {
    let field = filter.field.clone();
    match filter.operator {
        Operator::Eq => Ok(Expression::Eq(field, filter.value.clone())),
        Operator::In => match &filter.value {
            Bson::Array(values) => Ok(Expression::In(field, values.clone())),
            other => Err(StoreError::InvalidQuery(format!(
                "in value for {field} must be an array, got {other}"
            ))),
        },
        Operator::Regex => match &filter.value {
            Bson::String(pattern) => {
                let re = Regex::new(pattern).map_err(|e| {
                    StoreError::InvalidQuery(format!("invalid regex pattern for {field}: {e}"))
                })?;
                Ok(Expression::Regex(field, re))
            }
            other => Err(StoreError::InvalidQuery(format!(
                "regex value for {field} must be a string, got {other}"
            ))),
        },
    }
}
