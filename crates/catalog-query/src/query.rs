use serde::{Deserialize, Serialize};

use crate::filter::FilterGroup;
use crate::sort::Sort;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filter: Option<FilterGroup>,
    #[serde(default)]
    pub sort: Vec<Sort>,
}
