/// Optional parameters of a product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindProductsQuery {
    /// Substring of `commercialName`.
    pub name: Option<String>,
    /// Accepted categories. `Some(vec![])` matches nothing; a blank query
    /// value (`categories[]=`) is the category `""`.
    pub categories: Option<Vec<String>>,
    pub order_by: Option<String>,
    pub order: Option<String>,
}

impl FindProductsQuery {
    /// Build from decoded query-string pairs.
    ///
    /// `categories[]` and `categories` both append to the category set; for
    /// the other keys the last occurrence wins. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = FindProductsQuery::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "name" => query.name = Some(value.into()),
                "categories[]" | "categories" => query
                    .categories
                    .get_or_insert_with(Vec::new)
                    .push(value.into()),
                "orderBy" => query.order_by = Some(value.into()),
                "order" => query.order = Some(value.into()),
                _ => {}
            }
        }
        query
    }
}

/// Recognized `orderBy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Name,
    Amount,
}

impl OrderBy {
    /// Exact, case-sensitive match. Anything else has no effect on ordering.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(OrderBy::Name),
            "amount" => Some(OrderBy::Amount),
            _ => None,
        }
    }

    /// Document field the value sorts on.
    pub fn field(self) -> &'static str {
        match self {
            OrderBy::Name => "commercialName",
            OrderBy::Amount => "amount",
        }
    }
}
